//! Method dispatch on live instances
//!
//! Resolves a method by name and argument types against the instance's
//! runtime type, the way a virtual call would, and runs its body. Visibility is not
//! checked; test code calls private helpers as readily as public ones.

use std::panic::{self, AssertUnwindSafe};

use forge_types::{InvokeError, ObjectRef, TypeError, TypeRef, Value};

use crate::allocation::panic_message;
use crate::{ForgeError, ForgeResult};

/// Invoke `method` on `instance`
///
/// Arguments are coerced to the parameter types; a `void` method returns
/// `Value::Null`.
pub fn invoke(instance: &ObjectRef, method: &str, args: &[Value]) -> ForgeResult<Value> {
    let class = instance.class();
    let resolved = class
        .resolve_method(method, args)
        .ok_or_else(|| ForgeError::MethodNotFound {
            type_name: class.name().to_string(),
            method: method.to_string(),
            arity: args.len(),
        })?;

    let body = resolved.body.as_ref().ok_or_else(|| ForgeError::AbstractMethod {
        type_name: class.name().to_string(),
        method: method.to_string(),
    })?;

    let coerced = resolved
        .params
        .iter()
        .zip(args)
        .enumerate()
        .map(|(index, (param, arg))| {
            param.coerce(arg.clone()).map_err(|e| {
                let (expected, actual) = match e {
                    TypeError::Mismatch { expected, actual } => (expected, actual),
                    other => (param.to_string(), other.to_string()),
                };
                ForgeError::TypeMismatch {
                    field: format!("arg{}", index),
                    expected,
                    actual,
                }
            })
        })
        .collect::<ForgeResult<Vec<Value>>>()?;

    let target = format!("{}.{}", class.name(), method);
    let result = match panic::catch_unwind(AssertUnwindSafe(|| body(instance, &coerced))) {
        Ok(result) => result,
        Err(payload) => Err(InvokeError::new(format!("panicked: {}", panic_message(payload.as_ref())))),
    };
    let value = result.map_err(|source| ForgeError::Invocation { target, source })?;

    if resolved.return_type == TypeRef::Void {
        Ok(Value::Null)
    } else {
        Ok(value)
    }
}
