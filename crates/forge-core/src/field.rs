//! Field Accessor
//!
//! Reads and writes a named field of a live instance for test setup. The
//! lookup starts at the instance's runtime type and walks up the superclass
//! chain; the nearest declaring type wins when a name is shadowed.
//!
//! This path deliberately ignores visibility and `final`: a private final
//! field is as writable as a public one. The declared modifiers are left
//! untouched, so nothing about the override outlives the call.

use forge_types::{FieldInfo, ObjectRef, TypeError, Value};

use crate::{ForgeError, ForgeResult};

fn locate<'a>(instance: &'a ObjectRef, field_name: &str) -> ForgeResult<&'a FieldInfo> {
    instance
        .class()
        .find_field(field_name)
        .ok_or_else(|| ForgeError::FieldNotFound {
            type_name: instance.class().name().to_string(),
            field: field_name.to_string(),
        })
}

/// Read a field of `instance`
pub fn get_field(instance: &ObjectRef, field_name: &str) -> ForgeResult<Value> {
    let field = locate(instance, field_name)?;
    instance.load(field.slot).ok_or_else(|| ForgeError::FieldNotFound {
        type_name: instance.class().name().to_string(),
        field: field_name.to_string(),
    })
}

/// Overwrite a field of `instance`
///
/// The value is coerced to the field's declared type (primitive widening,
/// null or subtypes for references). Anything else is a `TypeMismatch`.
pub fn set_field(instance: &ObjectRef, field_name: &str, value: Value) -> ForgeResult<()> {
    let field = locate(instance, field_name)?;
    let value = field.ty.coerce(value).map_err(|e| match e {
        TypeError::Mismatch { expected, actual } => ForgeError::TypeMismatch {
            field: field_name.to_string(),
            expected,
            actual,
        },
        other => ForgeError::TypeMismatch {
            field: field_name.to_string(),
            expected: field.ty.to_string(),
            actual: other.to_string(),
        },
    })?;

    if instance.store(field.slot, value) {
        Ok(())
    } else {
        Err(ForgeError::FieldNotFound {
            type_name: instance.class().name().to_string(),
            field: field_name.to_string(),
        })
    }
}
