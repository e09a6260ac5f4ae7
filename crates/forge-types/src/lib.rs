//! Forge Type Model
//!
//! The host type system the Forge engine works against: primitive and
//! declared types, runtime values, instances, class and interface
//! descriptors, a builder to define them, and the concurrent registry that
//! resolves them by name.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod builder;
pub mod descriptor;
pub mod error;
pub mod hierarchy;
pub mod object;
pub mod registry;
pub mod resolver;
pub mod ty;
pub mod value;

pub use builder::{ConstructorDefinition, FieldDefinition, MethodDefinition, TypeBuilder};
pub use descriptor::{
    ConstructorBody, ConstructorInfo, FieldInfo, MethodBody, MethodInfo, Modifiers, TypeDescriptor,
    TypeId, TypeKind, Visibility,
};
pub use error::{InvokeError, TypeError};
pub use hierarchy::Ancestors;
pub use object::{Array, ArrayRef, Instance, ObjectRef};
pub use registry::TypeRegistry;
pub use resolver::{resolve_type_by_name, short_name, ResolvedType};
pub use ty::{PrimitiveType, TypeRef};
pub use value::Value;
