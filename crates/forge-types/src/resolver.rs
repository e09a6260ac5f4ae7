//! Name resolution helpers

use std::sync::Arc;

use crate::descriptor::TypeDescriptor;
use crate::error::TypeError;
use crate::registry::TypeRegistry;
use crate::ty::{PrimitiveType, TypeRef};

/// Result of resolving a type name
#[derive(Debug, Clone)]
pub enum ResolvedType {
    /// One of the eight primitive types
    Primitive(PrimitiveType),
    /// A registered class or interface
    Reference(Arc<TypeDescriptor>),
    /// An array type; the element type has been checked to exist
    Array(TypeRef),
}

impl ResolvedType {
    /// The declared-type form of this resolution
    pub fn to_type_ref(&self) -> TypeRef {
        match self {
            ResolvedType::Primitive(p) => TypeRef::Primitive(*p),
            ResolvedType::Reference(descriptor) => TypeRef::Class(descriptor.name().to_string()),
            ResolvedType::Array(ty) => ty.clone(),
        }
    }
}

/// Resolve a type name
///
/// The primitive names (`float`, `byte`, `char`, `short`, `double`, `int`,
/// `long`, `boolean`) are recognized first, then the `[]` array suffix,
/// then the registry is consulted.
pub fn resolve_type_by_name(registry: &TypeRegistry, name: &str) -> Result<ResolvedType, TypeError> {
    let name = name.trim();

    if let Some(primitive) = PrimitiveType::from_name(name) {
        return Ok(ResolvedType::Primitive(primitive));
    }

    if let Some(element) = name.strip_suffix("[]") {
        let element = resolve_type_by_name(registry, element)?;
        return Ok(ResolvedType::Array(TypeRef::array_of(element.to_type_ref())));
    }

    registry.lookup(name).map(ResolvedType::Reference)
}

/// Strip the namespace from a qualified name
pub fn short_name(qualified: &str) -> &str {
    match qualified.rfind('.') {
        Some(index) => &qualified[index + 1..],
        None => qualified,
    }
}
