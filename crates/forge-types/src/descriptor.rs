//! Type descriptors
//!
//! A [`TypeDescriptor`] is the read-only view of one class or interface:
//! its modifiers, declared members and direct ancestry. Descriptors are
//! created through [`TypeBuilder`](crate::TypeBuilder) and shared as
//! `Arc<TypeDescriptor>`; identity of a type is identity of that allocation
//! (or, equivalently, its [`TypeId`]).

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::InvokeError;
use crate::object::ObjectRef;
use crate::ty::TypeRef;
use crate::value::Value;

/// Process-unique identifier of a type descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u64);

impl TypeId {
    /// Allocate a fresh id
    pub(crate) fn fresh() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        TypeId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

/// Class or interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// Class (abstract or concrete)
    Class,
    /// Interface
    Interface,
}

/// Member or type visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Visible everywhere
    Public,
    /// Visible to subtypes
    Protected,
    /// Visible within the declaring namespace
    #[default]
    Package,
    /// Visible to the declaring type only
    Private,
}

/// Modifier flags for types and members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Visibility
    pub visibility: Visibility,
    /// Abstract type or member
    pub is_abstract: bool,
    /// Final type (cannot be extended) or final field (cannot be reassigned)
    pub is_final: bool,
}

impl Modifiers {
    /// Public, non-abstract, non-final
    pub const fn public() -> Self {
        Self {
            visibility: Visibility::Public,
            is_abstract: false,
            is_final: false,
        }
    }

    /// Same flags with visibility widened to public
    pub fn widened(self) -> Self {
        Self {
            visibility: Visibility::Public,
            ..self
        }
    }

    /// Check for public visibility
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

/// Body of a method: receives the instance and the arguments
pub type MethodBody = Arc<dyn Fn(&ObjectRef, &[Value]) -> Result<Value, InvokeError> + Send + Sync>;

/// Body of a constructor: receives the instance under construction and the arguments
pub type ConstructorBody = Arc<dyn Fn(&ObjectRef, &[Value]) -> Result<(), InvokeError> + Send + Sync>;

/// Declared instance field
#[derive(Debug, Clone)]
pub struct FieldInfo {
    /// Field name
    pub name: String,
    /// Declared type
    pub ty: TypeRef,
    /// Modifiers
    pub modifiers: Modifiers,
    /// Declaring type
    pub declaring_type: TypeId,
    /// Slot index within instances (inherited fields come first)
    pub slot: usize,
    /// Value assigned by construction before the constructor body runs
    pub initializer: Option<Value>,
}

/// Declared method
#[derive(Clone)]
pub struct MethodInfo {
    /// Method name
    pub name: String,
    /// Parameter types
    pub params: Vec<TypeRef>,
    /// Return type
    pub return_type: TypeRef,
    /// Modifiers
    pub modifiers: Modifiers,
    /// Declaring type
    pub declaring_type: TypeId,
    /// Implementation; `None` for abstract methods
    pub body: Option<MethodBody>,
}

impl MethodInfo {
    /// A method without a body is abstract
    pub fn is_abstract(&self) -> bool {
        self.body.is_none()
    }

    /// Number of parameters
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Same name and parameter types
    pub fn same_signature(&self, other: &MethodInfo) -> bool {
        self.name == other.name && self.params == other.params
    }
}

impl fmt::Debug for MethodInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodInfo")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("return_type", &self.return_type)
            .field("modifiers", &self.modifiers)
            .field("is_abstract", &self.is_abstract())
            .finish()
    }
}

/// Declared constructor
#[derive(Clone)]
pub struct ConstructorInfo {
    /// Parameter types
    pub params: Vec<TypeRef>,
    /// Modifiers
    pub modifiers: Modifiers,
    /// Declaring type
    pub declaring_type: TypeId,
    /// Implementation; `None` is an empty body
    pub body: Option<ConstructorBody>,
}

impl ConstructorInfo {
    /// Number of parameters
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Whether the body does nothing
    pub fn is_empty(&self) -> bool {
        self.body.is_none()
    }
}

impl fmt::Debug for ConstructorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorInfo")
            .field("params", &self.params)
            .field("modifiers", &self.modifiers)
            .field("is_empty", &self.is_empty())
            .finish()
    }
}

/// Read-only view of a class or interface
pub struct TypeDescriptor {
    pub(crate) id: TypeId,
    pub(crate) name: String,
    pub(crate) kind: TypeKind,
    pub(crate) modifiers: Modifiers,
    pub(crate) superclass: Option<Arc<TypeDescriptor>>,
    pub(crate) interfaces: Vec<Arc<TypeDescriptor>>,
    pub(crate) fields: Vec<FieldInfo>,
    pub(crate) methods: Vec<MethodInfo>,
    pub(crate) constructors: Vec<ConstructorInfo>,
    /// Number of slots taken by inherited fields
    pub(crate) field_offset: usize,
    pub(crate) synthetic: bool,
    pub(crate) allocatable: bool,
}

impl TypeDescriptor {
    /// Unique id
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully-qualified name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without its namespace
    pub fn short_name(&self) -> &str {
        crate::resolver::short_name(&self.name)
    }

    /// Class or interface
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Check if this is an interface
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// Type modifiers
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Direct superclass (`None` for roots and interfaces)
    pub fn superclass(&self) -> Option<&Arc<TypeDescriptor>> {
        self.superclass.as_ref()
    }

    /// Directly implemented (or, for interfaces, extended) interfaces
    pub fn interfaces(&self) -> &[Arc<TypeDescriptor>] {
        &self.interfaces
    }

    /// Fields declared by this type only
    pub fn declared_fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    /// Declared field by name
    pub fn declared_field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Methods declared by this type only
    pub fn declared_methods(&self) -> &[MethodInfo] {
        &self.methods
    }

    /// Constructors declared by this type
    pub fn declared_constructors(&self) -> &[ConstructorInfo] {
        &self.constructors
    }

    /// The non-abstract zero-argument constructor, whatever its visibility
    pub fn zero_arg_constructor(&self) -> Option<&ConstructorInfo> {
        self.constructors
            .iter()
            .find(|c| c.arity() == 0 && !c.modifiers.is_abstract)
    }

    /// Total number of instance slots, inherited fields included
    pub fn instance_size(&self) -> usize {
        self.field_offset + self.fields.len()
    }

    /// Whether this type was generated at runtime
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    /// Whether instances may be allocated without running a constructor
    pub fn is_allocatable(&self) -> bool {
        self.allocatable
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDescriptor {}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("modifiers", &self.modifiers)
            .field("superclass", &self.superclass.as_ref().map(|s| s.name()))
            .field(
                "interfaces",
                &self.interfaces.iter().map(|i| i.name()).collect::<Vec<_>>(),
            )
            .field("fields", &self.fields)
            .field("methods", &self.methods)
            .field("constructors", &self.constructors)
            .field("synthetic", &self.synthetic)
            .finish()
    }
}
