//! Type Builder
//!
//! Defines classes and interfaces programmatically. Test harnesses use it to
//! describe the program under test; the synthesizer uses it to produce stub
//! implementations.
//!
//! ```
//! use forge_types::{FieldDefinition, TypeBuilder, TypeRef};
//!
//! let point = TypeBuilder::class("geo.Point")
//!     .public()
//!     .field(FieldDefinition::new("x", TypeRef::INT).private().as_final())
//!     .field(FieldDefinition::new("y", TypeRef::INT).private().as_final())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(point.instance_size(), 2);
//! ```

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::descriptor::{
    ConstructorBody, ConstructorInfo, FieldInfo, MethodBody, MethodInfo, Modifiers, TypeDescriptor,
    TypeId, TypeKind, Visibility,
};
use crate::error::{InvokeError, TypeError};
use crate::object::ObjectRef;
use crate::ty::TypeRef;
use crate::value::Value;

/// Definition for a field to be declared on a type
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    /// Field name
    pub name: String,
    /// Declared type
    pub ty: TypeRef,
    /// Modifiers
    pub modifiers: Modifiers,
    /// Initial value assigned during construction
    pub initializer: Option<Value>,
}

impl FieldDefinition {
    /// Create a package-visible, mutable field
    pub fn new(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            modifiers: Modifiers::default(),
            initializer: None,
        }
    }

    /// Make the field public
    pub fn public(mut self) -> Self {
        self.modifiers.visibility = Visibility::Public;
        self
    }

    /// Make the field protected
    pub fn protected(mut self) -> Self {
        self.modifiers.visibility = Visibility::Protected;
        self
    }

    /// Make the field private
    pub fn private(mut self) -> Self {
        self.modifiers.visibility = Visibility::Private;
        self
    }

    /// Mark as final
    pub fn as_final(mut self) -> Self {
        self.modifiers.is_final = true;
        self
    }

    /// Set the initial value
    pub fn initial_value(mut self, value: impl Into<Value>) -> Self {
        self.initializer = Some(value.into());
        self
    }
}

/// Definition for a method to be declared on a type
#[derive(Clone)]
pub struct MethodDefinition {
    /// Method name
    pub name: String,
    /// Parameter types
    pub params: Vec<TypeRef>,
    /// Return type
    pub return_type: TypeRef,
    /// Modifiers
    pub modifiers: Modifiers,
    /// Implementation
    pub body: Option<MethodBody>,
}

impl MethodDefinition {
    /// Create a method returning `void` with no parameters
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            return_type: TypeRef::Void,
            modifiers: Modifiers::default(),
            body: None,
        }
    }

    /// Add a parameter
    pub fn param(mut self, ty: impl Into<TypeRef>) -> Self {
        self.params.push(ty.into());
        self
    }

    /// Set the return type
    pub fn returns(mut self, ty: impl Into<TypeRef>) -> Self {
        self.return_type = ty.into();
        self
    }

    /// Make the method public
    pub fn public(mut self) -> Self {
        self.modifiers.visibility = Visibility::Public;
        self
    }

    /// Make the method protected
    pub fn protected(mut self) -> Self {
        self.modifiers.visibility = Visibility::Protected;
        self
    }

    /// Make the method private
    pub fn private(mut self) -> Self {
        self.modifiers.visibility = Visibility::Private;
        self
    }

    /// Declare the method abstract (no body)
    pub fn as_abstract(mut self) -> Self {
        self.modifiers.is_abstract = true;
        self
    }

    /// Provide the implementation
    pub fn body<F>(mut self, body: F) -> Self
    where
        F: Fn(&ObjectRef, &[Value]) -> Result<Value, InvokeError> + Send + Sync + 'static,
    {
        self.body = Some(Arc::new(body));
        self
    }
}

/// Definition for a constructor
#[derive(Clone, Default)]
pub struct ConstructorDefinition {
    /// Parameter types
    pub params: Vec<TypeRef>,
    /// Modifiers
    pub modifiers: Modifiers,
    /// Implementation; `None` is an empty body
    pub body: Option<ConstructorBody>,
}

impl ConstructorDefinition {
    /// Create an empty, package-visible, zero-argument constructor
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter
    pub fn param(mut self, ty: impl Into<TypeRef>) -> Self {
        self.params.push(ty.into());
        self
    }

    /// Make the constructor public
    pub fn public(mut self) -> Self {
        self.modifiers.visibility = Visibility::Public;
        self
    }

    /// Make the constructor protected
    pub fn protected(mut self) -> Self {
        self.modifiers.visibility = Visibility::Protected;
        self
    }

    /// Make the constructor private
    pub fn private(mut self) -> Self {
        self.modifiers.visibility = Visibility::Private;
        self
    }

    /// Provide the implementation
    pub fn body<F>(mut self, body: F) -> Self
    where
        F: Fn(&ObjectRef, &[Value]) -> Result<(), InvokeError> + Send + Sync + 'static,
    {
        self.body = Some(Arc::new(body));
        self
    }
}

/// Builder for class and interface descriptors
pub struct TypeBuilder {
    name: String,
    kind: TypeKind,
    modifiers: Modifiers,
    superclass: Option<Arc<TypeDescriptor>>,
    interfaces: Vec<Arc<TypeDescriptor>>,
    fields: Vec<FieldDefinition>,
    methods: Vec<MethodDefinition>,
    constructors: Vec<ConstructorDefinition>,
    synthetic: bool,
    allocatable: bool,
}

impl TypeBuilder {
    fn new(name: String, kind: TypeKind) -> Self {
        Self {
            name,
            kind,
            modifiers: Modifiers::default(),
            superclass: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            synthetic: false,
            allocatable: true,
        }
    }

    /// Start a class definition
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name.into(), TypeKind::Class)
    }

    /// Start an interface definition
    pub fn interface(name: impl Into<String>) -> Self {
        let mut builder = Self::new(name.into(), TypeKind::Interface);
        builder.modifiers.is_abstract = true;
        builder
    }

    /// Set the superclass
    pub fn extends(mut self, parent: &Arc<TypeDescriptor>) -> Self {
        self.superclass = Some(Arc::clone(parent));
        self
    }

    /// Implement (or, for an interface, extend) an interface
    pub fn implements(mut self, interface: &Arc<TypeDescriptor>) -> Self {
        self.interfaces.push(Arc::clone(interface));
        self
    }

    /// Set the type's visibility
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.modifiers.visibility = visibility;
        self
    }

    /// Make the type public
    pub fn public(self) -> Self {
        self.visibility(Visibility::Public)
    }

    /// Mark the class abstract
    pub fn as_abstract(mut self) -> Self {
        self.modifiers.is_abstract = true;
        self
    }

    /// Mark the class final
    pub fn as_final(mut self) -> Self {
        self.modifiers.is_final = true;
        self
    }

    /// Declare a field
    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Declare a method
    pub fn method(mut self, method: MethodDefinition) -> Self {
        self.methods.push(method);
        self
    }

    /// Declare a constructor
    pub fn constructor(mut self, constructor: ConstructorDefinition) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Flag the type as generated at runtime
    pub fn synthetic(mut self) -> Self {
        self.synthetic = true;
        self
    }

    /// Forbid constructor-bypassing allocation of this type
    pub fn not_allocatable(mut self) -> Self {
        self.allocatable = false;
        self
    }

    /// Validate the definition and produce the descriptor
    pub fn build(self) -> Result<TypeDescriptor, TypeError> {
        let name = self.name.as_str();
        if name.trim().is_empty() {
            return Err(TypeError::invalid(name, "type name is empty"));
        }

        let is_interface = self.kind == TypeKind::Interface;
        if is_interface {
            if self.superclass.is_some() {
                return Err(TypeError::invalid(name, "an interface cannot extend a class"));
            }
            if !self.fields.is_empty() {
                return Err(TypeError::invalid(name, "an interface cannot declare instance fields"));
            }
            if !self.constructors.is_empty() {
                return Err(TypeError::invalid(name, "an interface cannot declare constructors"));
            }
        }

        if let Some(parent) = &self.superclass {
            if parent.is_interface() {
                return Err(TypeError::invalid(
                    name,
                    format!("cannot extend interface {}", parent.name()),
                ));
            }
            if parent.modifiers().is_final {
                return Err(TypeError::invalid(
                    name,
                    format!("cannot extend final class {}", parent.name()),
                ));
            }
        }
        if let Some(not_interface) = self.interfaces.iter().find(|i| !i.is_interface()) {
            return Err(TypeError::invalid(
                name,
                format!("{} is not an interface", not_interface.name()),
            ));
        }

        let id = TypeId::fresh();
        let field_offset = self.superclass.as_ref().map_or(0, |p| p.instance_size());

        let mut field_names = FxHashSet::default();
        let mut fields = Vec::with_capacity(self.fields.len());
        for (index, def) in self.fields.into_iter().enumerate() {
            if !field_names.insert(def.name.clone()) {
                return Err(TypeError::invalid(name, format!("duplicate field '{}'", def.name)));
            }
            let initializer = match def.initializer {
                Some(value) => Some(def.ty.coerce(value).map_err(|e| {
                    TypeError::invalid(name, format!("initializer of '{}': {}", def.name, e))
                })?),
                None => None,
            };
            fields.push(FieldInfo {
                name: def.name,
                ty: def.ty,
                modifiers: def.modifiers,
                declaring_type: id,
                slot: field_offset + index,
                initializer,
            });
        }

        let mut methods: Vec<MethodInfo> = Vec::with_capacity(self.methods.len());
        for def in self.methods {
            let mut modifiers = def.modifiers;
            if is_interface {
                modifiers.visibility = Visibility::Public;
            }
            match (&def.body, modifiers.is_abstract) {
                (Some(_), true) => {
                    return Err(TypeError::invalid(
                        name,
                        format!("abstract method '{}' has a body", def.name),
                    ));
                }
                (None, false) if !is_interface => {
                    return Err(TypeError::invalid(
                        name,
                        format!("method '{}' has no body", def.name),
                    ));
                }
                _ => {}
            }
            modifiers.is_abstract = def.body.is_none();

            let method = MethodInfo {
                name: def.name,
                params: def.params,
                return_type: def.return_type,
                modifiers,
                declaring_type: id,
                body: def.body,
            };
            if methods.iter().any(|m| m.same_signature(&method)) {
                return Err(TypeError::invalid(
                    name,
                    format!("duplicate method '{}'", method.name),
                ));
            }
            methods.push(method);
        }

        let mut constructors: Vec<ConstructorInfo> = Vec::with_capacity(self.constructors.len().max(1));
        for def in self.constructors {
            if constructors.iter().any(|c| c.params == def.params) {
                return Err(TypeError::invalid(name, "duplicate constructor signature"));
            }
            constructors.push(ConstructorInfo {
                params: def.params,
                modifiers: def.modifiers,
                declaring_type: id,
                body: def.body,
            });
        }
        // Implicit default constructor
        if !is_interface && constructors.is_empty() {
            constructors.push(ConstructorInfo {
                params: Vec::new(),
                modifiers: Modifiers::public(),
                declaring_type: id,
                body: None,
            });
        }

        Ok(TypeDescriptor {
            id,
            name: self.name,
            kind: self.kind,
            modifiers: self.modifiers,
            superclass: self.superclass,
            interfaces: self.interfaces,
            fields,
            methods,
            constructors,
            field_offset,
            synthetic: self.synthetic,
            allocatable: self.allocatable,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape() -> Arc<TypeDescriptor> {
        Arc::new(
            TypeBuilder::class("geo.Shape")
                .public()
                .as_abstract()
                .field(FieldDefinition::new("name", TypeRef::String).protected())
                .method(MethodDefinition::new("area").returns(TypeRef::DOUBLE).public().as_abstract())
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_field_definition() {
        let field = FieldDefinition::new("age", TypeRef::INT)
            .initial_value(0)
            .private()
            .as_final();

        assert_eq!(field.name, "age");
        assert_eq!(field.ty, TypeRef::INT);
        assert!(field.modifiers.is_final);
        assert_eq!(field.modifiers.visibility, Visibility::Private);
        assert_eq!(field.initializer, Some(Value::Int(0)));
    }

    #[test]
    fn test_slots_follow_parent_layout() {
        let shape = shape();
        let circle = TypeBuilder::class("geo.Circle")
            .extends(&shape)
            .field(FieldDefinition::new("radius", TypeRef::DOUBLE))
            .method(
                MethodDefinition::new("area")
                    .returns(TypeRef::DOUBLE)
                    .public()
                    .body(|_, _| Ok(Value::Double(0.0))),
            )
            .build()
            .unwrap();

        assert_eq!(shape.instance_size(), 1);
        assert_eq!(circle.instance_size(), 2);
        assert_eq!(circle.declared_field("radius").unwrap().slot, 1);
        assert_eq!(circle.superclass().unwrap().name(), "geo.Shape");
    }

    #[test]
    fn test_implicit_default_constructor() {
        let point = TypeBuilder::class("geo.Point").build().unwrap();
        let ctor = point.zero_arg_constructor().unwrap();
        assert!(ctor.modifiers.is_public());
        assert!(ctor.is_empty());

        let with_ctor = TypeBuilder::class("geo.Line")
            .constructor(ConstructorDefinition::new().param(TypeRef::INT))
            .build()
            .unwrap();
        assert!(with_ctor.zero_arg_constructor().is_none());
        assert_eq!(with_ctor.declared_constructors().len(), 1);
    }

    #[test]
    fn test_interface_methods_are_public_and_abstract() {
        let drawable = TypeBuilder::interface("geo.Drawable")
            .method(MethodDefinition::new("draw").returns(TypeRef::BOOLEAN))
            .build()
            .unwrap();

        let draw = &drawable.declared_methods()[0];
        assert!(draw.is_abstract());
        assert!(draw.modifiers.is_abstract);
        assert!(draw.modifiers.is_public());
        assert!(drawable.declared_constructors().is_empty());
    }

    #[test]
    fn test_rejects_extending_interface() {
        let drawable = Arc::new(TypeBuilder::interface("geo.Drawable").build().unwrap());
        let err = TypeBuilder::class("geo.Bad").extends(&drawable).build().unwrap_err();
        assert!(matches!(err, TypeError::InvalidDefinition { .. }));
    }

    #[test]
    fn test_rejects_implementing_class() {
        let shape = shape();
        let err = TypeBuilder::class("geo.Bad").implements(&shape).build().unwrap_err();
        assert!(matches!(err, TypeError::InvalidDefinition { .. }));
    }

    #[test]
    fn test_rejects_extending_final() {
        let sealed = Arc::new(TypeBuilder::class("geo.Sealed").as_final().build().unwrap());
        let err = TypeBuilder::class("geo.Bad").extends(&sealed).build().unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidDefinition {
                name: "geo.Bad".to_string(),
                reason: "cannot extend final class geo.Sealed".to_string(),
            }
        );
    }

    #[test]
    fn test_rejects_malformed_members() {
        let err = TypeBuilder::class("geo.Bad")
            .field(FieldDefinition::new("x", TypeRef::INT))
            .field(FieldDefinition::new("x", TypeRef::LONG))
            .build()
            .unwrap_err();
        assert!(matches!(err, TypeError::InvalidDefinition { .. }));

        let err = TypeBuilder::class("geo.Bad")
            .method(MethodDefinition::new("area"))
            .build()
            .unwrap_err();
        assert!(matches!(err, TypeError::InvalidDefinition { .. }));

        let err = TypeBuilder::class("geo.Bad")
            .method(MethodDefinition::new("area").as_abstract().body(|_, _| Ok(Value::Null)))
            .build()
            .unwrap_err();
        assert!(matches!(err, TypeError::InvalidDefinition { .. }));

        let err = TypeBuilder::interface("geo.Bad")
            .field(FieldDefinition::new("x", TypeRef::INT))
            .build()
            .unwrap_err();
        assert!(matches!(err, TypeError::InvalidDefinition { .. }));
    }

    #[test]
    fn test_rejects_ill_typed_initializer() {
        let err = TypeBuilder::class("geo.Bad")
            .field(FieldDefinition::new("x", TypeRef::INT).initial_value("seven"))
            .build()
            .unwrap_err();
        assert!(matches!(err, TypeError::InvalidDefinition { .. }));
    }

    #[test]
    fn test_initializer_is_widened() {
        let counter = TypeBuilder::class("geo.Counter")
            .field(FieldDefinition::new("total", TypeRef::LONG).initial_value(3))
            .build()
            .unwrap();
        assert_eq!(
            counter.declared_field("total").unwrap().initializer,
            Some(Value::Long(3))
        );
    }
}
