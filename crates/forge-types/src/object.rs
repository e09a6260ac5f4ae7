//! Object model: instances and arrays

use std::sync::Arc;

use parking_lot::RwLock;

use crate::descriptor::TypeDescriptor;
use crate::ty::TypeRef;
use crate::value::Value;

/// Shared handle to a live object
pub type ObjectRef = Arc<Instance>;

/// Shared handle to a live array
pub type ArrayRef = Arc<Array>;

/// Object instance
///
/// Slots cover every instance field of the runtime type and all of its
/// ancestors, root fields first; a field's `slot` in its [`FieldInfo`]
/// indexes directly into this table.
///
/// [`FieldInfo`]: crate::descriptor::FieldInfo
pub struct Instance {
    /// Runtime type
    class: Arc<TypeDescriptor>,
    /// Field values
    slots: RwLock<Vec<Value>>,
}

impl Instance {
    /// Create an instance whose every slot holds its field type's default value
    ///
    /// No constructor or field initializer runs.
    pub fn zeroed(class: Arc<TypeDescriptor>) -> Self {
        let mut slots = vec![Value::Null; class.instance_size()];
        for field in class.instance_fields() {
            slots[field.slot] = field.ty.default_value();
        }

        Self {
            class,
            slots: RwLock::new(slots),
        }
    }

    /// Runtime type of this instance
    pub fn class(&self) -> &Arc<TypeDescriptor> {
        &self.class
    }

    /// Read a slot
    pub fn load(&self, slot: usize) -> Option<Value> {
        self.slots.read().get(slot).cloned()
    }

    /// Overwrite a slot, returning `false` if it is out of bounds
    ///
    /// No type checking happens here; callers coerce against the field's
    /// declared type first.
    pub fn store(&self, slot: usize, value: Value) -> bool {
        match self.slots.write().get_mut(slot) {
            Some(target) => {
                *target = value;
                true
            }
            None => false,
        }
    }

    /// Number of slots
    pub fn slot_count(&self) -> usize {
        self.slots.read().len()
    }
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("class", &self.class.name())
            .field("slots", &self.slot_count())
            .finish()
    }
}

/// Array object
pub struct Array {
    /// Declared element type
    element: TypeRef,
    /// Descriptor of a class element type, when known
    element_class: Option<Arc<TypeDescriptor>>,
    /// Elements
    elements: RwLock<Vec<Value>>,
}

impl Array {
    /// Create an array of `length` default-valued elements
    pub fn new(element: TypeRef, length: usize) -> Self {
        let elements = vec![element.default_value(); length];
        Self {
            element,
            element_class: None,
            elements: RwLock::new(elements),
        }
    }

    /// Create an array of `length` nulls whose elements are `class` instances
    ///
    /// Unlike [`Array::new`] with a [`TypeRef::Class`], the array remembers
    /// the element descriptor and can be stored where an array of any of its
    /// supertypes is declared.
    pub fn of_class(class: Arc<TypeDescriptor>, length: usize) -> Self {
        let element = TypeRef::class(class.name());
        Self {
            elements: RwLock::new(vec![Value::Null; length]),
            element,
            element_class: Some(class),
        }
    }

    /// Whether this array may be stored where `declared[]` is expected
    ///
    /// Element types must match exactly, except that an array built with
    /// [`Array::of_class`] also fits any supertype of its element class.
    /// Nested array element types stay invariant.
    pub fn fits_element_type(&self, declared: &TypeRef) -> bool {
        if &self.element == declared {
            return true;
        }
        match (declared, &self.element_class) {
            (TypeRef::Class(name), Some(class)) => class.is_subtype_of_name(name),
            _ => false,
        }
    }

    /// Element type
    pub fn element_type(&self) -> &TypeRef {
        &self.element
    }

    /// Array length
    pub fn len(&self) -> usize {
        self.elements.read().len()
    }

    /// Check if array is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get element at index
    pub fn get(&self, index: usize) -> Option<Value> {
        self.elements.read().get(index).cloned()
    }

    /// Set element at index, coercing to the element type
    pub fn set(&self, index: usize, value: Value) -> Result<(), String> {
        let value = self.element.coerce(value).map_err(|e| e.to_string())?;
        let mut elements = self.elements.write();
        let len = elements.len();
        match elements.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(format!(
                "Array index {} out of bounds (length: {})",
                index, len
            )),
        }
    }
}

impl std::fmt::Debug for Array {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Array")
            .field("element", &self.element)
            .field("len", &self.len())
            .finish()
    }
}
