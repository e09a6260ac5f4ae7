//! Primitive types and declared type references

use std::fmt;

use crate::error::TypeError;
use crate::value::Value;

/// The eight primitive types of the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// `boolean`
    Boolean,
    /// `byte` (signed 8-bit)
    Byte,
    /// `char` (a Unicode scalar value)
    Char,
    /// `short` (signed 16-bit)
    Short,
    /// `int` (signed 32-bit)
    Int,
    /// `long` (signed 64-bit)
    Long,
    /// `float` (IEEE 754 single precision)
    Float,
    /// `double` (IEEE 754 double precision)
    Double,
}

impl PrimitiveType {
    /// All primitive types, in declaration order
    pub const ALL: [PrimitiveType; 8] = [
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Char,
        PrimitiveType::Short,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
    ];

    /// Look up a primitive by its source name (`"int"`, `"boolean"`, ...)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "boolean" => Some(PrimitiveType::Boolean),
            "byte" => Some(PrimitiveType::Byte),
            "char" => Some(PrimitiveType::Char),
            "short" => Some(PrimitiveType::Short),
            "int" => Some(PrimitiveType::Int),
            "long" => Some(PrimitiveType::Long),
            "float" => Some(PrimitiveType::Float),
            "double" => Some(PrimitiveType::Double),
            _ => None,
        }
    }

    /// Source name of the primitive
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Char => "char",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    /// The zero value of this primitive
    pub fn default_value(self) -> Value {
        match self {
            PrimitiveType::Boolean => Value::Bool(false),
            PrimitiveType::Byte => Value::Byte(0),
            PrimitiveType::Char => Value::Char('\0'),
            PrimitiveType::Short => Value::Short(0),
            PrimitiveType::Int => Value::Int(0),
            PrimitiveType::Long => Value::Long(0),
            PrimitiveType::Float => Value::Float(0.0),
            PrimitiveType::Double => Value::Double(0.0),
        }
    }

    /// Whether a value of `self` may be stored where `target` is declared
    pub fn widens_to(self, target: PrimitiveType) -> bool {
        use PrimitiveType::*;

        if self == target {
            return true;
        }
        match self {
            Byte => matches!(target, Short | Int | Long | Float | Double),
            Short | Char => matches!(target, Int | Long | Float | Double),
            Int => matches!(target, Long | Float | Double),
            Long => matches!(target, Float | Double),
            Float => matches!(target, Double),
            Boolean | Double => false,
        }
    }

    /// Convert a primitive value to this type, if the conversion is a widening one
    pub fn widen(self, value: &Value) -> Option<Value> {
        let source = value.primitive_type()?;
        if !source.widens_to(self) {
            return None;
        }

        let widened = match (value, self) {
            (Value::Bool(b), PrimitiveType::Boolean) => Value::Bool(*b),
            (Value::Char(c), PrimitiveType::Char) => Value::Char(*c),
            (_, PrimitiveType::Byte) => Value::Byte(value.as_i64()? as i8),
            (_, PrimitiveType::Short) => Value::Short(value.as_i64()? as i16),
            (_, PrimitiveType::Int) => Value::Int(value.as_i64()? as i32),
            (_, PrimitiveType::Long) => Value::Long(value.as_i64()?),
            (_, PrimitiveType::Float) => Value::Float(value.as_f64()? as f32),
            (_, PrimitiveType::Double) => Value::Double(value.as_f64()?),
            _ => return None,
        };
        Some(widened)
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared type of a field, parameter or return value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// No value (method returns only)
    Void,
    /// A primitive
    Primitive(PrimitiveType),
    /// The built-in immutable string type
    String,
    /// A class or interface, by qualified name
    Class(String),
    /// An array with the given element type
    Array(Box<TypeRef>),
}

impl TypeRef {
    /// `boolean`
    pub const BOOLEAN: TypeRef = TypeRef::Primitive(PrimitiveType::Boolean);
    /// `byte`
    pub const BYTE: TypeRef = TypeRef::Primitive(PrimitiveType::Byte);
    /// `char`
    pub const CHAR: TypeRef = TypeRef::Primitive(PrimitiveType::Char);
    /// `short`
    pub const SHORT: TypeRef = TypeRef::Primitive(PrimitiveType::Short);
    /// `int`
    pub const INT: TypeRef = TypeRef::Primitive(PrimitiveType::Int);
    /// `long`
    pub const LONG: TypeRef = TypeRef::Primitive(PrimitiveType::Long);
    /// `float`
    pub const FLOAT: TypeRef = TypeRef::Primitive(PrimitiveType::Float);
    /// `double`
    pub const DOUBLE: TypeRef = TypeRef::Primitive(PrimitiveType::Double);

    /// Reference to a class or interface
    pub fn class(name: impl Into<String>) -> Self {
        TypeRef::Class(name.into())
    }

    /// Array of `element`
    pub fn array_of(element: TypeRef) -> Self {
        TypeRef::Array(Box::new(element))
    }

    /// Whether values of this type are references (nullable)
    pub fn is_reference(&self) -> bool {
        matches!(self, TypeRef::String | TypeRef::Class(_) | TypeRef::Array(_))
    }

    /// The value a freshly zeroed slot of this type holds
    pub fn default_value(&self) -> Value {
        match self {
            TypeRef::Primitive(p) => p.default_value(),
            TypeRef::Void | TypeRef::String | TypeRef::Class(_) | TypeRef::Array(_) => Value::Null,
        }
    }

    /// Whether `value` has exactly this type, with no widening or subtyping
    pub fn is_exact_type_of(&self, value: &Value) -> bool {
        match (self, value) {
            (TypeRef::Primitive(p), _) => value.primitive_type() == Some(*p),
            (TypeRef::Void, _) => false,
            (_, Value::Null) => true,
            (TypeRef::String, Value::Str(_)) => true,
            (TypeRef::Class(name), Value::Object(obj)) => obj.class().name() == name,
            (TypeRef::Array(element), Value::Array(array)) => array.element_type() == element.as_ref(),
            _ => false,
        }
    }

    /// Check `value` against this declared type and convert it for storage
    pub fn coerce(&self, value: Value) -> Result<Value, TypeError> {
        let accepted = match (self, &value) {
            (TypeRef::Primitive(p), _) => p.widen(&value),
            (TypeRef::Void, _) => None,
            (_, Value::Null) => Some(value.clone()),
            (TypeRef::String, Value::Str(_)) => Some(value.clone()),
            (TypeRef::Class(name), Value::Object(obj)) if obj.class().is_subtype_of_name(name) => {
                Some(value.clone())
            }
            (TypeRef::Array(element), Value::Array(array)) if array.fits_element_type(element) => {
                Some(value.clone())
            }
            _ => None,
        };

        accepted.ok_or_else(|| TypeError::Mismatch {
            expected: self.to_string(),
            actual: value.type_name(),
        })
    }
}

impl From<PrimitiveType> for TypeRef {
    fn from(p: PrimitiveType) -> Self {
        TypeRef::Primitive(p)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Void => write!(f, "void"),
            TypeRef::Primitive(p) => write!(f, "{}", p),
            TypeRef::String => write!(f, "string"),
            TypeRef::Class(name) => write!(f, "{}", name),
            TypeRef::Array(element) => write!(f, "{}[]", element),
        }
    }
}
