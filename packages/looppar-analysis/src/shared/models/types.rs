//! Value types and constants of the subject-program IR

use serde::{Deserialize, Serialize};
use std::fmt;

/// Static type of a local, field, parameter or return value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Void,
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    /// Class or interface type (fully qualified name)
    Object(String),
    /// Array of the element type
    Array(Box<Type>),
}

impl Type {
    /// Parse a Jimple type name such as `int`, `float[]` or `java.lang.String[][]`
    pub fn from_name(name: &str) -> Option<Type> {
        let name = name.trim();
        if let Some(elem) = name.strip_suffix("[]") {
            return Type::from_name(elem).map(|t| Type::Array(Box::new(t)));
        }
        let ty = match name {
            "void" => Type::Void,
            "boolean" => Type::Boolean,
            "byte" => Type::Byte,
            "char" => Type::Char,
            "short" => Type::Short,
            "int" => Type::Int,
            "long" => Type::Long,
            "float" => Type::Float,
            "double" => Type::Double,
            "" => return None,
            other => {
                let valid = other
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_' || c == '$' || c == '.');
                if !valid {
                    return None;
                }
                Type::Object(other.to_string())
            }
        };
        Some(ty)
    }

    /// Whether values of this type are heap references
    pub fn is_reference(&self) -> bool {
        matches!(self, Type::Object(_) | Type::Array(_))
    }

    pub fn is_primitive(&self) -> bool {
        !self.is_reference() && *self != Type::Void
    }

    /// JVM field descriptor (`I`, `[F`, `Ljava/lang/String;`)
    pub fn descriptor(&self) -> String {
        match self {
            Type::Void => "V".to_string(),
            Type::Boolean => "Z".to_string(),
            Type::Byte => "B".to_string(),
            Type::Char => "C".to_string(),
            Type::Short => "S".to_string(),
            Type::Int => "I".to_string(),
            Type::Long => "J".to_string(),
            Type::Float => "F".to_string(),
            Type::Double => "D".to_string(),
            Type::Object(name) => format!("L{};", name.replace('.', "/")),
            Type::Array(elem) => format!("[{}", elem.descriptor()),
        }
    }

    /// Element type after indexing once
    pub fn element(&self) -> Option<&Type> {
        match self {
            Type::Array(elem) => Some(elem),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => write!(f, "void"),
            Type::Boolean => write!(f, "boolean"),
            Type::Byte => write!(f, "byte"),
            Type::Char => write!(f, "char"),
            Type::Short => write!(f, "short"),
            Type::Int => write!(f, "int"),
            Type::Long => write!(f, "long"),
            Type::Float => write!(f, "float"),
            Type::Double => write!(f, "double"),
            Type::Object(name) => write!(f, "{}", name),
            Type::Array(elem) => write!(f, "{}[]", elem),
        }
    }
}

/// Literal operand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constant {
    Int(i64),
    Long(i64),
    Float(f64),
    Double(f64),
    Str(String),
    Null,
}

impl Constant {
    /// Integer value of an `int` constant
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Constant::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Integer value of an `int` or `long` constant
    pub fn as_integral(&self) -> Option<i64> {
        match self {
            Constant::Int(v) | Constant::Long(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Int(v) => write!(f, "{}", v),
            Constant::Long(v) => write!(f, "{}L", v),
            Constant::Float(v) => write!(f, "{:?}F", v),
            Constant::Double(v) => write!(f, "{:?}", v),
            Constant::Str(s) => write!(f, "{:?}", s),
            Constant::Null => write!(f, "null"),
        }
    }
}
