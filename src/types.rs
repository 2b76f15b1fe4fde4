//! Logical type system shared by the node model and the generators.

use serde::{Deserialize, Serialize};

/// Logical data types carried by expressions.
///
/// Each type has a canonical name usable as a CAST/CONVERT target and a
/// classification that drives literal formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    String,
    Char,
    Boolean,
    Byte,
    Short,
    Integer,
    Long,
    BigInteger,
    Float,
    Double,
    BigDecimal,
    Date,
    Time,
    Timestamp,
    Uuid,
    Object,
}

/// Formatting classification of a logical type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeClass {
    Numeric,
    Boolean,
    Date,
    Time,
    Timestamp,
    Other,
}

impl DataType {
    /// Canonical type name, usable as a CAST/CONVERT target.
    pub fn type_name(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Char => "char",
            DataType::Boolean => "boolean",
            DataType::Byte => "byte",
            DataType::Short => "short",
            DataType::Integer => "integer",
            DataType::Long => "long",
            DataType::BigInteger => "biginteger",
            DataType::Float => "float",
            DataType::Double => "double",
            DataType::BigDecimal => "bigdecimal",
            DataType::Date => "date",
            DataType::Time => "time",
            DataType::Timestamp => "timestamp",
            DataType::Uuid => "uuid",
            DataType::Object => "object",
        }
    }

    /// Resolve a canonical type name back to a type.
    pub fn from_type_name(name: &str) -> Option<DataType> {
        let lower = name.to_ascii_lowercase();
        Some(match lower.as_str() {
            "string" => DataType::String,
            "char" => DataType::Char,
            "boolean" => DataType::Boolean,
            "byte" => DataType::Byte,
            "short" => DataType::Short,
            "integer" => DataType::Integer,
            "long" => DataType::Long,
            "biginteger" => DataType::BigInteger,
            "float" => DataType::Float,
            "double" => DataType::Double,
            "bigdecimal" => DataType::BigDecimal,
            "date" => DataType::Date,
            "time" => DataType::Time,
            "timestamp" => DataType::Timestamp,
            "uuid" => DataType::Uuid,
            "object" => DataType::Object,
            _ => return None,
        })
    }

    /// Classification used by the literal formatter.
    pub fn class(&self) -> TypeClass {
        match self {
            DataType::Byte
            | DataType::Short
            | DataType::Integer
            | DataType::Long
            | DataType::BigInteger
            | DataType::Float
            | DataType::Double
            | DataType::BigDecimal => TypeClass::Numeric,
            DataType::Boolean => TypeClass::Boolean,
            DataType::Date => TypeClass::Date,
            DataType::Time => TypeClass::Time,
            DataType::Timestamp => TypeClass::Timestamp,
            DataType::String | DataType::Char | DataType::Uuid | DataType::Object => {
                TypeClass::Other
            }
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.class() == TypeClass::Numeric
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.type_name())
    }
}
