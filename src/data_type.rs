use std::fmt;

use crate::value::Value;

/// Represents the kinds of data a cell can hold.
/// Every column declares one kind and every stored value carries its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// A 32-bit signed integer.
    Int32,
    /// A boolean value (true or false).
    Bool,
    /// Text of at most 256 bytes.
    Text,
    /// A raw byte string of at most 256 bytes.
    Bytes,
}

impl DataType {
    /// The value a column of this kind takes when nothing else is provided.
    pub fn zero_value(self) -> Value {
        match self {
            Self::Int32 => Value::Int32(0),
            Self::Bool => Value::Bool(false),
            Self::Text => Value::empty_text(),
            Self::Bytes => Value::empty_bytes(),
        }
    }

    /// Whether values of this kind have a variable logical length.
    pub fn is_sized(self) -> bool {
        matches!(self, Self::Text | Self::Bytes)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int32 => "Int32",
            Self::Bool => "Bool",
            Self::Text => "String",
            Self::Bytes => "Bytes",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_values() {
        assert_eq!(DataType::Int32.zero_value(), Value::Int32(0));
        assert_eq!(DataType::Bool.zero_value(), Value::Bool(false));
        assert_eq!(DataType::Text.zero_value().as_str(), Some(""));
        assert_eq!(DataType::Bytes.zero_value().as_bytes(), Some(&[][..]));
    }

    #[test]
    fn test_zero_value_kind_matches() {
        for kind in [
            DataType::Int32,
            DataType::Bool,
            DataType::Text,
            DataType::Bytes,
        ] {
            assert_eq!(kind.zero_value().data_type(), kind);
        }
    }
}
