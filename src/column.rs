use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::data_type::DataType;
use crate::error::{Error, Result};
use crate::value::{MAX_DATA_LEN, Value};

/// Attribute flags a column may be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Attributes(u8);

impl Attributes {
    pub const NONE: Self = Self(0);
    /// Key column: values are unique and indexed.
    pub const KEY: Self = Self(1);
    /// Values are unique and indexed.
    pub const UNIQUE: Self = Self(2);
    /// Int32 column filled from a per-table counter when left unspecified.
    pub const AUTOINCREMENT: Self = Self(4);

    /// Returns true if every flag of `other` is set in `self`.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Maps an attribute keyword (`key`, `unique`, `autoincrement`) to its flag.
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "key" => Some(Self::KEY),
            "unique" => Some(Self::UNIQUE),
            "autoincrement" => Some(Self::AUTOINCREMENT),
            _ => None,
        }
    }
}

impl BitOr for Attributes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Attributes {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = [
            (Self::KEY, "key"),
            (Self::UNIQUE, "unique"),
            (Self::AUTOINCREMENT, "autoincrement"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
        .collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

/// Describes one column of a table: its name, declared kind and attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// The name of the column, unique within its table.
    pub name: String,
    /// The kind every value stored in the column must have.
    pub data_type: DataType,
    pub attributes: Attributes,
    /// Declared capacity of `string[N]` / `bytes[N]` columns.
    pub width: Option<usize>,
    /// Value used when an insert leaves the column unspecified.
    pub default: Option<Value>,
}

impl Column {
    /// Creates a plain column with no attributes, width or default.
    pub fn new(name: String, data_type: DataType) -> Self {
        Self {
            name,
            data_type,
            attributes: Attributes::NONE,
            width: None,
            default: None,
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Key and unique columns keep an ordered index of their values.
    pub fn is_indexed(&self) -> bool {
        self.attributes.contains(Attributes::KEY) || self.attributes.contains(Attributes::UNIQUE)
    }

    pub fn is_autoincrement(&self) -> bool {
        self.attributes.contains(Attributes::AUTOINCREMENT)
    }

    /// Maximum logical length of values stored in this column.
    pub fn max_len(&self) -> usize {
        self.width.unwrap_or(MAX_DATA_LEN)
    }

    /// Checks the declaration is consistent.
    ///
    /// # Errors
    /// Returns [Error::InvalidSchema] for a width on a fixed-size kind or out of
    /// `1..=256`, autoincrement on a non-integer column, or a default that does not
    /// fit the column.
    pub fn validate(&self) -> Result<()> {
        if let Some(width) = self.width {
            if !self.data_type.is_sized() {
                return Err(Error::InvalidSchema(format!(
                    "column {} of type {} cannot declare a width",
                    self.name, self.data_type
                )));
            }
            if width == 0 || width > MAX_DATA_LEN {
                return Err(Error::InvalidSchema(format!(
                    "width of column {} must be between 1 and {MAX_DATA_LEN}, got {width}",
                    self.name
                )));
            }
        }
        if self.is_autoincrement() && self.data_type != DataType::Int32 {
            return Err(Error::InvalidSchema(format!(
                "autoincrement column {} must be Int32, not {}",
                self.name, self.data_type
            )));
        }
        if let Some(default) = &self.default {
            self.check(default)
                .map_err(|e| Error::InvalidSchema(format!("default of column {}: {e}", self.name)))?;
        }
        Ok(())
    }

    /// Checks that `value` may be stored in this column.
    ///
    /// # Errors
    /// Returns [Error::IncompatibleRow] if the kinds differ and
    /// [Error::MaxLengthExceeded] if the value is wider than the column.
    pub fn check(&self, value: &Value) -> Result<()> {
        if value.data_type() != self.data_type {
            return Err(Error::IncompatibleRow(format!(
                "column {} expects {}, got {}",
                self.name,
                self.data_type,
                value.data_type()
            )));
        }
        if self.data_type.is_sized() && value.len() > self.max_len() {
            return Err(Error::MaxLengthExceeded {
                len: value.len(),
                max: self.max_len(),
            });
        }
        Ok(())
    }

    /// The declared default, or the zero value of the column's kind.
    pub fn default_value(&self) -> Value {
        self.default.unwrap_or_else(|| self.data_type.zero_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_new() {
        let col = Column::new("age".into(), DataType::Int32);

        assert_eq!(col.name, "age");
        assert_eq!(col.data_type, DataType::Int32);
        assert!(col.attributes.is_empty());
        assert!(!col.is_indexed());
        assert_eq!(col.default_value(), Value::Int32(0));
    }

    #[test]
    fn test_attributes() {
        let attrs = Attributes::KEY | Attributes::AUTOINCREMENT;
        assert!(attrs.contains(Attributes::KEY));
        assert!(!attrs.contains(Attributes::UNIQUE));
        assert_eq!(attrs.to_string(), "{key, autoincrement}");
        assert_eq!(Attributes::from_keyword("unique"), Some(Attributes::UNIQUE));
        assert_eq!(Attributes::from_keyword("primary"), None);
    }

    #[test]
    fn test_check_kind() {
        let col = Column::new("id".into(), DataType::Int32);
        assert!(col.check(&Value::Int32(3)).is_ok());
        assert!(matches!(
            col.check(&Value::Bool(true)),
            Err(Error::IncompatibleRow(_))
        ));
    }

    #[test]
    fn test_check_width() {
        let col = Column::new("code".into(), DataType::Text).with_width(3);
        assert!(col.check(&Value::text("abc").unwrap()).is_ok());
        assert_eq!(
            col.check(&Value::text("abcd").unwrap()),
            Err(Error::MaxLengthExceeded { len: 4, max: 3 })
        );
    }

    #[test]
    fn test_validate() {
        assert!(Column::new("n".into(), DataType::Int32)
            .with_width(4)
            .validate()
            .is_err());
        assert!(Column::new("s".into(), DataType::Text)
            .with_width(300)
            .validate()
            .is_err());
        assert!(Column::new("s".into(), DataType::Text)
            .with_attributes(Attributes::AUTOINCREMENT)
            .validate()
            .is_err());
        assert!(Column::new("b".into(), DataType::Bool)
            .with_default(Value::Int32(1))
            .validate()
            .is_err());
        assert!(Column::new("id".into(), DataType::Int32)
            .with_attributes(Attributes::KEY | Attributes::AUTOINCREMENT)
            .with_default(Value::Int32(7))
            .validate()
            .is_ok());
    }

    #[test]
    fn test_declared_default() {
        let col = Column::new("flag".into(), DataType::Bool).with_default(Value::Bool(true));
        assert_eq!(col.default_value(), Value::Bool(true));
    }
}
