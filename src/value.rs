use std::fmt;

use crate::data_type::DataType;
use crate::error::{Error, Result};

/// Maximum logical length, in bytes, of text and byte string values.
pub const MAX_DATA_LEN: usize = 256;

/// Fixed-capacity storage backing [Value::Text] and [Value::Bytes].
///
/// Only the first `len` bytes are meaningful; equality, ordering and hashing
/// never look at the padding behind them.
#[derive(Clone, Copy)]
pub struct FixedBuf {
    len: u16,
    data: [u8; MAX_DATA_LEN],
}

impl FixedBuf {
    /// Copies `bytes` into a new buffer.
    ///
    /// # Errors
    /// Returns [Error::MaxLengthExceeded] if `bytes` is longer than [MAX_DATA_LEN].
    pub fn new(bytes: &[u8]) -> Result<Self> {
        if bytes.len() > MAX_DATA_LEN {
            return Err(Error::MaxLengthExceeded {
                len: bytes.len(),
                max: MAX_DATA_LEN,
            });
        }
        let mut data = [0; MAX_DATA_LEN];
        data[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            len: bytes.len() as u16,
            data,
        })
    }

    pub const fn empty() -> Self {
        Self {
            len: 0,
            data: [0; MAX_DATA_LEN],
        }
    }

    /// The logical content of the buffer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn concat(&self, other: &Self) -> Result<Self> {
        let len = self.len() + other.len();
        if len > MAX_DATA_LEN {
            return Err(Error::MaxLengthExceeded {
                len,
                max: MAX_DATA_LEN,
            });
        }
        let mut out = *self;
        out.data[self.len()..len].copy_from_slice(other.as_bytes());
        out.len = len as u16;
        Ok(out)
    }

    /// Combines two buffers byte by byte. Both must have the same logical length.
    fn zip_with(&self, other: &Self, op: &'static str, f: impl Fn(u8, u8) -> u8) -> Result<Self> {
        if self.len != other.len {
            return Err(Error::SizeMismatch {
                op,
                left: self.len(),
                right: other.len(),
            });
        }
        let mut out = *self;
        for (b, o) in out.data[..self.len as usize].iter_mut().zip(other.as_bytes()) {
            *b = f(*b, *o);
        }
        Ok(out)
    }

    fn map(&self, f: impl Fn(u8) -> u8) -> Self {
        let mut out = *self;
        for b in &mut out.data[..self.len as usize] {
            *b = f(*b);
        }
        out
    }
}

impl PartialEq for FixedBuf {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for FixedBuf {}

impl PartialOrd for FixedBuf {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FixedBuf {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl std::hash::Hash for FixedBuf {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl fmt::Debug for FixedBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_bytes()).finish()
    }
}

/// Represents a single data value stored in a table cell.
///
/// Values are plain fixed-size data: copying one never allocates. Every
/// operator checks the kinds of its operands before acting and returns a new
/// [Value], so expressions are closed over this type.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    /// A 32-bit signed integer.
    Int32(i32),
    /// A boolean value.
    Bool(bool),
    /// Text of at most [MAX_DATA_LEN] bytes. Built from `&str` it is UTF-8;
    /// `\xHH` escapes in literals may add arbitrary bytes.
    Text(FixedBuf),
    /// A raw byte string of at most [MAX_DATA_LEN] bytes.
    Bytes(FixedBuf),
}

impl Value {
    /// Builds a [Value::Text].
    ///
    /// # Errors
    /// Returns [Error::MaxLengthExceeded] if `s` is longer than [MAX_DATA_LEN] bytes.
    ///
    /// # Example
    /// ```
    /// # use memdb::Value;
    /// let v = Value::text("hello").unwrap();
    /// assert_eq!(v.as_str(), Some("hello"));
    /// assert!(Value::text(&"x".repeat(257)).is_err());
    /// ```
    pub fn text(s: &str) -> Result<Self> {
        FixedBuf::new(s.as_bytes()).map(Self::Text)
    }

    /// Builds a [Value::Text] from raw bytes, as produced by resolving the
    /// escapes of a quoted literal.
    ///
    /// # Errors
    /// Returns [Error::MaxLengthExceeded] if `bytes` is longer than [MAX_DATA_LEN].
    pub fn text_bytes(bytes: &[u8]) -> Result<Self> {
        FixedBuf::new(bytes).map(Self::Text)
    }

    /// Builds a [Value::Bytes].
    ///
    /// # Errors
    /// Returns [Error::MaxLengthExceeded] if `bytes` is longer than [MAX_DATA_LEN].
    pub fn bytes(bytes: &[u8]) -> Result<Self> {
        FixedBuf::new(bytes).map(Self::Bytes)
    }

    pub const fn empty_text() -> Self {
        Self::Text(FixedBuf::empty())
    }

    pub const fn empty_bytes() -> Self {
        Self::Bytes(FixedBuf::empty())
    }

    /// Returns the kind of this value.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Int32(_) => DataType::Int32,
            Self::Bool(_) => DataType::Bool,
            Self::Text(_) => DataType::Text,
            Self::Bytes(_) => DataType::Bytes,
        }
    }

    /// Logical size of the value in bytes.
    pub fn len(&self) -> usize {
        match self {
            Self::Int32(_) => 4,
            Self::Bool(_) => 1,
            Self::Text(buf) | Self::Bytes(buf) => buf.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the inner integer if this is a [Value::Int32].
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int32(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the inner boolean if this is a [Value::Bool].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the text if this is a [Value::Text].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(buf) => std::str::from_utf8(buf.as_bytes()).ok(),
            _ => None,
        }
    }

    /// Returns the bytes if this is a [Value::Bytes].
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(buf) => Some(buf.as_bytes()),
            _ => None,
        }
    }

    /// Checks both operands have the same kind and returns it.
    fn same_kind(&self, other: &Value, op: &'static str) -> Result<DataType> {
        let (left, right) = (self.data_type(), other.data_type());
        if left != right {
            return Err(Error::TypeMismatch { op, left, right });
        }
        Ok(left)
    }

    fn compare(&self, other: &Value, op: &'static str) -> Result<std::cmp::Ordering> {
        self.same_kind(other, op)?;
        Ok(self.cmp(other))
    }

    fn int_operands(&self, other: &Value, op: &'static str) -> Result<(i32, i32)> {
        let kind = self.same_kind(other, op)?;
        match (self, other) {
            (Self::Int32(l), Self::Int32(r)) => Ok((*l, *r)),
            _ => Err(Error::UnsupportedOperator { op, kind }),
        }
    }

    fn bool_operands(&self, other: &Value, op: &'static str) -> Result<(bool, bool)> {
        let kind = self.same_kind(other, op)?;
        match (self, other) {
            (Self::Bool(l), Self::Bool(r)) => Ok((*l, *r)),
            _ => Err(Error::UnsupportedOperator { op, kind }),
        }
    }

    // --- Comparison ---

    pub fn equals(&self, other: &Value) -> Result<Value> {
        Ok(Self::Bool(self.compare(other, "==")?.is_eq()))
    }

    pub fn not_equals(&self, other: &Value) -> Result<Value> {
        Ok(Self::Bool(self.compare(other, "!=")?.is_ne()))
    }

    pub fn less_than(&self, other: &Value) -> Result<Value> {
        Ok(Self::Bool(self.compare(other, "<")?.is_lt()))
    }

    pub fn less_equal(&self, other: &Value) -> Result<Value> {
        Ok(Self::Bool(self.compare(other, "<=")?.is_le()))
    }

    pub fn greater_than(&self, other: &Value) -> Result<Value> {
        Ok(Self::Bool(self.compare(other, ">")?.is_gt()))
    }

    pub fn greater_equal(&self, other: &Value) -> Result<Value> {
        Ok(Self::Bool(self.compare(other, ">=")?.is_ge()))
    }

    // --- Arithmetic ---
    // Integer arithmetic wraps on overflow.

    /// Adds two integers or concatenates two texts.
    pub fn try_add(&self, other: &Value) -> Result<Value> {
        if let (Self::Text(l), Self::Text(r)) = (self, other) {
            return Ok(Self::Text(l.concat(r)?));
        }
        let (l, r) = self.int_operands(other, "+")?;
        Ok(Self::Int32(l.wrapping_add(r)))
    }

    pub fn try_sub(&self, other: &Value) -> Result<Value> {
        let (l, r) = self.int_operands(other, "-")?;
        Ok(Self::Int32(l.wrapping_sub(r)))
    }

    pub fn try_mul(&self, other: &Value) -> Result<Value> {
        let (l, r) = self.int_operands(other, "*")?;
        Ok(Self::Int32(l.wrapping_mul(r)))
    }

    /// Truncating division.
    pub fn try_div(&self, other: &Value) -> Result<Value> {
        let (l, r) = self.int_operands(other, "/")?;
        if r == 0 {
            return Err(Error::DivideByZero);
        }
        Ok(Self::Int32(l.wrapping_div(r)))
    }

    /// Remainder of truncating division; takes the sign of the dividend.
    pub fn try_rem(&self, other: &Value) -> Result<Value> {
        let (l, r) = self.int_operands(other, "%")?;
        if r == 0 {
            return Err(Error::DivideByZero);
        }
        Ok(Self::Int32(l.wrapping_rem(r)))
    }

    pub fn try_neg(&self) -> Result<Value> {
        match self {
            Self::Int32(i) => Ok(Self::Int32(i.wrapping_neg())),
            _ => Err(Error::UnsupportedOperator {
                op: "-",
                kind: self.data_type(),
            }),
        }
    }

    // --- Logic ---
    // Both operands are always evaluated before these are called.

    pub fn logical_and(&self, other: &Value) -> Result<Value> {
        let (l, r) = self.bool_operands(other, "&&")?;
        Ok(Self::Bool(l && r))
    }

    pub fn logical_or(&self, other: &Value) -> Result<Value> {
        let (l, r) = self.bool_operands(other, "||")?;
        Ok(Self::Bool(l || r))
    }

    pub fn logical_not(&self) -> Result<Value> {
        match self {
            Self::Bool(b) => Ok(Self::Bool(!b)),
            _ => Err(Error::UnsupportedOperator {
                op: "!",
                kind: self.data_type(),
            }),
        }
    }

    // --- Bitwise ---

    pub fn bit_and(&self, other: &Value) -> Result<Value> {
        self.bitwise(other, "&", |l, r| l & r)
    }

    pub fn bit_or(&self, other: &Value) -> Result<Value> {
        self.bitwise(other, "|", |l, r| l | r)
    }

    pub fn bit_xor(&self, other: &Value) -> Result<Value> {
        self.bitwise(other, "^", |l, r| l ^ r)
    }

    /// Complements integers and byte strings bit by bit; on booleans it is a
    /// logical negation.
    pub fn bit_not(&self) -> Result<Value> {
        match self {
            Self::Int32(i) => Ok(Self::Int32(!i)),
            Self::Bool(b) => Ok(Self::Bool(!b)),
            Self::Bytes(buf) => Ok(Self::Bytes(buf.map(|b| !b))),
            Self::Text(_) => Err(Error::UnsupportedOperator {
                op: "~",
                kind: DataType::Text,
            }),
        }
    }

    /// Shared body of `&`, `|` and `^`, applied on the widened bit pattern of
    /// integers and booleans, and byte by byte on byte strings.
    fn bitwise(&self, other: &Value, op: &'static str, f: impl Fn(u32, u32) -> u32) -> Result<Value> {
        let kind = self.same_kind(other, op)?;
        match (self, other) {
            (Self::Int32(l), Self::Int32(r)) => Ok(Self::Int32(f(*l as u32, *r as u32) as i32)),
            (Self::Bool(l), Self::Bool(r)) => Ok(Self::Bool(f(*l as u32, *r as u32) != 0)),
            (Self::Bytes(l), Self::Bytes(r)) => Ok(Self::Bytes(
                l.zip_with(r, op, |a, b| f(a as u32, b as u32) as u8)?,
            )),
            _ => Err(Error::UnsupportedOperator { op, kind }),
        }
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int32(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int32(i) => write!(f, "Int32({i})"),
            Self::Bool(b) => write!(f, "Bool({b})"),
            Self::Text(buf) => write!(f, "Text({:?})", String::from_utf8_lossy(buf.as_bytes())),
            Self::Bytes(_) => write!(f, "Bytes({self})"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int32(i) => write!(f, "{i}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Text(buf) => f.write_str(&String::from_utf8_lossy(buf.as_bytes())),
            Self::Bytes(buf) => {
                f.write_str("0x")?;
                for b in buf.as_bytes() {
                    write!(f, "{b:02X}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn text(s: &str) -> Value {
        Value::text(s).unwrap()
    }

    fn bytes(b: &[u8]) -> Value {
        Value::bytes(b).unwrap()
    }

    // ─────────────────────────────────────────────────────────────
    // Construction and accessors
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_accessors() {
        assert_eq!(Value::Int32(42).as_int(), Some(42));
        assert_eq!(Value::Bool(true).as_int(), None);
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(text("abc").as_str(), Some("abc"));
        assert_eq!(bytes(&[1, 2]).as_str(), None);
        assert_eq!(bytes(&[1, 2]).as_bytes(), Some(&[1u8, 2][..]));
    }

    #[test]
    fn test_text_length_limit() {
        let max = "a".repeat(MAX_DATA_LEN);
        assert_eq!(text(&max).as_str(), Some(max.as_str()));

        let too_long = "a".repeat(MAX_DATA_LEN + 1);
        assert_eq!(
            Value::text(&too_long),
            Err(Error::MaxLengthExceeded { len: 257, max: 256 })
        );
        assert!(Value::bytes(&[0; MAX_DATA_LEN + 1]).is_err());
    }

    #[test]
    fn test_padding_is_ignored() {
        // same logical content built through different paths
        let concatenated = text("ab").try_add(&text("c")).unwrap();
        assert_eq!(concatenated, text("abc"));
        assert_ne!(text("abc"), text("abc\0"));
        assert_eq!(text("abc").len(), 3);
    }

    // ─────────────────────────────────────────────────────────────
    // Comparison
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_comparisons() {
        let one = Value::Int32(1);
        let two = Value::Int32(2);
        assert_eq!(one.less_than(&two), Ok(Value::Bool(true)));
        assert_eq!(one.greater_equal(&two), Ok(Value::Bool(false)));
        assert_eq!(one.not_equals(&two), Ok(Value::Bool(true)));
        assert_eq!(two.less_equal(&two), Ok(Value::Bool(true)));
        assert_eq!(text("a").less_than(&text("b")), Ok(Value::Bool(true)));
        assert_eq!(text("ab").greater_than(&text("a")), Ok(Value::Bool(true)));
        assert_eq!(
            Value::Bool(false).less_than(&Value::Bool(true)),
            Ok(Value::Bool(true))
        );
        assert_eq!(bytes(&[1]).equals(&bytes(&[1])), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_cross_kind_comparison_fails() {
        let err = Value::Int32(1).equals(&text("1")).unwrap_err();
        assert_eq!(
            err,
            Error::TypeMismatch {
                op: "==",
                left: DataType::Int32,
                right: DataType::Text
            }
        );
    }

    // ─────────────────────────────────────────────────────────────
    // Arithmetic
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_arithmetic() {
        let seven = Value::Int32(7);
        let two = Value::Int32(2);
        assert_eq!(seven.try_add(&two), Ok(Value::Int32(9)));
        assert_eq!(seven.try_sub(&two), Ok(Value::Int32(5)));
        assert_eq!(seven.try_mul(&two), Ok(Value::Int32(14)));
        assert_eq!(seven.try_div(&two), Ok(Value::Int32(3)));
        assert_eq!(seven.try_rem(&two), Ok(Value::Int32(1)));
        assert_eq!(seven.try_neg(), Ok(Value::Int32(-7)));
        assert_eq!(Value::Int32(-7).try_div(&two), Ok(Value::Int32(-3)));
        assert_eq!(Value::Int32(-7).try_rem(&two), Ok(Value::Int32(-1)));
    }

    #[test]
    fn test_division_by_zero() {
        let zero = Value::Int32(0);
        assert_eq!(Value::Int32(5).try_div(&zero), Err(Error::DivideByZero));
        assert_eq!(Value::Int32(5).try_rem(&zero), Err(Error::DivideByZero));
        // multiplying by zero is fine
        assert_eq!(Value::Int32(5).try_mul(&zero), Ok(Value::Int32(0)));
    }

    #[test]
    fn test_text_concatenation() {
        assert_eq!(text("foo").try_add(&text("bar")), Ok(text("foobar")));

        let half = "x".repeat(200);
        assert!(matches!(
            text(&half).try_add(&text(&half)),
            Err(Error::MaxLengthExceeded { len: 400, .. })
        ));
    }

    #[test]
    fn test_unsupported_arithmetic() {
        assert_eq!(
            text("a").try_sub(&text("b")),
            Err(Error::UnsupportedOperator {
                op: "-",
                kind: DataType::Text
            })
        );
        assert_eq!(
            Value::Bool(true).try_add(&Value::Bool(true)),
            Err(Error::UnsupportedOperator {
                op: "+",
                kind: DataType::Bool
            })
        );
        assert!(matches!(
            bytes(&[1]).try_neg(),
            Err(Error::UnsupportedOperator { op: "-", .. })
        ));
    }

    // ─────────────────────────────────────────────────────────────
    // Logic
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_logic() {
        let t = Value::Bool(true);
        let f = Value::Bool(false);
        assert_eq!(t.logical_and(&f), Ok(f));
        assert_eq!(t.logical_or(&f), Ok(t));
        assert_eq!(f.logical_not(), Ok(t));
        assert!(matches!(
            Value::Int32(1).logical_and(&Value::Int32(1)),
            Err(Error::UnsupportedOperator { op: "&&", .. })
        ));
        assert!(matches!(
            Value::Int32(1).logical_not(),
            Err(Error::UnsupportedOperator { op: "!", .. })
        ));
    }

    // ─────────────────────────────────────────────────────────────
    // Bitwise
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_bitwise_int_and_bool() {
        assert_eq!(
            Value::Int32(0b1100).bit_and(&Value::Int32(0b1010)),
            Ok(Value::Int32(0b1000))
        );
        assert_eq!(
            Value::Int32(0b1100).bit_or(&Value::Int32(0b1010)),
            Ok(Value::Int32(0b1110))
        );
        assert_eq!(
            Value::Int32(-1).bit_xor(&Value::Int32(1)),
            Ok(Value::Int32(-2))
        );
        assert_eq!(Value::Int32(0).bit_not(), Ok(Value::Int32(-1)));
        assert_eq!(
            Value::Bool(true).bit_xor(&Value::Bool(true)),
            Ok(Value::Bool(false))
        );
        assert_eq!(Value::Bool(true).bit_not(), Ok(Value::Bool(false)));
    }

    #[test]
    fn test_bitwise_bytes() {
        let a = bytes(&[0xFF, 0x00]);
        let b = bytes(&[0x00, 0xFF]);
        assert_eq!(a.bit_xor(&b), Ok(bytes(&[0xFF, 0xFF])));
        assert_eq!(a.bit_and(&b), Ok(bytes(&[0x00, 0x00])));
        assert_eq!(a.bit_or(&b), Ok(bytes(&[0xFF, 0xFF])));
        assert_eq!(a.bit_not(), Ok(bytes(&[0x00, 0xFF])));
    }

    #[test]
    fn test_bitwise_bytes_size_mismatch() {
        let err = bytes(&[1, 2]).bit_xor(&bytes(&[1])).unwrap_err();
        assert_eq!(
            err,
            Error::SizeMismatch {
                op: "^",
                left: 2,
                right: 1
            }
        );
    }

    #[test]
    fn test_bitwise_text_unsupported() {
        assert!(matches!(
            text("a").bit_or(&text("b")),
            Err(Error::UnsupportedOperator {
                op: "|",
                kind: DataType::Text
            })
        ));
        assert!(text("a").bit_not().is_err());
    }

    // ─────────────────────────────────────────────────────────────
    // Display
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_display() {
        assert_eq!(Value::Int32(-5).to_string(), "-5");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(text("hi").to_string(), "hi");
        assert_eq!(bytes(&[0xDE, 0xAD, 0x0F]).to_string(), "0xDEAD0F");
    }

    fn any_value() -> impl Strategy<Value = Value> {
        prop_oneof![
            any::<i32>().prop_map(Value::Int32),
            any::<bool>().prop_map(Value::Bool),
            "[a-z]{0,16}".prop_map(|s| Value::text(&s).unwrap()),
            proptest::collection::vec(any::<u8>(), 0..16).prop_map(|b| Value::bytes(&b).unwrap()),
        ]
    }

    proptest! {
        #[test]
        fn prop_division_law(a in any::<i32>(), b in any::<i32>().prop_filter("non-zero", |b| *b != 0)) {
            let (a, b) = (Value::Int32(a), Value::Int32(b));
            let quotient = a.try_div(&b).unwrap();
            let remainder = a.try_rem(&b).unwrap();
            let back = quotient.try_mul(&b).unwrap().try_add(&remainder).unwrap();
            prop_assert_eq!(back, a);
        }

        #[test]
        fn prop_cross_kind_operators_fail(l in any_value(), r in any_value()) {
            prop_assume!(l.data_type() != r.data_type());
            let ops: [fn(&Value, &Value) -> Result<Value>; 16] = [
                Value::equals, Value::not_equals, Value::less_than, Value::less_equal,
                Value::greater_than, Value::greater_equal, Value::try_add, Value::try_sub,
                Value::try_mul, Value::try_div, Value::try_rem, Value::logical_and,
                Value::logical_or, Value::bit_and, Value::bit_or, Value::bit_xor,
            ];
            for op in ops {
                let is_mismatch = matches!(op(&l, &r), Err(Error::TypeMismatch { .. }));
                prop_assert!(is_mismatch);
            }
        }

        #[test]
        fn prop_bounded_text_round_trip(s in "[ -~]{0,256}") {
            let v = Value::text(&s).unwrap();
            prop_assert_eq!(v.as_str(), Some(s.as_str()));
        }
    }
}
