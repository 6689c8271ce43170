#![forbid(unsafe_code)]

//! Type-erased values for constraint evaluation.

use std::fmt;

use chrono::NaiveDate;

/// What a constraint sees of a bound value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value (`None`, or the blank case of a target).
    Null,
    /// Boolean.
    Bool(bool),
    /// Any integer type, widened.
    Integer(i128),
    /// Any float type, widened.
    Float(f64),
    /// Text.
    Text(String),
    /// Calendar date.
    Date(NaiveDate),
    /// A collection, by length.
    Collection(usize),
}

impl Value {
    /// Whether this is [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
            Self::Date(d) => write!(f, "{d}"),
            Self::Collection(len) => write!(f, "[{len} items]"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// A value that can be bound and validated.
pub trait FieldValue {
    /// The constraint view of this value.
    fn to_value(&self) -> Value;

    /// Whether this value counts as empty input: null, or empty text.
    fn is_blank(&self) -> bool {
        match self.to_value() {
            Value::Null => true,
            Value::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl FieldValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl FieldValue for char {
    fn to_value(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl FieldValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl FieldValue for NaiveDate {
    fn to_value(&self) -> Value {
        Value::Date(*self)
    }
}

macro_rules! integer_field_values {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn to_value(&self) -> Value {
                    Value::Integer(i128::from(*self))
                }
            }
        )*
    };
}

integer_field_values!(i8, i16, i32, i64, i128, u8, u16, u32, u64);

impl FieldValue for isize {
    fn to_value(&self) -> Value {
        Value::Integer(*self as i128)
    }
}

impl FieldValue for u128 {
    fn to_value(&self) -> Value {
        Value::Integer(i128::try_from(*self).unwrap_or(i128::MAX))
    }
}

impl FieldValue for usize {
    fn to_value(&self) -> Value {
        Value::Integer(*self as i128)
    }
}

impl FieldValue for f32 {
    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }
}

impl FieldValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, FieldValue::to_value)
    }

    fn is_blank(&self) -> bool {
        self.as_ref().is_none_or(FieldValue::is_blank)
    }
}

impl<T> FieldValue for Vec<T> {
    fn to_value(&self) -> Value {
        Value::Collection(self.len())
    }

    fn is_blank(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_are_text() {
        assert_eq!("abc".to_string().to_value(), Value::Text("abc".into()));
        assert!(String::new().is_blank());
        assert!(!" ".to_string().is_blank());
    }

    #[test]
    fn integers_widen() {
        assert_eq!(7_u8.to_value(), Value::Integer(7));
        assert_eq!((-3_i64).to_value(), Value::Integer(-3));
        assert_eq!(u64::MAX.to_value(), Value::Integer(i128::from(u64::MAX)));
        assert!(!0_i32.is_blank());
    }

    #[test]
    fn options_map_none_to_null() {
        assert_eq!(None::<i32>.to_value(), Value::Null);
        assert_eq!(Some(4_i32).to_value(), Value::Integer(4));
        assert!(None::<String>.is_blank());
        assert!(Some(String::new()).is_blank());
        assert!(!Some("x".to_string()).is_blank());
    }

    #[test]
    fn collections_report_length() {
        assert_eq!(vec![1, 2, 3].to_value(), Value::Collection(3));
        assert!(!Vec::<u8>::new().is_blank());
    }

    #[test]
    fn dates_and_bools() {
        let date = NaiveDate::from_ymd_opt(2011, 5, 1).expect("valid date");
        assert_eq!(date.to_value(), Value::Date(date));
        assert_eq!(true.to_value(), Value::Bool(true));
    }

    #[test]
    fn display() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Collection(2).to_string(), "[2 items]");
        assert_eq!(Value::from("hi").to_string(), "hi");
    }
}
