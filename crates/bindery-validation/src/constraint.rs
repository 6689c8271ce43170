#![forbid(unsafe_code)]

//! Declarative constraints on bound values.
//!
//! Constraints follow the bean-validation conventions: every constraint
//! except [`Constraint::NotNull`] and [`Constraint::NotBlank`] accepts
//! [`Value::Null`], and a constraint accepts value kinds it does not apply to
//! (e.g. `Size` on an integer).

use std::fmt;
use std::rc::Rc;

use chrono::NaiveDate;
use regex::Regex;

use crate::messages::MessageCatalog;
use crate::value::Value;

/// A single declared constraint.
#[derive(Clone)]
pub enum Constraint {
    /// Value must not be null.
    NotNull,
    /// Text must contain a non-whitespace character; null fails.
    NotBlank,
    /// Text length (in chars) or collection length within `min..=max`.
    Size {
        /// Inclusive lower bound.
        min: usize,
        /// Inclusive upper bound.
        max: usize,
    },
    /// Number must be `>=` the bound.
    Min(i64),
    /// Number must be `<=` the bound.
    Max(i64),
    /// Text must match the whole pattern.
    Pattern {
        /// The pattern as declared.
        regexp: String,
        /// The pattern anchored at both ends.
        regex: Regex,
    },
    /// Date must be before today.
    Past,
    /// Date must be after today.
    Future,
    /// Application-defined check with its own message.
    Custom {
        /// Message reported on failure.
        message: String,
        /// Returns `true` when the value is acceptable.
        check: Rc<dyn Fn(&Value) -> bool>,
    },
}

impl Constraint {
    /// `Size { min, max }`.
    #[must_use]
    pub fn size(min: usize, max: usize) -> Self {
        Self::Size { min, max }
    }

    /// A whole-text pattern constraint.
    ///
    /// # Errors
    ///
    /// Returns the regex error if `regexp` does not compile.
    pub fn pattern(regexp: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{regexp})$"))?;
        Ok(Self::Pattern {
            regexp: regexp.to_string(),
            regex,
        })
    }

    /// A custom constraint.
    #[must_use]
    pub fn custom(message: impl Into<String>, check: impl Fn(&Value) -> bool + 'static) -> Self {
        Self::Custom {
            message: message.into(),
            check: Rc::new(check),
        }
    }

    /// Message catalog key for this constraint.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotNull => "NotNull",
            Self::NotBlank => "NotBlank",
            Self::Size { .. } => "Size",
            Self::Min(_) => "Min",
            Self::Max(_) => "Max",
            Self::Pattern { .. } => "Pattern",
            Self::Past => "Past",
            Self::Future => "Future",
            Self::Custom { .. } => "Custom",
        }
    }

    /// Whether `value` satisfies this constraint, with `today` as the
    /// reference date for `Past`/`Future`.
    #[must_use]
    pub fn is_satisfied(&self, value: &Value, today: NaiveDate) -> bool {
        match (self, value) {
            (Self::NotNull, v) => !v.is_null(),
            (Self::NotBlank, Value::Null) => false,
            (Self::NotBlank, Value::Text(s)) => !s.trim().is_empty(),
            (Self::Custom { check, .. }, v) => check(v),
            (_, Value::Null) => true,
            (Self::Size { min, max }, Value::Text(s)) => {
                let len = s.chars().count();
                (*min..=*max).contains(&len)
            }
            (Self::Size { min, max }, Value::Collection(len)) => (*min..=*max).contains(len),
            (Self::Min(bound), Value::Integer(n)) => *n >= i128::from(*bound),
            (Self::Min(bound), Value::Float(x)) => *x >= *bound as f64,
            (Self::Max(bound), Value::Integer(n)) => *n <= i128::from(*bound),
            (Self::Max(bound), Value::Float(x)) => *x <= *bound as f64,
            (Self::Pattern { regex, .. }, Value::Text(s)) => regex.is_match(s),
            (Self::Past, Value::Date(d)) => *d < today,
            (Self::Future, Value::Date(d)) => *d > today,
            _ => true,
        }
    }

    /// The failure message for this constraint.
    #[must_use]
    pub fn message(&self, catalog: &MessageCatalog) -> String {
        match self {
            Self::Size { min, max } => {
                let (min, max) = (min.to_string(), max.to_string());
                catalog.format(self.code(), &[("min", &min), ("max", &max)])
            }
            Self::Min(bound) | Self::Max(bound) => {
                let bound = bound.to_string();
                catalog.format(self.code(), &[("value", &bound)])
            }
            Self::Pattern { regexp, .. } => catalog.format(self.code(), &[("regexp", regexp)]),
            Self::Custom { message, .. } => message.clone(),
            _ => catalog.format(self.code(), &[]),
        }
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Size { min, max } => write!(f, "Size({min}..={max})"),
            Self::Min(bound) => write!(f, "Min({bound})"),
            Self::Max(bound) => write!(f, "Max({bound})"),
            Self::Pattern { regexp, .. } => write!(f, "Pattern({regexp:?})"),
            Self::Custom { message, .. } => write!(f, "Custom({message:?})"),
            _ => f.write_str(self.code()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).expect("valid date")
    }

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn not_null() {
        assert!(!Constraint::NotNull.is_satisfied(&Value::Null, today()));
        assert!(Constraint::NotNull.is_satisfied(&text(""), today()));
    }

    #[test]
    fn not_blank() {
        let c = Constraint::NotBlank;
        assert!(!c.is_satisfied(&Value::Null, today()));
        assert!(!c.is_satisfied(&text("  "), today()));
        assert!(c.is_satisfied(&text(" a "), today()));
        assert!(c.is_satisfied(&Value::Integer(0), today()));
    }

    #[test]
    fn size_counts_chars() {
        let c = Constraint::size(3, 10);
        assert!(!c.is_satisfied(&text("Bo"), today()));
        assert!(c.is_satisfied(&text("Bob"), today()));
        assert!(c.is_satisfied(&text("Zoë"), today()));
        assert!(!c.is_satisfied(&text("Bartholomew"), today()));
        assert!(c.is_satisfied(&Value::Null, today()));
        assert!(!c.is_satisfied(&Value::Collection(2), today()));
    }

    #[test]
    fn min_max_numbers() {
        assert!(!Constraint::Min(10).is_satisfied(&Value::Integer(9), today()));
        assert!(Constraint::Min(10).is_satisfied(&Value::Integer(10), today()));
        assert!(Constraint::Max(10).is_satisfied(&Value::Float(9.5), today()));
        assert!(!Constraint::Max(10).is_satisfied(&Value::Float(10.5), today()));
        assert!(Constraint::Min(10).is_satisfied(&text("3"), today()));
    }

    #[test]
    fn pattern_matches_whole_text() {
        let c = Constraint::pattern("[a-z]+|[0-9]").expect("valid regex");
        assert!(c.is_satisfied(&text("abc"), today()));
        assert!(!c.is_satisfied(&text("abc1"), today()));
        assert!(c.is_satisfied(&text("7"), today()));
        assert!(Constraint::pattern("(").is_err());
    }

    #[test]
    fn past_and_future() {
        let yesterday = Value::Date(today().pred_opt().expect("valid date"));
        let tomorrow = Value::Date(today().succ_opt().expect("valid date"));
        assert!(Constraint::Past.is_satisfied(&yesterday, today()));
        assert!(!Constraint::Past.is_satisfied(&Value::Date(today()), today()));
        assert!(Constraint::Future.is_satisfied(&tomorrow, today()));
        assert!(!Constraint::Future.is_satisfied(&yesterday, today()));
    }

    #[test]
    fn custom_sees_null() {
        let c = Constraint::custom("must be even", |v| matches!(v, Value::Integer(n) if n % 2 == 0));
        assert!(!c.is_satisfied(&Value::Null, today()));
        assert!(c.is_satisfied(&Value::Integer(4), today()));
        assert_eq!(c.message(&MessageCatalog::new()), "must be even");
    }

    #[test]
    fn messages() {
        let catalog = MessageCatalog::new();
        assert_eq!(
            Constraint::size(3, 10).message(&catalog),
            "size must be between 3 and 10"
        );
        assert_eq!(
            Constraint::Max(99).message(&catalog),
            "must be less than or equal to 99"
        );
        assert_eq!(Constraint::Past.message(&catalog), "must be in the past");
    }

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", Constraint::size(1, 2)), "Size(1..=2)");
        assert_eq!(format!("{:?}", Constraint::NotNull), "NotNull");
    }
}
