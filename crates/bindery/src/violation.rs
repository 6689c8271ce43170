#![forbid(unsafe_code)]

//! Labeled validation and conversion failures.

use std::fmt;

/// One failed validation or conversion, optionally prefixed by the label of
/// the field it belongs to.
///
/// Violations compare structurally, so an unchanged violation list does not
/// re-notify listeners.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingViolation {
    label: Option<String>,
    message: String,
}

impl BindingViolation {
    /// An unlabeled violation.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            label: None,
            message: message.into(),
        }
    }

    /// A violation attributed to the field labeled `label`.
    #[must_use]
    pub fn labeled(label: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            message: message.into(),
        }
    }

    /// Copy of this violation with its label replaced.
    #[must_use]
    pub fn with_label(self, label: Option<String>) -> Self {
        Self { label, ..self }
    }

    /// Field label, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// User-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for BindingViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{label} {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}
