#![forbid(unsafe_code)]

//! Error types.
//!
//! Conversion and validation failures are recoverable: a binding records
//! them as violations and carries on. [`BindError`] covers configuration
//! mistakes (a missing converter, a malformed config file) that the caller
//! has to fix.

use crate::violation::BindingViolation;

/// A value could not be converted between model and target representation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Conversion failed with a user-facing violation (e.g. unparsable input).
    #[error("{0}")]
    Violation(BindingViolation),
    /// Conversion failed for an internal reason.
    #[error("conversion failed: {0}")]
    Failed(String),
    /// The converter does not support this direction.
    #[error("conversion from `{from}` to `{to}` is not supported")]
    Unsupported {
        /// Source type name.
        from: &'static str,
        /// Destination type name.
        to: &'static str,
    },
}

impl ConversionError {
    /// A failure carrying a user-facing message.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Violation(BindingViolation::new(message))
    }

    /// An unsupported direction from `F` to `T`.
    #[must_use]
    pub fn unsupported<F, T>() -> Self {
        Self::Unsupported {
            from: std::any::type_name::<F>(),
            to: std::any::type_name::<T>(),
        }
    }

    /// The structured violation, if this failure carries one.
    #[must_use]
    pub fn violation(&self) -> Option<&BindingViolation> {
        match self {
            Self::Violation(v) => Some(v),
            _ => None,
        }
    }
}

/// A binding could not be created or configured.
#[derive(Debug, thiserror::Error)]
pub enum BindError {
    /// No converter is registered for the model/target type pair.
    #[error("couldn't find a converter for model type `{model}` and target type `{target}`")]
    NoConverter {
        /// Model value type name.
        model: &'static str,
        /// Target value type name.
        target: &'static str,
    },
    /// A configuration value was rejected.
    #[error("invalid binding configuration: {0}")]
    Config(String),
    /// A configuration file could not be read.
    #[error("failed to read binding configuration: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_carries_violation() {
        let err = ConversionError::invalid("must be a valid number");
        assert_eq!(
            err.violation().map(BindingViolation::message),
            Some("must be a valid number")
        );
        assert_eq!(err.to_string(), "must be a valid number");
    }

    #[test]
    fn unsupported_names_types() {
        let err = ConversionError::unsupported::<String, Vec<u8>>();
        assert!(err.violation().is_none());
        let text = err.to_string();
        assert!(text.contains("String"));
        assert!(text.contains("Vec<u8>"));
    }

    #[test]
    fn no_converter_message() {
        let err = BindError::NoConverter {
            model: "bool",
            target: "alloc::string::String",
        };
        assert_eq!(
            err.to_string(),
            "couldn't find a converter for model type `bool` and target type `alloc::string::String`"
        );
    }
}
