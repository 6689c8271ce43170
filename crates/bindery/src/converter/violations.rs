#![forbid(unsafe_code)]

use bindery_validation::interpolate;

use super::Converter;
use crate::error::ConversionError;
use crate::violation::BindingViolation;

/// One line per violation: the message only.
pub const SHORT_FORMAT: &str = "${message}";

/// One line per violation: the field label, then the message.
pub const LONG_FORMAT: &str = "${label} ${message}";

/// Renders a violation list as display text, one templated line each.
///
/// `${label}` and `${message}` are substituted; a missing label renders as
/// empty. Lines are joined with `\n`. The reverse direction is unsupported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViolationListConverter {
    template: String,
}

impl ViolationListConverter {
    /// A converter with a custom line template.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Message-only lines.
    #[must_use]
    pub fn short() -> Self {
        Self::new(SHORT_FORMAT)
    }

    /// Label-and-message lines.
    #[must_use]
    pub fn long() -> Self {
        Self::new(LONG_FORMAT)
    }

    /// The line template.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Render `violations` as text.
    #[must_use]
    pub fn format(&self, violations: &[BindingViolation]) -> String {
        violations
            .iter()
            .map(|v| {
                interpolate(
                    &self.template,
                    &[("label", v.label().unwrap_or("")), ("message", v.message())],
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for ViolationListConverter {
    fn default() -> Self {
        Self::long()
    }
}

impl Converter<Vec<BindingViolation>, String> for ViolationListConverter {
    fn to_model(&self, _target: &String) -> Result<Vec<BindingViolation>, ConversionError> {
        Err(ConversionError::unsupported::<String, Vec<BindingViolation>>())
    }

    fn to_target(&self, model: &Vec<BindingViolation>) -> Result<String, ConversionError> {
        Ok(self.format(model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<BindingViolation> {
        vec![
            BindingViolation::labeled("Name:", "size must be between 3 and 10"),
            BindingViolation::new("must be a valid number"),
        ]
    }

    #[test]
    fn short_format_lists_messages() {
        let text = ViolationListConverter::short().to_target(&sample());
        assert_eq!(
            text,
            Ok("size must be between 3 and 10\nmust be a valid number".to_string())
        );
    }

    #[test]
    fn long_format_prefixes_labels() {
        let text = ViolationListConverter::long().format(&sample());
        assert_eq!(
            text,
            "Name: size must be between 3 and 10\n must be a valid number"
        );
    }

    #[test]
    fn empty_list_is_empty_text() {
        assert_eq!(ViolationListConverter::short().format(&[]), "");
    }

    #[test]
    fn reverse_conversion_fails() {
        let err = ViolationListConverter::default()
            .to_model(&"anything".to_string())
            .unwrap_err();
        assert!(matches!(err, ConversionError::Unsupported { .. }));
    }

    #[test]
    fn custom_template() {
        let conv = ViolationListConverter::new("- ${message} (${label})");
        assert_eq!(conv.template(), "- ${message} (${label})");
        assert_eq!(
            conv.format(&sample()[..1]),
            "- size must be between 3 and 10 (Name:)"
        );
    }
}
