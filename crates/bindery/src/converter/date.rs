#![forbid(unsafe_code)]

use chrono::NaiveDate;

use super::Converter;
use crate::error::ConversionError;

/// Date format used when none is configured (`2011-05-01`).
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Converts dates to and from text with a `chrono` format string.
///
/// Text that does not parse fails with "must be a valid date".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateConverter {
    format: String,
}

impl DateConverter {
    /// A converter using `format` (see `chrono::format::strftime`).
    #[must_use]
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }

    /// The format string.
    #[must_use]
    pub fn format(&self) -> &str {
        &self.format
    }
}

impl Default for DateConverter {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMAT)
    }
}

impl Converter<NaiveDate, String> for DateConverter {
    fn to_model(&self, target: &String) -> Result<NaiveDate, ConversionError> {
        NaiveDate::parse_from_str(target, &self.format)
            .map_err(|_| ConversionError::invalid("must be a valid date"))
    }

    fn to_target(&self, model: &NaiveDate) -> Result<String, ConversionError> {
        Ok(model.format(&self.format).to_string())
    }
}
