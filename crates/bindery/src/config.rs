#![forbid(unsafe_code)]

//! Context-wide defaults.
//!
//! A [`BindingConfig`] sets the update policies a binding gets when its
//! builder does not override them, the date format of the built-in date
//! converters, and the template used by
//! [`BindingContext::bind_binding_violations`](crate::BindingContext::bind_binding_violations).
//!
//! With the `config` feature, a config can be read from TOML:
//!
//! ```toml
//! model_update_policy = "ON_REQUEST"
//! target_update_policy = "INSTANTLY"
//! date_format = "%d.%m.%Y"
//! violation_format = { custom = "${label}: ${message}" }
//! ```
//!
//! Missing keys keep their defaults.

use crate::converter::{
    DEFAULT_DATE_FORMAT, DateConverter, LONG_FORMAT, SHORT_FORMAT, ViolationListConverter,
};
use crate::policy::UpdatePolicy;

/// How a violation list renders as display text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum ViolationFormat {
    /// One message per line.
    #[default]
    Short,
    /// One `label message` per line.
    Long,
    /// A custom `${label}` / `${message}` template per line.
    Custom(String),
}

impl ViolationFormat {
    /// The per-violation template.
    #[must_use]
    pub fn template(&self) -> &str {
        match self {
            Self::Short => SHORT_FORMAT,
            Self::Long => LONG_FORMAT,
            Self::Custom(template) => template,
        }
    }

    /// A converter rendering with this format.
    #[must_use]
    pub fn converter(&self) -> ViolationListConverter {
        ViolationListConverter::new(self.template())
    }
}

/// Defaults applied by a [`BindingContext`](crate::BindingContext).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct BindingConfig {
    pub model_update_policy: UpdatePolicy,
    pub target_update_policy: UpdatePolicy,
    /// `chrono` format string for `NaiveDate <-> String`.
    pub date_format: String,
    pub violation_format: ViolationFormat,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            model_update_policy: UpdatePolicy::Instantly,
            target_update_policy: UpdatePolicy::Instantly,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            violation_format: ViolationFormat::Short,
        }
    }
}

impl BindingConfig {
    #[must_use]
    pub fn with_model_update_policy(mut self, policy: UpdatePolicy) -> Self {
        self.model_update_policy = policy;
        self
    }

    #[must_use]
    pub fn with_target_update_policy(mut self, policy: UpdatePolicy) -> Self {
        self.target_update_policy = policy;
        self
    }

    #[must_use]
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    #[must_use]
    pub fn with_violation_format(mut self, format: ViolationFormat) -> Self {
        self.violation_format = format;
        self
    }

    /// The date converter for the configured format.
    #[must_use]
    pub fn date_converter(&self) -> DateConverter {
        DateConverter::new(self.date_format.clone())
    }
}

#[cfg(feature = "config")]
impl BindingConfig {
    /// Parse a config from TOML text.
    ///
    /// # Errors
    ///
    /// [`BindError::Config`](crate::BindError::Config) when the text is not
    /// valid TOML or holds unknown values.
    pub fn from_toml_str(text: &str) -> Result<Self, crate::BindError> {
        toml::from_str(text).map_err(|err| crate::BindError::Config(err.to_string()))
    }

    /// Read and parse a TOML config file.
    ///
    /// # Errors
    ///
    /// [`BindError::Io`](crate::BindError::Io) when the file cannot be read,
    /// [`BindError::Config`](crate::BindError::Config) when it does not parse.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, crate::BindError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), ?config, "loaded binding config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::BindingViolation;

    #[test]
    fn defaults() {
        let config = BindingConfig::default();
        assert_eq!(config.model_update_policy, UpdatePolicy::Instantly);
        assert_eq!(config.target_update_policy, UpdatePolicy::Instantly);
        assert_eq!(config.date_format, "%Y-%m-%d");
        assert_eq!(config.violation_format, ViolationFormat::Short);
    }

    #[test]
    fn violation_formats() {
        let violations = [BindingViolation::labeled("Name:", "may not be null")];
        assert_eq!(
            ViolationFormat::Short.converter().format(&violations),
            "may not be null"
        );
        assert_eq!(
            ViolationFormat::Long.converter().format(&violations),
            "Name: may not be null"
        );
        assert_eq!(
            ViolationFormat::Custom("[${label}] ${message}".into())
                .converter()
                .format(&violations),
            "[Name:] may not be null"
        );
    }

    #[test]
    fn builder_overrides() {
        let config = BindingConfig::default()
            .with_model_update_policy(UpdatePolicy::OnRequest)
            .with_date_format("%d/%m/%Y");
        assert_eq!(config.model_update_policy, UpdatePolicy::OnRequest);
        assert_eq!(config.date_converter().format(), "%d/%m/%Y");
    }

    #[cfg(feature = "config")]
    mod toml_loading {
        use super::*;
        use std::io::Write;

        #[test]
        fn partial_toml_keeps_defaults() {
            let config = BindingConfig::from_toml_str("model_update_policy = \"ON_REQUEST\"\n")
                .expect("valid config");
            assert_eq!(config.model_update_policy, UpdatePolicy::OnRequest);
            assert_eq!(config.target_update_policy, UpdatePolicy::Instantly);
            assert_eq!(config.date_format, DEFAULT_DATE_FORMAT);
        }

        #[test]
        fn custom_violation_format() {
            let config = BindingConfig::from_toml_str(
                "violation_format = { custom = \"${label}: ${message}\" }\n",
            )
            .expect("valid config");
            assert_eq!(
                config.violation_format,
                ViolationFormat::Custom("${label}: ${message}".into())
            );
        }

        #[test]
        fn unknown_policy_is_config_error() {
            let err = BindingConfig::from_toml_str("model_update_policy = \"SOMETIMES\"\n")
                .expect_err("invalid policy");
            assert!(matches!(err, crate::BindError::Config(_)));
        }

        #[test]
        fn load_from_file() {
            let mut file = tempfile::NamedTempFile::new().expect("temp file");
            writeln!(file, "date_format = \"%d.%m.%Y\"").expect("write");
            writeln!(file, "violation_format = \"long\"").expect("write");

            let config = BindingConfig::load(file.path()).expect("loads");
            assert_eq!(config.date_format, "%d.%m.%Y");
            assert_eq!(config.violation_format, ViolationFormat::Long);
        }

        #[test]
        fn missing_file_is_io_error() {
            let dir = tempfile::tempdir().expect("temp dir");
            let err = BindingConfig::load(dir.path().join("absent.toml")).expect_err("no file");
            assert!(matches!(err, crate::BindError::Io(_)));
        }
    }
}
