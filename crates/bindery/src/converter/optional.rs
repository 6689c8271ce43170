#![forbid(unsafe_code)]

use super::Converter;
use crate::error::ConversionError;

/// Lifts a text converter to optional model values: empty text is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Optional<C> {
    inner: C,
}

impl<C> Optional<C> {
    /// Wrap `inner`.
    #[must_use]
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    /// The wrapped converter.
    #[must_use]
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<M, C: Converter<M, String>> Converter<Option<M>, String> for Optional<C> {
    fn to_model(&self, target: &String) -> Result<Option<M>, ConversionError> {
        if target.is_empty() {
            return Ok(None);
        }
        self.inner.to_model(target).map(Some)
    }

    fn to_target(&self, model: &Option<M>) -> Result<String, ConversionError> {
        match model {
            Some(value) => self.inner.to_target(value),
            None => Ok(String::new()),
        }
    }
}
