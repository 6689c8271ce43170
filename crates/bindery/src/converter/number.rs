#![forbid(unsafe_code)]

use std::fmt::Display;
use std::marker::PhantomData;
use std::str::FromStr;

use super::Converter;
use crate::error::ConversionError;

/// Converts numbers to and from their decimal text.
///
/// Text that does not parse as `N` fails with "must be a valid number".
pub struct NumberConverter<N> {
    _number: PhantomData<fn() -> N>,
}

impl<N> NumberConverter<N> {
    /// Create a number converter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            _number: PhantomData,
        }
    }
}

impl<N> Default for NumberConverter<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> std::fmt::Debug for NumberConverter<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NumberConverter<{}>", std::any::type_name::<N>())
    }
}

impl<N: FromStr + Display> Converter<N, String> for NumberConverter<N> {
    fn to_model(&self, target: &String) -> Result<N, ConversionError> {
        target
            .parse()
            .map_err(|_| ConversionError::invalid("must be a valid number"))
    }

    fn to_target(&self, model: &N) -> Result<String, ConversionError> {
        Ok(model.to_string())
    }
}
