#![forbid(unsafe_code)]

//! Conversion between model and target representations.
//!
//! A [`Converter<M, T>`] turns a model value `M` into its target
//! representation `T` (usually the text shown in a widget) and parses it
//! back. Parsing user input is where conversion fails; a failure carrying a
//! [`BindingViolation`](crate::BindingViolation) is shown to the user like
//! any validation message.
//!
//! # Built-in converters
//!
//! | Converter | Model | Target |
//! |-----------|-------|--------|
//! | [`IdentityConverter`] | `T` | `T` |
//! | [`NumberConverter`] | integers and floats | `String` |
//! | [`DateConverter`] | `NaiveDate` | `String` |
//! | [`Optional`] | `Option<M>` | `String` |
//! | [`ViolationListConverter`] | `Vec<BindingViolation>` | `String` (one-way) |
//!
//! [`ConverterRegistry`] resolves a converter for a type pair when a binding
//! is created without one.

mod date;
mod number;
mod optional;
mod registry;
mod violations;

use std::any::Any;
use std::marker::PhantomData;

pub use date::{DEFAULT_DATE_FORMAT, DateConverter};
pub use number::NumberConverter;
pub use optional::Optional;
pub use registry::ConverterRegistry;
pub use violations::{LONG_FORMAT, SHORT_FORMAT, ViolationListConverter};

use crate::error::ConversionError;

/// Two-way conversion between a model value and its target representation.
pub trait Converter<M, T> {
    /// Parse a target value into a model value.
    ///
    /// # Errors
    ///
    /// Fails when the target value has no model representation.
    fn to_model(&self, target: &T) -> Result<M, ConversionError>;

    /// Render a model value as a target value.
    ///
    /// # Errors
    ///
    /// Fails when the model value has no target representation.
    fn to_target(&self, model: &M) -> Result<T, ConversionError>;
}

impl<M, T, C: Converter<M, T> + ?Sized> Converter<M, T> for std::rc::Rc<C> {
    fn to_model(&self, target: &T) -> Result<M, ConversionError> {
        (**self).to_model(target)
    }

    fn to_target(&self, model: &M) -> Result<T, ConversionError> {
        (**self).to_target(model)
    }
}

/// Passes values through unchanged when model and target types are equal.
///
/// The registry only hands this out when `M` and `T` are the same type; for
/// any other pair both directions fail.
pub struct IdentityConverter<M, T> {
    _types: PhantomData<fn(M) -> T>,
}

impl<M, T> IdentityConverter<M, T> {
    /// Create an identity converter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            _types: PhantomData,
        }
    }
}

impl<M, T> Default for IdentityConverter<M, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M, T> std::fmt::Debug for IdentityConverter<M, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("IdentityConverter")
    }
}

fn pass_through<F: 'static, T: Clone + 'static>(value: &F) -> Result<T, ConversionError> {
    (value as &dyn Any)
        .downcast_ref::<T>()
        .cloned()
        .ok_or_else(ConversionError::unsupported::<F, T>)
}

impl<M: Clone + 'static, T: Clone + 'static> Converter<M, T> for IdentityConverter<M, T> {
    fn to_model(&self, target: &T) -> Result<M, ConversionError> {
        pass_through(target)
    }

    fn to_target(&self, model: &M) -> Result<T, ConversionError> {
        pass_through(model)
    }
}
