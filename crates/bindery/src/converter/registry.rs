#![forbid(unsafe_code)]

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use chrono::NaiveDate;

use super::{Converter, DateConverter, IdentityConverter, NumberConverter, Optional};
use crate::error::BindError;

struct Entry {
    model: &'static str,
    target: &'static str,
    // Always an `Rc<dyn Converter<M, T>>` for the key's types.
    converter: Box<dyn Any>,
}

/// Converters keyed by `(model type, target type)`.
///
/// A registry is owned by a [`BindingContext`](crate::BindingContext); there
/// is no process-wide state. Built-in conversions are registered at
/// construction:
///
/// - every primitive integer and float type `<->` `String`
/// - `NaiveDate` `<->` `String` with the configured date format
/// - `Option<_>` of each of the above `<->` `String`, with empty text as `None`
///
/// # Example
///
/// ```
/// use bindery::converter::{Converter, ConverterRegistry};
///
/// let registry = ConverterRegistry::new();
/// let conv = registry.resolve::<i32, String>().unwrap();
/// assert_eq!(conv.to_model(&"7".to_string()), Ok(7));
///
/// assert!(registry.resolve::<bool, String>().is_err());
/// ```
pub struct ConverterRegistry {
    converters: HashMap<(TypeId, TypeId), Entry>,
}

macro_rules! register_numbers {
    ($registry:expr; $($ty:ty),* $(,)?) => {
        $(
            $registry.register::<$ty, String>(NumberConverter::<$ty>::new());
            $registry.register::<Option<$ty>, String>(Optional::new(NumberConverter::<$ty>::new()));
        )*
    };
}

impl ConverterRegistry {
    /// A registry with the built-in converters and the default date format.
    #[must_use]
    pub fn new() -> Self {
        Self::with_date_converter(DateConverter::default())
    }

    /// A registry with the built-in converters, formatting dates with `dates`.
    #[must_use]
    pub fn with_date_converter(dates: DateConverter) -> Self {
        let mut registry = Self::empty();
        register_numbers!(registry; i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);
        registry.register::<Option<NaiveDate>, String>(Optional::new(dates.clone()));
        registry.register::<NaiveDate, String>(dates);
        registry
    }

    /// A registry with no converters. Equal types still resolve to identity.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            converters: HashMap::new(),
        }
    }

    /// Register `converter` for `M <-> T`, replacing any previous one.
    pub fn register<M: 'static, T: 'static>(&mut self, converter: impl Converter<M, T> + 'static) {
        let shared: Rc<dyn Converter<M, T>> = Rc::new(converter);
        self.converters.insert(
            (TypeId::of::<M>(), TypeId::of::<T>()),
            Entry {
                model: type_name::<M>(),
                target: type_name::<T>(),
                converter: Box::new(shared),
            },
        );
    }

    /// Whether a converter is registered for `M <-> T`.
    #[must_use]
    pub fn contains<M: 'static, T: 'static>(&self) -> bool {
        self.converters
            .contains_key(&(TypeId::of::<M>(), TypeId::of::<T>()))
    }

    /// Number of registered converters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Whether no converters are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// The converter for `M <-> T`.
    ///
    /// Equal types resolve to [`IdentityConverter`]; otherwise the registered
    /// converter is returned.
    ///
    /// # Errors
    ///
    /// [`BindError::NoConverter`] when the types differ and nothing is
    /// registered for the pair.
    pub fn resolve<M: Clone + 'static, T: Clone + 'static>(
        &self,
    ) -> Result<Rc<dyn Converter<M, T>>, BindError> {
        if TypeId::of::<M>() == TypeId::of::<T>() {
            return Ok(Rc::new(IdentityConverter::<M, T>::new()));
        }
        self.converters
            .get(&(TypeId::of::<M>(), TypeId::of::<T>()))
            .and_then(|entry| entry.converter.downcast_ref::<Rc<dyn Converter<M, T>>>())
            .cloned()
            .ok_or_else(|| BindError::NoConverter {
                model: type_name::<M>(),
                target: type_name::<T>(),
            })
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pairs: Vec<String> = self
            .converters
            .values()
            .map(|e| format!("{} <-> {}", e.model, e.target))
            .collect();
        pairs.sort();
        f.debug_struct("ConverterRegistry")
            .field("converters", &pairs)
            .finish()
    }
}
