#![forbid(unsafe_code)]

//! The validator capability and its built-in implementation.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use bindery_reactive::BeanType;
use chrono::NaiveDate;

use crate::constraint::Constraint;
use crate::messages::MessageCatalog;
use crate::value::Value;

/// Validates a candidate value for a declared bean property.
///
/// Implementations return one message per violated constraint; an empty
/// vector means the value is acceptable. Properties without declared
/// constraints are always acceptable.
pub trait Validator {
    /// Validate `value` as a candidate for `property` of `bean`.
    fn validate_value(&self, bean: BeanType, property: &str, value: &Value) -> Vec<String>;
}

impl<V: Validator + ?Sized> Validator for Rc<V> {
    fn validate_value(&self, bean: BeanType, property: &str, value: &Value) -> Vec<String> {
        (**self).validate_value(bean, property, value)
    }
}

/// Accepts every value.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopValidator;

impl Validator for NoopValidator {
    fn validate_value(&self, _bean: BeanType, _property: &str, _value: &Value) -> Vec<String> {
        Vec::new()
    }
}

/// Constraint registry keyed by bean type and property name.
///
/// # Example
///
/// ```
/// use bindery_reactive::BeanType;
/// use bindery_validation::{Constraint, ConstraintValidator, Validator, Value};
///
/// struct Person;
///
/// let validator = ConstraintValidator::new()
///     .constrain::<Person>("age", [Constraint::NotNull, Constraint::Min(10)]);
///
/// let errors = validator.validate_value(BeanType::of::<Person>(), "age", &Value::Integer(3));
/// assert_eq!(errors, vec!["must be greater than or equal to 10".to_string()]);
/// ```
#[derive(Clone)]
pub struct ConstraintValidator {
    constraints: HashMap<(BeanType, String), Vec<Constraint>>,
    messages: MessageCatalog,
    today: Rc<dyn Fn() -> NaiveDate>,
}

impl Default for ConstraintValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstraintValidator {
    /// An empty registry with default messages, using the local date for
    /// `Past`/`Future`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            constraints: HashMap::new(),
            messages: MessageCatalog::new(),
            today: Rc::new(|| chrono::Local::now().date_naive()),
        }
    }

    /// Declare constraints for property `name` of bean `B`, appending to any
    /// already declared.
    #[must_use]
    pub fn constrain<B: 'static>(
        mut self,
        name: &str,
        constraints: impl IntoIterator<Item = Constraint>,
    ) -> Self {
        self.add::<B>(name, constraints);
        self
    }

    /// In-place form of [`constrain`](Self::constrain).
    pub fn add<B: 'static>(
        &mut self,
        name: &str,
        constraints: impl IntoIterator<Item = Constraint>,
    ) {
        self.constraints
            .entry((BeanType::of::<B>(), name.to_string()))
            .or_default()
            .extend(constraints);
    }

    /// Replace the message catalog.
    #[must_use]
    pub fn with_messages(mut self, messages: MessageCatalog) -> Self {
        self.messages = messages;
        self
    }

    /// Fix the reference date used by `Past`/`Future`.
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Rc::new(move || today);
        self
    }

    /// Constraints declared for a property.
    #[must_use]
    pub fn constraints_for(&self, bean: BeanType, property: &str) -> &[Constraint] {
        self.constraints
            .get(&(bean, property.to_string()))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl Validator for ConstraintValidator {
    fn validate_value(&self, bean: BeanType, property: &str, value: &Value) -> Vec<String> {
        let constraints = self.constraints_for(bean, property);
        if constraints.is_empty() {
            return Vec::new();
        }
        let today = (self.today)();
        let messages: Vec<String> = constraints
            .iter()
            .filter(|c| !c.is_satisfied(value, today))
            .map(|c| c.message(&self.messages))
            .collect();
        if !messages.is_empty() {
            tracing::trace!(
                bean = bean.name(),
                property,
                %value,
                violations = messages.len(),
                "constraint violations"
            );
        }
        messages
    }
}

impl fmt::Debug for ConstraintValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstraintValidator")
            .field("constraints", &self.constraints)
            .field("messages", &self.messages.len())
            .finish_non_exhaustive()
    }
}
