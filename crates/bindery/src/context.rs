#![forbid(unsafe_code)]

//! The owner of a form's bindings.
//!
//! A [`BindingContext`] creates bindings through a fluent builder, keeps
//! every binding it created, and folds their violations into one observable
//! list. Bulk operations ([`update_models`](BindingContext::update_models),
//! [`update_targets`](BindingContext::update_targets),
//! [`validate_all`](BindingContext::validate_all)) serve form-level actions
//! such as submit and reset.
//!
//! # Usage
//!
//! ```
//! use bindery::{BindingContext, Observable};
//! use bindery::validation::{Constraint, ConstraintValidator};
//!
//! struct Person;
//!
//! let validator = ConstraintValidator::new()
//!     .constrain::<Person>("age", [Constraint::Min(10)]);
//! let context = BindingContext::with_validator(validator);
//!
//! let age = Observable::for_property::<Person>("age", 0_i32);
//! let text = Observable::new(String::new());
//! let binding = context.bind(&age).with_label("Age:").to(&text).unwrap();
//!
//! text.set("4".to_string());
//! assert!(!context.is_valid());
//! assert_eq!(binding.violations()[0].to_string(), "Age: must be greater than or equal to 10");
//!
//! text.set("40".to_string());
//! assert!(context.is_valid());
//! assert_eq!(age.get(), 40);
//! ```
//!
//! # Invariants
//!
//! 1. The aggregated list is the concatenation of every binding's list, in
//!    binding creation order.
//! 2. The aggregated list is recomputed whenever any binding's list changes.
//! 3. `is_valid` is `true` exactly when the aggregated list is empty; an
//!    empty context is valid. The list is published before the
//!    `is_valid_property` flag, and subscribers to either observe
//!    [`is_valid`](BindingContext::is_valid) agreeing with
//!    [`violations`](BindingContext::violations).
//! 4. Bindings live as long as the context; the context does not keep
//!    observed properties alive beyond its bindings.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use bindery_reactive::{
    Access, Observable, ObservableValue, ReadOnlyObservable, Subscription,
};
use bindery_validation::{NoopValidator, Validator};

use crate::binding::{Binding, BindingHandle, PropertyValue};
use crate::config::BindingConfig;
use crate::converter::{Converter, ConverterRegistry};
use crate::error::BindError;
use crate::policy::UpdatePolicy;
use crate::violation::BindingViolation;

struct ContextInner {
    bindings: RefCell<Vec<Rc<dyn BindingHandle>>>,
    violations: Observable<Vec<BindingViolation>>,
    is_valid: Observable<bool>,
    converters: RefCell<ConverterRegistry>,
    validator: Rc<dyn Validator>,
    config: BindingConfig,
    listeners: RefCell<Vec<Subscription>>,
}

impl ContextInner {
    fn refresh_violations(&self) {
        let bindings: Vec<Rc<dyn BindingHandle>> = self.bindings.borrow().clone();
        let violations: Vec<BindingViolation> =
            bindings.iter().flat_map(|b| b.violations()).collect();
        let valid = violations.is_empty();
        // List first: `is_valid()` reads it.
        self.violations.set(violations);
        self.is_valid.set(valid);
    }

    fn snapshot(&self) -> Vec<Rc<dyn BindingHandle>> {
        self.bindings.borrow().clone()
    }
}

/// Creates and tracks bindings for one unit of work, typically a form.
///
/// Clones share the same context.
#[derive(Clone)]
pub struct BindingContext {
    inner: Rc<ContextInner>,
}

impl Default for BindingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl BindingContext {
    /// A context that accepts every value.
    #[must_use]
    pub fn new() -> Self {
        Self::with_validator(NoopValidator)
    }

    /// A context validating model properties with `validator`.
    #[must_use]
    pub fn with_validator(validator: impl Validator + 'static) -> Self {
        Self::with_config(BindingConfig::default(), validator)
    }

    /// A context with explicit defaults.
    #[must_use]
    pub fn with_config(config: BindingConfig, validator: impl Validator + 'static) -> Self {
        let converters = ConverterRegistry::with_date_converter(config.date_converter());
        Self {
            inner: Rc::new(ContextInner {
                bindings: RefCell::new(Vec::new()),
                violations: Observable::new(Vec::new()),
                is_valid: Observable::new(true),
                converters: RefCell::new(converters),
                validator: Rc::new(validator),
                config,
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    /// The defaults this context applies.
    #[must_use]
    pub fn config(&self) -> &BindingConfig {
        &self.inner.config
    }

    /// Register a converter for bindings created after this call.
    pub fn register_converter<M: 'static, T: 'static>(
        &self,
        converter: impl Converter<M, T> + 'static,
    ) {
        self.inner.converters.borrow_mut().register(converter);
    }

    /// Start a binding with `model` as its model side.
    pub fn bind<P, T>(&self, model: &P) -> BindingBuilder<'_, P::Value, T>
    where
        P: ObservableValue,
        P::Value: PropertyValue,
        T: PropertyValue,
    {
        BindingBuilder {
            context: self,
            model: model.access(),
            options: BindingOptions::default(),
        }
    }

    /// Start a binding that renders `binding`'s violations as text with the
    /// configured violation format.
    pub fn bind_binding_violations<M: PropertyValue, T: PropertyValue>(
        &self,
        binding: &Binding<M, T>,
    ) -> BindingBuilder<'_, Vec<BindingViolation>, String> {
        let converter = self.inner.config.violation_format.converter();
        self.bind(&binding.target_violations_property())
            .with_converter(converter)
    }

    /// Validate `binding` whenever some other observable reaches a value.
    ///
    /// ```
    /// use bindery::{BindingContext, Observable};
    ///
    /// let context = BindingContext::new();
    /// let name = Observable::new(String::new());
    /// let text = Observable::new(String::new());
    /// let focused = Observable::new(false);
    /// let binding = context.bind(&name).to(&text).unwrap();
    ///
    /// context
    ///     .auto_validate_target_property_of(&binding)
    ///     .upon(&focused)
    ///     .becoming(false);
    /// ```
    pub fn auto_validate_target_property_of<M: PropertyValue, T: PropertyValue>(
        &self,
        binding: &Binding<M, T>,
    ) -> AutoValidate<'_> {
        AutoValidate {
            context: self,
            binding: binding.handle(),
        }
    }

    /// Create a binding between `model` and `target`.
    ///
    /// Options left unset take the context's defaults; a read-only side
    /// always gets `Never` for its update policy.
    ///
    /// # Errors
    ///
    /// [`BindError::NoConverter`] when no converter was given and none is
    /// registered for `M <-> T`.
    pub fn create_binding<M: PropertyValue, T: PropertyValue>(
        &self,
        model: Access<M>,
        target: Access<T>,
        options: BindingOptions<M, T>,
    ) -> Result<Binding<M, T>, BindError> {
        let converter = match options.converter {
            Some(converter) => converter,
            None => self.inner.converters.borrow().resolve::<M, T>()?,
        };
        let binding = Binding::new(
            model,
            target,
            converter,
            Rc::clone(&self.inner.validator),
            options
                .model_update_policy
                .unwrap_or(self.inner.config.model_update_policy),
            options
                .target_update_policy
                .unwrap_or(self.inner.config.target_update_policy),
            options.label,
        );
        self.register(&binding);
        tracing::debug!(
            model = ?binding.model_property().meta(),
            label = ?binding.label(),
            model_update_policy = %binding.model_update_policy(),
            target_update_policy = %binding.target_update_policy(),
            bindings = self.binding_count(),
            "created binding"
        );
        Ok(binding)
    }

    fn register<M: PropertyValue, T: PropertyValue>(&self, binding: &Binding<M, T>) {
        let weak: Weak<ContextInner> = Rc::downgrade(&self.inner);
        let sub = binding.target_violations_property().subscribe(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.refresh_violations();
            }
        });
        self.inner.listeners.borrow_mut().push(sub);
        self.inner.bindings.borrow_mut().push(binding.handle());
        self.inner.refresh_violations();
    }

    /// Commit every binding's target value to its model.
    pub fn update_models(&self) {
        let bindings = self.inner.snapshot();
        tracing::debug!(bindings = bindings.len(), "updating models");
        for binding in &bindings {
            binding.update_model_property();
        }
    }

    /// Refresh every binding's target from its model.
    pub fn update_targets(&self) {
        let bindings = self.inner.snapshot();
        tracing::debug!(bindings = bindings.len(), "updating targets");
        for binding in &bindings {
            binding.update_target_property();
        }
    }

    /// Validate every binding that can write its model, without committing.
    ///
    /// Returns whether all of them are valid. Display bindings (read-only
    /// models such as those from
    /// [`bind_binding_violations`](Self::bind_binding_violations)) are
    /// skipped.
    pub fn validate_all(&self) -> bool {
        let bindings = self.inner.snapshot();
        let mut valid = true;
        for binding in bindings
            .iter()
            .filter(|b| b.model_update_policy().allows_update())
        {
            valid &= binding.validate_target_property();
        }
        tracing::debug!(bindings = bindings.len(), valid, "validated bindings");
        valid
    }

    /// All bindings' violations, observable.
    #[must_use]
    pub fn violations_property(&self) -> ReadOnlyObservable<Vec<BindingViolation>> {
        self.inner.violations.read_only()
    }

    #[must_use]
    pub fn violations(&self) -> Vec<BindingViolation> {
        self.inner.violations.get()
    }

    /// Whether no binding has violations, observable.
    #[must_use]
    pub fn is_valid_property(&self) -> ReadOnlyObservable<bool> {
        self.inner.is_valid.read_only()
    }

    /// Whether the aggregated list is empty.
    ///
    /// Read from the list itself, so a `violations_property` subscriber sees
    /// a verdict that matches the list it was handed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.inner.violations.with(Vec::is_empty)
    }

    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.inner.bindings.borrow().len()
    }
}

impl fmt::Debug for BindingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingContext")
            .field("bindings", &self.binding_count())
            .field("violations", &self.inner.violations.with(Vec::len))
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

/// Per-binding settings. Unset fields take the context's defaults.
pub struct BindingOptions<M, T> {
    /// Converter to use instead of resolving one from the registry.
    pub converter: Option<Rc<dyn Converter<M, T>>>,
    pub model_update_policy: Option<UpdatePolicy>,
    pub target_update_policy: Option<UpdatePolicy>,
    /// Prefix for this binding's violations.
    pub label: Option<String>,
}

impl<M, T> Default for BindingOptions<M, T> {
    fn default() -> Self {
        Self {
            converter: None,
            model_update_policy: None,
            target_update_policy: None,
            label: None,
        }
    }
}

impl<M, T> fmt::Debug for BindingOptions<M, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingOptions")
            .field("converter", &self.converter.is_some())
            .field("model_update_policy", &self.model_update_policy)
            .field("target_update_policy", &self.target_update_policy)
            .field("label", &self.label)
            .finish()
    }
}

/// Fluent construction of a [`Binding`], finished by [`to`](Self::to).
#[must_use = "a binding is only created by `to()`"]
pub struct BindingBuilder<'a, M, T> {
    context: &'a BindingContext,
    model: Access<M>,
    options: BindingOptions<M, T>,
}

impl<M: PropertyValue, T: PropertyValue> BindingBuilder<'_, M, T> {
    pub fn with_converter(mut self, converter: impl Converter<M, T> + 'static) -> Self {
        self.options.converter = Some(Rc::new(converter));
        self
    }

    pub fn with_model_update_policy(mut self, policy: UpdatePolicy) -> Self {
        self.options.model_update_policy = Some(policy);
        self
    }

    pub fn with_target_update_policy(mut self, policy: UpdatePolicy) -> Self {
        self.options.target_update_policy = Some(policy);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.options.label = Some(label.into());
        self
    }

    /// Replace all options at once.
    pub fn with_options(mut self, options: BindingOptions<M, T>) -> Self {
        self.options = options;
        self
    }

    /// Bind to `target` and register the binding with the context.
    ///
    /// # Errors
    ///
    /// [`BindError::NoConverter`] when no converter was given and none is
    /// registered for the value types.
    pub fn to<P>(self, target: &P) -> Result<Binding<M, T>, BindError>
    where
        P: ObservableValue<Value = T>,
    {
        self.context
            .create_binding(self.model, target.access(), self.options)
    }
}

/// First step of [`BindingContext::auto_validate_target_property_of`].
#[must_use = "nothing is registered until `becoming()`"]
pub struct AutoValidate<'a> {
    context: &'a BindingContext,
    binding: Rc<dyn BindingHandle>,
}

impl<'a> AutoValidate<'a> {
    /// The observable to watch.
    pub fn upon<P: ObservableValue>(self, trigger: &P) -> AutoValidateUpon<'a, P::Value> {
        AutoValidateUpon {
            context: self.context,
            binding: self.binding,
            trigger: trigger.access(),
        }
    }
}

/// Second step of [`BindingContext::auto_validate_target_property_of`].
#[must_use = "nothing is registered until `becoming()`"]
pub struct AutoValidateUpon<'a, V> {
    context: &'a BindingContext,
    binding: Rc<dyn BindingHandle>,
    trigger: Access<V>,
}

impl<V: Clone + PartialEq + 'static> AutoValidateUpon<'_, V> {
    /// Validate whenever the watched observable changes to `value`.
    ///
    /// The trigger stays registered for the lifetime of the context.
    pub fn becoming(self, value: V) {
        let binding = self.binding;
        let sub = self.trigger.subscribe(move |current| {
            if *current == value {
                tracing::trace!("auto-validating binding");
                binding.validate_target_property();
            }
        });
        self.context.inner.listeners.borrow_mut().push(sub);
    }
}
