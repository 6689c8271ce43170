#![forbid(unsafe_code)]

//! One model property bound to one target property.
//!
//! A [`Binding<M, T>`] listens to both sides. A target change (typically a
//! text field edit) runs the validate-then-commit cycle when the model update
//! policy is [`UpdatePolicy::Instantly`]; a model change is converted and
//! written to the target when the target update policy is `Instantly`.
//!
//! # The validate cycle
//!
//! 1. A blank target (empty text, `None`) is validated as null first. If the
//!    model property rejects null, the cycle stops there.
//! 2. The target value is converted to the model type. A failed conversion
//!    becomes the binding's only violation and the cycle stops.
//! 3. The converted value is validated against the model property's declared
//!    constraints.
//! 4. If valid, and the cycle commits, and the model is writable, the value
//!    is written to the model.
//!
//! Each step that produces violations replaces the binding's list; it is
//! never merged with an earlier outcome.
//!
//! # Invariants
//!
//! 1. A read-only model side always has model update policy `Never`; a
//!    read-only target side always has target update policy `Never`.
//! 2. Listeners and explicit updates act only from [`Phase::Idle`]. A
//!    notification raised while the binding is validating or propagating is
//!    ignored, so writing one side never bounces back into the side that
//!    triggered it, whatever the update policy.
//! 3. The phase returns to `Idle` when the triggering call returns, even if a
//!    converter or validator panics.
//! 4. No side is synchronized at construction.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Conversion error with violation | Unparseable target text | Violation recorded, model untouched |
//! | Conversion error without violation | Converter bug or one-way converter | "Error occurred during conversion" recorded, logged at `error` |
//! | Model → target conversion error | Model value has no target form | Target untouched, logged at `warn` |
//! | Model has no property metadata | Plain `Observable::new` model | Validation skipped, list reset, logged at `warn` |

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

use bindery_reactive::{Access, Observable, ReadOnlyObservable, Subscription};
use bindery_validation::{FieldValue, Validator, Value};

use crate::converter::Converter;
use crate::error::ConversionError;
use crate::policy::UpdatePolicy;
use crate::violation::BindingViolation;

/// Message recorded when a conversion fails without a violation of its own.
pub const CONVERSION_FAILED_MESSAGE: &str = "Error occurred during conversion";

/// Values that can sit on either side of a binding.
pub trait PropertyValue: FieldValue + Clone + PartialEq + 'static {}

impl<T: FieldValue + Clone + PartialEq + 'static> PropertyValue for T {}

/// What a binding is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Waiting for a change.
    #[default]
    Idle,
    /// Running the validate cycle for a target change.
    Validating,
    /// Writing a model change to the target.
    Propagating,
}

/// Holds a binding in a non-idle phase; dropping it returns to `Idle`.
struct PhaseGuard<'a> {
    phase: &'a Cell<Phase>,
}

impl<'a> PhaseGuard<'a> {
    fn enter(phase: &'a Cell<Phase>, next: Phase) -> Option<Self> {
        if phase.get() != Phase::Idle {
            return None;
        }
        phase.set(next);
        Some(Self { phase })
    }
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        self.phase.set(Phase::Idle);
    }
}

struct BindingInner<M, T> {
    model: Access<M>,
    target: Access<T>,
    model_update_policy: UpdatePolicy,
    target_update_policy: UpdatePolicy,
    converter: Rc<dyn Converter<M, T>>,
    validator: Rc<dyn Validator>,
    label: Option<String>,
    violations: Observable<Vec<BindingViolation>>,
    phase: Cell<Phase>,
    _listeners: [Subscription; 2],
}

/// A bidirectional binding between a model property and a target property.
///
/// Created through [`BindingContext`](crate::BindingContext); clones share
/// the same binding.
pub struct Binding<M, T> {
    inner: Rc<BindingInner<M, T>>,
}

impl<M, T> Clone for Binding<M, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<M: PropertyValue, T: PropertyValue> Binding<M, T> {
    pub(crate) fn new(
        model: Access<M>,
        target: Access<T>,
        converter: Rc<dyn Converter<M, T>>,
        validator: Rc<dyn Validator>,
        model_update_policy: UpdatePolicy,
        target_update_policy: UpdatePolicy,
        label: Option<String>,
    ) -> Self {
        let model_update_policy = if model.is_writable() {
            model_update_policy
        } else {
            UpdatePolicy::Never
        };
        let target_update_policy = if target.is_writable() {
            target_update_policy
        } else {
            UpdatePolicy::Never
        };

        let inner = Rc::new_cyclic(|weak: &Weak<BindingInner<M, T>>| {
            let on_target = weak.clone();
            let target_listener = target.subscribe(move |_| {
                if let Some(inner) = on_target.upgrade() {
                    inner.on_target_changed();
                }
            });

            let on_model = weak.clone();
            let model_listener = model.subscribe(move |_| {
                if let Some(inner) = on_model.upgrade() {
                    inner.on_model_changed();
                }
            });

            BindingInner {
                model,
                target,
                model_update_policy,
                target_update_policy,
                converter,
                validator,
                label,
                violations: Observable::new(Vec::new()),
                phase: Cell::new(Phase::Idle),
                _listeners: [target_listener, model_listener],
            }
        });

        Self { inner }
    }

    /// The target side.
    #[must_use]
    pub fn target_property(&self) -> &Access<T> {
        &self.inner.target
    }

    /// The model side.
    #[must_use]
    pub fn model_property(&self) -> &Access<M> {
        &self.inner.model
    }

    /// The current violations, observable.
    #[must_use]
    pub fn target_violations_property(&self) -> ReadOnlyObservable<Vec<BindingViolation>> {
        self.inner.violations.read_only()
    }

    /// Snapshot of the current violations.
    #[must_use]
    pub fn violations(&self) -> Vec<BindingViolation> {
        self.inner.violations.get()
    }

    /// Whether the latest validation produced no violations.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.inner.violations.with(Vec::is_empty)
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.inner.label.as_deref()
    }

    #[must_use]
    pub fn model_update_policy(&self) -> UpdatePolicy {
        self.inner.model_update_policy
    }

    #[must_use]
    pub fn target_update_policy(&self) -> UpdatePolicy {
        self.inner.target_update_policy
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.inner.phase.get()
    }

    /// Run the validate cycle and commit a valid value to the model.
    ///
    /// No-op when the model update policy is `Never`.
    pub fn update_model_property(&self) {
        self.inner.update_model_property();
    }

    /// Convert the model value and write it to the target.
    ///
    /// No-op when the target update policy is `Never`. A failed conversion
    /// leaves the target unchanged.
    pub fn update_target_property(&self) {
        self.inner.update_target_property();
    }

    /// Run the validate cycle without committing. Returns whether the target
    /// value is currently valid.
    pub fn validate_target_property(&self) -> bool {
        self.inner.validate_target(false)
    }

    pub(crate) fn handle(&self) -> Rc<dyn BindingHandle> {
        Rc::clone(&self.inner) as Rc<dyn BindingHandle>
    }
}

impl<M: PropertyValue, T: PropertyValue> BindingInner<M, T> {
    fn on_target_changed(&self) {
        if !self.model_update_policy.is_instant() {
            return;
        }
        let Some(_guard) = PhaseGuard::enter(&self.phase, Phase::Validating) else {
            tracing::trace!(label = ?self.label, phase = ?self.phase.get(), "ignored nested target change");
            return;
        };
        tracing::trace!(label = ?self.label, "target changed");
        self.validate_target(true);
    }

    fn on_model_changed(&self) {
        if !self.target_update_policy.is_instant() {
            return;
        }
        let Some(_guard) = PhaseGuard::enter(&self.phase, Phase::Propagating) else {
            tracing::trace!(label = ?self.label, phase = ?self.phase.get(), "ignored nested model change");
            return;
        };
        tracing::trace!(label = ?self.label, "model changed");
        self.write_target();
    }

    fn update_model_property(&self) {
        if !self.model_update_policy.allows_update() {
            return;
        }
        let Some(_guard) = PhaseGuard::enter(&self.phase, Phase::Validating) else {
            tracing::trace!(label = ?self.label, phase = ?self.phase.get(), "ignored nested model update");
            return;
        };
        self.validate_target(true);
    }

    fn update_target_property(&self) {
        if !self.target_update_policy.allows_update() {
            return;
        }
        let Some(_guard) = PhaseGuard::enter(&self.phase, Phase::Propagating) else {
            tracing::trace!(label = ?self.label, phase = ?self.phase.get(), "ignored nested target update");
            return;
        };
        self.write_target();
    }

    fn write_target(&self) {
        let Some(target) = self.target.writable() else {
            return;
        };
        match self.converter.to_target(&self.model.get()) {
            Ok(value) => target.set(value),
            Err(err) => {
                tracing::warn!(label = ?self.label, error = %err, "model value not written to target");
            }
        }
    }

    fn validate_target(&self, commit: bool) -> bool {
        let target = self.target.get();
        if target.is_blank() && !self.validate_model_value(&Value::Null) {
            return false;
        }

        let Ok(value) = self.convert_target(&target) else {
            return false;
        };

        let valid = self.validate_model_value(&value.to_value());
        if valid && commit {
            if let Some(model) = self.model.writable() {
                model.set(value);
            }
        }
        valid
    }

    fn convert_target(&self, target: &T) -> Result<M, ConversionError> {
        self.converter.to_model(target).inspect_err(|err| {
            let message = match err.violation() {
                Some(violation) => violation.message().to_string(),
                None => {
                    tracing::error!(label = ?self.label, error = %err, "conversion failed without a violation");
                    CONVERSION_FAILED_MESSAGE.to_string()
                }
            };
            self.violations
                .set(vec![BindingViolation::new(message).with_label(self.label.clone())]);
        })
    }

    fn validate_model_value(&self, value: &Value) -> bool {
        let Some(meta) = self.model.meta() else {
            tracing::warn!(
                label = ?self.label,
                "can't validate a model property without bean type and property name"
            );
            self.violations.set(Vec::new());
            return true;
        };
        let violations: Vec<BindingViolation> = self
            .validator
            .validate_value(meta.bean, meta.name, value)
            .into_iter()
            .map(|message| BindingViolation::new(message).with_label(self.label.clone()))
            .collect();
        let valid = violations.is_empty();
        self.violations.set(violations);
        valid
    }
}

/// A binding with its value types erased, as held by a context.
pub(crate) trait BindingHandle {
    fn model_update_policy(&self) -> UpdatePolicy;
    fn update_model_property(&self);
    fn update_target_property(&self);
    fn validate_target_property(&self) -> bool;
    fn violations(&self) -> Vec<BindingViolation>;
}

impl<M: PropertyValue, T: PropertyValue> BindingHandle for BindingInner<M, T> {
    fn model_update_policy(&self) -> UpdatePolicy {
        self.model_update_policy
    }

    fn update_model_property(&self) {
        BindingInner::update_model_property(self);
    }

    fn update_target_property(&self) {
        BindingInner::update_target_property(self);
    }

    fn validate_target_property(&self) -> bool {
        self.validate_target(false)
    }

    fn violations(&self) -> Vec<BindingViolation> {
        self.violations.get()
    }
}

impl<M: PropertyValue, T: PropertyValue> fmt::Debug for Binding<M, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("model", &self.inner.model.meta())
            .field("label", &self.inner.label)
            .field("model_update_policy", &self.inner.model_update_policy)
            .field("target_update_policy", &self.inner.target_update_policy)
            .field("phase", &self.inner.phase.get())
            .finish_non_exhaustive()
    }
}
