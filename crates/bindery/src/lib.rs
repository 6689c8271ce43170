#![forbid(unsafe_code)]

//! Bidirectional property bindings with conversion and validation.
//!
//! A [`BindingContext`] wires model properties (the fields of a domain
//! object) to target properties (what a form widget shows), converting
//! between their types and validating user input before it reaches the
//! model. Violations are collected per [`Binding`] and across the context,
//! ready to be bound to an error label.
//!
//! ```
//! use bindery::{BindingContext, Observable, UpdatePolicy};
//! use bindery::validation::{Constraint, ConstraintValidator};
//!
//! struct Person;
//!
//! let context = BindingContext::with_validator(
//!     ConstraintValidator::new()
//!         .constrain::<Person>("name", [Constraint::NotNull, Constraint::size(3, 10)]),
//! );
//!
//! let name = Observable::for_property::<Person>("name", String::new());
//! let name_field = Observable::new(String::new());
//! let error_label = Observable::new(String::new());
//!
//! let binding = context
//!     .bind(&name)
//!     .with_model_update_policy(UpdatePolicy::Instantly)
//!     .to(&name_field)
//!     .unwrap();
//! context.bind_binding_violations(&binding).to(&error_label).unwrap();
//!
//! name_field.set("Al".to_string());
//! assert_eq!(error_label.get(), "size must be between 3 and 10");
//! assert_eq!(name.get(), "");
//!
//! name_field.set("Alice".to_string());
//! assert_eq!(error_label.get(), "");
//! assert_eq!(name.get(), "Alice");
//! ```
//!
//! # Crates
//!
//! - [`reactive`]: the observable properties bindings connect.
//! - [`validation`]: constraints and the [`Validator`](validation::Validator)
//!   capability.
//!
//! # Feature Flags
//!
//! - `config`: load [`BindingConfig`] from TOML.

pub mod binding;
pub mod config;
pub mod context;
pub mod converter;
pub mod error;
pub mod policy;
pub mod violation;

pub use bindery_reactive as reactive;
pub use bindery_validation as validation;

pub use binding::{Binding, CONVERSION_FAILED_MESSAGE, Phase, PropertyValue};
pub use config::{BindingConfig, ViolationFormat};
pub use context::{AutoValidate, AutoValidateUpon, BindingBuilder, BindingContext, BindingOptions};
pub use converter::{Converter, ConverterRegistry};
pub use error::{BindError, ConversionError};
pub use policy::UpdatePolicy;
pub use violation::BindingViolation;

pub use bindery_reactive::{Access, Observable, ObservableValue, ReadOnlyObservable};
