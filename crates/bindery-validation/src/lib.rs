#![forbid(unsafe_code)]

//! Validation capability for Bindery bindings.
//!
//! A binding never evaluates constraints itself. It hands the converted
//! value to a [`Validator`], keyed by the model property's declared bean type
//! and property name, and records whatever messages come back.
//!
//! - [`FieldValue`] / [`Value`]: the type-erased view of a value that
//!   constraints are evaluated against.
//! - [`Validator`]: the injected capability.
//! - [`ConstraintValidator`]: a registry of [`Constraint`]s per bean property,
//!   following the usual bean-validation conventions.
//! - [`MessageCatalog`]: message templates for the built-in constraints.
//!
//! # Example
//!
//! ```
//! use bindery_reactive::BeanType;
//! use bindery_validation::{Constraint, ConstraintValidator, Validator, Value};
//!
//! struct Person;
//!
//! let validator = ConstraintValidator::new()
//!     .constrain::<Person>("name", [Constraint::NotNull, Constraint::size(3, 10)]);
//!
//! let bean = BeanType::of::<Person>();
//! assert!(validator.validate_value(bean, "name", &Value::from("Ada")).is_empty());
//! assert_eq!(
//!     validator.validate_value(bean, "name", &Value::Null),
//!     vec!["may not be null".to_string()]
//! );
//! ```

pub mod constraint;
pub mod messages;
pub mod validator;
pub mod value;

pub use constraint::Constraint;
pub use messages::{MessageCatalog, interpolate};
pub use validator::{ConstraintValidator, NoopValidator, Validator};
pub use value::{FieldValue, Value};
