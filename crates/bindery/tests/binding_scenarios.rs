//! Form-level scenarios: a `Person` edited through text fields.

use std::cell::RefCell;
use std::rc::Rc;

use bindery::validation::{Constraint, ConstraintValidator};
use bindery::{
    BindingConfig, BindingContext, BindingViolation, Observable, Phase, UpdatePolicy,
    ViolationFormat,
};
use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct Person {
    name: Observable<String>,
    age: Observable<i32>,
    birthday: Observable<Option<NaiveDate>>,
}

impl Person {
    fn new() -> Self {
        Self {
            name: Observable::for_property::<Person>("name", String::new()),
            age: Observable::for_property::<Person>("age", 0),
            birthday: Observable::for_property::<Person>("birthday", None),
        }
    }
}

/// A text field: the target side of every binding here.
fn field() -> Observable<String> {
    Observable::new(String::new())
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn person_validator() -> ConstraintValidator {
    ConstraintValidator::new()
        .constrain::<Person>("name", [Constraint::NotNull, Constraint::size(3, 10)])
        .constrain::<Person>("age", [Constraint::Min(10)])
        .constrain::<Person>("birthday", [Constraint::NotNull, Constraint::Past])
        .with_today(date(2024, 6, 1))
}

fn context() -> BindingContext {
    init_tracing();
    BindingContext::with_validator(person_validator())
}

fn messages(violations: &[BindingViolation]) -> Vec<&str> {
    violations.iter().map(BindingViolation::message).collect()
}

#[test]
fn simple_binding() {
    let ctx = context();
    let person = Person::new();
    let name_field = field();
    ctx.bind(&person.name).to(&name_field).expect("identity");

    person.name.set("foo".to_string());
    assert_eq!(name_field.get(), "foo");
}

#[test]
fn validation_upon_update() {
    let ctx = context();
    let person = Person::new();
    let name_field = field();
    let binding = ctx.bind(&person.name).to(&name_field).expect("identity");

    name_field.set("Bo".to_string());
    assert_eq!(binding.violations().len(), 1);
    assert_eq!(
        messages(&binding.violations()),
        vec!["size must be between 3 and 10"]
    );
    assert_eq!(person.name.get(), "");

    name_field.set("Bob".to_string());
    assert!(binding.is_valid());
    assert_eq!(person.name.get(), "Bob");
}

#[test]
fn explicit_validation_on_request() {
    let ctx = context();
    let person = Person::new();
    let name_field = field();
    let binding = ctx
        .bind(&person.name)
        .with_model_update_policy(UpdatePolicy::OnRequest)
        .to(&name_field)
        .expect("identity");

    name_field.set("Bo".to_string());
    assert!(binding.violations().is_empty());

    assert!(!binding.validate_target_property());
    assert_eq!(binding.violations().len(), 1);
    assert_eq!(person.name.get(), "");
}

#[test]
fn non_numeric_age_is_a_conversion_violation() {
    let ctx = context();
    let person = Person::new();
    person.age.set(33);
    let age_field = field();
    let binding = ctx
        .bind(&person.age)
        .with_label("Age:")
        .to(&age_field)
        .expect("builtin converter");

    age_field.set("abc".to_string());
    assert_eq!(
        binding.violations(),
        vec![BindingViolation::labeled("Age:", "must be a valid number")]
    );
    assert_eq!(person.age.get(), 33);

    age_field.set("34".to_string());
    assert!(binding.is_valid());
    assert_eq!(person.age.get(), 34);
}

#[test]
fn context_aggregates_and_recovers() {
    let ctx = context();
    let person = Person::new();
    let name_field = field();
    let age_field = field();
    ctx.bind(&person.name)
        .with_label("Name:")
        .to(&name_field)
        .expect("identity");
    ctx.bind(&person.age)
        .with_label("Age:")
        .to(&age_field)
        .expect("builtin converter");

    let validity = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&validity);
    let _sub = ctx
        .is_valid_property()
        .subscribe(move |valid| seen.borrow_mut().push(*valid));

    assert!(ctx.is_valid());
    name_field.set("Bo".to_string());
    age_field.set("5".to_string());

    assert!(!ctx.is_valid());
    assert_eq!(
        ctx.violations()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>(),
        vec![
            "Name: size must be between 3 and 10",
            "Age: must be greater than or equal to 10",
        ]
    );

    name_field.set("Bob".to_string());
    assert!(!ctx.is_valid());
    age_field.set("12".to_string());
    assert!(ctx.is_valid());
    assert!(ctx.violations().is_empty());
    assert_eq!(*validity.borrow(), vec![false, true]);
}

#[test]
fn committed_value_is_not_written_back() {
    let ctx = context();
    let person = Person::new();
    let age_field = field();
    let binding = ctx.bind(&person.age).to(&age_field).expect("builtin converter");

    age_field.set("0042".to_string());
    assert_eq!(person.age.get(), 42);
    assert_eq!(age_field.get(), "0042");
    assert_eq!(binding.phase(), Phase::Idle);

    person.age.set(50);
    assert_eq!(age_field.get(), "50");
}

#[test]
fn read_only_model_is_never_written() {
    let ctx = context();
    let person = Person::new();
    let name_field = field();
    let binding = ctx
        .bind(&person.name.read_only())
        .with_model_update_policy(UpdatePolicy::Instantly)
        .to(&name_field)
        .expect("identity");
    assert_eq!(binding.model_update_policy(), UpdatePolicy::Never);

    name_field.set("Mallory".to_string());
    binding.update_model_property();
    assert_eq!(person.name.get(), "");

    person.name.set("Alice".to_string());
    assert_eq!(name_field.get(), "Alice");
}

#[test]
fn violations_bound_to_a_label() {
    init_tracing();
    let config = BindingConfig::default().with_violation_format(ViolationFormat::Long);
    let validator = person_validator().constrain::<Person>(
        "name",
        [Constraint::pattern("[A-Z].*").expect("valid regex")],
    );
    let ctx = BindingContext::with_config(config, validator);
    let person = Person::new();
    let name_field = field();
    let error_label = field();
    let binding = ctx
        .bind(&person.name)
        .with_label("Name:")
        .to(&name_field)
        .expect("identity");
    ctx.bind_binding_violations(&binding)
        .to(&error_label)
        .expect("violation converter");

    name_field.set("bo".to_string());
    assert_eq!(
        error_label.get(),
        "Name: size must be between 3 and 10\nName: must match \"[A-Z].*\""
    );

    name_field.set("Bob".to_string());
    assert_eq!(error_label.get(), "");
    assert_eq!(ctx.binding_count(), 2);
}

#[test]
fn short_format_is_the_default_for_labels() {
    let ctx = context();
    let person = Person::new();
    let age_field = field();
    let error_label = field();
    let binding = ctx
        .bind(&person.age)
        .with_label("Age:")
        .to(&age_field)
        .expect("builtin converter");
    ctx.bind_binding_violations(&binding)
        .to(&error_label)
        .expect("violation converter");

    age_field.set("x".to_string());
    assert_eq!(error_label.get(), "must be a valid number");
}

#[test]
fn optional_date_field() {
    let ctx = context();
    let person = Person::new();
    person.birthday.set(Some(date(1990, 5, 17)));
    let birthday_field = field();
    let binding = ctx
        .bind(&person.birthday)
        .to(&birthday_field)
        .expect("builtin converter");

    birthday_field.set("2030-01-01".to_string());
    assert_eq!(messages(&binding.violations()), vec!["must be in the past"]);

    birthday_field.set("17 May".to_string());
    assert_eq!(messages(&binding.violations()), vec!["must be a valid date"]);

    birthday_field.set(String::new());
    assert_eq!(messages(&binding.violations()), vec!["may not be null"]);
    assert_eq!(person.birthday.get(), Some(date(1990, 5, 17)));

    birthday_field.set("1985-02-03".to_string());
    assert!(binding.is_valid());
    assert_eq!(person.birthday.get(), Some(date(1985, 2, 3)));
}

#[test]
fn configured_date_format() {
    init_tracing();
    let config = BindingConfig::default().with_date_format("%d.%m.%Y");
    let ctx = BindingContext::with_config(config, person_validator());
    let person = Person::new();
    let birthday_field = field();
    ctx.bind(&person.birthday)
        .to(&birthday_field)
        .expect("builtin converter");

    person.birthday.set(Some(date(1990, 5, 17)));
    assert_eq!(birthday_field.get(), "17.05.1990");
}

#[test]
fn validate_when_focus_is_lost() {
    let ctx = context();
    let person = Person::new();
    let name_field = field();
    let focused = Observable::new(false);
    let binding = ctx
        .bind(&person.name)
        .with_model_update_policy(UpdatePolicy::OnRequest)
        .to(&name_field)
        .expect("identity");
    ctx.auto_validate_target_property_of(&binding)
        .upon(&focused)
        .becoming(false);

    focused.set(true);
    name_field.set("Al".to_string());
    assert!(binding.is_valid());

    focused.set(false);
    assert_eq!(binding.violations().len(), 1);
    assert!(!ctx.is_valid());
    assert_eq!(person.name.get(), "");
}

#[test]
fn bulk_commit_and_refresh() {
    let ctx = context();
    let person = Person::new();
    let name_field = field();
    let age_field = field();
    ctx.bind(&person.name)
        .with_model_update_policy(UpdatePolicy::OnRequest)
        .with_target_update_policy(UpdatePolicy::OnRequest)
        .to(&name_field)
        .expect("identity");
    ctx.bind(&person.age)
        .with_model_update_policy(UpdatePolicy::OnRequest)
        .with_target_update_policy(UpdatePolicy::OnRequest)
        .to(&age_field)
        .expect("builtin converter");

    name_field.set("Carol".to_string());
    age_field.set("7".to_string());
    assert!(ctx.is_valid());

    ctx.update_models();
    assert_eq!(person.name.get(), "Carol");
    assert_eq!(person.age.get(), 0);
    assert_eq!(
        messages(&ctx.violations()),
        vec!["must be greater than or equal to 10"]
    );

    person.name.set("Dave".to_string());
    person.age.set(40);
    assert_eq!(name_field.get(), "Carol");

    ctx.update_targets();
    assert_eq!(name_field.get(), "Dave");
    assert_eq!(age_field.get(), "40");

    assert!(ctx.validate_all());
    assert!(ctx.is_valid());
}

#[test]
fn dropping_the_context_releases_bindings() {
    let person = Person::new();
    let name_field = field();
    {
        let ctx = context();
        ctx.bind(&person.name).to(&name_field).expect("identity");
        assert_eq!(name_field.subscriber_count(), 1);
    }
    assert_eq!(name_field.subscriber_count(), 0);
    assert_eq!(person.name.subscriber_count(), 0);
}

#[cfg(feature = "config")]
#[test]
fn context_from_toml() {
    init_tracing();
    let config = BindingConfig::from_toml_str(
        r#"
model_update_policy = "ON_REQUEST"
violation_format = "long"
"#,
    )
    .expect("valid config");
    let ctx = BindingContext::with_config(config, person_validator());
    let person = Person::new();
    let name_field = field();
    let binding = ctx
        .bind(&person.name)
        .with_label("Name:")
        .to(&name_field)
        .expect("identity");

    name_field.set("Eve".to_string());
    assert_eq!(person.name.get(), "");
    binding.update_model_property();
    assert_eq!(person.name.get(), "Eve");
}
