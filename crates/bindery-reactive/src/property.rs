#![forbid(unsafe_code)]

//! Property metadata and the writable/read-only distinction.
//!
//! A binding needs two facts about each side beyond its value: whether it
//! may be written, and (for model properties) which bean property it stands
//! for. [`Access`] answers the first as a sum type; [`PropertyMeta`] answers
//! the second with a statically declared bean type instead of reflection.

use std::any::TypeId;
use std::fmt;

use crate::observable::{Observable, ReadOnlyObservable, Subscription};

/// Identifies the declaring type of a model property.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BeanType {
    id: TypeId,
    name: &'static str,
}

impl BeanType {
    /// The bean type tag for `B`.
    #[must_use]
    pub fn of<B: 'static>() -> Self {
        Self {
            id: TypeId::of::<B>(),
            name: std::any::type_name::<B>(),
        }
    }

    /// Fully qualified type name, for diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The underlying type id.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.id
    }
}

impl fmt::Debug for BeanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// The bean type and property name a model value is declared as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PropertyMeta {
    /// Declaring bean type.
    pub bean: BeanType,
    /// Property name within the bean.
    pub name: &'static str,
}

impl PropertyMeta {
    /// Create property metadata.
    #[must_use]
    pub fn new(bean: BeanType, name: &'static str) -> Self {
        Self { bean, name }
    }
}

impl fmt::Display for PropertyMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.bean.name(), self.name)
    }
}

/// One side of a binding: either writable or read-only.
pub enum Access<T> {
    /// The side may be read, observed and written.
    Writable(Observable<T>),
    /// The side may only be read and observed.
    ReadOnly(ReadOnlyObservable<T>),
}

impl<T> Clone for Access<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Writable(obs) => Self::Writable(obs.clone()),
            Self::ReadOnly(obs) => Self::ReadOnly(obs.clone()),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Access<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Writable(obs) => f.debug_tuple("Writable").field(obs).finish(),
            Self::ReadOnly(obs) => f.debug_tuple("ReadOnly").field(obs).finish(),
        }
    }
}

impl<T: Clone + PartialEq + 'static> Access<T> {
    /// Current value.
    #[must_use]
    pub fn get(&self) -> T {
        match self {
            Self::Writable(obs) => obs.get(),
            Self::ReadOnly(obs) => obs.get(),
        }
    }

    /// Subscribe to changes of this side.
    #[must_use = "dropping the subscription unsubscribes the callback"]
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        match self {
            Self::Writable(obs) => obs.subscribe(callback),
            Self::ReadOnly(obs) => obs.subscribe(callback),
        }
    }

    /// Declared property metadata, if any.
    #[must_use]
    pub fn meta(&self) -> Option<PropertyMeta> {
        match self {
            Self::Writable(obs) => obs.meta(),
            Self::ReadOnly(obs) => obs.meta(),
        }
    }

    /// Whether this side can be written.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        matches!(self, Self::Writable(_))
    }

    /// The writable handle, if this side is writable.
    #[must_use]
    pub fn writable(&self) -> Option<&Observable<T>> {
        match self {
            Self::Writable(obs) => Some(obs),
            Self::ReadOnly(_) => None,
        }
    }

    /// A read-only view of this side.
    #[must_use]
    pub fn read_only(&self) -> ReadOnlyObservable<T> {
        match self {
            Self::Writable(obs) => obs.read_only(),
            Self::ReadOnly(obs) => obs.clone(),
        }
    }
}

/// Anything that can stand on one side of a binding.
pub trait ObservableValue {
    /// The observed value type.
    type Value: Clone + PartialEq + 'static;

    /// Current value.
    fn get(&self) -> Self::Value;

    /// How this property may be accessed.
    fn access(&self) -> Access<Self::Value>;
}

impl<T: Clone + PartialEq + 'static> ObservableValue for Observable<T> {
    type Value = T;

    fn get(&self) -> T {
        Observable::get(self)
    }

    fn access(&self) -> Access<T> {
        Access::Writable(self.clone())
    }
}

impl<T: Clone + PartialEq + 'static> ObservableValue for ReadOnlyObservable<T> {
    type Value = T;

    fn get(&self) -> T {
        ReadOnlyObservable::get(self)
    }

    fn access(&self) -> Access<T> {
        Access::ReadOnly(self.clone())
    }
}
