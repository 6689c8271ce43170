#![forbid(unsafe_code)]

//! Shared, version-tracked values with change notification.
//!
//! # Usage
//!
//! ```
//! use bindery_reactive::Observable;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let name = Observable::new(String::from("Ada"));
//! let seen = Rc::new(Cell::new(0));
//!
//! let s = Rc::clone(&seen);
//! let _sub = name.subscribe(move |_| s.set(s.get() + 1));
//!
//! name.set("Grace".to_string());
//! name.set("Grace".to_string()); // equal value: no notification
//! assert_eq!(seen.get(), 1);
//! assert_eq!(name.version(), 1);
//! ```
//!
//! # Failure Modes
//!
//! - Subscriber panic: propagates to the caller of `set()`; the value has
//!   already been stored.
//! - Subscription dropped mid-notification: the callback still runs for the
//!   current cycle if it was already collected, and never afterwards.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::property::{BeanType, PropertyMeta};

type Callback<T> = dyn Fn(&T);

struct ObservableInner<T> {
    value: T,
    version: u64,
    subscribers: Vec<Weak<Callback<T>>>,
    meta: Option<PropertyMeta>,
}

/// A shared, writable value that notifies subscribers when it changes.
///
/// Cloning an `Observable` yields another handle to the same value.
pub struct Observable<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("meta", &inner.meta)
            .finish()
    }
}

impl<T: Default + Clone + PartialEq + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Create an observable holding `value`, with no property metadata.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self::with_meta(value, None)
    }

    /// Create an observable that is declared as property `name` of bean `B`.
    ///
    /// The metadata is what a validator uses to find the constraints that
    /// apply to this value.
    #[must_use]
    pub fn for_property<B: 'static>(name: &'static str, value: T) -> Self {
        Self::with_meta(
            value,
            Some(PropertyMeta::new(BeanType::of::<B>(), name)),
        )
    }

    fn with_meta(value: T, meta: Option<PropertyMeta>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObservableInner {
                value,
                version: 0,
                subscribers: Vec::new(),
                meta,
            })),
        }
    }

    /// Get a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Borrow the current value for the duration of `f`.
    ///
    /// `f` must not write to this observable.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Replace the value, notifying subscribers if it changed.
    pub fn set(&self, value: T) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.value = value;
            inner.version += 1;
        }
        self.notify();
    }

    /// Modify the value in place, notifying subscribers if it changed.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut next = self.get();
        f(&mut next);
        self.set(next);
    }

    /// Number of value-changing writes since creation.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Declared bean type and property name, if any.
    #[must_use]
    pub fn meta(&self) -> Option<PropertyMeta> {
        self.inner.borrow().meta
    }

    /// Register `callback` to run after every value change.
    ///
    /// The callback stays registered until the returned [`Subscription`] is
    /// dropped.
    #[must_use = "dropping the subscription unsubscribes the callback"]
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let callback: Rc<Callback<T>> = Rc::new(callback);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&callback));
        Subscription {
            _callback: Box::new(callback),
        }
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    /// A read-only view sharing this observable's value.
    #[must_use]
    pub fn read_only(&self) -> ReadOnlyObservable<T> {
        ReadOnlyObservable {
            source: self.clone(),
        }
    }

    /// Whether `self` and `other` are handles to the same value.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn notify(&self) {
        // Collect live callbacks and release the borrow before calling them.
        let (value, callbacks) = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|weak| weak.strong_count() > 0);
            let callbacks: Vec<Rc<Callback<T>>> =
                inner.subscribers.iter().filter_map(Weak::upgrade).collect();
            (inner.value.clone(), callbacks)
        };
        for callback in callbacks {
            callback(&value);
        }
    }
}

/// A view of an [`Observable`] that can be read and observed, never written.
pub struct ReadOnlyObservable<T> {
    source: Observable<T>,
}

impl<T> Clone for ReadOnlyObservable<T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ReadOnlyObservable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReadOnlyObservable")
            .field(&self.source)
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> ReadOnlyObservable<T> {
    /// Get a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.source.get()
    }

    /// Borrow the current value for the duration of `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.source.with(f)
    }

    /// Number of value-changing writes since creation.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.source.version()
    }

    /// Declared bean type and property name, if any.
    #[must_use]
    pub fn meta(&self) -> Option<PropertyMeta> {
        self.source.meta()
    }

    /// Register `callback` to run after every value change.
    #[must_use = "dropping the subscription unsubscribes the callback"]
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.source.subscribe(callback)
    }

    /// Whether this view and `other` share the same value.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.source.ptr_eq(&other.source)
    }
}

/// Keeps a subscriber callback registered; dropping it unsubscribes.
#[must_use = "dropping the subscription unsubscribes the callback"]
pub struct Subscription {
    _callback: Box<dyn std::any::Any>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
