#![forbid(unsafe_code)]

//! Observable properties for Bindery.
//!
//! This crate provides the change-tracking primitives that bindings are
//! wired to:
//!
//! - [`Observable`]: A shared, version-tracked, writable value with change
//!   notification via subscriber callbacks.
//! - [`ReadOnlyObservable`]: A view of an `Observable` that can be read and
//!   subscribed to, but never written.
//! - [`Subscription`]: RAII guard that automatically unsubscribes on drop.
//! - [`PropertyMeta`]: The declared bean type and property name of a model
//!   property, used to look up its constraints.
//!
//! # Architecture
//!
//! `Observable<T>` uses `Rc<RefCell<..>>` for single-threaded shared ownership.
//! Subscribers are stored as `Weak` function pointers and cleaned up lazily
//! during notification. Everything runs on the thread that owns the
//! observables; a write returns only after every subscriber has run.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per mutation that changes the value.
//! 2. Subscribers are notified in registration order.
//! 3. Setting a value equal to the current value is a no-op (no version bump,
//!    no notifications).
//! 4. Dropping a [`Subscription`] removes the callback before the next
//!    notification cycle.
//! 5. No internal borrow is held while subscribers run, so a callback may
//!    read or write any observable, including the one that notified it.

pub mod observable;
pub mod property;

pub use observable::{Observable, ReadOnlyObservable, Subscription};
pub use property::{Access, BeanType, ObservableValue, PropertyMeta};
