#![forbid(unsafe_code)]

//! Reactive data bindings for Waypoint.
//!
//! This module provides the value-stream primitive used to wire
//! view-models to view widgets:
//!
//! - [`Observable`]: a shared, optional value slot whose writes defer
//!   notification tasks onto the main-thread [`Scheduler`].
//! - [`Subscription`]: RAII guard that unsubscribes an observer on drop.
//! - Binding conveniences ([`bind`]): widget → observable and
//!   observable → widget wiring over the `waypoint-core` widget
//!   capability traits.
//!
//! # Contract
//!
//! At-least-once, unordered, no dedup: every write notifies every live
//! observer once, equal consecutive values included, with no ordering
//! guarantee between deferred callbacks.
//!
//! [`Scheduler`]: crate::scheduler::Scheduler

pub mod bind;
pub mod observable;

pub use observable::{Observable, Subscription};
