#![forbid(unsafe_code)]

//! Runtime: coordinator navigation, scoped dependency bags, and
//! observable bindings.
//!
//! # Role in Waypoint
//! `waypoint-runtime` drives the contracts defined in `waypoint-core`.
//! It owns the three moving parts of the framework: the navigation
//! state machine, the shared-object scope, and the value-stream
//! primitive wired to widgets.
//!
//! # Primary responsibilities
//! - **Coordinator**: one segment of navigation flow, advanced by a
//!   per-flow [`Flow`](coordinator::Flow) strategy.
//! - **Bag / SharedRegistry**: lazily materialized shared objects with
//!   scope-tied cleanup.
//! - **Observable**: optional value slot notifying observers through
//!   deferred main-thread tasks.
//! - **Scheduler**: the deferred task queue the host's main loop
//!   drains.
//!
//! # Concurrency
//! Everything here is single-threaded by construction (`Rc`/`RefCell`
//! handles are `!Send`). Notifications are deferred, never inline, so a
//! write during an update cycle cannot re-enter its own observers.
//!
//! # Error handling
//! There is none to speak of: every failure path is "nothing to do" and
//! resolves to a silent no-op or `None`, with a `debug`/`trace` event
//! for diagnosis.

pub mod animation;
pub mod bag;
pub mod coordinator;
pub mod reactive;
pub mod scheduler;

pub use animation::{animations_enabled, animations_from_env};
pub use bag::{Bag, SharedRegistry};
pub use coordinator::{
    Coordinator, Flow, InstantiableScreen, NavigationStack, Navigator, Platform, Screen,
    ScreenRoute, SharedNavigationStack,
};
pub use reactive::{Observable, Subscription};
pub use scheduler::Scheduler;
