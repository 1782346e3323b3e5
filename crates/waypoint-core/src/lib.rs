#![forbid(unsafe_code)]

//! Core: screen identity, binding declarations, and toolkit capability
//! contracts.
//!
//! # Role in Waypoint
//! `waypoint-core` is the contract layer. It owns the identities and
//! capability traits the runtime consumes, without depending on any
//! concrete UI toolkit.
//!
//! # Primary responsibilities
//! - **ScreenType**: copyable identity for concrete screen types; the
//!   state alphabet of a navigation flow.
//! - **Binding declarations**: per-slot keys, the shared-object
//!   capability, and the enumerable request list a subject exposes.
//! - **Widget capabilities**: the text-input and text-display contracts
//!   that observable bindings target.
//! - **Foreground walk**: locating the leaf screen in a chain of
//!   toolkit containers.
//!
//! # How it fits in the system
//! The runtime (`waypoint-runtime`) drives coordinators and observables
//! against these contracts. The surrounding toolkit implements them;
//! nothing in this crate renders, lays out, or handles input itself.

pub mod binding;
pub mod foreground;
pub mod screen;
pub mod widget;

pub use binding::{Binding, BindingDeclarations, BindingKey, BindingObject, BindingRequest};
pub use foreground::{ScreenNode, top_screen};
pub use screen::ScreenType;
pub use widget::{ChangeHandler, TextDisplay, TextInput};
