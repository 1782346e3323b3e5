#![forbid(unsafe_code)]

//! Waypoint: an MVVM/Coordinator navigation framework.
//!
//! Three pieces, toolkit-agnostic:
//!
//! - **Coordinator flows**: a [`Coordinator`] owns one segment of
//!   navigation and advances it through a [`Flow`] strategy: the
//!   visible screen's type maps to the route that follows it, `None`
//!   ends the flow.
//! - **Dependency bags**: a [`Bag`] lazily materializes the shared
//!   objects a view-model declares through [`Binding`] slots, one
//!   instance per concrete type per flow, indexed across flows in a
//!   [`SharedRegistry`] until the owning bag dies.
//! - **Observable bindings**: an [`Observable`] value slot notifies
//!   observers through tasks deferred onto the main-thread
//!   [`Scheduler`], and wires to text widgets in both directions.
//!
//! The surrounding toolkit supplies the capability contracts
//! (`NavigationStack`, `Platform`, the widget traits); nothing here
//! renders or handles input.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use waypoint::prelude::*;
//!
//! struct Login;
//!
//! impl Screen for Login {
//!     fn screen_type(&self) -> ScreenType {
//!         ScreenType::of::<Self>()
//!     }
//! }
//!
//! impl InstantiableScreen for Login {
//!     fn instantiate() -> Self {
//!         Login
//!     }
//! }
//!
//! struct Onboarding;
//!
//! impl Flow for Onboarding {
//!     fn start(&mut self) -> Option<ScreenRoute> {
//!         Some(ScreenRoute::to::<Login>())
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Stack {
//!     screens: Vec<Box<dyn Screen>>,
//! }
//!
//! impl NavigationStack for Stack {
//!     fn push(&mut self, screen: Box<dyn Screen>, _animated: bool) {
//!         self.screens.push(screen);
//!     }
//!
//!     fn visible(&self) -> Option<&dyn Screen> {
//!         self.screens.last().map(|s| &**s)
//!     }
//! }
//!
//! let nav: SharedNavigationStack = Rc::new(RefCell::new(Stack::default()));
//! let registry = SharedRegistry::new();
//! let coordinator = Coordinator::new(
//!     &nav,
//!     Box::new(Onboarding),
//!     Rc::new(Bag::new(registry)),
//! );
//! assert!(nav.borrow().visible().is_some());
//! coordinator.proceed(); // Login is terminal: a silent no-op.
//! ```

pub use waypoint_core::binding::{
    Binding, BindingDeclarations, BindingKey, BindingObject, BindingRequest,
};
pub use waypoint_core::foreground::{ScreenNode, top_screen};
pub use waypoint_core::screen::ScreenType;
pub use waypoint_core::widget::{ChangeHandler, TextDisplay, TextInput};

pub use waypoint_runtime::animation::{animations_enabled, animations_from_env};
pub use waypoint_runtime::bag::{Bag, SharedRegistry};
pub use waypoint_runtime::coordinator::{
    Coordinator, Flow, InstantiableScreen, NavigationStack, Navigator, Platform, Screen,
    ScreenRoute, SharedNavigationStack,
};
pub use waypoint_runtime::reactive::{Observable, Subscription};
pub use waypoint_runtime::scheduler::Scheduler;

/// One-stop import for applications and toolkit adapters.
pub mod prelude {
    pub use waypoint_core::binding::{
        Binding, BindingDeclarations, BindingKey, BindingObject, BindingRequest,
    };
    pub use waypoint_core::foreground::{ScreenNode, top_screen};
    pub use waypoint_core::screen::ScreenType;
    pub use waypoint_core::widget::{TextDisplay, TextInput};
    pub use waypoint_runtime::bag::{Bag, SharedRegistry};
    pub use waypoint_runtime::coordinator::{
        Coordinator, Flow, InstantiableScreen, NavigationStack, Navigator, Platform, Screen,
        ScreenRoute, SharedNavigationStack,
    };
    pub use waypoint_runtime::reactive::{Observable, Subscription};
    pub use waypoint_runtime::scheduler::Scheduler;
}
