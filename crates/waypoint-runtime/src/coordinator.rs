#![forbid(unsafe_code)]

//! Coordinator: the navigation state machine.
//!
//! # Design
//!
//! A [`Coordinator`] owns one segment of navigation flow. Its decision
//! logic is a [`Flow`] strategy supplied at construction: `start` names
//! the initial screen, and `next` is the transition function from the
//! currently visible screen's type to the route that follows it, a
//! pure mapping testable without any toolkit. States are
//! [`ScreenType`]s; `None` from `next` is terminal.
//!
//! # Ownership
//!
//! The navigation stack owns its screens; screens bound via
//! [`Screen::bind`] own the coordinator; the coordinator holds the
//! stack weakly. A coordinator therefore lives exactly as long as some
//! screen on the stack references it, and a dangling stack turns every
//! operation into a silent no-op.
//!
//! # Failure Modes
//!
//! Only "nothing to do": a gone stack, an empty stack, or a terminal
//! state. Each path returns without side effects and records a `debug`
//! event; there is no error type anywhere in this module.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::debug;

use waypoint_core::foreground::{ScreenNode, top_screen};
use waypoint_core::screen::ScreenType;

use crate::animation::animations_enabled;
use crate::bag::{Bag, SharedRegistry};

/// A displayable unit bound to exactly one coordinator at a time.
pub trait Screen: Any {
    /// This screen's identity in the flow's transition table.
    fn screen_type(&self) -> ScreenType;

    /// Accept the owning coordinator. The default keeps no reference;
    /// screens that trigger navigation store the handle.
    fn bind(&mut self, coordinator: Rc<Coordinator>) {
        let _ = coordinator;
    }
}

/// A screen constructible with no arguments.
pub trait InstantiableScreen: Screen + Sized {
    fn instantiate() -> Self;
}

/// Toolkit capability: the stack of screens a coordinator pushes onto.
pub trait NavigationStack {
    fn push(&mut self, screen: Box<dyn Screen>, animated: bool);

    /// The currently visible screen, if any.
    fn visible(&self) -> Option<&dyn Screen>;
}

/// Shared handle to a toolkit navigation stack.
pub type SharedNavigationStack = Rc<RefCell<dyn NavigationStack>>;

/// A transition target: a screen type together with its constructor.
pub struct ScreenRoute {
    target: ScreenType,
    build: fn() -> Box<dyn Screen>,
}

impl ScreenRoute {
    /// Route to the screen type `S`.
    #[must_use]
    pub fn to<S: InstantiableScreen>() -> Self {
        Self {
            target: ScreenType::of::<S>(),
            build: || Box::new(S::instantiate()),
        }
    }

    /// The routed-to screen type.
    #[must_use]
    pub fn target(&self) -> ScreenType {
        self.target
    }
}

impl fmt::Debug for ScreenRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenRoute")
            .field("target", &self.target.name())
            .finish()
    }
}

/// Per-flow navigation strategy.
///
/// `next` is the state-transition function of the navigation machine:
/// the visible screen's type maps to the route that follows it, and
/// `None` is terminal. Both hooks default to "nothing".
pub trait Flow: 'static {
    /// The initial screen, pushed at coordinator construction.
    fn start(&mut self) -> Option<ScreenRoute> {
        None
    }

    /// What screen follows `current`; `None` ends the flow.
    fn next(&self, current: ScreenType) -> Option<ScreenRoute> {
        let _ = current;
        None
    }
}

/// Public capability for "advance to the next screen". Widgets hold
/// this without knowing the concrete coordinator.
pub trait Navigator {
    fn proceed(&self);
}

/// External entry-point collaborator: the toolkit pieces needed to
/// start a flow over the currently foreground screen.
pub trait Platform {
    /// Root of the container chain, if the toolkit has one yet.
    fn root_node(&self) -> Option<Rc<dyn ScreenNode>>;

    /// A fresh, empty navigation stack.
    fn new_navigation_stack(&self) -> SharedNavigationStack;

    /// Present `stack` modally over `host`.
    fn present(&self, host: &Rc<dyn ScreenNode>, stack: SharedNavigationStack, animated: bool);
}

/// Owner of one segment of navigation flow.
pub struct Coordinator {
    nav: Weak<RefCell<dyn NavigationStack>>,
    bag: Rc<Bag>,
    flow: RefCell<Box<dyn Flow>>,
    /// Self-handle passed to screens at bind time. Always upgradable
    /// while the coordinator is alive (it is only ever built inside an
    /// `Rc`).
    this: Weak<Coordinator>,
}

impl fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("stack_alive", &(self.nav.strong_count() > 0))
            .finish()
    }
}

impl Coordinator {
    /// Construct a coordinator over `nav`, run the flow's `start` hook,
    /// and push the initial screen if the flow names one.
    ///
    /// The returned handle is kept alive only by the screens it binds;
    /// callers that push no screen and drop the handle end the flow.
    pub fn new(nav: &SharedNavigationStack, flow: Box<dyn Flow>, bag: Rc<Bag>) -> Rc<Self> {
        let coordinator = Rc::new_cyclic(|this| Self {
            nav: Rc::downgrade(nav),
            bag,
            flow: RefCell::new(flow),
            this: this.clone(),
        });
        let initial = coordinator.flow.borrow_mut().start();
        if let Some(route) = initial {
            coordinator.push_route(route);
        }
        coordinator
    }

    /// The shared-object scope for this flow.
    #[must_use]
    pub fn bag(&self) -> &Rc<Bag> {
        &self.bag
    }

    /// Advance the flow: resolve the visible screen's type, ask the
    /// flow for the next route, and push it. A gone stack, an empty
    /// stack, or a terminal state is a silent no-op.
    pub fn proceed(&self) {
        let Some(nav) = self.nav.upgrade() else {
            debug!("proceed skipped: navigation stack gone");
            return;
        };
        let current = {
            let stack = nav.borrow();
            let Some(screen) = stack.visible() else {
                debug!("proceed skipped: nothing visible");
                return;
            };
            screen.screen_type()
        };
        let Some(route) = self.flow.borrow().next(current) else {
            debug!(state = current.name(), "flow terminal");
            return;
        };
        self.push_route(route);
    }

    /// Delegate to a child flow against the same navigation stack and
    /// the same Bag. Fire-and-forget: the child coordinator survives
    /// only through the screens its `start` pushes.
    pub fn proceed_to(&self, flow: Box<dyn Flow>) {
        let Some(nav) = self.nav.upgrade() else {
            debug!("delegation skipped: navigation stack gone");
            return;
        };
        let _child = Coordinator::new(&nav, flow, Rc::clone(&self.bag));
    }

    fn push_route(&self, route: ScreenRoute) {
        let Some(nav) = self.nav.upgrade() else {
            debug!("push skipped: navigation stack gone");
            return;
        };
        let Some(this) = self.this.upgrade() else {
            return;
        };
        debug!(screen = route.target().name(), "pushing screen");
        let mut screen = (route.build)();
        screen.bind(this);
        nav.borrow_mut().push(screen, animations_enabled());
    }

    /// Static entry point: locate the foreground screen, create a fresh
    /// stack and a fresh Bag over `registry`, build the coordinator
    /// (running its `start`), and present the stack modally. `None`
    /// when the toolkit has no foreground screen.
    pub fn launch(
        platform: &dyn Platform,
        flow: Box<dyn Flow>,
        registry: &SharedRegistry,
    ) -> Option<Rc<Self>> {
        let root = platform.root_node()?;
        let host = top_screen(root);
        let nav = platform.new_navigation_stack();
        let coordinator = Coordinator::new(&nav, flow, Rc::new(Bag::new(registry.clone())));
        platform.present(&host, nav, animations_enabled());
        Some(coordinator)
    }
}

impl Navigator for Coordinator {
    fn proceed(&self) {
        Coordinator::proceed(self);
    }
}
