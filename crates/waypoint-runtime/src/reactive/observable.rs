#![forbid(unsafe_code)]

//! Observable value slot with deferred change notification.
//!
//! # Design
//!
//! [`Observable<T>`] wraps an *optional* value in shared, reference-
//! counted storage (`Rc<RefCell<..>>`). Every write runs a notification
//! pass: dead observers are pruned, and for each live observer a task
//! carrying a clone of the written value is deferred onto the
//! [`Scheduler`]. Callbacks never run inline during a write, so a
//! subscriber may freely read the observable (though writing back from a
//! deferred callback re-enters `set` safely, since the pass holds no
//! borrow while scheduling).
//!
//! # Contract
//!
//! At-least-once, unordered, no dedup: writing a value equal to the
//! current one still notifies, and no ordering is guaranteed between the
//! deferred callbacks of one write or of rapid successive writes.
//!
//! # Invariants
//!
//! 1. `version` increments by exactly 1 on every write (`set`, `clear`,
//!    `update`), equal value or not.
//! 2. A write with N live observers and a present value schedules
//!    exactly N tasks, each invoked with a clone of the written value.
//! 3. Every observer whose [`Subscription`] guard was dropped before a
//!    write is pruned during that write and never scheduled for it.
//! 4. `observe` on a slot holding a value invokes the callback
//!    synchronously, exactly once, before registering it.
//! 5. No notification fires for a seed value.
//!
//! # Failure Modes
//!
//! - **Re-entrant write from `observe`'s synchronous catch-up**: the
//!   catch-up runs with no borrow held, so writing back is safe but the
//!   written value only reaches observers on the next drain.
//! - **Guard dropped between write and drain**: the scheduled task holds
//!   the callback strongly and still runs. Dropping a guard only
//!   suppresses *subsequent* writes.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::scheduler::Scheduler;

/// A subscriber callback stored as a strong `Rc` inside the guard,
/// handed to the observable as `Weak`.
type CallbackRc<T> = Rc<dyn Fn(&T)>;
type CallbackWeak<T> = Weak<dyn Fn(&T)>;

/// Shared interior for [`Observable<T>`].
struct ObservableInner<T> {
    value: Option<T>,
    version: u64,
    /// Observers stored as weak references. Dead entries are pruned on
    /// every write.
    observers: Vec<CallbackWeak<T>>,
}

/// A shared, optional value slot with deferred change notification.
///
/// Cloning an `Observable` creates a new handle to the **same** inner
/// state; both handles see the same value and share observers.
pub struct Observable<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
    scheduler: Scheduler,
}

// Manual Clone: shares the same Rc.
impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            scheduler: self.scheduler.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("observer_count", &inner.observers.len())
            .finish()
    }
}

impl<T: Clone + 'static> Observable<T> {
    /// Create an empty slot bound to `scheduler`.
    #[must_use]
    pub fn new(scheduler: &Scheduler) -> Self {
        Self::build(scheduler, None)
    }

    /// Create a slot seeded with `value`. No notification fires for the
    /// seed and the version starts at 0.
    #[must_use]
    pub fn with_value(scheduler: &Scheduler, value: T) -> Self {
        Self::build(scheduler, Some(value))
    }

    fn build(scheduler: &Scheduler, value: Option<T>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObservableInner {
                value,
                version: 0,
                observers: Vec::new(),
            })),
            scheduler: scheduler.clone(),
        }
    }

    /// Get a clone of the current value.
    #[must_use]
    pub fn get(&self) -> Option<T> {
        self.inner.borrow().value.clone()
    }

    /// Access the current value by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(Option<&T>) -> R) -> R {
        f(self.inner.borrow().value.as_ref())
    }

    /// Write a new value and run a notification pass. Equal consecutive
    /// values are not deduplicated.
    pub fn set(&self, value: T) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.value = Some(value);
            inner.version += 1;
        }
        self.notify();
    }

    /// Remove the value. Counts as a write: dead observers are pruned,
    /// but nothing is scheduled while the slot is empty.
    pub fn clear(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.value = None;
            inner.version += 1;
        }
        self.notify();
    }

    /// Mutate the value in place when one is present; a silent no-op on
    /// an empty slot. Counts as a write.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        {
            let mut inner = self.inner.borrow_mut();
            let Some(value) = inner.value.as_mut() else {
                return;
            };
            f(value);
            inner.version += 1;
        }
        self.notify();
    }

    /// Register an observer.
    ///
    /// If a value is present, `callback` is invoked synchronously and
    /// immediately with it, so a late subscriber is caught up before any
    /// deferred notification from a later write. The observer then lives
    /// as long as the returned [`Subscription`] guard.
    #[must_use = "dropping the subscription unsubscribes the observer"]
    pub fn observe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        // Clone out, then call with no borrow held: the catch-up may
        // write back into this observable.
        let current = self.inner.borrow().value.clone();
        if let Some(value) = &current {
            callback(value);
        }

        let strong: CallbackRc<T> = Rc::new(callback);
        let weak = Rc::downgrade(&strong);
        self.inner.borrow_mut().observers.push(weak);
        // The guard type-erases the Rc as `dyn Any`, since
        // `Rc<dyn Fn(&T)>` cannot coerce to `Rc<dyn Any>` directly.
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Number of writes so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of registered observers, including dead entries not yet
    /// pruned by a write.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner.borrow().observers.len()
    }

    /// Prune dead observers, then defer one task per live observer
    /// carrying a clone of the current value. Nothing is scheduled while
    /// the slot is empty.
    fn notify(&self) {
        let callbacks: Vec<CallbackRc<T>> = {
            let mut inner = self.inner.borrow_mut();
            inner.observers.retain(|weak| weak.strong_count() > 0);
            inner
                .observers
                .iter()
                .filter_map(Weak::upgrade)
                .collect()
        };

        let Some(value) = self.inner.borrow().value.clone() else {
            return;
        };

        trace!(observers = callbacks.len(), "scheduling notifications");
        for callback in callbacks {
            let value = value.clone();
            self.scheduler.defer(move || callback(&value));
        }
    }
}

/// RAII guard for an observer.
///
/// Dropping the guard drops the strong callback reference, so the
/// observable prunes the entry on its next write and never schedules the
/// callback again. A task already deferred before the drop still runs.
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
