#![forbid(unsafe_code)]

//! Main-thread deferred task queue.
//!
//! # Design
//!
//! All framework mutation and notification happens on one thread; work
//! that must not run inline (observable notifications during a value
//! write) is deferred onto a [`Scheduler`] and executed when the host's
//! main loop calls [`drain`](Scheduler::drain). The handle is a cheap
//! clone over shared state and is `!Send` by construction, so the
//! single-thread constraint is a compile-time fact.
//!
//! # Invariants
//!
//! 1. Tasks run in FIFO enqueue order on the draining thread.
//! 2. Tasks enqueued while draining run within the same drain call.
//! 3. Clones share one queue; there is no per-handle state.
//!
//! # Failure Modes
//!
//! - A task that panics aborts the drain; remaining tasks stay queued
//!   and run on the next drain.
//! - Tasks that endlessly re-enqueue themselves make `drain` diverge;
//!   pacing is the host's responsibility.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

type Task = Box<dyn FnOnce()>;

/// Cheaply cloneable handle to a single-threaded deferred task queue.
pub struct Scheduler {
    queue: Rc<RefCell<VecDeque<Task>>>,
}

impl Clone for Scheduler {
    fn clone(&self) -> Self {
        Self {
            queue: Rc::clone(&self.queue),
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("pending", &self.pending())
            .finish()
    }
}

impl Scheduler {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            queue: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    /// Enqueue a task to run on a later [`drain`](Self::drain).
    pub fn defer(&self, task: impl FnOnce() + 'static) {
        self.queue.borrow_mut().push_back(Box::new(task));
    }

    /// Run queued tasks until the queue is empty, including tasks the
    /// queued tasks enqueue. Returns the number executed.
    pub fn drain(&self) -> usize {
        let mut ran = 0;
        loop {
            // Pop with the borrow released so tasks can defer more work.
            let task = self.queue.borrow_mut().pop_front();
            match task {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }

    /// Number of tasks currently queued.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn runs_tasks_in_fifo_order() {
        let scheduler = Scheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for i in 0..3 {
            let log = Rc::clone(&log);
            scheduler.defer(move || log.borrow_mut().push(i));
        }

        assert_eq!(scheduler.pending(), 3);
        assert_eq!(scheduler.drain(), 3);
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn tasks_enqueued_while_draining_run_in_same_drain() {
        let scheduler = Scheduler::new();
        let count = Rc::new(Cell::new(0u32));

        let inner_scheduler = scheduler.clone();
        let inner_count = Rc::clone(&count);
        scheduler.defer(move || {
            inner_count.set(inner_count.get() + 1);
            let count = Rc::clone(&inner_count);
            inner_scheduler.defer(move || count.set(count.get() + 1));
        });

        assert_eq!(scheduler.drain(), 2);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn clones_share_one_queue() {
        let scheduler = Scheduler::new();
        let clone = scheduler.clone();
        let count = Rc::new(Cell::new(0u32));

        let probe = Rc::clone(&count);
        clone.defer(move || probe.set(probe.get() + 1));

        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.drain(), 1);
        assert_eq!(count.get(), 1);
        assert!(clone.is_idle());
    }

    #[test]
    fn drain_on_empty_queue_is_a_no_op() {
        let scheduler = Scheduler::new();
        assert_eq!(scheduler.drain(), 0);
    }
}
