#![forbid(unsafe_code)]

//! Widget binding conveniences over [`Observable`].
//!
//! Two directions, matching the widget capability traits in
//! `waypoint-core`:
//!
//! - **Reverse** ([`bind_input`](Observable::bind_input)): a text-entry
//!   widget drives the observable. Edits parse into `T`; a failed parse
//!   clears the slot.
//! - **Forward** ([`bind_display`](Observable::bind_display),
//!   [`bind_display_with`](Observable::bind_display_with)): the
//!   observable projects into a widget's displayed text. These are
//!   plain `observe` subscriptions, so a present value is displayed
//!   immediately and later writes arrive on drain.

use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;
use std::str::FromStr;

use waypoint_core::widget::{TextDisplay, TextInput};

use super::observable::{Observable, Subscription};

impl<T: Clone + FromStr + 'static> Observable<T> {
    /// Wire a text-entry widget's edits to this slot.
    ///
    /// Each edit parses the widget's text as `T`: success writes the
    /// value, failure clears the slot. Both count as writes.
    pub fn bind_input<W: TextInput + ?Sized>(&self, input: &mut W) {
        let slot = self.clone();
        input.set_change_handler(Box::new(move |text| match text.parse::<T>() {
            Ok(value) => slot.set(value),
            Err(_) => slot.clear(),
        }));
    }
}

impl<T: Clone + Display + 'static> Observable<T> {
    /// Project this slot into a widget's displayed text using the
    /// value's `Display` form.
    #[must_use = "dropping the subscription unbinds the widget"]
    pub fn bind_display<W>(&self, display: &Rc<RefCell<W>>) -> Subscription
    where
        W: TextDisplay + ?Sized + 'static,
    {
        self.bind_display_with(display, |value| Some(value.to_string()))
    }
}

impl<T: Clone + 'static> Observable<T> {
    /// Project this slot into a widget's displayed text through a
    /// formatting function. `None` from the formatter clears the text.
    #[must_use = "dropping the subscription unbinds the widget"]
    pub fn bind_display_with<W>(
        &self,
        display: &Rc<RefCell<W>>,
        format: impl Fn(&T) -> Option<String> + 'static,
    ) -> Subscription
    where
        W: TextDisplay + ?Sized + 'static,
    {
        let display = Rc::clone(display);
        self.observe(move |value| display.borrow_mut().set_text(format(value)))
    }
}
