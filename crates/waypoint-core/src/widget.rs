#![forbid(unsafe_code)]

//! Widget capability contracts targeted by observable bindings.
//!
//! The toolkit layer implements these for its concrete widgets; the
//! runtime's binding helpers are written against the traits alone.

/// Change handler installed on a text-entry widget. Invoked with the
/// widget's full text after each edit.
pub type ChangeHandler = Box<dyn Fn(&str)>;

/// A text-entry widget: the source side of a reverse binding.
pub trait TextInput {
    /// Install the change handler. Installing replaces any previous
    /// handler; widgets carry at most one.
    fn set_change_handler(&mut self, handler: ChangeHandler);
}

/// A widget with settable display text: the target side of a forward
/// binding. `None` clears the displayed text.
pub trait TextDisplay {
    fn set_text(&mut self, text: Option<String>);
}
