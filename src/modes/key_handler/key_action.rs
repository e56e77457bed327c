use crate::text_map::NavDirection;

/// Represents a pure action to be executed by the reader window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyAction {
    /// Move the finger one step
    MoveCursor(NavDirection),
    /// Close the window and end the session
    Close,
}
