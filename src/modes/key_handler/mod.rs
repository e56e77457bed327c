mod key_action;
mod processing;

pub use key_action::KeyAction;
pub use processing::{KeyResult, handle_reader_key};
