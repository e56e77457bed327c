pub mod key_handler;

pub use key_handler::{KeyAction, KeyResult, handle_reader_key};
