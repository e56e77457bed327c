mod finger_overlay;
mod reader_view;
mod reader_window;

pub use reader_view::ReaderView;
pub use reader_window::ReaderWindow;
