pub mod glyph;
pub mod line_index;
pub mod navigation;

pub use glyph::{Glyph, GlyphBounds};
pub use navigation::{CursorMoved, NavDirection, Navigator};
