/// Axis-aligned glyph rectangle in page space (origin top-left, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphBounds {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl GlyphBounds {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Horizontal midpoint, used for column matching between lines
    pub fn center_x(&self) -> f64 {
        (self.x0 + self.x1) / 2.0
    }
}

/// A single positioned, non-whitespace character extracted from a page
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// Zero-based page number
    pub page: usize,
    pub character: char,
    pub bounds: GlyphBounds,
    /// Top edge of the line this glyph was laid out on, as reported by the extractor.
    /// Only used as a grouping key.
    pub line_y: f64,
}

impl Glyph {
    pub fn new(page: usize, character: char, bounds: GlyphBounds, line_y: f64) -> Self {
        Self {
            page,
            character,
            bounds,
            line_y,
        }
    }

    pub fn center_x(&self) -> f64 {
        self.bounds.center_x()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_x_is_horizontal_midpoint() {
        let bounds = GlyphBounds::new(4.0, 10.0, 10.0, 22.0);
        assert_eq!(bounds.center_x(), 7.0);

        let glyph = Glyph::new(0, 'a', bounds, 10.0);
        assert_eq!(glyph.center_x(), 7.0);
    }
}
