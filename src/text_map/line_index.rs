use std::collections::HashMap;

use crate::text_map::glyph::Glyph;

/// A run of glyphs sharing a page and a reported line top
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub page: usize,
    pub line_y: f64,
    /// Glyph indices in the order they were met in the glyph sequence
    pub members: Vec<usize>,
}

/// Every line of a document, ordered by page and then by `line_y`.
///
/// Glyphs are grouped on the exact `(page, line_y)` pair the extractor reported.
/// Two visually aligned lines whose tops differ by a rounding error stay separate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineIndex {
    lines: Vec<Line>,
    /// glyph index -> position in `lines`
    line_of_glyph: Vec<usize>,
}

impl LineIndex {
    /// Group a reading-ordered glyph sequence into sorted lines
    pub fn build(glyphs: &[Glyph]) -> Self {
        // f64 is not Hash; the bit pattern gives the same exact-equality grouping.
        // Adding 0.0 folds -0.0 into 0.0.
        let mut slots: HashMap<(usize, u64), usize> = HashMap::new();
        let mut lines: Vec<Line> = Vec::new();

        for (index, glyph) in glyphs.iter().enumerate() {
            let key = (glyph.page, (glyph.line_y + 0.0).to_bits());
            let slot = *slots.entry(key).or_insert_with(|| {
                lines.push(Line {
                    page: glyph.page,
                    line_y: glyph.line_y,
                    members: Vec::new(),
                });
                lines.len() - 1
            });
            lines[slot].members.push(index);
        }

        lines.sort_by(|a, b| {
            a.page
                .cmp(&b.page)
                .then_with(|| a.line_y.total_cmp(&b.line_y))
        });

        let mut line_of_glyph = vec![0; glyphs.len()];
        for (line_index, line) in lines.iter().enumerate() {
            for &member in &line.members {
                line_of_glyph[member] = line_index;
            }
        }

        Self {
            lines,
            line_of_glyph,
        }
    }

    pub fn get(&self, line_index: usize) -> Option<&Line> {
        self.lines.get(line_index)
    }

    /// Position of the line holding `glyph_index`, if the glyph is indexed
    pub fn line_of(&self, glyph_index: usize) -> Option<usize> {
        self.line_of_glyph.get(glyph_index).copied()
    }

    /// Lines of a single page, in sorted order
    pub fn lines_on_page(&self, page: usize) -> impl Iterator<Item = &Line> + '_ {
        self.lines.iter().filter(move |line| line.page == page)
    }

    /// Total number of lines across all pages
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
