use tracing::{debug, warn};

use crate::text_map::glyph::Glyph;
use crate::text_map::line_index::LineIndex;

/// Direction for cursor navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Left,  // Previous glyph in reading order (h)
    Right, // Next glyph in reading order (l)
    Up,    // Closest glyph on line above (k)
    Down,  // Closest glyph on line below (j)
}

impl NavDirection {
    /// Signed step along the glyph or line sequence
    fn step(self) -> isize {
        match self {
            NavDirection::Left | NavDirection::Up => -1,
            NavDirection::Right | NavDirection::Down => 1,
        }
    }
}

/// Report of a cursor move that actually changed the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorMoved {
    pub index: usize,
    pub page: usize,
    pub page_changed: bool,
    /// Sign of the page change: -1 backward, 0 same page, +1 forward
    pub direction: i32,
}

/// Owns the glyph sequence, its line index and the single cursor
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    glyphs: Vec<Glyph>,
    lines: LineIndex,
    /// `None` for a document without glyphs
    cursor: Option<usize>,
}

impl Navigator {
    /// Build the line index and place the cursor on the first glyph
    pub fn new(glyphs: Vec<Glyph>) -> Self {
        let lines = LineIndex::build(&glyphs);
        let cursor = if glyphs.is_empty() { None } else { Some(0) };

        Self {
            glyphs,
            lines,
            cursor,
        }
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current_glyph(&self) -> Option<&Glyph> {
        self.glyphs.get(self.cursor?)
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.lines
    }

    /// Highest page number that carries at least one glyph
    pub fn max_page(&self) -> Option<usize> {
        self.glyphs.iter().map(|glyph| glyph.page).max()
    }

    pub fn move_left(&mut self) -> Option<CursorMoved> {
        self.navigate(NavDirection::Left)
    }

    pub fn move_right(&mut self) -> Option<CursorMoved> {
        self.navigate(NavDirection::Right)
    }

    pub fn move_up(&mut self) -> Option<CursorMoved> {
        self.navigate(NavDirection::Up)
    }

    pub fn move_down(&mut self) -> Option<CursorMoved> {
        self.navigate(NavDirection::Down)
    }

    /// Move the cursor one step in `direction`.
    /// Returns None when the cursor stays where it is.
    pub fn navigate(&mut self, direction: NavDirection) -> Option<CursorMoved> {
        let current = self.cursor?;

        let target = match direction {
            NavDirection::Left | NavDirection::Right => {
                self.horizontal_target(current, direction.step())
            }
            NavDirection::Up | NavDirection::Down => {
                self.vertical_target(current, direction.step())?
            }
        };

        if target == current {
            return None;
        }

        let previous_page = self.glyphs[current].page;
        let glyph = &self.glyphs[target];
        let page = glyph.page;
        debug!(
            ?direction,
            from = current,
            to = target,
            page,
            character = %glyph.character,
            x = glyph.center_x(),
            top = glyph.bounds.y0,
            "cursor moved"
        );
        self.cursor = Some(target);

        Some(CursorMoved {
            index: target,
            page,
            page_changed: page != previous_page,
            direction: (page as i64 - previous_page as i64).signum() as i32,
        })
    }

    /// Previous/next glyph in reading order, clamped to the sequence
    fn horizontal_target(&self, current: usize, step: isize) -> usize {
        current
            .saturating_add_signed(step)
            .min(self.glyphs.len().saturating_sub(1))
    }

    /// Closest glyph on the adjacent line, crossing pages when the adjacent line
    /// in the global ordering sits on another page
    fn vertical_target(&self, current: usize, step: isize) -> Option<usize> {
        let current_glyph = self.glyphs.get(current)?;
        let current_x = current_glyph.center_x();

        let Some(current_line) = self.lines.line_of(current) else {
            warn!(glyph = current, "cursor glyph is not on any line");
            return None;
        };

        let target_line = current_line as isize + step;
        if target_line >= 0 && (target_line as usize) < self.lines.len() {
            let line = self.lines.get(target_line as usize)?;
            return find_closest_glyph_on_line(&self.glyphs, &line.members, current_x);
        }

        // Past the first or last line: look for a neighbouring page
        let next_page = current_glyph.page as isize + step;
        if next_page < 0 || next_page as usize > self.max_page()? {
            return None;
        }

        let mut page_lines = self.lines.lines_on_page(next_page as usize);
        let line = if step > 0 {
            page_lines.next()
        } else {
            page_lines.last()
        }?;

        find_closest_glyph_on_line(&self.glyphs, &line.members, current_x)
    }
}

/// Find the glyph among `members` whose x midpoint is closest to `target_x`.
/// Ties go to the first candidate in member order.
fn find_closest_glyph_on_line(glyphs: &[Glyph], members: &[usize], target_x: f64) -> Option<usize> {
    let mut closest: Option<(usize, f64)> = None;

    for &glyph_idx in members {
        if let Some(glyph) = glyphs.get(glyph_idx) {
            let dist = (glyph.center_x() - target_x).abs();
            match closest {
                Some((_, closest_dist)) if dist >= closest_dist => {}
                _ => closest = Some((glyph_idx, dist)),
            }
        }
    }

    closest.map(|(glyph_idx, _)| glyph_idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text_map::glyph::GlyphBounds;

    /// Glyph whose x midpoint is `mid`
    fn glyph_at(page: usize, line_y: f64, mid: f64) -> Glyph {
        Glyph::new(
            page,
            'x',
            GlyphBounds::new(mid - 0.5, line_y, mid + 0.5, line_y + 8.0),
            line_y,
        )
    }

    fn glyph_span(page: usize, line_y: f64, x0: f64, x1: f64) -> Glyph {
        Glyph::new(page, 'x', GlyphBounds::new(x0, line_y, x1, line_y + 8.0), line_y)
    }

    fn navigator_at(glyphs: Vec<Glyph>, cursor: usize) -> Navigator {
        let mut nav = Navigator::new(glyphs);
        nav.cursor = Some(cursor);
        nav
    }

    #[test]
    fn test_starts_on_first_glyph() {
        let nav = Navigator::new(vec![glyph_at(0, 10.0, 1.0), glyph_at(0, 10.0, 2.0)]);
        assert_eq!(nav.cursor(), Some(0));
        assert_eq!(nav.current_glyph().map(|g| g.center_x()), Some(1.0));
    }

    #[test]
    fn test_horizontal_moves_clamp_at_ends() {
        let mut nav = Navigator::new(vec![
            glyph_at(0, 10.0, 1.0),
            glyph_at(0, 10.0, 2.0),
            glyph_at(0, 20.0, 1.0),
        ]);

        assert_eq!(nav.move_left(), None);
        assert_eq!(nav.cursor(), Some(0));

        nav.cursor = Some(2);
        assert_eq!(nav.move_right(), None);
        assert_eq!(nav.cursor(), Some(2));

        let moved = nav.move_left().unwrap();
        assert_eq!(moved.index, 1);
        assert!(!moved.page_changed);
        assert_eq!(moved.direction, 0);
    }

    #[test]
    fn test_horizontal_moves_follow_sequence_across_pages() {
        let mut nav = Navigator::new(vec![glyph_at(0, 90.0, 50.0), glyph_at(1, 10.0, 3.0)]);

        let moved = nav.move_right().unwrap();
        assert_eq!(moved.index, 1);
        assert!(moved.page_changed);
        assert_eq!(moved.direction, 1);

        let moved = nav.move_left().unwrap();
        assert_eq!(moved.index, 0);
        assert_eq!(moved.direction, -1);
    }

    #[test]
    fn test_closest_glyph_picks_smallest_distance() {
        let glyphs = vec![
            glyph_at(0, 10.0, 2.0),
            glyph_at(0, 10.0, 5.0),
            glyph_at(0, 10.0, 9.0),
        ];
        assert_eq!(find_closest_glyph_on_line(&glyphs, &[0, 1, 2], 6.0), Some(1));
    }

    #[test]
    fn test_closest_glyph_tie_goes_to_first_member() {
        let glyphs = vec![glyph_at(0, 10.0, 4.0), glyph_at(0, 10.0, 8.0)];
        assert_eq!(find_closest_glyph_on_line(&glyphs, &[0, 1], 6.0), Some(0));
        assert_eq!(find_closest_glyph_on_line(&glyphs, &[1, 0], 6.0), Some(1));
        assert_eq!(find_closest_glyph_on_line(&glyphs, &[], 6.0), None);
    }

    #[test]
    fn test_move_down_picks_nearest_column() {
        let mut nav = navigator_at(
            vec![
                glyph_at(0, 10.0, 6.0),
                glyph_at(0, 20.0, 2.0),
                glyph_at(0, 20.0, 5.0),
                glyph_at(0, 20.0, 9.0),
            ],
            0,
        );

        let moved = nav.move_down().unwrap();
        assert_eq!(moved.index, 2);
        assert!(!moved.page_changed);
    }

    #[test]
    fn test_move_down_on_last_line_of_last_page_is_noop() {
        let mut nav = navigator_at(
            vec![
                glyph_at(0, 10.0, 1.0),
                glyph_at(1, 10.0, 1.0),
                glyph_at(1, 20.0, 1.0),
            ],
            2,
        );
        assert_eq!(nav.move_down(), None);
        assert_eq!(nav.cursor(), Some(2));
    }

    #[test]
    fn test_move_up_on_first_line_is_noop() {
        let mut nav = navigator_at(vec![glyph_at(0, 10.0, 1.0), glyph_at(0, 20.0, 1.0)], 0);
        assert_eq!(nav.move_up(), None);
        assert_eq!(nav.cursor(), Some(0));
    }

    #[test]
    fn test_move_up_from_first_line_above_empty_page_is_noop() {
        // Text starts on page 1; page 0 exists but has no lines
        let mut nav = navigator_at(
            vec![
                glyph_at(1, 10.0, 1.0),
                glyph_at(1, 10.0, 2.0),
                glyph_at(1, 20.0, 1.0),
            ],
            1,
        );
        assert_eq!(nav.line_index().lines_on_page(0).count(), 0);

        assert_eq!(nav.move_up(), None);
        assert_eq!(nav.cursor(), Some(1));
    }

    #[test]
    fn test_move_down_crosses_page_boundary() {
        let mut nav = navigator_at(
            vec![
                glyph_at(0, 10.0, 1.0),
                glyph_at(0, 10.0, 4.0),
                glyph_at(1, 10.0, 2.0),
                glyph_at(1, 10.0, 3.0),
            ],
            1,
        );

        let moved = nav.move_down().unwrap();
        assert_eq!(moved.index, 3);
        assert_eq!(moved.page, 1);
        assert!(moved.page_changed);
        assert_eq!(moved.direction, 1);
    }

    #[test]
    fn test_move_up_lands_on_last_line_of_previous_page() {
        let mut nav = navigator_at(
            vec![
                glyph_at(0, 10.0, 1.0),
                glyph_at(0, 40.0, 7.0),
                glyph_at(0, 40.0, 3.0),
                glyph_at(1, 5.0, 6.0),
            ],
            3,
        );

        let moved = nav.move_up().unwrap();
        assert_eq!(moved.index, 1);
        assert_eq!(moved.direction, -1);
    }

    #[test]
    fn test_vertical_move_skips_page_without_glyphs() {
        let mut nav = navigator_at(vec![glyph_at(0, 10.0, 1.0), glyph_at(2, 10.0, 1.0)], 0);

        let moved = nav.move_down().unwrap();
        assert_eq!(moved.index, 1);
        assert_eq!(moved.page, 2);
        assert_eq!(moved.direction, 1);
    }

    #[test]
    fn test_single_candidate_line_wins_regardless_of_distance() {
        let mut nav = Navigator::new(vec![
            glyph_span(0, 10.0, 0.0, 2.0),
            glyph_span(0, 10.0, 5.0, 7.0),
            glyph_span(0, 20.0, 1.0, 3.0),
        ]);

        assert_eq!(nav.move_right().map(|m| m.index), Some(1));
        assert_eq!(nav.move_down().map(|m| m.index), Some(2));
        assert_eq!(nav.cursor(), Some(2));
    }

    #[test]
    fn test_lines_shorter_than_current_column() {
        let mut nav = navigator_at(
            vec![
                glyph_at(0, 10.0, 1.0),
                glyph_at(0, 10.0, 2.0),
                glyph_at(0, 10.0, 3.0),
                glyph_at(0, 10.0, 40.0),
                glyph_at(0, 20.0, 1.0),
                glyph_at(0, 20.0, 2.0),
            ],
            3,
        );
        assert_eq!(nav.move_down().map(|m| m.index), Some(5));
        assert_eq!(nav.move_up().map(|m| m.index), Some(1));
    }

    #[test]
    fn test_empty_document_ignores_all_moves() {
        let mut nav = Navigator::new(Vec::new());
        assert_eq!(nav.cursor(), None);
        assert_eq!(nav.current_glyph(), None);
        assert_eq!(nav.max_page(), None);
        assert_eq!(nav.move_left(), None);
        assert_eq!(nav.move_right(), None);
        assert_eq!(nav.move_up(), None);
        assert_eq!(nav.move_down(), None);
        assert_eq!(nav.cursor(), None);
    }

    #[test]
    fn test_single_glyph_document_never_moves() {
        let mut nav = Navigator::new(vec![glyph_at(0, 10.0, 1.0)]);
        for direction in [
            NavDirection::Left,
            NavDirection::Right,
            NavDirection::Up,
            NavDirection::Down,
        ] {
            assert_eq!(nav.navigate(direction), None);
        }
        assert_eq!(nav.cursor(), Some(0));
    }
}
