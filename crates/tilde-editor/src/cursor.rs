//! Cursor — the (column, line) state machine.
//!
//! The cursor lives in *logical* coordinates: `cx` indexes a row's raw bytes
//! and `cy` indexes rows. `cy` may equal the row count, the line just past
//! the end. The render column `rx` is derived from `cx` by the viewport on
//! every scroll and is never a source of truth.
//!
//! Every motion finishes with [`Cursor::clamp`], so moving onto a shorter row
//! snaps the column to that row's end. There is no sticky column.

use crate::row::RowStore;

/// Which way a page motion goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Up,
    Down,
}

/// Cursor position in logical coordinates, plus the derived render column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Logical column, `0..=row_length(cy)`.
    pub cx: usize,
    /// Line, `0..=rows.len()`.
    pub cy: usize,
    /// Render column of `cx`. Recomputed by the viewport before drawing.
    pub rx: usize,
}

impl Cursor {
    /// A cursor at the top-left.
    #[must_use]
    pub const fn new() -> Self {
        Self { cx: 0, cy: 0, rx: 0 }
    }

    // -- Single-step motions ------------------------------------------------

    /// Up one line, stopping at the first.
    pub const fn up(&mut self) {
        if self.cy > 0 {
            self.cy -= 1;
        }
    }

    /// Down one line, as far as the line past the end.
    pub fn down(&mut self, rows: &RowStore) {
        if self.cy < rows.len() {
            self.cy += 1;
        }
    }

    /// Left one byte, wrapping to the end of the previous line.
    pub fn left(&mut self, rows: &RowStore) {
        if self.cx > 0 {
            self.cx -= 1;
        } else if self.cy > 0 {
            self.cy -= 1;
            self.cx = rows.row_length(self.cy);
        }
    }

    /// Right one byte, wrapping to the start of the next line.
    ///
    /// Wrapping happens only from the end of a real row; on the line past
    /// the end there is nowhere to go.
    pub fn right(&mut self, rows: &RowStore) {
        let Some(row) = rows.get(self.cy) else {
            return;
        };
        if self.cx < row.size() {
            self.cx += 1;
        } else if self.cx == row.size() {
            self.cy += 1;
            self.cx = 0;
        }
    }

    /// Start of the line.
    pub const fn home(&mut self) {
        self.cx = 0;
    }

    /// End of the line, if the cursor is on a real row.
    pub fn end(&mut self, rows: &RowStore) {
        if self.cy < rows.len() {
            self.cx = rows.row_length(self.cy);
        }
    }

    // -- Page motions -------------------------------------------------------

    /// Jump to the edge of the visible page, then move one page further.
    ///
    /// Page up snaps to the top visible line (`rowoff`); page down snaps to
    /// the bottom visible line, clamped to the line past the end. Either
    /// way the cursor then steps `screen_rows` lines in that direction.
    pub fn page(
        &mut self,
        direction: PageDirection,
        rowoff: usize,
        screen_rows: usize,
        rows: &RowStore,
    ) {
        match direction {
            PageDirection::Up => {
                self.cy = rowoff;
                for _ in 0..screen_rows {
                    self.up();
                }
            }
            PageDirection::Down => {
                self.cy = (rowoff + screen_rows).saturating_sub(1).min(rows.len());
                for _ in 0..screen_rows {
                    self.down(rows);
                }
            }
        }
    }

    // -- Invariants ---------------------------------------------------------

    /// Pull `cx` back inside the current row.
    pub fn clamp(&mut self, rows: &RowStore) {
        self.cx = self.cx.min(rows.row_length(self.cy));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(lines: &[&str]) -> RowStore {
        let mut s = RowStore::default();
        for line in lines {
            s.append_row(line.as_bytes());
        }
        s
    }

    fn at(cx: usize, cy: usize) -> Cursor {
        Cursor { cx, cy, rx: 0 }
    }

    // -- Vertical -----------------------------------------------------------

    #[test]
    fn up_stops_at_top() {
        let mut c = at(0, 0);
        c.up();
        assert_eq!(c.cy, 0);
    }

    #[test]
    fn down_reaches_line_past_end() {
        let r = rows(&["a", "b"]);
        let mut c = at(0, 1);
        c.down(&r);
        assert_eq!(c.cy, 2);
        c.down(&r);
        assert_eq!(c.cy, 2);
    }

    #[test]
    fn down_on_empty_buffer_stays() {
        let r = rows(&[]);
        let mut c = Cursor::new();
        c.down(&r);
        assert_eq!(c.cy, 0);
    }

    // -- Horizontal ---------------------------------------------------------

    #[test]
    fn left_wraps_to_previous_line_end() {
        let r = rows(&["hello", "x"]);
        let mut c = at(0, 1);
        c.left(&r);
        assert_eq!((c.cx, c.cy), (5, 0));
    }

    #[test]
    fn left_at_origin_stays() {
        let r = rows(&["hello"]);
        let mut c = at(0, 0);
        c.left(&r);
        assert_eq!((c.cx, c.cy), (0, 0));
    }

    #[test]
    fn left_from_line_past_end_wraps_to_last_row_end() {
        let r = rows(&["abc"]);
        let mut c = at(0, 1);
        c.left(&r);
        assert_eq!((c.cx, c.cy), (3, 0));
    }

    #[test]
    fn right_moves_within_row() {
        let r = rows(&["ab"]);
        let mut c = at(0, 0);
        c.right(&r);
        assert_eq!((c.cx, c.cy), (1, 0));
    }

    #[test]
    fn right_wraps_from_row_end() {
        let r = rows(&["ab", "cd"]);
        let mut c = at(2, 0);
        c.right(&r);
        assert_eq!((c.cx, c.cy), (0, 1));
    }

    #[test]
    fn right_from_last_row_end_reaches_line_past_end() {
        let r = rows(&["ab"]);
        let mut c = at(2, 0);
        c.right(&r);
        assert_eq!((c.cx, c.cy), (0, 1));
    }

    #[test]
    fn right_on_line_past_end_stays() {
        let r = rows(&["ab"]);
        let mut c = at(0, 1);
        c.right(&r);
        assert_eq!((c.cx, c.cy), (0, 1));
    }

    // -- Home / End ---------------------------------------------------------

    #[test]
    fn home_and_end() {
        let r = rows(&["\tindented"]);
        let mut c = at(3, 0);
        c.end(&r);
        assert_eq!(c.cx, 9);
        c.home();
        assert_eq!(c.cx, 0);
    }

    #[test]
    fn end_on_line_past_end_is_noop() {
        let r = rows(&["abc"]);
        let mut c = at(0, 1);
        c.end(&r);
        assert_eq!(c.cx, 0);
    }

    // -- Clamp --------------------------------------------------------------

    #[test]
    fn clamp_snaps_to_shorter_row() {
        let r = rows(&["a long line", "short"]);
        let mut c = at(11, 0);
        c.down(&r);
        c.clamp(&r);
        assert_eq!((c.cx, c.cy), (5, 1));
    }

    #[test]
    fn clamp_on_line_past_end_is_zero() {
        let r = rows(&["abc"]);
        let mut c = at(3, 0);
        c.down(&r);
        c.clamp(&r);
        assert_eq!((c.cx, c.cy), (0, 1));
    }

    #[test]
    fn clamp_leaves_valid_column() {
        let r = rows(&["abcdef"]);
        let mut c = at(4, 0);
        c.clamp(&r);
        assert_eq!(c.cx, 4);
    }

    // -- Paging -------------------------------------------------------------

    fn hundred() -> RowStore {
        let lines: Vec<String> = (0..100).map(|i| format!("line {i}")).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        rows(&refs)
    }

    #[test]
    fn page_down_from_top() {
        let r = hundred();
        let mut c = at(0, 0);
        c.page(PageDirection::Down, 0, 20, &r);
        // Snap to line 19, then 20 more.
        assert_eq!(c.cy, 39);
    }

    #[test]
    fn page_up_from_scrolled_view() {
        let r = hundred();
        let mut c = at(0, 55);
        c.page(PageDirection::Up, 50, 20, &r);
        // Snap to line 50, then 20 up.
        assert_eq!(c.cy, 30);
    }

    #[test]
    fn page_up_near_top_stops_at_zero() {
        let r = hundred();
        let mut c = at(0, 12);
        c.page(PageDirection::Up, 5, 20, &r);
        assert_eq!(c.cy, 0);
    }

    #[test]
    fn page_down_near_end_stops_past_last_row() {
        let r = hundred();
        let mut c = at(0, 90);
        c.page(PageDirection::Down, 85, 20, &r);
        assert_eq!(c.cy, 100);
    }

    #[test]
    fn page_down_on_short_buffer() {
        let r = rows(&["a", "b", "c"]);
        let mut c = at(0, 0);
        c.page(PageDirection::Down, 0, 20, &r);
        assert_eq!(c.cy, 3);
    }
}
