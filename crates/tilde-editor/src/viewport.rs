//! Viewport — which part of the render space is on screen.
//!
//! The viewport is the rectangle `(rowoff, coloff, rows, cols)` over the
//! rows' render forms. [`Viewport::scroll`] is the only thing that moves it,
//! and it moves it as little as possible: just far enough that the cursor's
//! render cell is inside the rectangle again.
//!
//! ```text
//!            coloff
//!              │◄──── cols ────►│
//!   rowoff ─── ┌────────────────┐
//!              │                │ ▲
//!              │      █ ◄ (rx, cy)  rows
//!              │                │ ▼
//!              └────────────────┘
//! ```

use crate::cursor::Cursor;
use crate::row::RowStore;

/// Scroll offsets and text-area dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// First visible row.
    pub rowoff: usize,
    /// First visible render column.
    pub coloff: usize,
    /// Text rows on screen (status and message bars excluded).
    pub rows: usize,
    /// Columns on screen.
    pub cols: usize,
}

impl Viewport {
    /// A viewport at the top-left of a `rows × cols` text area.
    #[must_use]
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self {
            rowoff: 0,
            coloff: 0,
            rows,
            cols,
        }
    }

    /// Recompute `cursor.rx` and bring the cursor back into view.
    ///
    /// The four rules run in order and each only pushes its offset one way.
    /// A zero-sized text area has nothing to keep the cursor inside, so the
    /// offsets are left alone.
    pub fn scroll(&mut self, cursor: &mut Cursor, text: &RowStore) {
        cursor.rx = text.render_column_for(cursor.cy, cursor.cx);

        if self.rows > 0 {
            if cursor.cy < self.rowoff {
                self.rowoff = cursor.cy;
            }
            if cursor.cy >= self.rowoff + self.rows {
                self.rowoff = cursor.cy - self.rows + 1;
            }
        }

        if self.cols > 0 {
            if cursor.rx < self.coloff {
                self.coloff = cursor.rx;
            }
            if cursor.rx >= self.coloff + self.cols {
                self.coloff = cursor.rx - self.cols + 1;
            }
        }
    }

    /// Whether `(rx, cy)` is inside the rectangle.
    #[must_use]
    pub const fn contains(&self, rx: usize, cy: usize) -> bool {
        cy >= self.rowoff
            && cy < self.rowoff + self.rows
            && rx >= self.coloff
            && rx < self.coloff + self.cols
    }

    /// Screen position of the cursor relative to the text area, 0-indexed.
    #[must_use]
    pub const fn screen_position(&self, cursor: &Cursor) -> (usize, usize) {
        (
            cursor.rx.saturating_sub(self.coloff),
            cursor.cy.saturating_sub(self.rowoff),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
