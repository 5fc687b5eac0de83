//! Rows — the text model.
//!
//! A [`Row`] is one line of the file exactly as read (no newline) plus its
//! *render* form, where every tab has been expanded to spaces up to the next
//! tab stop. Everything on screen is drawn from the render form; the cursor
//! lives in the raw form. [`RowStore::render_column_for`] is the one mapping
//! between the two.
//!
//! Everything is byte-oriented: one column per byte, except tabs.
//!
//! ```text
//! chars:  a \t b              (size 3)
//! render: a · · · · · · · b   (rsize 9, tab stop 8)
//!         0 1             8
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::EditorError;

/// Default distance between tab stops.
pub const TAB_STOP: usize = 8;

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// One line of text and its tab-expanded render form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    chars: Vec<u8>,
    render: Vec<u8>,
}

impl Row {
    /// Build a row from raw bytes, deriving the render form immediately.
    #[must_use]
    pub fn new(chars: &[u8], tab_stop: usize) -> Self {
        let mut row = Self {
            chars: chars.to_vec(),
            render: Vec::new(),
        };
        row.update_render(tab_stop);
        row
    }

    /// Raw bytes.
    #[inline]
    #[must_use]
    pub fn chars(&self) -> &[u8] {
        &self.chars
    }

    /// Tab-expanded bytes.
    #[inline]
    #[must_use]
    pub fn render(&self) -> &[u8] {
        &self.render
    }

    /// Length of the raw bytes.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.chars.len()
    }

    /// Length of the render form. Never less than [`size`](Self::size).
    #[inline]
    #[must_use]
    pub fn rsize(&self) -> usize {
        self.render.len()
    }

    /// Regenerate the render form from the raw bytes.
    fn update_render(&mut self, tab_stop: usize) {
        let tab_stop = tab_stop.max(1);
        let tabs = self.chars.iter().filter(|&&b| b == b'\t').count();
        self.render.clear();
        self.render.reserve(self.chars.len() + tabs * (tab_stop - 1));

        for &b in &self.chars {
            if b == b'\t' {
                self.render.push(b' ');
                while self.render.len() % tab_stop != 0 {
                    self.render.push(b' ');
                }
            } else {
                self.render.push(b);
            }
        }
    }

    /// Map a raw column to a render column.
    ///
    /// `cx` past the end is treated as the end of the row.
    #[must_use]
    pub fn cx_to_rx(&self, cx: usize, tab_stop: usize) -> usize {
        let tab_stop = tab_stop.max(1);
        let mut rx = 0;
        for &b in self.chars.iter().take(cx) {
            if b == b'\t' {
                rx += (tab_stop - 1) - (rx % tab_stop);
            }
            rx += 1;
        }
        rx
    }
}

// ---------------------------------------------------------------------------
// RowStore
// ---------------------------------------------------------------------------

/// The ordered, append-only collection of rows.
///
/// Insertion order is file line order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowStore {
    rows: Vec<Row>,
    tab_stop: usize,
}

impl Default for RowStore {
    fn default() -> Self {
        Self::new(TAB_STOP)
    }
}

impl RowStore {
    /// An empty store with the given tab stop (clamped to at least 1).
    #[must_use]
    pub fn new(tab_stop: usize) -> Self {
        Self {
            rows: Vec::new(),
            tab_stop: tab_stop.max(1),
        }
    }

    /// Load rows from any buffered reader, one row per `\n`-terminated line.
    ///
    /// Trailing `\r` and `\n` bytes are stripped, so CRLF files load clean.
    /// A last line without a newline still becomes a row.
    ///
    /// # Errors
    ///
    /// Returns the first read error.
    pub fn from_reader(reader: impl BufRead, tab_stop: usize) -> io::Result<Self> {
        let mut store = Self::new(tab_stop);
        for line in reader.split(b'\n') {
            let mut line = line?;
            while matches!(line.last(), Some(b'\r' | b'\n')) {
                line.pop();
            }
            store.append_row(&line);
        }
        Ok(store)
    }

    /// Load rows from a file.
    ///
    /// # Errors
    ///
    /// [`EditorError::Open`] if the file cannot be opened,
    /// [`EditorError::Read`] if reading it fails.
    pub fn open(path: &Path, tab_stop: usize) -> Result<Self, EditorError> {
        let file = File::open(path).map_err(|source| EditorError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let store = Self::from_reader(BufReader::new(file), tab_stop).map_err(|source| {
            EditorError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        tracing::info!(path = %path.display(), rows = store.len(), "loaded file");
        Ok(store)
    }

    /// Append a row at the end.
    pub fn append_row(&mut self, bytes: &[u8]) {
        self.rows.push(Row::new(bytes, self.tab_stop));
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the store has no rows.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The tab stop used for render expansion.
    #[inline]
    #[must_use]
    pub const fn tab_stop(&self) -> usize {
        self.tab_stop
    }

    /// The row at `index`, if any.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Logical length of a row, or 0 past the last row.
    #[must_use]
    pub fn row_length(&self, index: usize) -> usize {
        self.rows.get(index).map_or(0, Row::size)
    }

    /// Render column of logical column `cx` in row `index`.
    ///
    /// Monotonic in `cx`, and 0 at `cx == 0`. Past the last row there are no
    /// tabs to expand, so the render column is `cx` itself.
    #[must_use]
    pub fn render_column_for(&self, index: usize, cx: usize) -> usize {
        self.rows
            .get(index)
            .map_or(cx, |row| row.cx_to_rx(cx, self.tab_stop))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
