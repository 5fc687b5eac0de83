//! Screen — composes one frame from editor state.
//!
//! A [`Frame`] borrows everything drawing needs and writes the whole screen
//! into an [`OutputBuffer`]: text rows, the inverse-video status bar, the
//! message bar, and the final cursor placement. Nothing here touches the
//! terminal; the caller flushes the buffer in one write.
//!
//! Layout, top to bottom:
//!
//! ```text
//! ┌────────────────────────────────┐
//! │ text rows (viewport.rows)      │  render slice, `~` filler, or banner
//! ├────────────────────────────────┤
//! │ name - N lines         cy/N    │  status bar, inverse
//! │ message                        │  message bar, blank once expired
//! └────────────────────────────────┘
//! ```
//!
//! The frame is a pure function of its fields: the same state and clock give
//! the same bytes.

use std::time::{Duration, Instant};

use tilde_term::ansi;
use tilde_term::output::OutputBuffer;
use tilde_term::style::Attr;

use crate::cursor::Cursor;
use crate::message::StatusMessage;
use crate::row::RowStore;
use crate::viewport::Viewport;

/// Rows below the text area: status bar and message bar.
pub const RESERVED_ROWS: usize = 2;

/// Shown on an empty buffer, a third of the way down.
pub const WELCOME: &str = concat!("Tilde editor -- version ", env!("CARGO_PKG_VERSION"));

/// Longest file name shown on the status bar.
const NAME_MAX: usize = 20;

/// Everything one frame is drawn from.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub rows: &'a RowStore,
    pub cursor: &'a Cursor,
    pub viewport: &'a Viewport,
    pub filename: Option<&'a str>,
    pub message: Option<&'a StatusMessage>,
    pub message_timeout: Duration,
    pub now: Instant,
}

impl Frame<'_> {
    /// Append the complete frame to `out`.
    ///
    /// The viewport must already have been scrolled for the cursor, so that
    /// the cursor's render cell lies inside it.
    pub fn draw(&self, out: &mut OutputBuffer) {
        ansi::cursor_hide(out).ok();
        ansi::cursor_home(out).ok();

        self.draw_rows(out);
        self.draw_status_bar(out);
        self.draw_message_bar(out);

        let (x, y) = self.viewport.screen_position(self.cursor);
        ansi::cursor_to(out, x, y).ok();
        ansi::cursor_show(out).ok();
    }

    // -- Text area ------------------------------------------------------------

    fn draw_rows(&self, out: &mut OutputBuffer) {
        let Viewport {
            rowoff,
            coloff,
            rows: height,
            cols: width,
        } = *self.viewport;

        for y in 0..height {
            match self.rows.get(y + rowoff) {
                Some(row) => {
                    let render = row.render();
                    let start = coloff.min(render.len());
                    let end = (coloff + width).min(render.len());
                    out.push_bytes(&render[start..end]);
                }
                None if self.rows.is_empty() && y == height / 3 => draw_welcome(out, width),
                None => out.push_bytes(b"~"),
            }
            ansi::erase_line(out).ok();
            out.push_bytes(b"\r\n");
        }
    }

    // -- Bars -----------------------------------------------------------------

    fn draw_status_bar(&self, out: &mut OutputBuffer) {
        let width = self.viewport.cols;
        let name = self.filename.unwrap_or("[No Name]").as_bytes();
        let mut left = name[..name.len().min(NAME_MAX)].to_vec();
        left.extend_from_slice(format!(" - {} lines", self.rows.len()).as_bytes());
        let right = format!("{}/{}", self.cursor.cy + 1, self.rows.len());

        ansi::erase_line(out).ok();
        ansi::attrs(out, Attr::INVERSE).ok();

        let mut len = left.len().min(width);
        out.push_bytes(&left[..len]);
        while len < width {
            if width - len == right.len() {
                out.push_bytes(right.as_bytes());
                break;
            }
            out.push_bytes(b" ");
            len += 1;
        }

        ansi::reset(out).ok();
        out.push_bytes(b"\r\n");
    }

    fn draw_message_bar(&self, out: &mut OutputBuffer) {
        ansi::erase_line(out).ok();
        let Some(message) = self.message else {
            return;
        };
        if message.is_visible(self.now, self.message_timeout) {
            let text = message.text().as_bytes();
            out.push_bytes(&text[..text.len().min(self.viewport.cols)]);
        }
    }
}

/// Centered banner with the usual `~` in the first column.
fn draw_welcome(out: &mut OutputBuffer, width: usize) {
    let len = WELCOME.len().min(width);
    let mut padding = (width - len) / 2;
    if padding > 0 {
        out.push_bytes(b"~");
        padding -= 1;
    }
    out.push_repeated(b' ', padding);
    out.push_bytes(&WELCOME.as_bytes()[..len]);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
