//! Editor — the application the event loop drives.
//!
//! `Editor` owns all state: the rows, the cursor, the viewport, the file
//! name, and the current status message. One key in means one transition of
//! the cursor state machine; one paint means scroll, then draw.

use std::time::Instant;

use tilde_term::event_loop::{Action, App};
use tilde_term::input::Key;
use tilde_term::output::OutputBuffer;
use tilde_term::terminal::Size;

use crate::cursor::{Cursor, PageDirection};
use crate::message::StatusMessage;
use crate::options::Options;
use crate::row::RowStore;
use crate::screen::{Frame, RESERVED_ROWS};
use crate::viewport::Viewport;

/// The only command that is not a motion.
const QUIT: Key = Key::ctrl(b'q');

/// First message on the message bar.
pub const HELP_MESSAGE: &str = "HELP: Ctrl-Q = quit";

/// Viewer state.
#[derive(Debug)]
pub struct Editor {
    rows: RowStore,
    cursor: Cursor,
    viewport: Viewport,
    filename: Option<String>,
    message: Option<StatusMessage>,
    options: Options,
}

impl Editor {
    /// An editor over `rows` on a terminal of `size`.
    ///
    /// The bottom two screen rows go to the status and message bars.
    #[must_use]
    pub fn new(rows: RowStore, size: Size, options: Options) -> Self {
        let text_rows = usize::from(size.rows).saturating_sub(RESERVED_ROWS);
        Self {
            rows,
            cursor: Cursor::new(),
            viewport: Viewport::new(text_rows, usize::from(size.cols)),
            filename: None,
            message: None,
            options,
        }
    }

    /// Name shown on the status bar.
    #[must_use]
    pub fn with_filename(mut self, name: impl Into<String>) -> Self {
        self.filename = Some(name.into());
        self
    }

    /// Replace the status message.
    pub fn set_status_message(&mut self, text: impl Into<String>, now: Instant) {
        self.message = Some(StatusMessage::new(text, now));
    }

    #[must_use]
    pub const fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[must_use]
    pub const fn rows(&self) -> &RowStore {
        &self.rows
    }

    #[must_use]
    pub const fn message(&self) -> Option<&StatusMessage> {
        self.message.as_ref()
    }

    // -- Input ----------------------------------------------------------------

    /// Apply one key. Every motion ends with the column clamped to its row.
    pub fn process_key(&mut self, key: Key) -> Action {
        let rows = &self.rows;
        match key {
            QUIT => {
                tracing::info!(cy = self.cursor.cy, "quit");
                return Action::Quit;
            }
            Key::Up => self.cursor.up(),
            Key::Down => self.cursor.down(rows),
            Key::Left => self.cursor.left(rows),
            Key::Right => self.cursor.right(rows),
            Key::Home => self.cursor.home(),
            Key::End => self.cursor.end(rows),
            Key::PageUp => self.cursor.page(
                PageDirection::Up,
                self.viewport.rowoff,
                self.viewport.rows,
                rows,
            ),
            Key::PageDown => self.cursor.page(
                PageDirection::Down,
                self.viewport.rowoff,
                self.viewport.rows,
                rows,
            ),
            Key::Byte(_) | Key::Escape | Key::Delete => {
                tracing::trace!(?key, "ignored");
            }
        }
        self.cursor.clamp(rows);
        Action::Continue
    }

    // -- Output ---------------------------------------------------------------

    /// Scroll the viewport onto the cursor and draw the frame as of `now`.
    pub fn refresh_screen(&mut self, out: &mut OutputBuffer, now: Instant) {
        self.viewport.scroll(&mut self.cursor, &self.rows);
        Frame {
            rows: &self.rows,
            cursor: &self.cursor,
            viewport: &self.viewport,
            filename: self.filename.as_deref(),
            message: self.message.as_ref(),
            message_timeout: self.options.message_timeout,
            now,
        }
        .draw(out);
    }
}

impl App for Editor {
    fn paint(&mut self, out: &mut OutputBuffer) {
        self.refresh_screen(out, Instant::now());
    }

    fn on_key(&mut self, key: Key) -> Action {
        self.process_key(key)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
