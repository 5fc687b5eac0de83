// SPDX-License-Identifier: MIT
//
// Event loop — the heartbeat of the terminal application.
//
// One iteration is one frame and at most one key:
//
//   1. the app paints a complete frame into the output buffer
//   2. the buffer goes to the terminal in a single write
//   3. the decoder reads one key (or times out)
//   4. the app handles the key and says whether to keep going
//
// Everything happens on the calling thread. The only place the loop waits
// is the byte read inside the decoder, and raw mode bounds that wait with
// VTIME, so an idle loop still redraws every read timeout. That is how a
// status message disappears on its own without any timer.

use std::io::Write;

use crate::error::TermError;
use crate::input::{self, ByteSource, Key};
use crate::output::OutputBuffer;

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the event loop to do after handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Continue running.
    Continue,
    /// Exit the event loop cleanly.
    Quit,
}

/// Application interface for the event loop.
///
/// The loop calls [`paint`](App::paint) before every read, then either
/// [`on_key`](App::on_key) or [`on_idle`](App::on_idle).
pub trait App {
    /// Paint a complete frame into `out`.
    ///
    /// The buffer is empty on entry. Whatever is in it on return is written
    /// to the terminal in one piece.
    fn paint(&mut self, out: &mut OutputBuffer);

    /// Handle one decoded key.
    ///
    /// Return [`Action::Quit`] to exit the event loop.
    fn on_key(&mut self, key: Key) -> Action;

    /// Called when a read times out with no key.
    fn on_idle(&mut self) {}
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// Synchronous paint/read/dispatch loop over any byte source and sink.
///
/// In the binary the source is [`StdinReader`](crate::reader::StdinReader)
/// and the sink is stdout; tests drive it with a byte slice and a `Vec`.
#[derive(Debug)]
pub struct EventLoop<S, W> {
    source: S,
    sink: W,
    out: OutputBuffer,
    frames: u64,
}

impl<S: ByteSource, W: Write> EventLoop<S, W> {
    /// Create a loop reading keys from `source` and writing frames to `sink`.
    pub fn new(source: S, sink: W) -> Self {
        Self {
            source,
            sink,
            out: OutputBuffer::new(),
            frames: 0,
        }
    }

    /// Number of frames written so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Give back the sink (for inspecting output in tests).
    pub fn into_sink(self) -> W {
        self.sink
    }

    /// Run until the app returns [`Action::Quit`].
    ///
    /// # Errors
    ///
    /// [`TermError::Write`] if a frame cannot be written, [`TermError::Read`]
    /// on a hard input failure. Neither is retried.
    pub fn run(&mut self, app: &mut impl App) -> Result<(), TermError> {
        loop {
            self.render(app)?;

            match input::read_key(&mut self.source).map_err(TermError::Read)? {
                Some(key) => {
                    tracing::trace!(?key, "key");
                    if app.on_key(key) == Action::Quit {
                        return Ok(());
                    }
                }
                None => app.on_idle(),
            }
        }
    }

    /// Paint and write one frame.
    ///
    /// # Errors
    ///
    /// [`TermError::Write`] if the sink rejects the frame.
    pub fn render(&mut self, app: &mut impl App) -> Result<(), TermError> {
        self.out.clear();
        app.paint(&mut self.out);
        self.out.flush_to(&mut self.sink).map_err(TermError::Write)?;
        self.frames += 1;
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
