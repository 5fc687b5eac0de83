// SPDX-License-Identifier: MIT
//
// Fatal terminal errors.
//
// Everything in here ends the process: the caller restores the terminal,
// prints the error, and exits nonzero. Malformed escape sequences are not
// errors at all — the key decoder degrades them to a bare Escape.

use std::io;

/// A fatal failure while talking to the terminal.
#[derive(Debug, thiserror::Error)]
pub enum TermError {
    /// `tcgetattr` failed — usually stdin is not a terminal we can control.
    #[error("tcgetattr failed")]
    GetAttr(#[source] io::Error),

    /// `tcsetattr` failed while entering or leaving raw mode.
    #[error("tcsetattr failed")]
    SetAttr(#[source] io::Error),

    /// Neither `TIOCGWINSZ` nor the cursor-position fallback produced a size.
    #[error("could not determine the terminal size")]
    SizeQuery,

    /// Reading a byte from the input stream failed.
    #[error("read from terminal failed")]
    Read(#[source] io::Error),

    /// Writing a frame to the output stream failed.
    #[error("write to terminal failed")]
    Write(#[source] io::Error),
}
