// SPDX-License-Identifier: MIT
//
// tilde-term — Terminal plumbing for tilde.
//
// Raw termios, byte-at-a-time key decoding, ANSI encoding, and a frame
// buffer that reaches the terminal in a single write. No TUI framework in
// between: every byte sent to the terminal is one we chose to send.

pub mod ansi;
pub mod error;
pub mod event_loop;
pub mod input;
pub mod output;
pub mod reader;
pub mod style;
pub mod terminal;

pub use error::TermError;
