// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Stdin byte reader — one unbuffered byte per call.
//
// The key decoder needs to see exactly what the terminal has delivered so
// far: a buffered reader would hide the difference between "the rest of
// the escape sequence is already here" and "the read timed out". So this
// goes straight to `read(2)` on fd 0, one byte at a time.
//
// Raw mode sets VMIN=0 / VTIME=n, so a read with nothing pending returns 0
// after n deciseconds. That zero, along with EAGAIN and EINTR, is a timeout
// (`Ok(None)`). Outside raw mode a zero-length read is end of input and is
// reported as `UnexpectedEof`.

use std::io;

use crate::input::ByteSource;
use crate::terminal::raw_mode_active;

/// Unbuffered one-byte reader on the process's stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinReader;

impl StdinReader {
    /// Create a reader on fd 0.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Map the outcome of a single `read(2)` to the `ByteSource` contract.
///
/// Split out so the errno handling is testable without a terminal.
fn classify_read(
    n: isize,
    byte: u8,
    raw: bool,
    err: impl FnOnce() -> io::Error,
) -> io::Result<Option<u8>> {
    match n {
        1 => Ok(Some(byte)),
        0 if raw => Ok(None),
        0 => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "end of input")),
        _ => {
            let e = err();
            match e.kind() {
                io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => Ok(None),
                _ => Err(e),
            }
        }
    }
}

#[cfg(unix)]
impl ByteSource for StdinReader {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = 0u8;
        let n = unsafe { libc::read(libc::STDIN_FILENO, (&raw mut byte).cast(), 1) };
        classify_read(n, byte, raw_mode_active(), io::Error::last_os_error)
    }
}

#[cfg(not(unix))]
impl ByteSource for StdinReader {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        use std::io::Read;

        let mut byte = [0u8; 1];
        match io::stdin().lock().read(&mut byte) {
            Ok(0) => classify_read(0, 0, raw_mode_active(), || {
                io::Error::from(io::ErrorKind::Other)
            }),
            Ok(_) => Ok(Some(byte[0])),
            Err(e) => classify_read(-1, 0, false, || e),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn unexpected() -> io::Error {
        panic!("errno must not be consulted on a successful read")
    }

    #[test]
    fn one_byte_is_data() {
        assert_eq!(classify_read(1, b'x', true, unexpected).unwrap(), Some(b'x'));
    }

    #[test]
    fn zero_in_raw_mode_is_timeout() {
        assert_eq!(classify_read(0, 0, true, unexpected).unwrap(), None);
    }

    #[test]
    fn zero_outside_raw_mode_is_eof() {
        let r = classify_read(0, 0, false, unexpected);
        assert_eq!(r.unwrap_err().kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn data_outside_raw_mode_is_still_data() {
        assert_eq!(classify_read(1, b'q', false, unexpected).unwrap(), Some(b'q'));
    }

    #[test]
    fn would_block_is_timeout() {
        let r = classify_read(-1, 0, true, || io::Error::from(io::ErrorKind::WouldBlock));
        assert_eq!(r.unwrap(), None);
    }

    #[test]
    fn interrupted_is_timeout() {
        let r = classify_read(-1, 0, true, || io::Error::from(io::ErrorKind::Interrupted));
        assert_eq!(r.unwrap(), None);
    }

    #[test]
    fn other_errors_propagate() {
        let r = classify_read(-1, 0, true, || io::Error::from(io::ErrorKind::BrokenPipe));
        assert_eq!(r.unwrap_err().kind(), io::ErrorKind::BrokenPipe);
    }
}
