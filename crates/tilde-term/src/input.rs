// SPDX-License-Identifier: MIT
//
// Terminal input decoding.
//
// Turns raw stdin bytes into logical keys, one key per call. Handles the
// sequences a VT-style terminal sends for the navigation cluster:
//
// - CSI letter finals: `ESC [ A..D`, `ESC [ H`, `ESC [ F`
// - CSI tilde finals:  `ESC [ 1..8 ~` (Home, Delete, End, PageUp, PageDown)
// - SS3 finals:        `ESC O H`, `ESC O F`
//
// # Fail-open decoding
//
// The decoder never buffers. It reads bytes straight off the source under
// the raw-mode read timeout, and the moment a read comes back short or a
// byte doesn't fit a known sequence, it returns a bare `Escape` and drops
// whatever it already consumed. A half-arrived sequence therefore becomes
// an Escape keypress rather than being stitched together with the next
// read. Malformed input is never an error.

use std::io;

/// The Escape byte (0x1B) that introduces every sequence.
const ESC: u8 = 0x1b;

// ─── Keys ───────────────────────────────────────────────────────────────────

/// A decoded logical key.
///
/// Anything that is not part of an escape sequence comes through verbatim
/// as [`Byte`](Key::Byte), including control bytes like Ctrl-Q (`0x11`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable or control byte, passed through untouched.
    Byte(u8),
    /// A lone Escape, or any sequence we could not make sense of.
    Escape,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
    Delete,
}

impl Key {
    /// The key produced by holding Ctrl with an ASCII letter.
    ///
    /// The terminal strips bits 5 and 6, so Ctrl-Q arrives as `0x11`.
    ///
    /// ```
    /// use tilde_term::input::Key;
    ///
    /// assert_eq!(Key::ctrl(b'q'), Key::Byte(0x11));
    /// ```
    #[must_use]
    pub const fn ctrl(letter: u8) -> Self {
        Self::Byte(letter & 0x1f)
    }
}

// ─── Byte sources ───────────────────────────────────────────────────────────

/// Somewhere the decoder can pull single bytes from.
///
/// `Ok(None)` means the read timed out with nothing available; that is the
/// "short read" the decoder collapses to a bare Escape.
pub trait ByteSource {
    /// Read at most one byte.
    ///
    /// # Errors
    ///
    /// Returns an error only for hard I/O failures. Timeouts and
    /// would-block conditions are `Ok(None)`.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

/// A byte slice is an input stream that runs dry instead of blocking.
impl ByteSource for &[u8] {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let Some((&first, rest)) = self.split_first() else {
            return Ok(None);
        };
        *self = rest;
        Ok(Some(first))
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).read_byte()
    }
}

// ─── Decoder ────────────────────────────────────────────────────────────────

/// Read and decode exactly one key.
///
/// Returns `Ok(None)` when the very first read times out, so the caller can
/// redraw and poll again. Once a byte has arrived the result is always
/// `Some`: either the byte itself, a navigation key, or a bare Escape.
///
/// # Errors
///
/// Propagates hard read failures from `src`.
pub fn read_key(src: &mut impl ByteSource) -> io::Result<Option<Key>> {
    let Some(byte) = src.read_byte()? else {
        return Ok(None);
    };

    if byte != ESC {
        return Ok(Some(Key::Byte(byte)));
    }

    let key = decode_escape(src)?;
    if key == Key::Escape {
        tracing::trace!("escape sequence collapsed to bare Escape");
    }
    Ok(Some(key))
}

/// Decode whatever follows an ESC byte.
///
/// Reads the two bytes every recognized sequence has before deciding; a
/// third is read only for the `ESC [ <digit> ~` family.
fn decode_escape(src: &mut impl ByteSource) -> io::Result<Key> {
    let Some(first) = src.read_byte()? else {
        return Ok(Key::Escape);
    };
    let Some(second) = src.read_byte()? else {
        return Ok(Key::Escape);
    };

    let key = match (first, second) {
        (b'[', digit) if digit.is_ascii_digit() => {
            let Some(b'~') = src.read_byte()? else {
                return Ok(Key::Escape);
            };
            tilde_key(digit)
        }
        (b'[', letter) => csi_letter_key(letter),
        (b'O', letter) => ss3_key(letter),
        _ => None,
    };

    Ok(key.unwrap_or(Key::Escape))
}

/// `ESC [ <digit> ~` — the editing keypad.
///
/// Home and End each have two encodings depending on the terminal
/// (rxvt sends 7/8, xterm and the Linux console send 1/4).
const fn tilde_key(digit: u8) -> Option<Key> {
    match digit {
        b'1' | b'7' => Some(Key::Home),
        b'3' => Some(Key::Delete),
        b'4' | b'8' => Some(Key::End),
        b'5' => Some(Key::PageUp),
        b'6' => Some(Key::PageDown),
        _ => None,
    }
}

/// `ESC [ <letter>` — arrows plus the xterm Home/End.
const fn csi_letter_key(letter: u8) -> Option<Key> {
    match letter {
        b'A' => Some(Key::Up),
        b'B' => Some(Key::Down),
        b'C' => Some(Key::Right),
        b'D' => Some(Key::Left),
        b'H' => Some(Key::Home),
        b'F' => Some(Key::End),
        _ => None,
    }
}

/// `ESC O <letter>` — Home/End in application cursor mode.
const fn ss3_key(letter: u8) -> Option<Key> {
    match letter {
        b'H' => Some(Key::Home),
        b'F' => Some(Key::End),
        _ => None,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
