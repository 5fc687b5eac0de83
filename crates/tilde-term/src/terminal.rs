// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode, alternate screen, size query, RAII cleanup.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), isatty, and raw fd writes. These are
// the standard POSIX interfaces for terminal control — there is no safe
// alternative. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// This module owns the terminal's raw state. It enters raw mode via termios,
// switches to the alternate screen, and guarantees cleanup on every way out:
// a normal quit drops the handle, an error return drops the handle, and a
// panic runs the hook below before the default handler prints.
//
// The panic hook bypasses Rust's stdout lock entirely, writing a pre-built
// restore sequence directly to fd 1. A panic mid-frame may be holding that
// lock; one raw write avoids the deadlock.

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use crate::ansi;
use crate::error::TermError;
use crate::input::ByteSource;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

// ─── Size Queries ───────────────────────────────────────────────────────────

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if stdout is not a terminal, the query fails, or the
/// kernel reports zero columns.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Longest cursor position report we are willing to read.
const REPORT_MAX: usize = 31;

/// Determine the terminal size, falling back to a cursor-position probe.
///
/// Tries `TIOCGWINSZ` first. When that is unavailable, moves the cursor to
/// the bottom-right corner through `sink`, asks for its position, and reads
/// the `ESC [ rows ; cols R` reply from `src`. Raw mode must already be on
/// for the reply to arrive unechoed.
///
/// # Errors
///
/// [`TermError::Write`] if the probe cannot be sent, [`TermError::Read`] on
/// a hard read failure, and [`TermError::SizeQuery`] if the reply is missing
/// or malformed.
pub fn query_size(src: &mut impl ByteSource, sink: &mut impl Write) -> Result<Size, TermError> {
    if let Some(size) = get_size() {
        return Ok(size);
    }
    tracing::debug!("TIOCGWINSZ unavailable, probing cursor position");
    probe_size(src, sink)
}

/// The cursor-position half of [`query_size`].
///
/// # Errors
///
/// Same as [`query_size`].
pub fn probe_size(src: &mut impl ByteSource, sink: &mut impl Write) -> Result<Size, TermError> {
    ansi::cursor_far_corner(sink).map_err(TermError::Write)?;
    ansi::request_cursor_position(sink).map_err(TermError::Write)?;
    sink.flush().map_err(TermError::Write)?;

    let mut reply = Vec::with_capacity(REPORT_MAX);
    while reply.len() < REPORT_MAX {
        let Some(byte) = src.read_byte().map_err(TermError::Read)? else {
            break;
        };
        reply.push(byte);
        if byte == b'R' {
            break;
        }
    }

    parse_cursor_report(&reply).ok_or(TermError::SizeQuery)
}

/// Parse a DSR cursor position report: `ESC [ rows ; cols R`.
///
/// The terminating `R` is optional so a report cut short by the length cap
/// still parses if both numbers made it through.
#[must_use]
pub fn parse_cursor_report(buf: &[u8]) -> Option<Size> {
    let body = buf.strip_prefix(b"\x1b[")?;
    let body = body.strip_suffix(b"R").unwrap_or(body);

    let mut parts = body.splitn(2, |&b| b == b';');
    let rows = parse_decimal(parts.next()?)?;
    let cols = parse_decimal(parts.next()?)?;

    (rows > 0 && cols > 0).then_some(Size { cols, rows })
}

fn parse_decimal(digits: &[u8]) -> Option<u16> {
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(digits).ok()?.parse().ok()
}

/// Check whether stdin is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Global backup of original termios for panic recovery.
///
/// The [`Terminal`] struct owns its own copy, but the panic hook can't
/// access it.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Restore termios from the global backup. Best-effort, ignores errors.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, original);
            }
        }
    }
}

/// Whether some [`Terminal`] currently has stdin in raw mode.
///
/// Only then does an empty read mean "timed out"; otherwise it is EOF.
#[cfg(unix)]
#[must_use]
pub fn raw_mode_active() -> bool {
    TERMIOS_BACKUP.lock().is_ok_and(|guard| guard.is_some())
}

#[cfg(not(unix))]
#[must_use]
pub fn raw_mode_active() -> bool {
    false
}

/// Complete terminal restore sequence for emergency use.
///
/// Reset SGR, clear the screen, home and show the cursor, then exit the
/// alternate screen last so the shell content reappears clean.
#[rustfmt::skip]
const EMERGENCY_RESTORE: &[u8] = b"\
    \x1b[m\
    \x1b[2J\
    \x1b[H\
    \x1b[?25h\
    \x1b[?1049l";

/// Panic hook guard — ensures the hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that restores the terminal before printing the error.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();

            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

/// Write the complete restore sequence directly to stdout's file descriptor.
fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Terminal handle with RAII cleanup.
///
/// Call [`enter`](Self::enter) to switch to raw mode on the alternate
/// screen. The terminal is restored when the handle is dropped — on a
/// normal quit, on an error return, and (through the panic hook) on panic.
///
/// # Example
///
/// ```no_run
/// use tilde_term::terminal::Terminal;
///
/// let mut term = Terminal::new(1);
/// term.enter()?;
/// let size = term.size()?;
/// // ... render frames, decode keys ...
/// // Terminal is restored automatically on drop.
/// # Ok::<(), tilde_term::TermError>(())
/// ```
#[derive(Debug)]
pub struct Terminal {
    /// Original termios saved before entering raw mode.
    #[cfg(unix)]
    original_termios: Option<libc::termios>,

    /// Raw-mode read timeout in deciseconds (VTIME).
    read_timeout: u8,

    /// Whether we're in raw mode on the alternate screen.
    active: bool,
}

impl Terminal {
    /// Create a terminal handle. Does **not** touch the terminal yet.
    ///
    /// `read_timeout` is how long (in tenths of a second) a read waits for
    /// a byte before giving up, which is what lets the loop redraw while idle.
    #[must_use]
    pub const fn new(read_timeout: u8) -> Self {
        Self {
            #[cfg(unix)]
            original_termios: None,
            read_timeout,
            active: false,
        }
    }

    /// Whether we're currently in raw mode.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Query the size of the terminal attached to stdin/stdout.
    ///
    /// # Errors
    ///
    /// See [`query_size`].
    pub fn size(&self) -> Result<Size, TermError> {
        let mut stdout = io::stdout();
        query_size(&mut crate::reader::StdinReader::new(), &mut stdout)
    }

    /// Enter raw mode and switch to the alternate screen.
    ///
    /// Idempotent: calling `enter()` while already active is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if termios cannot be read or set, or if the mode
    /// switch sequences cannot be written.
    pub fn enter(&mut self) -> Result<(), TermError> {
        if self.active {
            return Ok(());
        }

        install_panic_hook();
        self.enable_raw_mode()?;

        let stdout = io::stdout();
        let mut lock = stdout.lock();
        ansi::enter_alt_screen(&mut lock)
            .and_then(|()| lock.flush())
            .map_err(TermError::Write)?;

        self.active = true;
        Ok(())
    }

    /// Leave raw mode and restore the terminal.
    ///
    /// Clears the screen, homes and shows the cursor, leaves the alternate
    /// screen, then restores the saved termios. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal output or termios restore fails.
    pub fn leave(&mut self) -> Result<(), TermError> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        let stdout = io::stdout();
        let mut lock = stdout.lock();
        let written = write_restore(&mut lock);
        drop(lock);

        // Termios goes back even if the escape sequences could not be written.
        self.disable_raw_mode()?;
        written.map_err(TermError::Write)
    }

    // ── Raw Mode (termios) ──────────────────────────────────────────

    #[cfg(unix)]
    fn enable_raw_mode(&mut self) -> Result<(), TermError> {
        self.enable_raw_mode_on(libc::STDIN_FILENO)
    }

    /// Put `fd` into raw mode. Anything but a terminal is `GetAttr(ENOTTY)`.
    #[cfg(unix)]
    fn enable_raw_mode_on(&mut self, fd: libc::c_int) -> Result<(), TermError> {
        if unsafe { libc::isatty(fd) } == 0 {
            return Err(TermError::GetAttr(io::Error::from_raw_os_error(
                libc::ENOTTY,
            )));
        }

        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &raw mut termios) != 0 {
                return Err(TermError::GetAttr(io::Error::last_os_error()));
            }

            self.original_termios = Some(termios);
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = Some(termios);
            }

            // No break signal, no CR→NL, no parity check, no 8th-bit strip,
            // no Ctrl-S/Ctrl-Q flow control.
            termios.c_iflag &=
                !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
            termios.c_oflag &= !libc::OPOST;
            termios.c_cflag |= libc::CS8;
            termios.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);

            // VMIN=0, VTIME=n: read() returns after n deciseconds with or
            // without data.
            termios.c_cc[libc::VMIN] = 0;
            termios.c_cc[libc::VTIME] = self.read_timeout;

            if libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const termios) != 0 {
                return Err(TermError::SetAttr(io::Error::last_os_error()));
            }
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn enable_raw_mode(&mut self) -> Result<(), TermError> {
        Err(TermError::GetAttr(io::Error::from(io::ErrorKind::Unsupported)))
    }

    #[cfg(unix)]
    fn disable_raw_mode(&mut self) -> Result<(), TermError> {
        if let Some(ref original) = self.original_termios {
            unsafe {
                if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, original) != 0 {
                    return Err(TermError::SetAttr(io::Error::last_os_error()));
                }
            }

            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = None;
            }

            self.original_termios = None;
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn disable_raw_mode(&mut self) -> Result<(), TermError> {
        Ok(())
    }
}

/// The orderly counterpart of [`EMERGENCY_RESTORE`].
fn write_restore(w: &mut impl Write) -> io::Result<()> {
    ansi::reset(w)?;
    ansi::clear_screen(w)?;
    ansi::cursor_home(w)?;
    ansi::cursor_show(w)?;
    ansi::exit_alt_screen(w)?;
    w.flush()
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.active {
            let _ = self.leave();
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── Cursor report parsing ───────────────────────────────────────

    #[test]
    fn parse_report_basic() {
        assert_eq!(
            parse_cursor_report(b"\x1b[24;80R"),
            Some(Size { cols: 80, rows: 24 })
        );
    }

    #[test]
    fn parse_report_without_terminator() {
        assert_eq!(
            parse_cursor_report(b"\x1b[50;132"),
            Some(Size { cols: 132, rows: 50 })
        );
    }

    #[test]
    fn parse_report_rejects_missing_prefix() {
        assert_eq!(parse_cursor_report(b"24;80R"), None);
        assert_eq!(parse_cursor_report(b"\x1bO24;80R"), None);
    }

    #[test]
    fn parse_report_rejects_one_number() {
        assert_eq!(parse_cursor_report(b"\x1b[24R"), None);
    }

    #[test]
    fn parse_report_rejects_garbage() {
        assert_eq!(parse_cursor_report(b"\x1b[2x;80R"), None);
        assert_eq!(parse_cursor_report(b"\x1b[;80R"), None);
        assert_eq!(parse_cursor_report(b""), None);
    }

    #[test]
    fn parse_report_rejects_zero() {
        assert_eq!(parse_cursor_report(b"\x1b[0;80R"), None);
    }

    #[test]
    fn parse_report_rejects_overflow() {
        assert_eq!(parse_cursor_report(b"\x1b[99999;80R"), None);
    }

    // ── Probe ───────────────────────────────────────────────────────

    #[test]
    fn probe_writes_request_and_parses_reply() {
        let mut reply: &[u8] = b"\x1b[40;100Rleftover";
        let mut sink = Vec::new();
        let size = probe_size(&mut reply, &mut sink).unwrap();

        assert_eq!(size, Size { cols: 100, rows: 40 });
        assert_eq!(sink, b"\x1b[999C\x1b[999B\x1b[6n");
        // Reading stops at the terminating R.
        assert_eq!(reply, b"leftover");
    }

    #[test]
    fn probe_without_reply_fails() {
        let mut reply: &[u8] = b"";
        let mut sink = Vec::new();
        assert!(matches!(
            probe_size(&mut reply, &mut sink),
            Err(TermError::SizeQuery)
        ));
    }

    #[test]
    fn probe_caps_reply_length() {
        let long = [b'9'; 64];
        let mut reply: &[u8] = &long;
        let mut sink = Vec::new();
        assert!(probe_size(&mut reply, &mut sink).is_err());
        assert_eq!(reply.len(), 64 - REPORT_MAX);
    }

    // ── Restore sequences ───────────────────────────────────────────

    #[test]
    fn emergency_restore_exits_alt_screen_last() {
        let s = std::str::from_utf8(EMERGENCY_RESTORE).unwrap();
        assert!(s.ends_with("\x1b[?1049l"));
        assert!(s.contains("\x1b[?25h"), "must show cursor");
        assert!(s.contains("\x1b[2J"), "must clear screen");
    }

    #[test]
    fn orderly_restore_matches_emergency() {
        let mut out = Vec::new();
        write_restore(&mut out).unwrap();
        assert_eq!(out, EMERGENCY_RESTORE);
    }

    // ── Terminal struct ─────────────────────────────────────────────

    #[test]
    fn terminal_new_is_inactive() {
        let term = Terminal::new(1);
        assert!(!term.is_active());
    }

    #[test]
    fn terminal_leave_without_enter() {
        let mut term = Terminal::new(1);
        term.leave().unwrap();
        assert!(!term.is_active());
    }

    #[test]
    fn terminal_drop_without_enter() {
        let term = Terminal::new(1);
        drop(term);
    }

    #[test]
    fn is_tty_does_not_panic() {
        let _ = is_tty();
    }

    // ── Raw mode needs a terminal ───────────────────────────────────

    #[cfg(unix)]
    #[test]
    fn raw_mode_on_a_regular_file_is_get_attr() {
        use std::os::fd::AsRawFd;

        let file = tempfile::tempfile().unwrap();
        let mut term = Terminal::new(1);
        let err = term.enable_raw_mode_on(file.as_raw_fd()).unwrap_err();

        let TermError::GetAttr(e) = err else {
            panic!("expected GetAttr, got {err:?}");
        };
        assert_eq!(e.raw_os_error(), Some(libc::ENOTTY));
        assert!(term.original_termios.is_none());
        assert!(!raw_mode_active());
    }

    #[test]
    fn enter_fails_when_stdin_is_not_a_tty() {
        if is_tty() {
            // Run under a terminal; covered by the regular-file case above.
            return;
        }
        let mut term = Terminal::new(1);
        assert!(matches!(term.enter(), Err(TermError::GetAttr(_))));
        assert!(!term.is_active());
    }
}
