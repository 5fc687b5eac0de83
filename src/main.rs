// SPDX-License-Identifier: MIT
//
// tilde — a minimal terminal text viewer.
//
// This is the binary that wires the two crates together:
//
//   tilde-term   → raw mode, size query, key decoding, frame output, event loop
//   tilde-editor → rows, cursor, viewport, screen composition
//
// The Editor implements tilde-term's App trait. Each loop iteration is:
//
//   paint → scroll viewport → compose frame → one write to stdout
//   stdin → decode one key → cursor transition → clamp
//
// Exit status: 0 on quit, 1 on a fatal error (after the terminal is
// restored), 2 on bad arguments, options, or log settings.

mod logging;

use std::env;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use tilde_editor::editor::HELP_MESSAGE;
use tilde_editor::{Editor, EditorError, Options, RowStore};
use tilde_term::event_loop::EventLoop;
use tilde_term::reader::StdinReader;
use tilde_term::terminal::Terminal;

/// Startup options, `:set` syntax.
const OPTS_ENV: &str = "TILDE_OPTS";

const USAGE: &str = "usage: tilde [FILE]\n       tilde --version";

// ─── Arguments ──────────────────────────────────────────────────────────────

/// What the command line asked for.
#[derive(Debug, PartialEq, Eq)]
enum Invocation {
    /// View a file, or an empty buffer.
    View(Option<PathBuf>),
    Version,
    Help,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
enum ArgsError {
    #[error("unknown flag: {0}")]
    UnknownFlag(String),

    #[error("only one file can be viewed")]
    TooManyFiles,
}

fn parse_args(args: impl IntoIterator<Item = OsString>) -> Result<Invocation, ArgsError> {
    let mut file = None;
    let mut only_files = false;

    for arg in args {
        if !only_files {
            match arg.to_str() {
                Some("--version" | "-V") => return Ok(Invocation::Version),
                Some("--help" | "-h") => return Ok(Invocation::Help),
                Some("--") => {
                    only_files = true;
                    continue;
                }
                Some(flag) if flag.starts_with('-') && flag.len() > 1 => {
                    return Err(ArgsError::UnknownFlag(flag.to_string()));
                }
                _ => {}
            }
        }
        if file.replace(PathBuf::from(arg)).is_some() {
            return Err(ArgsError::TooManyFiles);
        }
    }

    Ok(Invocation::View(file))
}

/// Options from `TILDE_OPTS`; unset is the defaults.
fn options_from_env() -> Result<Options, String> {
    match env::var(OPTS_ENV) {
        Ok(value) => Options::parse(&value).map_err(|e| format!("{OPTS_ENV}: {e}")),
        Err(env::VarError::NotPresent) => Ok(Options::default()),
        Err(e @ env::VarError::NotUnicode(_)) => Err(format!("{OPTS_ENV}: {e}")),
    }
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() {
    let path = match parse_args(env::args_os().skip(1)) {
        Ok(Invocation::View(path)) => path,
        Ok(Invocation::Version) => {
            println!("tilde {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        Ok(Invocation::Help) => {
            println!("{USAGE}");
            return;
        }
        Err(e) => {
            eprintln!("tilde: {e}\n{USAGE}");
            process::exit(2);
        }
    };

    let options = options_from_env().unwrap_or_else(|e| {
        eprintln!("tilde: {e}");
        process::exit(2);
    });

    let log_path = env::var_os(logging::LOG_ENV).map(PathBuf::from);
    let log_level = env::var(logging::LEVEL_ENV).ok();
    if let Err(e) = logging::init(log_path.as_deref(), log_level.as_deref()) {
        eprintln!("tilde: {e}");
        process::exit(2);
    }

    if let Err(e) = run(path.as_deref(), options) {
        tracing::error!(error = %e, "fatal");
        eprintln!("tilde: {}", error_chain(&e));
        process::exit(1);
    }
}

/// Load, enter raw mode, and run the loop until quit.
///
/// The terminal is restored when this returns, on every path.
fn run(path: Option<&Path>, options: Options) -> Result<(), EditorError> {
    let rows = match path {
        Some(p) => RowStore::open(p, options.tab_stop)?,
        None => RowStore::new(options.tab_stop),
    };

    let mut terminal = Terminal::new(options.read_timeout);
    terminal.enter()?;
    let size = terminal.size()?;
    tracing::info!(cols = size.cols, rows = size.rows, "screen size");

    let mut editor = Editor::new(rows, size, options);
    if let Some(p) = path {
        editor = editor.with_filename(p.display().to_string());
    }
    editor.set_status_message(HELP_MESSAGE, Instant::now());

    EventLoop::new(StdinReader::new(), io::stdout()).run(&mut editor)?;
    terminal.leave()?;
    Ok(())
}

/// `outer: inner: ...` for an error and its sources.
fn error_chain(e: &dyn std::error::Error) -> String {
    let mut msg = e.to_string();
    let mut source = e.source();
    while let Some(s) = source {
        msg.push_str(": ");
        msg.push_str(&s.to_string());
        source = s.source();
    }
    msg
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(list: &[&str]) -> Result<Invocation, ArgsError> {
        parse_args(list.iter().map(OsString::from))
    }

    #[test]
    fn no_args_views_empty_buffer() {
        assert_eq!(args(&[]), Ok(Invocation::View(None)));
    }

    #[test]
    fn one_file() {
        assert_eq!(
            args(&["notes.txt"]),
            Ok(Invocation::View(Some(PathBuf::from("notes.txt"))))
        );
    }

    #[test]
    fn version_and_help() {
        assert_eq!(args(&["--version"]), Ok(Invocation::Version));
        assert_eq!(args(&["-V"]), Ok(Invocation::Version));
        assert_eq!(args(&["-h"]), Ok(Invocation::Help));
    }

    #[test]
    fn dash_dash_allows_dash_names() {
        assert_eq!(
            args(&["--", "-odd"]),
            Ok(Invocation::View(Some(PathBuf::from("-odd"))))
        );
    }

    #[test]
    fn lone_dash_is_a_file_name() {
        assert_eq!(args(&["-"]), Ok(Invocation::View(Some(PathBuf::from("-")))));
    }

    #[test]
    fn rejects_unknown_flags_and_extra_files() {
        assert_eq!(args(&["-x"]), Err(ArgsError::UnknownFlag("-x".into())));
        assert_eq!(args(&["a", "b"]), Err(ArgsError::TooManyFiles));
    }

    #[test]
    fn missing_file_fails_before_raw_mode() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let e = run(Some(&missing), Options::default()).unwrap_err();
        assert!(matches!(e, EditorError::Open { .. }));
        assert!(error_chain(&e).starts_with("cannot open "));
        assert!(error_chain(&e).contains(": "));
    }
}
