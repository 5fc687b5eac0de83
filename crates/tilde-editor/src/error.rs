//! Editor errors.
//!
//! Every variant here is fatal: the binary restores the terminal, prints the
//! message, and exits nonzero. Option parsing has its own error type in
//! [`options`](crate::options) because it is reported before the terminal is
//! touched.

use std::io;
use std::path::PathBuf;

use tilde_term::TermError;

/// A fatal editor failure.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// The file named on the command line could not be opened.
    #[error("cannot open {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file opened but reading it failed partway.
    #[error("cannot read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Terminal setup, size query, input, or output failed.
    #[error(transparent)]
    Term(#[from] TermError),
}
