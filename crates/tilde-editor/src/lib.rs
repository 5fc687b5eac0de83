//! # tilde-editor — Viewer core for tilde
//!
//! This crate holds everything between the terminal plumbing and the binary:
//!
//! - **[`row`]** — `Row` (raw bytes + tab-expanded render form) and `RowStore`
//! - **[`cursor`]** — logical cursor and its motions
//! - **[`viewport`]** — scroll offsets and the minimal-motion scroll rules
//! - **[`screen`]** — frame composition: text rows, status bar, message bar
//! - **[`message`]** — the expiring status message
//! - **[`options`]** — `:set`-style startup options
//! - **[`editor`]** — `Editor`, the application the event loop drives

pub mod cursor;
pub mod editor;
pub mod error;
pub mod message;
pub mod options;
pub mod row;
pub mod screen;
pub mod viewport;

pub use editor::Editor;
pub use error::EditorError;
pub use options::{Options, OptionsError};
pub use row::RowStore;
