//! Status message — the one line of feedback under the status bar.
//!
//! A message is replaced wholesale by the next one. It shows until its
//! timeout runs out, measured from when it was set.

use std::time::{Duration, Instant};

/// Text for the message bar plus the moment it was set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    text: String,
    set_at: Instant,
}

impl StatusMessage {
    #[must_use]
    pub fn new(text: impl Into<String>, now: Instant) -> Self {
        Self {
            text: text.into(),
            set_at: now,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the message is still inside its display window at `now`.
    ///
    /// A clock reading earlier than `set_at` counts as no time elapsed.
    #[must_use]
    pub fn is_visible(&self, now: Instant, timeout: Duration) -> bool {
        now.saturating_duration_since(self.set_at) < timeout
    }
}
