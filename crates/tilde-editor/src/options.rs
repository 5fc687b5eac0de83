//! Options — startup configuration.
//!
//! Options are written the way `:set` arguments are: space-separated
//! `name=value` pairs, full names or abbreviations. The binary reads them
//! from the `TILDE_OPTS` environment variable.
//!
//! | Full name     | Abbrev | Default | Meaning                                |
//! |---------------|--------|---------|----------------------------------------|
//! | `tabstop`     | `ts`   | 8       | columns between tab stops (1–32)       |
//! | `msgtimeout`  | `mt`   | 5       | seconds a status message stays visible |
//! | `readtimeout` | `rt`   | 1       | key read timeout, tenths of a second   |

use std::time::Duration;

use crate::row::TAB_STOP;

/// Largest accepted tab stop.
const MAX_TAB_STOP: usize = 32;

/// Why an options string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionsError {
    /// The name is not an option we know.
    #[error("unknown option: {0}")]
    Unknown(String),

    /// The option needs `=value`.
    #[error("option needs a value: {0}")]
    MissingValue(String),

    /// The value is not a number in the allowed range.
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

/// Startup options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Columns between tab stops.
    pub tab_stop: usize,

    /// How long a status message stays on the message bar.
    pub message_timeout: Duration,

    /// Raw-mode read timeout in deciseconds (termios VTIME).
    pub read_timeout: u8,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tab_stop: TAB_STOP,
            message_timeout: Duration::from_secs(5),
            read_timeout: 1,
        }
    }
}

impl Options {
    /// Parse an options string on top of the defaults.
    ///
    /// An empty or all-whitespace string yields the defaults. Later
    /// assignments to the same option win.
    ///
    /// # Errors
    ///
    /// Returns the first unknown name, missing value, or bad value.
    pub fn parse(args: &str) -> Result<Self, OptionsError> {
        let mut opts = Self::default();
        for arg in args.split_whitespace() {
            opts.apply(arg)?;
        }
        Ok(opts)
    }

    /// Apply one `name=value` argument.
    fn apply(&mut self, arg: &str) -> Result<(), OptionsError> {
        let Some((name, value)) = arg.split_once('=') else {
            return Err(if is_known_option(arg) {
                OptionsError::MissingValue(arg.to_string())
            } else {
                OptionsError::Unknown(arg.to_string())
            });
        };

        let invalid = || OptionsError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        };

        match name {
            "tabstop" | "ts" => {
                self.tab_stop = parse_in_range(value, 1, MAX_TAB_STOP).ok_or_else(invalid)?;
            }
            "msgtimeout" | "mt" => {
                let secs = parse_in_range(value, 0, 3600).ok_or_else(invalid)?;
                self.message_timeout = Duration::from_secs(secs as u64);
            }
            "readtimeout" | "rt" => {
                let ds = parse_in_range(value, 1, usize::from(u8::MAX)).ok_or_else(invalid)?;
                self.read_timeout = u8::try_from(ds).map_err(|_| invalid())?;
            }
            _ => return Err(OptionsError::Unknown(name.to_string())),
        }
        Ok(())
    }
}

/// Returns `true` if `name` is a known option (full name or abbreviation).
#[must_use]
pub fn is_known_option(name: &str) -> bool {
    matches!(
        name,
        "tabstop" | "ts" | "msgtimeout" | "mt" | "readtimeout" | "rt"
    )
}

fn parse_in_range(value: &str, min: usize, max: usize) -> Option<usize> {
    value.parse().ok().filter(|n| (min..=max).contains(n))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_is_default() {
        assert_eq!(Options::parse("").unwrap(), Options::default());
        assert_eq!(Options::parse("   ").unwrap(), Options::default());
    }

    #[test]
    fn defaults() {
        let o = Options::default();
        assert_eq!(o.tab_stop, 8);
        assert_eq!(o.message_timeout, Duration::from_secs(5));
        assert_eq!(o.read_timeout, 1);
    }

    #[test]
    fn full_names() {
        let o = Options::parse("tabstop=4 msgtimeout=2 readtimeout=3").unwrap();
        assert_eq!(o.tab_stop, 4);
        assert_eq!(o.message_timeout, Duration::from_secs(2));
        assert_eq!(o.read_timeout, 3);
    }

    #[test]
    fn abbreviations() {
        let o = Options::parse("ts=2 mt=0 rt=10").unwrap();
        assert_eq!(o.tab_stop, 2);
        assert_eq!(o.message_timeout, Duration::ZERO);
        assert_eq!(o.read_timeout, 10);
    }

    #[test]
    fn last_assignment_wins() {
        assert_eq!(Options::parse("ts=2 ts=6").unwrap().tab_stop, 6);
    }

    #[test]
    fn unknown_option() {
        assert_eq!(
            Options::parse("wrap=1"),
            Err(OptionsError::Unknown("wrap".into()))
        );
        assert_eq!(
            Options::parse("nowrap"),
            Err(OptionsError::Unknown("nowrap".into()))
        );
    }

    #[test]
    fn missing_value() {
        assert_eq!(
            Options::parse("tabstop"),
            Err(OptionsError::MissingValue("tabstop".into()))
        );
    }

    #[test]
    fn out_of_range_values() {
        for bad in ["ts=0", "ts=33", "rt=0", "rt=256", "mt=-1", "ts=", "ts=four"] {
            assert!(
                matches!(Options::parse(bad), Err(OptionsError::InvalidValue { .. })),
                "{bad}"
            );
        }
    }

    #[test]
    fn error_messages() {
        let e = Options::parse("ts=x").unwrap_err();
        assert_eq!(e.to_string(), "invalid value for ts: x");
    }

    #[test]
    fn known_option_names() {
        assert!(is_known_option("ts"));
        assert!(is_known_option("readtimeout"));
        assert!(!is_known_option("number"));
    }
}
