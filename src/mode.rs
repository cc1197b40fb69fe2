//! Open-mode parsing
//!
//! Modes follow the conventional `fopen`-style grammar: exactly one of
//! `r`, `w`, `a`, `x`, optionally followed by `+` (update) and one of `b`
//! (binary) or `t` (text). Facets are derived from the validated string.

use crate::error::{FsError, Result};
use std::fmt;
use std::str::FromStr;

const VALID_CHARS: &str = "rwxab+t";

/// A validated open mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenMode {
    mode: String,
}

impl OpenMode {
    /// Parse and validate a mode string
    ///
    /// # Errors
    ///
    /// Returns [`FsError::InvalidMode`] if the string is empty, contains an
    /// unknown character, repeats a character, does not name exactly one of
    /// `r`/`w`/`a`/`x`, or mixes `b` and `t`.
    pub fn parse(mode: &str) -> Result<Self> {
        let invalid = |reason| FsError::InvalidMode {
            mode: mode.to_string(),
            reason,
        };

        if mode.is_empty() {
            return Err(invalid("mode must not be empty"));
        }
        if !mode.chars().all(|c| VALID_CHARS.contains(c)) {
            return Err(invalid("mode contains an invalid character"));
        }
        let mut seen = String::with_capacity(mode.len());
        for c in mode.chars() {
            if seen.contains(c) {
                return Err(invalid("mode repeats a character"));
            }
            seen.push(c);
        }
        if !mode.starts_with(['r', 'w', 'a', 'x']) {
            return Err(invalid("mode must start with 'r', 'w', 'x', or 'a'"));
        }
        if mode.chars().filter(|c| "rwax".contains(*c)).count() != 1 {
            return Err(invalid("mode must contain exactly one of 'r', 'w', 'x', 'a'"));
        }
        if mode.contains('t') && mode.contains('b') {
            return Err(invalid("mode can't be binary ('b') and text ('t')"));
        }

        Ok(Self {
            mode: mode.to_string(),
        })
    }

    /// Check the mode is usable for a binary file handle
    ///
    /// # Errors
    ///
    /// Returns [`FsError::InvalidMode`] if the mode requests text mode.
    pub fn validate_bin(&self) -> Result<()> {
        if self.text() {
            return Err(FsError::InvalidMode {
                mode: self.mode.clone(),
                reason: "mode must be binary",
            });
        }
        Ok(())
    }

    /// The mode string as given
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.mode
    }

    #[must_use]
    pub fn reading(&self) -> bool {
        self.mode.contains('r') || self.mode.contains('+')
    }

    #[must_use]
    pub fn writing(&self) -> bool {
        self.mode.contains(['w', 'a', 'x', '+'])
    }

    #[must_use]
    pub fn appending(&self) -> bool {
        self.mode.contains('a')
    }

    /// Existing content is discarded on open
    #[must_use]
    pub fn truncate(&self) -> bool {
        self.mode.contains(['w', 'x'])
    }

    /// Opening fails if the file already exists
    #[must_use]
    pub fn exclusive(&self) -> bool {
        self.mode.contains('x')
    }

    /// Opening may create the file
    #[must_use]
    pub fn create(&self) -> bool {
        self.mode.contains(['w', 'a', 'x'])
    }

    /// Explicit text mode (`t`)
    #[must_use]
    pub fn text(&self) -> bool {
        self.mode.contains('t')
    }

    /// Opening fails if the file does not exist (`r` and `r+`)
    #[must_use]
    pub fn requires_existing(&self) -> bool {
        self.reading() && !self.create()
    }
}

impl FromStr for OpenMode {
    type Err = FsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.mode)
    }
}
