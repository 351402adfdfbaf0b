use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ModelError;

/// Length of the "GO" prefix stripped before reading the cycle.
const PREFIX_LEN: usize = 2;
/// Length of the per-cycle sequence suffix (e.g., "023" in "GO5023").
const SUFFIX_LEN: usize = 3;

/// A K2 Guest Observer proposal identifier (e.g., "GO5023", "GO14010").
///
/// The cycle number sits between the two-character prefix and the
/// three-character sequence suffix.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Wrap a raw token, trimming surrounding whitespace.
    pub fn new(raw: &str) -> Result<Self, ModelError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ModelError::EmptyIdentifier);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the cycle number out of the identifier.
    ///
    /// `GO5023` -> 5, `GO05023` -> 5, `GO14010` -> 14.
    pub fn cycle(&self) -> Result<u32, ModelError> {
        let id = self.0.as_str();
        let malformed = |reason: &str| ModelError::ParseError {
            id: id.to_string(),
            reason: reason.to_string(),
        };

        if !id.is_ascii() {
            return Err(malformed("non-ASCII characters"));
        }
        if id.len() <= PREFIX_LEN + SUFFIX_LEN {
            return Err(malformed("too short to contain a cycle number"));
        }

        let digits = &id[PREFIX_LEN..id.len() - SUFFIX_LEN];
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed(&format!("cycle '{digits}' is not numeric")));
        }
        digits
            .parse::<u32>()
            .map_err(|e| malformed(&format!("cycle '{digits}': {e}")))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Identifier {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
