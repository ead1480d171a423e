//! IMDb-style external identifiers.
//!
//! An [`ImdbId`] is always `tt` followed by at least seven ASCII digits.
//! Construction goes through [`ImdbId::parse`] or [`ImdbId::from_numeric`],
//! so a value of this type is valid by construction.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix shared by every IMDb title identifier.
pub const IMDB_PREFIX: &str = "tt";

/// Minimum number of digits following the prefix.
const MIN_DIGITS: usize = 7;

/// A validated IMDb title identifier such as `tt0133093`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ImdbId(String);

impl ImdbId {
    /// Parse an identifier, accepting surrounding whitespace and an
    /// upper-case prefix. Returns `None` if the text is not `tt` + 7+ digits.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.len() < IMDB_PREFIX.len() + MIN_DIGITS {
            return None;
        }
        let prefix = trimmed.get(..IMDB_PREFIX.len())?;
        let digits = &trimmed[IMDB_PREFIX.len()..];
        if !prefix.eq_ignore_ascii_case(IMDB_PREFIX) {
            return None;
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self(format!("{IMDB_PREFIX}{digits}")))
    }

    /// Build an identifier from its numeric part, zero-padding to seven digits.
    ///
    /// Returns `None` for zero, which catalogs use to mean "no identifier".
    #[must_use]
    pub fn from_numeric(n: u64) -> Option<Self> {
        if n == 0 {
            return None;
        }
        Some(Self(format!("{IMDB_PREFIX}{n:07}")))
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImdbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ImdbId {
    type Err = crate::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| crate::Error::Internal(format!("invalid IMDb id: {s}")))
    }
}

impl<'de> Deserialize<'de> for ImdbId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid IMDb id: {raw}")))
    }
}

impl AsRef<str> for ImdbId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
