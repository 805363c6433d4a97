//! Opaque product identifiers.
//!
//! The Catalog API assigns identifiers and may encode them either as JSON
//! numbers or as strings. [`ProductId`] keeps whichever representation the API
//! used so an identifier echoed back in a payload looks exactly like the one
//! that was received.
//!
//! Identity is the textual form: `42` and `"42"` name the same product.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A product identifier assigned by the Catalog API.
///
/// Equality, ordering and hashing go through the textual form, so an id taken
/// from a URL path or a form field matches the one from a JSON body whatever
/// its encoding. Only serialization sees the representation.
///
/// [`FromStr`] guesses [`ProductId::Numeric`] for canonical integers. Callers
/// that know the API's encoding (e.g. from a hydrated product) should keep
/// that value instead of the guess.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    /// Identifier encoded as a JSON number.
    Numeric(i64),
    /// Identifier encoded as a JSON string.
    Text(String),
}

impl ProductId {
    /// Returns `true` if the identifier has no usable content.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Numeric(_) => false,
            Self::Text(text) => text.trim().is_empty(),
        }
    }

    /// Textual form used for identity.
    #[must_use]
    pub fn key(&self) -> Cow<'_, str> {
        match self {
            Self::Numeric(id) => Cow::Owned(id.to_string()),
            Self::Text(id) => Cow::Borrowed(id),
        }
    }
}

impl PartialEq for ProductId {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for ProductId {}

impl Hash for ProductId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for ProductId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ProductId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl FromStr for ProductId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // Only canonical integers become numeric ("007" stays text).
        match trimmed.parse::<i64>() {
            Ok(id) if id.to_string() == trimmed => Ok(Self::Numeric(id)),
            _ => Ok(Self::Text(trimmed.to_string())),
        }
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self::Numeric(id)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        match id.parse() {
            Ok(parsed) => parsed,
            Err(never) => match never {},
        }
    }
}
