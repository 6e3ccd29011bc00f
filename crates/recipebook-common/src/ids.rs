//! Identifier types.
//!
//! Catalog and recipe ids are opaque strings owned by the backend. Line ids
//! are minted locally and only unique within one draft.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Produce `len` random lowercase base36 characters.
///
/// Randomness comes from a v4 UUID; one UUID yields up to 24 characters.
pub fn random_base36(len: usize) -> String {
    let mut out = String::with_capacity(len);
    let mut bits = uuid::Uuid::new_v4().as_u128();
    for _ in 0..len {
        if bits == 0 {
            bits = uuid::Uuid::new_v4().as_u128();
        }
        out.push(BASE36[(bits % 36) as usize] as char);
        bits /= 36;
    }
    out
}

/// Locally generated identifier of an ingredient or step line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(String);

impl LineId {
    /// Mint a fresh id of the form `id-<millis>-<9 base36 chars>`.
    pub fn generate() -> Self {
        Self(format!(
            "id-{}-{}",
            Utc::now().timestamp_millis(),
            random_base36(9)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LineId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for LineId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of an ingredient or brand in the backend catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogId(String);

impl CatalogId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key under which a draft snapshot is stored.
///
/// Edit sessions use the recipe's backend id; create sessions mint a
/// temporary id from the wall clock once per session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DraftIdentity {
    Recipe(String),
    Temp(i64),
}

impl DraftIdentity {
    pub fn mint_temp() -> Self {
        DraftIdentity::Temp(Utc::now().timestamp_millis())
    }
}

impl fmt::Display for DraftIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftIdentity::Recipe(id) => write!(f, "{}", id),
            DraftIdentity::Temp(millis) => write!(f, "temp-{}", millis),
        }
    }
}

impl std::str::FromStr for DraftIdentity {
    type Err = std::convert::Infallible;

    /// `temp-<millis>` parses as a temporary identity, anything else as a
    /// recipe id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(millis) = s.strip_prefix("temp-").and_then(|m| m.parse().ok()) {
            return Ok(DraftIdentity::Temp(millis));
        }
        Ok(DraftIdentity::Recipe(s.to_string()))
    }
}
