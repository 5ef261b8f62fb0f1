//! Registry domain records.
//!
//! # Design Decisions
//! - Records mirror the backend's JSON; unknown fields are ignored
//! - Identifiers may arrive as numbers or strings, see [`EntityId`]
//! - No client-side invariants beyond the type system; validation is server-side

pub mod document;
pub mod estate;
pub mod plot;
pub mod transaction;
pub mod user;

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub use document::{Document, DocumentStatus, DocumentUpload};
pub use estate::{Estate, EstateInput};
pub use plot::{Beacon, Coordinate, Plot, PlotStatus, PlotTier};
pub use transaction::{FeeBreakdown, NewTransaction, PortfolioEntry, Transaction};
pub use user::{AuthResponse, LoginRequest, RegisterRequest, User, VerifyOtpRequest};

/// Backend identifier, numeric or textual.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Int(i64),
    Text(String),
}

impl EntityId {
    /// True when `raw` equals the stringified form of this id.
    pub fn matches(&self, raw: &str) -> bool {
        match self {
            EntityId::Int(n) => n.to_string() == raw,
            EntityId::Text(s) => s == raw,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Int(n) => write!(f, "{}", n),
            EntityId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        EntityId::Int(id)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        match id.parse::<i64>() {
            Ok(n) => EntityId::Int(n),
            Err(_) => EntityId::Text(id.to_string()),
        }
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        EntityId::from(id.as_str())
    }
}

/// Accept a string, a number or null where the backend is inconsistent.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
