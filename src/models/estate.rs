//! Estates (registered land developments).

use serde::{Deserialize, Serialize};

use super::{string_or_number, EntityId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estate {
    pub id: EntityId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(
        default,
        alias = "plotSize",
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub plot_size: Option<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Estate {
    /// True when `key` is this estate's slug or its stringified id.
    pub fn matches_key(&self, key: &str) -> bool {
        self.slug == key || self.id.matches(key)
    }
}

/// Payload for admin create/update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EstateInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_size: Option<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
