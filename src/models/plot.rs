//! Plots inside an estate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{string_or_number, EntityId};

/// Sale status of a plot. No transitions are enforced client-side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotStatus {
    #[default]
    Available,
    Reserved,
    Sold,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlotTier {
    #[default]
    #[serde(alias = "standard")]
    Standard,
    #[serde(alias = "premium")]
    Premium,
    #[serde(alias = "signature")]
    Signature,
}

/// Survey beacon marking a plot corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beacon {
    pub id: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plot {
    pub id: EntityId,
    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(
        rename = "blockNumber",
        alias = "block_number",
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub block_number: Option<String>,
    #[serde(default)]
    pub sqm: f64,
    #[serde(default)]
    pub status: PlotStatus,
    #[serde(default)]
    pub tier: PlotTier,
    #[serde(default)]
    pub price: Decimal,
    /// SVG path outlining the plot on the estate map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub beacons: Vec<Beacon>,
    #[serde(default)]
    pub coordinates: Vec<Coordinate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estate_id: Option<EntityId>,
}

impl Plot {
    pub fn is_available(&self) -> bool {
        self.status == PlotStatus::Available
    }

    /// Human label such as `B3/12`.
    pub fn label(&self) -> String {
        match (&self.block_number, &self.number) {
            (Some(block), Some(number)) => format!("{}/{}", block, number),
            (None, Some(number)) => number.clone(),
            _ => self.id.to_string(),
        }
    }
}
