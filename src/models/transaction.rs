//! Purchase transactions and the local portfolio.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::EntityId;

/// Itemised cost of a plot purchase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub base: Decimal,
    pub processing: Decimal,
    pub legal: Decimal,
    pub survey: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estate_id: Option<EntityId>,
    #[serde(default)]
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fees: Option<FeeBreakdown>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(
        default,
        alias = "timestamp",
        alias = "createdAt",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body for `POST /transactions`. Money goes out as JSON numbers.
#[derive(Debug, Clone, Serialize)]
pub struct NewTransaction {
    pub plot_id: EntityId,
    pub estate_id: EntityId,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,
    pub fees: FeeBreakdown,
    pub reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

/// A plot the user holds, recorded locally after checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    pub plot_id: EntityId,
    pub plot_label: String,
    pub estate_id: EntityId,
    pub estate_name: String,
    pub amount: Decimal,
    pub reference: String,
    pub acquired_at: DateTime<Utc>,
}
