//! Canonical loyalty-account model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What a loyalty balance counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceUnit {
    Miles,
    Points,
    Nights,
    Credits,
}

impl BalanceUnit {
    /// Infer the unit from a provider's free-text program category.
    ///
    /// Deterministic fallback order: "airline" → miles, "hotel" → nights,
    /// "credit" → credits, anything else → points.
    pub fn from_category(category: &str) -> Self {
        let lower = category.to_ascii_lowercase();
        if lower.contains("airline") {
            Self::Miles
        } else if lower.contains("hotel") {
            Self::Nights
        } else if lower.contains("credit") {
            Self::Credits
        } else {
            Self::Points
        }
    }
}

impl std::fmt::Display for BalanceUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Miles => "miles",
            Self::Points => "points",
            Self::Nights => "nights",
            Self::Credits => "credits",
        };
        write!(f, "{label}")
    }
}

/// One linked frequent-traveler account, mapped from the aggregator's raw
/// per-account record at read time. Never mutated or persisted by this
/// layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoyaltyAccount {
    pub provider_code: String,
    pub provider_name: String,
    pub balance: f64,
    pub unit: BalanceUnit,
    pub elite_status: Option<String>,
    pub expiration_date: Option<NaiveDate>,
    pub masked_number: Option<String>,
    pub logo_url: Option<String>,
}
