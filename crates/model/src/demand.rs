use chrono::{DateTime, Local};
use indexmap::IndexMap;
use serde::Serialize;
use utility::id::Id;

use crate::zone::Zone;

/// Horizon label under which the prediction service reports the demand for
/// the requested time itself.
pub const CURRENT_HORIZON: &str = "+0min";

/// One forecast value for a single zone at a single horizon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionPoint {
    pub horizon: String,
    /// Rounded to the nearest rider; downstream display only ever shows
    /// whole numbers.
    pub demand: i64,
    #[serde(serialize_with = "utility::serde::date_time::serialize_local")]
    pub timestamp: DateTime<Local>,
}

/// Per-zone demand derived from the latest prediction response.
/// Rebuilt in full on every response and replaced wholesale, never patched.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneDemandRecord {
    pub zone_name: String,
    pub borough: Option<String>,
    /// Raw (unrounded) demand at the current horizon, 0.0 when the horizon
    /// is missing from the payload.
    pub demand: f64,
    /// Ordered by horizon as enumerated by the service, not by timestamp.
    pub series: Vec<PredictionPoint>,
}

/// The complete per-zone demand mapping from the most recent successful
/// response. Zone order follows the response; the map renderer treats zones
/// absent from this set as "unknown demand".
pub type RecordSet = IndexMap<Id<Zone>, ZoneDemandRecord>;

/// Largest current demand across the record set, `None` when empty.
pub fn max_demand(records: &RecordSet) -> Option<f64> {
    records
        .values()
        .map(|record| record.demand)
        .fold(None, |max, demand| match max {
            Some(current) if current >= demand => Some(current),
            _ => Some(demand),
        })
}

/// Coarse classification used by the zone detail panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DemandLevel {
    Low,
    Moderate,
    High,
}

impl DemandLevel {
    pub fn classify(demand: f64) -> Self {
        if demand > 100.0 {
            Self::High
        } else if demand > 50.0 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }
}
