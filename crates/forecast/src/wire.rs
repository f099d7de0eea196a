use chrono::{DateTime, Local};
use indexmap::IndexMap;
use model::zone::{Location, Zone};
use serde::{Deserialize, Serialize};
use utility::id::Id;

/// Request body of the prediction service.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionRequest {
    pub latitude: f64,
    pub longitude: f64,
    /// `YYYY-MM-DD HH:MM:SS`, always today's date in the caller's timezone.
    pub datetime_str: String,
}

impl PredictionRequest {
    pub fn new(location: Location, datetime_str: String) -> Self {
        Self {
            latitude: location.latitude,
            longitude: location.longitude,
            datetime_str,
        }
    }
}

/// One forecast value as reported on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPrediction {
    pub predicted_demand: f64,
    #[serde(deserialize_with = "utility::serde::date_time::deserialize_local")]
    pub datetime: DateTime<Local>,
}

/// One zone entry of the prediction response.
#[derive(Debug, Clone, Deserialize)]
pub struct NearestZone {
    pub zone_id: Id<Zone>,
    pub zone_name: String,
    pub borough: Option<String>,
    pub distance_meters: Option<f64>,
    /// Horizon label to forecast, in the service's enumeration order. An
    /// IndexMap keeps that order; it is meaningful downstream (chart bars
    /// follow it) and must not be sorted away.
    #[serde(default)]
    pub predictions: IndexMap<String, RawPrediction>,
}

/// Raw payload of a successful prediction call.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionResponse {
    pub nearest_zones: Vec<NearestZone>,
}
