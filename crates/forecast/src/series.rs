use model::demand::{PredictionPoint, RecordSet, ZoneDemandRecord, CURRENT_HORIZON};

use crate::wire::PredictionResponse;

/// Turns the raw prediction payload into the per-zone record set.
///
/// The series keeps the service's horizon enumeration order and carries
/// demand rounded to the nearest rider. The current demand is the raw value
/// at the `+0min` horizon; a zone whose horizon map is empty (partial data)
/// still yields a record with demand 0 and an empty series, so it renders
/// as "zero demand" rather than "unknown".
pub fn build_records(response: &PredictionResponse) -> RecordSet {
    let mut records = RecordSet::with_capacity(response.nearest_zones.len());
    for zone in &response.nearest_zones {
        let series = zone
            .predictions
            .iter()
            .map(|(horizon, prediction)| PredictionPoint {
                horizon: horizon.clone(),
                demand: prediction.predicted_demand.round() as i64,
                timestamp: prediction.datetime,
            })
            .collect();
        let demand = zone
            .predictions
            .get(CURRENT_HORIZON)
            .map(|prediction| prediction.predicted_demand)
            .unwrap_or(0.0);
        records.insert(
            zone.zone_id,
            ZoneDemandRecord {
                zone_name: zone.zone_name.clone(),
                borough: zone.borough.clone(),
                demand,
                series,
            },
        );
    }
    records
}
