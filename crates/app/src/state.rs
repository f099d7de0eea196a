use model::{
    demand::{DemandLevel, RecordSet, ZoneDemandRecord},
    zone::{Location, Zone},
};
use render::{color::DemandColorScale, interaction::MapController};
use utility::id::Id;

/// All mutable state of the running application, owned in one place and
/// mutated only through the methods below. Everything runs on one thread;
/// the only hazard is an async prediction response arriving after a newer
/// request was issued, which the generation check below guards against.
#[derive(Default)]
pub struct AppState {
    records: Option<RecordSet>,
    pub controller: MapController,
    user_location: Option<Location>,
    issued_requests: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Option<&RecordSet> {
        self.records.as_ref()
    }

    pub fn user_location(&self) -> Option<Location> {
        self.user_location
    }

    pub fn set_user_location(&mut self, location: Location) {
        self.user_location = Some(location);
    }

    /// Registers a new prediction request and returns its generation tag.
    /// The response handler must present the tag to [`apply_records`];
    /// responses of superseded requests are dropped.
    ///
    /// [`apply_records`]: AppState::apply_records
    pub fn begin_request(&mut self) -> u64 {
        self.issued_requests += 1;
        self.issued_requests
    }

    /// Replaces the record set wholesale. Returns whether the response was
    /// applied; a stale generation leaves the current records untouched.
    pub fn apply_records(&mut self, generation: u64, records: RecordSet) -> bool {
        if generation != self.issued_requests {
            log::warn!(
                "Discarding stale prediction response ({generation} superseded by {}).",
                self.issued_requests
            );
            return false;
        }
        self.records = Some(records);
        true
    }

    /// Current demand of a zone, `None` when it is absent from the record
    /// set (the "unknown demand" domain value).
    pub fn zone_demand(&self, zone: &Id<Zone>) -> Option<f64> {
        self.records
            .as_ref()
            .and_then(|records| records.get(zone))
            .map(|record| record.demand)
    }

    /// Fresh scale for the current record set. Recomputed per call since
    /// the maximum changes with every response.
    pub fn color_scale(&self) -> DemandColorScale {
        match &self.records {
            Some(records) => DemandColorScale::from_records(records),
            None => DemandColorScale::new(1.0),
        }
    }

    /// Selection output for the detail panel.
    pub fn selected_record(&self) -> Option<(Id<Zone>, &ZoneDemandRecord)> {
        let selected = self.controller.selected()?;
        let record = self.records.as_ref()?.get(&selected)?;
        Some((selected, record))
    }

    pub fn selected_demand_level(&self) -> Option<DemandLevel> {
        self.selected_record()
            .map(|(_, record)| DemandLevel::classify(record.demand))
    }
}
