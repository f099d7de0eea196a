use model::{
    demand::RecordSet,
    zone::Zone,
};
use utility::id::Id;

use crate::projection::ProjectedZone;

pub const MIN_SCALE: f64 = 0.5;
pub const MAX_SCALE: f64 = 8.0;

pub const DEFAULT_OPACITY: f64 = 0.6;
pub const HOVER_OPACITY: f64 = 1.0;
pub const DEFAULT_STROKE_WIDTH: f64 = 0.5;
pub const SELECTED_STROKE_WIDTH: f64 = 2.0;

/// Offset of the tooltip from the pointer so it does not sit under the
/// cursor.
pub const TOOLTIP_OFFSET: (f64, f64) = (15.0, 10.0);

/// Pan/zoom state applied on top of the base projection. Maps a projected
/// point `p` to `translate + scale * p`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub translate: (f64, f64),
    pub scale: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            translate: (0.0, 0.0),
            scale: 1.0,
        }
    }
}

impl ViewTransform {
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.translate.0 += dx;
        self.translate.1 += dy;
    }

    /// Scales about `focus` (a screen point), keeping whatever is under the
    /// focus stationary. The resulting scale is clamped to
    /// [`MIN_SCALE`, `MAX_SCALE`] no matter how large `factor` is.
    pub fn zoom_by(&mut self, factor: f64, focus: (f64, f64)) {
        let clamped = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        let ratio = clamped / self.scale;
        self.translate.0 = focus.0 - ratio * (focus.0 - self.translate.0);
        self.translate.1 = focus.1 - ratio * (focus.1 - self.translate.1);
        self.scale = clamped;
    }

    pub fn apply(&self, point: (f64, f64)) -> (f64, f64) {
        (
            self.translate.0 + self.scale * point.0,
            self.translate.1 + self.scale * point.1,
        )
    }

    /// Screen point back to projected space, for hit-testing.
    pub fn invert(&self, point: (f64, f64)) -> (f64, f64) {
        (
            (point.0 - self.translate.0) / self.scale,
            (point.1 - self.translate.1) / self.scale,
        )
    }
}

/// Tooltip contents requested while a zone is hovered.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub position: (f64, f64),
    pub title: String,
    pub demand: String,
    pub borough: String,
}

/// Presentation of one zone, derived from hover and selection state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneStyle {
    pub opacity: f64,
    pub stroke_width: f64,
    pub highlighted: bool,
}

/// Owns the three orthogonal pieces of interaction state: the view
/// transform, the hover target and the selection. Gestures arrive as named
/// transitions; nothing here touches a rendering surface.
#[derive(Debug, Clone, Default)]
pub struct MapController {
    transform: ViewTransform,
    hover: Option<Id<Zone>>,
    selected: Option<Id<Zone>>,
    tooltip: Option<Tooltip>,
}

impl MapController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    pub fn hover(&self) -> Option<Id<Zone>> {
        self.hover
    }

    pub fn selected(&self) -> Option<Id<Zone>> {
        self.selected
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    /// Wheel gesture. Affects the transform only.
    pub fn zoom(&mut self, factor: f64, focus: (f64, f64)) {
        self.transform.zoom_by(factor, focus);
    }

    /// Drag gesture. Affects the transform only.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.transform.pan_by(dx, dy);
    }

    /// First zone whose rendered region contains the screen point, under the
    /// current transform.
    pub fn hit_test(
        &self,
        position: (f64, f64),
        zones: &[ProjectedZone],
    ) -> Option<Id<Zone>> {
        let point = self.transform.invert(position);
        zones
            .iter()
            .find(|zone| zone_contains(zone, point))
            .map(|zone| zone.id)
    }

    pub fn pointer_enter(
        &mut self,
        zone: Id<Zone>,
        position: (f64, f64),
        records: &RecordSet,
    ) {
        self.hover = Some(zone);
        self.tooltip = Some(build_tooltip(zone, position, records));
    }

    /// Tooltip tracks the pointer on every move while hovering.
    pub fn pointer_move(&mut self, position: (f64, f64)) {
        if let Some(tooltip) = self.tooltip.as_mut() {
            tooltip.position = tooltip_position(position);
        }
    }

    pub fn pointer_leave(&mut self) {
        self.hover = None;
        self.tooltip = None;
    }

    /// Composite transition for a raw pointer-moved event: hit-tests and
    /// performs enter/move/leave as needed. Returns the hover target.
    pub fn pointer_moved(
        &mut self,
        position: (f64, f64),
        zones: &[ProjectedZone],
        records: &RecordSet,
    ) -> Option<Id<Zone>> {
        match self.hit_test(position, zones) {
            Some(zone) if self.hover == Some(zone) => self.pointer_move(position),
            Some(zone) => self.pointer_enter(zone, position, records),
            None => self.pointer_leave(),
        }
        self.hover
    }

    /// Sets the selection unconditionally; clicking the already selected
    /// zone keeps it selected. Returns the new selection for upward
    /// dispatch.
    pub fn click_zone(&mut self, zone: Id<Zone>) -> Id<Zone> {
        self.selected = Some(zone);
        zone
    }

    /// Click at a screen position. Clicks outside every zone leave the
    /// selection untouched.
    pub fn click_at(
        &mut self,
        position: (f64, f64),
        zones: &[ProjectedZone],
    ) -> Option<Id<Zone>> {
        self.hit_test(position, zones)
            .map(|zone| self.click_zone(zone))
    }

    pub fn zone_style(&self, zone: &Id<Zone>) -> ZoneStyle {
        let hovered = self.hover.as_ref() == Some(zone);
        let selected = self.selected.as_ref() == Some(zone);
        ZoneStyle {
            opacity: if hovered {
                HOVER_OPACITY
            } else {
                DEFAULT_OPACITY
            },
            stroke_width: if selected {
                SELECTED_STROKE_WIDTH
            } else {
                DEFAULT_STROKE_WIDTH
            },
            highlighted: selected,
        }
    }
}

fn tooltip_position(pointer: (f64, f64)) -> (f64, f64) {
    (pointer.0 + TOOLTIP_OFFSET.0, pointer.1 + TOOLTIP_OFFSET.1)
}

fn build_tooltip(
    zone: Id<Zone>,
    position: (f64, f64),
    records: &RecordSet,
) -> Tooltip {
    let record = records.get(&zone);
    Tooltip {
        position: tooltip_position(position),
        title: record
            .map(|record| record.zone_name.clone())
            .unwrap_or_else(|| format!("Zone {zone}")),
        demand: record
            .map(|record| format!("{}", record.demand.round() as i64))
            .unwrap_or_else(|| "N/A".to_owned()),
        borough: record
            .and_then(|record| record.borough.clone())
            .unwrap_or_else(|| "Unknown".to_owned()),
    }
}

/// Even-odd test over every ring of the zone, so interior rings punch
/// holes.
fn zone_contains(zone: &ProjectedZone, point: (f64, f64)) -> bool {
    let mut inside = false;
    for polygon in &zone.polygons {
        if ring_contains(&polygon.exterior, point) {
            inside = !inside;
        }
        for ring in &polygon.interiors {
            if ring_contains(ring, point) {
                inside = !inside;
            }
        }
    }
    inside
}

fn ring_contains(ring: &[(f64, f64)], point: (f64, f64)) -> bool {
    let (px, py) = point;
    let mut inside = false;
    let mut j = ring.len().wrapping_sub(1);
    for i in 0..ring.len() {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];
        let crosses = (yi > py) != (yj > py)
            && px < (xj - xi) * (py - yi) / (yj - yi) + xi;
        if crosses {
            inside = !inside;
        }
        j = i;
    }
    inside
}
