use geo_types::MultiPolygon;
use utility::{
    geo::haversine_distance,
    id::{HasId, Id},
};

use crate::WithDistance;

/// A point on the map, e.g. the geocoded pickup address.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// A fixed geographic region of the city with a stable integer identifier.
/// Loaded once from the static geometry source and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Zone {
    pub name: String,
    pub borough: Option<String>,
    pub geometry: MultiPolygon<f64>,
}

impl HasId for Zone {
    type IdType = i64;
}

impl Zone {
    /// Vertex average over all exterior rings, as (longitude, latitude).
    /// Good enough to report distances; not an exact area centroid.
    pub fn centroid(&self) -> Option<(f64, f64)> {
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut count = 0usize;
        for polygon in &self.geometry.0 {
            for coord in &polygon.exterior().0 {
                sum_x += coord.x;
                sum_y += coord.y;
                count += 1;
            }
        }
        if count == 0 {
            return None;
        }
        Some((sum_x / count as f64, sum_y / count as f64))
    }

    pub fn with_distance_to(
        self,
        latitude: f64,
        longitude: f64,
    ) -> Option<WithDistance<Zone>> {
        let (zone_longitude, zone_latitude) = self.centroid()?;
        let distance =
            haversine_distance(latitude, longitude, zone_latitude, zone_longitude);
        Some(WithDistance::new(distance, self))
    }

    pub fn display_name(&self, id: &Id<Zone>) -> String {
        if self.name.is_empty() {
            format!("Zone {}", id)
        } else {
            self.name.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use geo_types::{polygon, MultiPolygon};

    use super::*;

    fn unit_square_zone() -> Zone {
        Zone {
            name: "Test Square".to_owned(),
            borough: Some("Manhattan".to_owned()),
            geometry: MultiPolygon(vec![polygon![
                (x: 0.0, y: 0.0),
                (x: 1.0, y: 0.0),
                (x: 1.0, y: 1.0),
                (x: 0.0, y: 1.0),
                (x: 0.0, y: 0.0),
            ]]),
        }
    }

    #[test]
    fn centroid_of_square_is_near_center() {
        let (x, y) = unit_square_zone().centroid().unwrap();
        // closed ring repeats the first vertex, so the average is skewed
        // slightly towards it
        assert!(x > 0.3 && x < 0.7);
        assert!(y > 0.3 && y < 0.7);
    }

    #[test]
    fn empty_geometry_has_no_centroid() {
        let zone = Zone {
            name: "Empty".to_owned(),
            borough: None,
            geometry: MultiPolygon(vec![]),
        };
        assert!(zone.centroid().is_none());
        assert!(zone.with_distance_to(40.0, -73.0).is_none());
    }

    #[test]
    fn display_name_falls_back_to_id() {
        let mut zone = unit_square_zone();
        zone.name = String::new();
        assert_eq!(zone.display_name(&Id::new(42)), "Zone 42");
    }
}
