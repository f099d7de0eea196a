use std::error;
use std::fmt;
use std::fmt::Write as _;

use geo_types::MultiPolygon;
use model::zone::Zone;
use utility::{
    geo::{mercator_y, to_radians},
    id::Id,
};

/// Geographic center the map is fixed on (longitude, latitude).
pub const CITY_CENTER: (f64, f64) = (-73.9851, 40.7589);

/// Base Mercator scale for the city view before any zoom gesture.
pub const BASE_SCALE: f64 = 60000.0;

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// Projecting into a zero-sized viewport is undefined; callers must wait
    /// until layout has produced a real size.
    EmptyViewport { width: f64, height: f64 },
}

impl error::Error for ProjectionError {}

impl fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProjectionError::EmptyViewport { width, height } => {
                write!(f, "viewport has no area ({width}x{height})")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Spherical-Mercator mapping from geographic coordinates to viewport
/// pixels. Pure: the same inputs always yield the same pixel, regardless of
/// any interaction state.
#[derive(Debug, Clone)]
pub struct Projector {
    center: (f64, f64),
    scale: f64,
    viewport: Viewport,
}

impl Projector {
    pub fn new(
        center: (f64, f64),
        scale: f64,
        viewport: Viewport,
    ) -> Result<Self, ProjectionError> {
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return Err(ProjectionError::EmptyViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        Ok(Self {
            center,
            scale,
            viewport,
        })
    }

    /// Projector for the one supported city view.
    pub fn city(viewport: Viewport) -> Result<Self, ProjectionError> {
        Self::new(CITY_CENTER, BASE_SCALE, viewport)
    }

    /// Maps (longitude, latitude) to a viewport pixel. East is right,
    /// north is up in geographic space; screen y grows downward.
    pub fn project(&self, longitude: f64, latitude: f64) -> (f64, f64) {
        let x = self.viewport.width / 2.0
            + self.scale * (to_radians(longitude) - to_radians(self.center.0));
        let y = self.viewport.height / 2.0
            - self.scale * (mercator_y(latitude) - mercator_y(self.center.1));
        (x, y)
    }

    /// Projects every vertex of the geometry, preserving ring order and
    /// winding.
    pub fn project_geometry(
        &self,
        geometry: &MultiPolygon<f64>,
    ) -> Vec<ProjectedPolygon> {
        geometry
            .0
            .iter()
            .map(|polygon| ProjectedPolygon {
                exterior: self.project_ring(&polygon.exterior().0),
                interiors: polygon
                    .interiors()
                    .iter()
                    .map(|ring| self.project_ring(&ring.0))
                    .collect(),
            })
            .collect()
    }

    pub fn project_zone(&self, id: Id<Zone>, zone: &Zone) -> ProjectedZone {
        ProjectedZone {
            id,
            polygons: self.project_geometry(&zone.geometry),
        }
    }

    fn project_ring(&self, ring: &[geo_types::Coord<f64>]) -> Vec<(f64, f64)> {
        ring.iter()
            .map(|coord| self.project(coord.x, coord.y))
            .collect()
    }
}

/// One polygon of a zone in pixel space. Interior rings are holes.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedPolygon {
    pub exterior: Vec<(f64, f64)>,
    pub interiors: Vec<Vec<(f64, f64)>>,
}

impl ProjectedPolygon {
    /// SVG path data for this polygon; holes rely on the even-odd fill rule.
    pub fn path_data(&self) -> String {
        let mut path = String::new();
        write_ring(&mut path, &self.exterior);
        for ring in &self.interiors {
            write_ring(&mut path, ring);
        }
        path
    }
}

fn write_ring(path: &mut String, ring: &[(f64, f64)]) {
    for (index, (x, y)) in ring.iter().enumerate() {
        let command = if index == 0 { 'M' } else { 'L' };
        let _ = write!(path, "{command}{x:.2},{y:.2}");
    }
    if !ring.is_empty() {
        path.push('Z');
    }
}

/// A zone's complete rendered outline in pixel space.
#[derive(Debug, Clone)]
pub struct ProjectedZone {
    pub id: Id<Zone>,
    pub polygons: Vec<ProjectedPolygon>,
}

#[cfg(test)]
mod tests {
    use geo_types::polygon;

    use super::*;

    fn projector() -> Projector {
        Projector::city(Viewport::new(800.0, 600.0)).unwrap()
    }

    #[test]
    fn zero_viewport_is_rejected() {
        let result = Projector::city(Viewport::new(0.0, 600.0));
        assert!(matches!(
            result,
            Err(ProjectionError::EmptyViewport { .. })
        ));
    }

    #[test]
    fn center_projects_to_viewport_center() {
        let (x, y) = projector().project(CITY_CENTER.0, CITY_CENTER.1);
        assert!((x - 400.0).abs() < 1e-9);
        assert!((y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn east_is_right_and_north_is_up() {
        let projector = projector();
        let center = projector.project(CITY_CENTER.0, CITY_CENTER.1);
        let east = projector.project(CITY_CENTER.0 + 0.01, CITY_CENTER.1);
        let north = projector.project(CITY_CENTER.0, CITY_CENTER.1 + 0.01);
        assert!(east.0 > center.0);
        assert!(north.1 < center.1);
    }

    #[test]
    fn projection_is_deterministic() {
        let a = projector().project(-73.95, 40.75);
        let b = projector().project(-73.95, 40.75);
        assert_eq!(a, b);
    }

    #[test]
    fn ring_order_is_preserved() {
        let geometry = geo_types::MultiPolygon(vec![polygon![
            (x: -73.99, y: 40.75),
            (x: -73.98, y: 40.75),
            (x: -73.98, y: 40.76),
            (x: -73.99, y: 40.75),
        ]]);
        let projector = projector();
        let projected = projector.project_geometry(&geometry);
        assert_eq!(projected.len(), 1);
        let exterior = &projected[0].exterior;
        assert_eq!(exterior.len(), 4);
        assert_eq!(exterior[0], projector.project(-73.99, 40.75));
        assert_eq!(exterior[1], projector.project(-73.98, 40.75));
        assert_eq!(exterior[3], exterior[0]);
    }

    #[test]
    fn path_data_starts_with_move_and_closes() {
        let geometry = geo_types::MultiPolygon(vec![polygon![
            (x: -73.99, y: 40.75),
            (x: -73.98, y: 40.75),
            (x: -73.98, y: 40.76),
        ]]);
        let projected = projector().project_geometry(&geometry);
        let path = projected[0].path_data();
        assert!(path.starts_with('M'));
        assert!(path.ends_with('Z'));
        // the ring is closed by the geometry type, so 3 vertices become 4
        assert_eq!(path.matches('L').count(), 3);
    }
}
