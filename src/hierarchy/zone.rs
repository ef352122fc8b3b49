use geo::{Area, Centroid, InteriorPoint, LineString, MultiPolygon, Point};

use crate::{geom::contains_point, ids::{CameraId, ZoneId}};

/// The region of the corridor covered by one camera, or by a group of
/// cameras at a coarser resolution level.
#[derive(Clone, Debug, PartialEq)]
pub struct CoverageZone {
    pub id: ZoneId,
    /// Owning camera (smallest member id). Lookup only.
    pub camera: CameraId,
    /// Cameras whose finest zones make up this zone, sorted ascending.
    pub members: Vec<CameraId>,
    pub geometry: MultiPolygon<f64>,
    pub area: f64,
    /// Sum of member camera priorities.
    pub weight: f64,
}

impl CoverageZone {
    /// Build a finest-level zone for a single camera.
    pub(crate) fn new(id: ZoneId, camera: CameraId, priority: f64, geometry: MultiPolygon<f64>) -> Self {
        Self {
            id,
            camera,
            members: vec![camera],
            area: geometry.unsigned_area(),
            geometry,
            weight: priority,
        }
    }

    /// True for zones with no area (shadowed coincident cameras, or cameras
    /// whose cell misses the corridor).
    #[inline] pub fn is_empty(&self) -> bool { self.geometry.0.is_empty() }

    /// Closed exterior rings of the zone, one per polygon piece.
    pub fn rings(&self) -> impl Iterator<Item = &LineString<f64>> {
        self.geometry.0.iter().map(|polygon| polygon.exterior())
    }

    /// A representative point inside the zone: its centroid, or an interior
    /// point when the centroid of a non-convex zone falls outside it.
    pub fn representative_point(&self) -> Option<Point<f64>> {
        let centroid = self.geometry.centroid()?;
        if contains_point(&self.geometry, centroid) { return Some(centroid) }
        self.geometry.interior_point()
    }

    /// Check whether the zone contains a point (boundary inclusive).
    #[inline] pub fn contains(&self, point: Point<f64>) -> bool { contains_point(&self.geometry, point) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Polygon;

    fn zone(geometry: MultiPolygon<f64>) -> CoverageZone {
        CoverageZone::new(ZoneId(0), CameraId(9), 2.0, geometry)
    }

    #[test]
    fn new_zone_caches_area_and_weight() {
        let square = MultiPolygon(vec![Polygon::new(
            LineString::from(vec![(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]),
            vec![],
        )]);
        let zone = zone(square);
        assert_eq!(zone.area, 4.0);
        assert_eq!(zone.weight, 2.0);
        assert_eq!(zone.members, vec![CameraId(9)]);
        assert_eq!(zone.rings().count(), 1);
        assert_eq!(zone.representative_point(), Some(Point::new(1.0, 1.0)));
    }

    #[test]
    fn representative_point_of_horseshoe_lies_inside() {
        // U-shape whose centroid falls in the notch.
        let horseshoe = MultiPolygon(vec![Polygon::new(
            LineString::from(vec![(0.0, 0.0), (3.0, 0.0), (3.0, 3.0), (2.0, 3.0), (2.0, 1.0), (1.0, 1.0), (1.0, 3.0), (0.0, 3.0)]),
            vec![],
        )]);
        let zone = zone(horseshoe);
        let point = zone.representative_point().unwrap();
        assert!(zone.contains(point));
    }

    #[test]
    fn empty_zone() {
        let zone = zone(MultiPolygon(vec![]));
        assert!(zone.is_empty());
        assert_eq!(zone.area, 0.0);
        assert_eq!(zone.representative_point(), None);
    }
}
