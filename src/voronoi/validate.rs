use geo::{Area, BoundingRect, Polygon};
use rstar::AABB;

use crate::{
    error::PartitionError,
    geom::{index_shapes, overlap_area},
    hierarchy::CoverageZone,
};

/// Check that zones tile the boundary: no two zones overlap by more than
/// `epsilon * area(boundary)`, and their areas add up to the boundary area
/// within the same tolerance. Every zone lies inside the boundary by
/// construction, so together these imply the union equals the boundary.
pub fn check_tessellation(zones: &[CoverageZone], boundary: &Polygon<f64>, epsilon: f64) -> Result<(), PartitionError> {
    let boundary_area = boundary.unsigned_area();
    let tol = epsilon * boundary_area;

    let total = zones.iter().map(|z| z.area).sum::<f64>();
    if (total - boundary_area).abs() > tol {
        return Err(PartitionError::CoverageMismatch { zones: total, boundary: boundary_area })
    }

    let rtree = index_shapes(&zones.iter().map(|z| &z.geometry).collect::<Vec<_>>());
    for (i, zone) in zones.iter().enumerate() {
        let Some(bbox) = zone.geometry.bounding_rect() else { continue };
        let envelope = AABB::from_corners(bbox.min().into(), bbox.max().into());

        for j in rtree.locate_in_envelope_intersecting(&envelope).map(|b| b.idx()) {
            if j <= i { continue }
            let area = overlap_area(&zone.geometry, &zones[j].geometry);
            if area > tol {
                return Err(PartitionError::Overlap { a: zone.id, b: zones[j].id, area })
            }
        }
    }

    Ok(())
}
