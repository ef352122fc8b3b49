//! Per-camera coverage zones: a Voronoi tessellation clipped to the corridor.
mod cell;
mod validate;

use ahash::AHashSet;
use geo::{BoundingRect, Coord, MultiPolygon, Polygon, Rect};
use rayon::prelude::*;
use rstar::RTree;
use tracing::{debug, info};

use crate::{
    camera::Camera,
    config::PartitionConfig,
    error::PartitionError,
    geom::{clip_to_boundary, is_simple, validate_ring},
    hierarchy::{CoverageZone, ZoneId},
};

pub use validate::check_tessellation;

/// Validate a corridor boundary: a simple polygon with at least three
/// vertices, oriented counter-clockwise. Holes are kept as given.
pub fn validate_boundary(boundary: &Polygon<f64>) -> Result<Polygon<f64>, PartitionError> {
    let exterior = validate_ring(&boundary.exterior().0)?;
    is_simple(exterior.exterior()).map_err(|(i, j)| PartitionError::NonSimpleBoundary(i, j))?;

    Ok(Polygon::new(exterior.exterior().clone(), boundary.interiors().to_vec()))
}

/// Partition the corridor into one coverage zone per camera.
///
/// Zones are returned in ascending camera-id order, with `ZoneId(i)` for the
/// i-th camera. Cameras sharing a location are tie-broken by id: the smallest
/// id owns the cell and the others get an empty zone.
pub fn partition(cameras: &[Camera], boundary: &Polygon<f64>, config: &PartitionConfig) -> Result<Vec<CoverageZone>, PartitionError> {
    if cameras.is_empty() { return Err(PartitionError::NoCameras) }
    if let Some(bad) = cameras.iter().find(|c| !c.location.x().is_finite() || !c.location.y().is_finite()) {
        return Err(PartitionError::InvalidCamera(bad.id))
    }

    let boundary = validate_boundary(boundary)?;

    let mut cameras = cameras.iter().collect::<Vec<_>>();
    cameras.sort_by_key(|c| c.id);
    if let Some(pair) = cameras.windows(2).find(|pair| pair[0].id == pair[1].id) {
        return Err(PartitionError::DuplicateCamera(pair[0].id))
    }

    // Distinct locations; the first (smallest id) camera at each owns it.
    let mut seen: AHashSet<(u64, u64)> = AHashSet::new();
    let mut sites: Vec<Coord<f64>> = Vec::new();
    let site_of = cameras.iter()
        .map(|camera| {
            let c = camera.coord();
            let key = ((c.x + 0.0).to_bits(), (c.y + 0.0).to_bits()); // +0.0 folds -0.0 into 0.0
            if !seen.insert(key) { return None }
            sites.push(c);
            Some(sites.len() - 1)
        })
        .collect::<Vec<_>>();

    debug!(cameras = cameras.len(), sites = sites.len(), "[partition] computing cells");

    let geometries: Vec<MultiPolygon<f64>> = if sites.len() == 1 {
        vec![MultiPolygon(vec![boundary.clone()])]
    } else {
        let frame = padded_frame(&boundary);
        let rtree = RTree::bulk_load(
            sites.iter().enumerate().map(|(i, c)| cell::Site::new([c.x, c.y], i)).collect()
        );

        sites.par_iter().enumerate()
            .map(|(i, &site)| clip_to_boundary(&cell::voronoi_cell(i, &rtree, site, &frame), &boundary))
            .collect()
    };

    let mut geometries = geometries.into_iter().map(Some).collect::<Vec<_>>();
    let zones = cameras.iter().zip(&site_of).enumerate()
        .map(|(i, (camera, site))| {
            let geometry = site.and_then(|s| geometries[s].take()).unwrap_or(MultiPolygon(vec![]));
            CoverageZone::new(ZoneId(i as u32), camera.id, camera.priority, geometry)
        })
        .collect::<Vec<_>>();

    if config.check {
        check_tessellation(&zones, &boundary, config.epsilon)?;
    }

    info!(zones = zones.len(), shadowed = cameras.len() - sites.len(), "[partition] built");
    Ok(zones)
}

/// The boundary's bounding rectangle, padded so that every cell is closed.
fn padded_frame(boundary: &Polygon<f64>) -> Rect<f64> {
    let bbox = boundary.bounding_rect().unwrap_or(Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 0.0, y: 0.0 }));
    let pad = bbox.width().max(bbox.height()) * 0.01 + 1.0;
    Rect::new(
        Coord { x: bbox.min().x - pad, y: bbox.min().y - pad },
        Coord { x: bbox.max().x + pad, y: bbox.max().y + pad },
    )
}
