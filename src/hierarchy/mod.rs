//! Multi-resolution zone hierarchy built by greedy merging of adjacent zones.
mod merge;
mod zone;

use ahash::AHashMap;
use geo::Point;
use rstar::AABB;
use tracing::{debug, info, warn};

use crate::{
    camera::Camera,
    config::HierarchyConfig,
    error::PartitionError,
    geom::index_shapes,
};

pub use crate::ids::ZoneId;
pub use zone::CoverageZone;

/// Shortest border that makes two zones adjacent, relative to the diagonal
/// of the zones' extent.
const ADJACENCY_TOLERANCE: f64 = 1e-6;

/// The zones of one resolution level.
#[derive(Clone, Debug)]
pub struct ZoneLayer {
    zones: Vec<CoverageZone>,
    parents: Vec<ZoneId>, // Zone of the next coarser level containing each zone (empty at the coarsest level)
}

impl ZoneLayer {
    pub(crate) fn new(zones: Vec<CoverageZone>) -> Self {
        Self { zones, parents: Vec::new() }
    }

    /// Get the number of zones in this level (including empty zones).
    #[inline] pub fn len(&self) -> usize { self.zones.len() }

    /// Check if the level has no zones.
    #[inline] pub fn is_empty(&self) -> bool { self.zones.is_empty() }

    /// Get the zones of this level, indexed by `ZoneId`.
    #[inline] pub fn zones(&self) -> &[CoverageZone] { &self.zones }

    /// Get a zone by id.
    #[inline] pub fn zone(&self, id: ZoneId) -> Option<&CoverageZone> { self.zones.get(id.index()) }

    /// Get the zone of the next coarser level containing `id`.
    #[inline] pub fn parent(&self, id: ZoneId) -> Option<ZoneId> { self.parents.get(id.index()).copied() }

    /// Number of zones with non-zero area.
    pub fn num_nonempty(&self) -> usize { self.zones.iter().filter(|z| !z.is_empty()).count() }
}

/// Coverage zones at every resolution level; level 0 is the finest.
#[derive(Clone, Debug)]
pub struct ZoneHierarchy {
    layers: Vec<ZoneLayer>,
}

impl ZoneHierarchy {
    /// Build the hierarchy from the finest partition by repeated greedy merging.
    ///
    /// When more levels are requested than can be formed (a single zone
    /// remains, or no admissible pair exists), the hierarchy stops at the
    /// coarsest level reached.
    pub fn build(finest: Vec<CoverageZone>, cameras: &[Camera], config: &HierarchyConfig) -> Result<Self, PartitionError> {
        let sites: AHashMap<_, Point<f64>> = cameras.iter().map(|c| (c.id, c.location)).collect();

        let mut layers = vec![ZoneLayer::new(finest)];
        let tol = ADJACENCY_TOLERANCE * merge::extent(&layers[0]);

        for level in 1..config.levels.max(1) {
            let finer = &layers[level - 1];
            let count = finer.num_nonempty();
            if count <= 1 {
                warn!(requested = config.levels, built = level, "[hierarchy] single zone left, capping levels");
                break
            }

            let target = config.targets.as_ref()
                .and_then(|targets| targets.get(level - 1).copied())
                .unwrap_or(count.div_ceil(2))
                .max(1);

            let pairs = merge::adjacent_pairs(finer, &config.strategy, &sites, tol);
            debug!(level, zones = count, target, pairs = pairs.len(), "[hierarchy] coarsening");

            let Some((coarse, parents)) = merge::coarsen(finer, target, &pairs, &sites) else {
                warn!(requested = config.levels, built = level, "[hierarchy] no admissible merge, capping levels");
                break
            };

            let coarse = ZoneLayer::new(coarse);
            check_nesting(level - 1, finer, &coarse, &parents)?;

            layers[level - 1].parents = parents;
            layers.push(coarse);
        }

        info!(levels = layers.len(), zones = ?layers.iter().map(ZoneLayer::len).collect::<Vec<_>>(), "[hierarchy] built");
        Ok(Self { layers })
    }

    /// A hierarchy with only the finest level.
    pub fn single(finest: Vec<CoverageZone>) -> Self {
        Self { layers: vec![ZoneLayer::new(finest)] }
    }

    /// Get the number of resolution levels.
    #[inline] pub fn num_levels(&self) -> usize { self.layers.len() }

    /// Get a level by index (0 = finest).
    #[inline] pub fn layer(&self, level: usize) -> Option<&ZoneLayer> { self.layers.get(level) }

    /// Get all levels, finest first.
    #[inline] pub fn layers(&self) -> &[ZoneLayer] { &self.layers }

    /// Get the finest level.
    #[inline] pub fn finest(&self) -> &ZoneLayer { &self.layers[0] }

    /// Map a finest-level zone to the zone containing it at `level`.
    pub fn ancestor(&self, zone: ZoneId, level: usize) -> Option<ZoneId> {
        (0..level).try_fold(zone, |zone, l| self.layers.get(l)?.parent(zone))
    }
}

/// Verify that every non-empty finer zone's representative point lies in
/// exactly one coarser zone, and that it is the recorded parent.
fn check_nesting(level: usize, finer: &ZoneLayer, coarse: &ZoneLayer, parents: &[ZoneId]) -> Result<(), PartitionError> {
    let rtree = index_shapes(&coarse.zones().iter().map(|z| &z.geometry).collect::<Vec<_>>());

    for zone in finer.zones().iter().filter(|z| !z.is_empty()) {
        let Some(point) = zone.representative_point() else { continue };

        let matches = rtree.locate_in_envelope_intersecting(&AABB::from_point([point.x(), point.y()]))
            .map(|b| b.idx())
            .filter(|&i| coarse.zones()[i].contains(point))
            .collect::<Vec<_>>();

        if matches.len() != 1 || ZoneId(matches[0] as u32) != parents[zone.id.index()] {
            return Err(PartitionError::NestingViolated { level, zone: zone.id, matches: matches.len() })
        }
    }

    Ok(())
}
