use std::{cmp::Ordering, collections::BinaryHeap};

use ahash::AHashMap;
use geo::{BoundingRect, LineString, MultiPolygon, Point};
use rstar::{primitives::GeomWithData, RTree, AABB};

use crate::{
    config::MergeStrategy,
    geom::{contains_point, distance, index_shapes, shared_boundary_length, union},
    hierarchy::{CoverageZone, ZoneLayer},
    ids::{CameraId, ZoneId},
};

/// Adjacent zone pairs `(i, j)` with `i < j` and the border length they share.
pub(super) fn adjacent_pairs(
    layer: &ZoneLayer,
    strategy: &MergeStrategy,
    sites: &AHashMap<CameraId, Point<f64>>,
    tol: f64,
) -> Vec<(usize, usize, f64)> {
    let zones = layer.zones();
    let mut pairs = Vec::new();

    match strategy {
        MergeStrategy::SharedBoundary { min_shared_length } => {
            let rtree = index_shapes(&zones.iter().map(|z| &z.geometry).collect::<Vec<_>>());
            for (i, zone) in zones.iter().enumerate() {
                let Some(bbox) = zone.geometry.bounding_rect() else { continue };
                let envelope = AABB::from_corners(
                    [bbox.min().x - tol, bbox.min().y - tol],
                    [bbox.max().x + tol, bbox.max().y + tol],
                );
                for j in rtree.locate_in_envelope_intersecting(&envelope).map(|b| b.idx()) {
                    if j <= i { continue }
                    let shared = shared_boundary_length(&zone.geometry, &zones[j].geometry, tol);
                    if shared > *min_shared_length { pairs.push((i, j, shared)) }
                }
            }
        }
        MergeStrategy::NearestCameras { k } => {
            let points = zones.iter().enumerate()
                .filter(|(_, zone)| !zone.is_empty())
                .filter_map(|(i, zone)| sites.get(&zone.camera).map(|p| GeomWithData::new([p.x(), p.y()], i)))
                .collect::<Vec<_>>();
            let rtree = RTree::bulk_load(points.clone());

            let mut seen = AHashMap::new();
            for point in &points {
                for neighbor in rtree.nearest_neighbor_iter(point.geom())
                    .filter(|n| n.data != point.data)
                    .take(*k)
                {
                    let (i, j) = (point.data.min(neighbor.data), point.data.max(neighbor.data));
                    seen.entry((i, j)).or_insert_with(|| {
                        shared_boundary_length(&zones[i].geometry, &zones[j].geometry, tol)
                    });
                }
            }
            pairs.extend(seen.into_iter().map(|((i, j), shared)| (i, j, shared)));
            pairs.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        }
    }

    pairs
}

/// A group of finer zones being merged into one coarser zone.
#[derive(Debug)]
struct Group {
    members: Vec<usize>,
    area: f64,
    alive: bool,
    version: u32,
    neighbors: AHashMap<usize, f64>, // neighbor group -> shared border length
}

/// Candidate merge in the min-heap; stale once either group's version moves on.
#[derive(Copy, Clone, Eq, PartialEq)]
struct Entry {
    area_bits: u64, // f64::to_bits() is monotone for non-negative values
    a: usize,
    b: usize,
    va: u32,
    vb: u32,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so the smallest combined area (then smallest ids) pops first.
        other.area_bits.cmp(&self.area_bits)
            .then_with(|| other.a.cmp(&self.a))
            .then_with(|| other.b.cmp(&self.b))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

/// Greedily merge adjacent zones of `layer`, smallest combined area first,
/// until at most `target` non-empty zones remain or no admissible pair is left.
///
/// Returns the coarser zones and, for every zone of `layer`, the id of the
/// coarser zone containing it. `None` if no merge was possible.
pub(super) fn coarsen(
    layer: &ZoneLayer,
    target: usize,
    pairs: &[(usize, usize, f64)],
    sites: &AHashMap<CameraId, Point<f64>>,
) -> Option<(Vec<CoverageZone>, Vec<ZoneId>)> {
    let zones = layer.zones();
    let mut groups = zones.iter().enumerate()
        .map(|(i, zone)| Group {
            members: vec![i],
            area: zone.area,
            alive: !zone.is_empty(),
            version: 0,
            neighbors: AHashMap::new(),
        })
        .collect::<Vec<_>>();

    for &(i, j, shared) in pairs {
        if !groups[i].alive || !groups[j].alive { continue }
        groups[i].neighbors.insert(j, shared);
        groups[j].neighbors.insert(i, shared);
    }

    let entry = |groups: &[Group], a: usize, b: usize| {
        let (a, b) = (a.min(b), a.max(b));
        Entry {
            area_bits: (groups[a].area + groups[b].area).to_bits(),
            a, b,
            va: groups[a].version,
            vb: groups[b].version,
        }
    };

    let mut heap = BinaryHeap::with_capacity(pairs.len());
    for &(i, j, _) in pairs {
        if groups[i].alive && groups[j].alive { heap.push(entry(&groups, i, j)) }
    }

    let mut count = groups.iter().filter(|g| g.alive).count();
    let mut merges = 0;

    // Merge the pair with the smallest combined area, keeping the smaller id.
    while count > target {
        let Some(Entry { a, b, va, vb, .. }) = heap.pop() else { break };
        if !groups[a].alive || !groups[b].alive { continue }
        if groups[a].version != va || groups[b].version != vb { continue }

        let absorbed = std::mem::replace(&mut groups[b], Group {
            members: vec![],
            area: 0.0,
            alive: false,
            version: 0,
            neighbors: AHashMap::new(),
        });

        groups[a].members.extend(absorbed.members);
        groups[a].area += absorbed.area;
        groups[a].version += 1;
        groups[a].neighbors.remove(&b);

        for (n, shared) in absorbed.neighbors {
            if n == a { continue }
            groups[n].neighbors.remove(&b);
            *groups[n].neighbors.entry(a).or_insert(0.0) += shared;
            *groups[a].neighbors.entry(n).or_insert(0.0) += shared;
        }

        let mut neighbors = groups[a].neighbors.keys().copied().collect::<Vec<_>>();
        neighbors.sort_unstable();
        for n in neighbors {
            heap.push(entry(&groups, a, n));
        }

        count -= 1;
        merges += 1;
    }

    if merges == 0 { return None }

    // Number the surviving groups in order of their smallest member.
    let mut parents = vec![ZoneId(u32::MAX); zones.len()];
    let mut coarse: Vec<CoverageZone> = Vec::with_capacity(count);
    for group in groups.iter().filter(|g| g.alive) {
        let id = ZoneId(coarse.len() as u32);
        for &m in &group.members { parents[m] = id }
        coarse.push(merge_zones(id, group.members.iter().map(|&m| &zones[m])));
    }

    // Empty zones follow the coarser zone covering their camera, or the one
    // whose owner is nearest.
    for (i, zone) in zones.iter().enumerate().filter(|(_, z)| z.is_empty()) {
        let parent = sites.get(&zone.camera)
            .and_then(|&site| coarse.iter()
                .find(|c| contains_point(&c.geometry, site))
                .or_else(|| coarse.iter().min_by(|x, y| {
                    let dx = sites.get(&x.camera).map_or(f64::INFINITY, |p| distance(p.0, site.0));
                    let dy = sites.get(&y.camera).map_or(f64::INFINITY, |p| distance(p.0, site.0));
                    dx.total_cmp(&dy)
                })))
            .map_or(ZoneId(0), |c| c.id);

        parents[i] = parent;
        let owner = &mut coarse[parent.index()];
        owner.members.push(zone.camera);
        owner.members.sort_unstable();
        owner.camera = owner.members[0];
        owner.weight += zone.weight;
    }

    Some((coarse, parents))
}

/// Union a set of zones into one coarser zone.
fn merge_zones<'a>(id: ZoneId, zones: impl Iterator<Item = &'a CoverageZone>) -> CoverageZone {
    let mut geometry = MultiPolygon(vec![]);
    let mut members = Vec::new();
    let mut weight = 0.0;

    for zone in zones {
        geometry = union(&geometry, &zone.geometry);
        members.extend_from_slice(&zone.members);
        weight += zone.weight;
    }
    members.sort_unstable();

    CoverageZone {
        id,
        camera: members[0],
        area: geo::Area::unsigned_area(&geometry),
        geometry,
        members,
        weight,
    }
}

/// Diagonal length of the extent of all zones, used to scale tolerances.
pub(super) fn extent(layer: &ZoneLayer) -> f64 {
    let corners = layer.zones().iter()
        .filter_map(|zone| zone.geometry.bounding_rect())
        .flat_map(|rect| [rect.min(), rect.max()])
        .collect::<LineString<f64>>();
    corners.bounding_rect().map_or(0.0, |rect| distance(rect.min(), rect.max()))
}
