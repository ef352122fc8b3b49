use geo::{Coord, Rect};
use rstar::{primitives::GeomWithData, RTree};

use crate::geom::{clip_half_plane, distance, rect_ring};

/// A camera site in the R-tree, tagged with its index in the site list.
pub(super) type Site = GeomWithData<[f64; 2], usize>;

/// Convex Voronoi cell of `sites[i]`, restricted to `frame`.
///
/// Neighbouring sites are visited nearest-first; once the next neighbour is
/// more than twice the cell radius away its bisector cannot cut the cell.
pub(super) fn voronoi_cell(i: usize, sites: &RTree<Site>, site: Coord<f64>, frame: &Rect<f64>) -> Vec<Coord<f64>> {
    let mut cell = rect_ring(frame);

    for neighbor in sites.nearest_neighbor_iter(&[site.x, site.y]) {
        if neighbor.data == i { continue }
        if cell.is_empty() { break }

        let other = Coord { x: neighbor.geom()[0], y: neighbor.geom()[1] };
        let radius = cell.iter().map(|&p| distance(p, site)).fold(0.0, f64::max);
        if distance(site, other) > 2.0 * radius { break }

        cell = clip_half_plane(&cell, site, other);
    }

    cell
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;

    use crate::geom::signed_area;

    fn tree(points: &[(f64, f64)]) -> RTree<Site> {
        RTree::bulk_load(points.iter().enumerate().map(|(i, &(x, y))| Site::new([x, y], i)).collect())
    }

    #[test]
    fn lone_site_owns_the_frame() {
        let frame = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 4.0, y: 2.0 });
        let cell = voronoi_cell(0, &tree(&[(1.0, 1.0)]), coord! { x: 1.0, y: 1.0 }, &frame);
        assert_eq!(signed_area(&cell), 8.0);
    }

    #[test]
    fn two_sites_split_at_bisector() {
        let frame = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 4.0, y: 2.0 });
        let sites = tree(&[(1.0, 1.0), (3.0, 1.0)]);

        let left = voronoi_cell(0, &sites, coord! { x: 1.0, y: 1.0 }, &frame);
        let right = voronoi_cell(1, &sites, coord! { x: 3.0, y: 1.0 }, &frame);

        assert!((signed_area(&left) - 4.0).abs() < 1e-12);
        assert!((signed_area(&right) - 4.0).abs() < 1e-12);
        assert!(left.iter().all(|c| c.x <= 2.0));
        assert!(right.iter().all(|c| c.x >= 2.0));
    }

    #[test]
    fn grid_of_sites_yields_equal_cells() {
        let frame = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 3.0, y: 3.0 });
        let points = (0..3).flat_map(|i| (0..3).map(move |j| (i as f64 + 0.5, j as f64 + 0.5))).collect::<Vec<_>>();
        let sites = tree(&points);

        for (i, &(x, y)) in points.iter().enumerate() {
            let cell = voronoi_cell(i, &sites, coord! { x: x, y: y }, &frame);
            assert!((signed_area(&cell) - 1.0).abs() < 1e-12, "cell {i}");
        }
    }
}
