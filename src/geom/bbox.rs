use geo::{BoundingRect, MultiPolygon, Rect};
use rstar::{RTree, RTreeObject, AABB};

/// A bounding box in an R-tree, associated with a zone geometry by index.
#[derive(Debug, Clone)]
pub(crate) struct BoundingBox {
    idx: usize, // Index of corresponding geometry
    bbox: Rect<f64>,
}

impl BoundingBox {
    pub(crate) fn new(idx: usize, bbox: Rect<f64>) -> Self {
        Self { idx, bbox }
    }

    /// Get the index of the corresponding geometry.
    #[inline] pub(crate) fn idx(&self) -> usize { self.idx }
}

impl RTreeObject for BoundingBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}

/// Bulk-load an R-tree over the bounding boxes of the non-empty shapes.
pub(crate) fn index_shapes(shapes: &[&MultiPolygon<f64>]) -> RTree<BoundingBox> {
    RTree::bulk_load(
        shapes.iter().enumerate()
            .filter_map(|(i, shape)| shape.bounding_rect().map(|bbox| BoundingBox::new(i, bbox)))
            .collect()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{coord, LineString, Polygon};

    #[test]
    fn empty_shapes_are_skipped() {
        let square = MultiPolygon(vec![Polygon::new(
            LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]),
            vec![],
        )]);
        let empty = MultiPolygon(vec![]);
        let tree = index_shapes(&[&empty, &square]);
        assert_eq!(tree.size(), 1);

        let hits = tree.locate_in_envelope_intersecting(&AABB::from_point([0.5, 0.5]))
            .map(|b| b.idx())
            .collect::<Vec<_>>();
        assert_eq!(hits, vec![1]);
        assert!(tree.locate_in_envelope_intersecting(&AABB::from_point([2.0, 2.0])).next().is_none());
    }

    #[test]
    fn envelope_matches_rect() {
        let bbox = BoundingBox::new(3, Rect::new(coord! { x: -1.0, y: 2.0 }, coord! { x: 4.0, y: 5.0 }));
        let envelope = bbox.envelope();
        assert_eq!(envelope.lower(), [-1.0, 2.0]);
        assert_eq!(envelope.upper(), [4.0, 5.0]);
    }
}
