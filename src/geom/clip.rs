use geo::{Area, BooleanOps, Coord, LineString, MultiPolygon, Polygon, Rect};

/// Clip a convex open ring to the half-plane of points at least as close to
/// `site` as to `other` (Sutherland–Hodgman against the perpendicular bisector).
pub fn clip_half_plane(ring: &[Coord<f64>], site: Coord<f64>, other: Coord<f64>) -> Vec<Coord<f64>> {
    let normal = other - site;
    let mid = Coord { x: (site.x + other.x) / 2.0, y: (site.y + other.y) / 2.0 };

    // Signed offset from the bisector; non-positive means inside.
    let side = |p: Coord<f64>| (p.x - mid.x) * normal.x + (p.y - mid.y) * normal.y;

    let n = ring.len();
    let mut out = Vec::with_capacity(n + 1);
    for i in 0..n {
        let (prev, curr) = (ring[(i + n - 1) % n], ring[i]);
        let (s_prev, s_curr) = (side(prev), side(curr));

        if s_curr <= 0.0 {
            if s_prev > 0.0 { out.push(crossing(prev, curr, s_prev, s_curr)) }
            out.push(curr);
        } else if s_prev <= 0.0 {
            out.push(crossing(prev, curr, s_prev, s_curr));
        }
    }

    out.dedup();
    if out.len() > 1 && out.first() == out.last() { out.pop(); }
    if out.len() < 3 { out.clear() }
    out
}

/// Point where segment `a`-`b` crosses the clip line, given the signed offsets of its ends.
#[inline]
fn crossing(a: Coord<f64>, b: Coord<f64>, s_a: f64, s_b: f64) -> Coord<f64> {
    let t = s_a / (s_a - s_b);
    Coord { x: a.x + t * (b.x - a.x), y: a.y + t * (b.y - a.y) }
}

/// Counter-clockwise open ring of a rectangle.
pub(crate) fn rect_ring(rect: &Rect<f64>) -> Vec<Coord<f64>> {
    let (min, max) = (rect.min(), rect.max());
    vec![min, Coord { x: max.x, y: min.y }, max, Coord { x: min.x, y: max.y }]
}

/// Intersect an open cell ring with the corridor boundary.
pub fn clip_to_boundary(cell: &[Coord<f64>], boundary: &Polygon<f64>) -> MultiPolygon<f64> {
    if cell.len() < 3 { return MultiPolygon(vec![]) }
    Polygon::new(LineString::from(cell.to_vec()), vec![]).intersection(boundary)
}

/// Area shared by two zone geometries.
pub fn overlap_area(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> f64 {
    if a.0.is_empty() || b.0.is_empty() { return 0.0 }
    a.intersection(b).unsigned_area()
}

/// Union of two zone geometries.
pub fn union(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    if a.0.is_empty() { return b.clone() }
    if b.0.is_empty() { return a.clone() }
    a.union(b)
}
