use geo::{Coord, MapCoords, MultiPolygon};
use proj4rs::{proj::Proj as Proj4, transform::transform};

use crate::error::Error;

const GEOGRAPHIC: &str = "+proj=longlat +datum=WGS84 +no_defs +type=crs";

/// Projection between WGS84 lon/lat degrees and the UTM zone containing a
/// chosen centre, so Euclidean distances come out in metres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projector {
    zone: u32,
    south: bool,
}

impl Projector {
    /// Pick the UTM zone containing `center` (lon/lat degrees).
    pub fn utm_for(center: Coord<f64>) -> Self {
        let zone = (((center.x + 180.0) / 6.0).floor() as i32 + 1).clamp(1, 60) as u32;
        Self { zone, south: center.y < 0.0 }
    }

    #[inline] pub fn zone(&self) -> u32 { self.zone }

    /// Build PROJ.4 string for the target UTM CRS.
    fn utm_proj4(&self) -> String {
        let south = if self.south { " +south" } else { "" };
        format!("+proj=utm +zone={}{south} +datum=WGS84 +units=m +no_defs +type=crs", self.zone)
    }

    fn projections(&self) -> Result<(Proj4, Proj4), Error> {
        let geographic = Proj4::from_proj_string(GEOGRAPHIC)
            .map_err(|e| Error::Projection(format!("failed to build source PROJ.4 {GEOGRAPHIC}: {e:?}")))?;
        let utm = Proj4::from_proj_string(&self.utm_proj4())
            .map_err(|e| Error::Projection(format!("failed to build target PROJ.4 {}: {e:?}", self.utm_proj4())))?;
        Ok((geographic, utm))
    }

    /// A reusable lon/lat degrees -> UTM metres transform.
    pub fn projection(&self) -> Result<impl Fn(Coord<f64>) -> Result<Coord<f64>, Error> + use<>, Error> {
        let (geographic, utm) = self.projections()?;
        Ok(move |coord: Coord<f64>| {
            let mut point = (coord.x.to_radians(), coord.y.to_radians(), 0.0);
            transform(&geographic, &utm, &mut point)
                .map_err(|e| Error::Projection(format!("cannot project ({}, {}): {e:?}", coord.x, coord.y)))?;
            Ok(Coord { x: point.0, y: point.1 })
        })
    }

    /// A reusable UTM metres -> lon/lat degrees transform.
    pub fn unprojection(&self) -> Result<impl Fn(Coord<f64>) -> Result<Coord<f64>, Error> + use<>, Error> {
        let (geographic, utm) = self.projections()?;
        Ok(move |coord: Coord<f64>| {
            let mut point = (coord.x, coord.y, 0.0);
            transform(&utm, &geographic, &mut point)
                .map_err(|e| Error::Projection(format!("cannot unproject ({}, {}): {e:?}", coord.x, coord.y)))?;
            Ok(Coord { x: point.0.to_degrees(), y: point.1.to_degrees() })
        })
    }

    /// Project lon/lat degrees to UTM metres.
    pub fn forward(&self, coords: &[Coord<f64>]) -> Result<Vec<Coord<f64>>, Error> {
        let project = self.projection()?;
        coords.iter().map(|&coord| project(coord)).collect()
    }

    /// Project UTM metres back to lon/lat degrees.
    pub fn inverse(&self, coords: &[Coord<f64>]) -> Result<Vec<Coord<f64>>, Error> {
        let unproject = self.unprojection()?;
        coords.iter().map(|&coord| unproject(coord)).collect()
    }

    /// Project every vertex of a geometry back to lon/lat degrees.
    pub fn inverse_shape(&self, shape: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>, Error> {
        let unproject = self.unprojection()?;
        shape.try_map_coords(|coord: Coord<f64>| unproject(coord))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;

    #[test]
    fn zone_from_longitude() {
        assert_eq!(Projector::utm_for(coord! { x: 103.8, y: 1.35 }).zone(), 48);
        assert_eq!(Projector::utm_for(coord! { x: -87.6, y: 41.9 }).zone(), 16);
        assert_eq!(Projector::utm_for(coord! { x: 180.0, y: 0.0 }).zone(), 60);
    }

    #[test]
    fn inverse_shape_matches_inverse() {
        let projector = Projector::utm_for(coord! { x: 103.8, y: 1.35 });
        let ring = projector.forward(&[
            coord! { x: 103.80, y: 1.35 },
            coord! { x: 103.81, y: 1.35 },
            coord! { x: 103.81, y: 1.36 },
        ]).unwrap();
        let shape = MultiPolygon(vec![geo::Polygon::new(ring.into(), vec![])]);

        let back = projector.inverse_shape(&shape).unwrap();
        let first = back.0[0].exterior().0[0];
        assert!((first.x - 103.80).abs() < 1e-7 && (first.y - 1.35).abs() < 1e-7);
    }

    #[test]
    fn forward_then_inverse_round_trips() {
        let projector = Projector::utm_for(coord! { x: 103.8, y: 1.35 });
        let input = vec![coord! { x: 103.80, y: 1.35 }, coord! { x: 103.81, y: 1.36 }];

        let metric = projector.forward(&input).unwrap();
        // About 1.1 km per 0.01 degree near the equator.
        let dx = metric[1].x - metric[0].x;
        assert!(dx > 1000.0 && dx < 1200.0, "dx = {dx}");

        let back = projector.inverse(&metric).unwrap();
        for (a, b) in input.iter().zip(&back) {
            assert!((a.x - b.x).abs() < 1e-7 && (a.y - b.y).abs() < 1e-7);
        }
    }
}
