use std::{fs, path::Path};

use anyhow::{anyhow, bail, ensure, Context, Result};
use geo::{Coord, LineString, Polygon};
use serde_json::Value;

use crate::{
    camera::{Camera, CameraRecord},
    network::RoadNetwork,
};

fn read_json(path: &Path, what: &str) -> Result<Value> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {what} {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse {what} {}", path.display()))
}

/// Read a camera manifest: a JSON array of camera records.
pub fn read_cameras(path: &Path) -> Result<Vec<Camera>> {
    let records: Vec<CameraRecord> = serde_json::from_value(read_json(path, "camera manifest")?)
        .with_context(|| format!("[read_cameras] Invalid camera record in {}", path.display()))?;
    Ok(records.into_iter().map(Camera::from).collect())
}

/// Read a corridor boundary from GeoJSON or a bare `[[x, y], ...]` ring.
pub fn read_boundary(path: &Path) -> Result<Polygon<f64>> {
    parse_boundary(&read_json(path, "boundary")?)
        .with_context(|| format!("[read_boundary] Invalid boundary in {}", path.display()))
}

/// Read a street network: `{ nodes: [{ id, x, y }], edges: [{ from, to, length?, coords? }] }`.
pub fn read_network(path: &Path) -> Result<RoadNetwork> {
    serde_json::from_value(read_json(path, "street network")?)
        .with_context(|| format!("[read_network] Invalid street network in {}", path.display()))
}

/// Extract a boundary polygon from a GeoJSON value. Feature collections
/// contribute their first feature; multipolygons their first polygon.
pub fn parse_boundary(value: &Value) -> Result<Polygon<f64>> {
    if let Some(ring) = value.as_array() {
        return Ok(Polygon::new(parse_ring(ring)?, vec![]))
    }

    match value["type"].as_str() {
        Some("FeatureCollection") => {
            let first = value["features"].as_array()
                .and_then(|features| features.first())
                .ok_or_else(|| anyhow!("FeatureCollection has no features"))?;
            parse_boundary(first)
        }
        Some("Feature") => parse_boundary(&value["geometry"]),
        Some("Polygon") => parse_polygon(&value["coordinates"]),
        Some("MultiPolygon") => {
            let first = value["coordinates"].as_array()
                .and_then(|polygons| polygons.first())
                .ok_or_else(|| anyhow!("MultiPolygon has no polygons"))?;
            parse_polygon(first)
        }
        Some(other) => bail!("Unsupported boundary geometry type {other:?}"),
        None => bail!("Boundary must be a GeoJSON object or an array of [x, y] pairs"),
    }
}

/// Parse GeoJSON polygon coordinates: exterior ring followed by holes.
fn parse_polygon(coords: &Value) -> Result<Polygon<f64>> {
    let rings = coords.as_array().ok_or_else(|| anyhow!("Polygon coordinates must be an array of rings"))?;
    let (exterior, interiors) = rings.split_first().ok_or_else(|| anyhow!("Polygon has no exterior ring"))?;

    let exterior = parse_ring(exterior.as_array().ok_or_else(|| anyhow!("Ring must be an array"))?)?;
    let interiors = interiors.iter()
        .map(|ring| parse_ring(ring.as_array().ok_or_else(|| anyhow!("Ring must be an array"))?))
        .collect::<Result<Vec<_>>>()?;

    Ok(Polygon::new(exterior, interiors))
}

/// Parse a ring from `[[x, y], [x, y], ...]`.
fn parse_ring(coords: &[Value]) -> Result<LineString<f64>> {
    let points = coords.iter()
        .map(|pair| {
            let pair = pair.as_array().ok_or_else(|| anyhow!("Coordinate must be an [x, y] array"))?;
            ensure!(pair.len() >= 2, "Coordinate must have at least two components");
            let x = pair[0].as_f64().ok_or_else(|| anyhow!("Invalid coordinate: x must be a number"))?;
            let y = pair[1].as_f64().ok_or_else(|| anyhow!("Invalid coordinate: y must be a number"))?;
            Ok(Coord { x, y })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(LineString(points))
}
