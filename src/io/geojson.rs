use std::{fs::File, io::{BufWriter, Write}, path::Path};

use anyhow::{Context, Result};
use geo::{Coord, LineString, MultiPolygon};
use serde_json::{json, Map, Value};

use crate::{
    hierarchy::CoverageZone,
    ids::NodeId,
    network::StreetGraph,
};

use super::Transform;

fn ring_coords(ring: &LineString<f64>, transform: &Transform) -> crate::Result<Vec<[f64; 2]>> {
    ring.coords().map(|&c| transform(c).map(|c| [c.x, c.y])).collect()
}

fn multipolygon_coords(shape: &MultiPolygon<f64>, transform: &Transform) -> crate::Result<Value> {
    let polygons = shape.0.iter()
        .map(|polygon| {
            let mut rings = vec![ring_coords(polygon.exterior(), transform)?];
            for interior in polygon.interiors() {
                rings.push(ring_coords(interior, transform)?);
            }
            Ok(rings)
        })
        .collect::<crate::Result<Vec<_>>>()?;
    Ok(json!(polygons))
}

/// Zones of one resolution level as a FeatureCollection of MultiPolygons.
pub fn zones_to_geojson(zones: &[CoverageZone], level: usize, transform: &Transform) -> Result<Value> {
    let features = zones.iter()
        .map(|zone| {
            Ok(json!({
                "type": "Feature",
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": multipolygon_coords(&zone.geometry, transform)?,
                },
                "properties": {
                    "level": level,
                    "zone": zone.id.0,
                    "camera": zone.camera.0,
                    "members": zone.members.iter().map(|c| c.0).collect::<Vec<_>>(),
                    "area": zone.area,
                    "weight": zone.weight,
                },
            }))
        })
        .collect::<crate::Result<Vec<_>>>()?;

    Ok(json!({ "type": "FeatureCollection", "features": features }))
}

/// The annotated street graph: node Points with per-level zones, edge
/// LineStrings with length and per-level coverage.
pub fn graph_to_geojson(graph: &StreetGraph, transform: &Transform) -> Result<Value> {
    let mut features = Vec::with_capacity(graph.node_count() + graph.edge_count());

    for node in graph.nodes() {
        let c = transform(node.location.0)?;
        let zones = node.zones.iter()
            .map(|set| set.iter().map(|z| z.0).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        features.push(json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [c.x, c.y] },
            "properties": { "kind": "node", "id": node.id.0, "zones": zones },
        }));
    }

    for (e, edge) in graph.edges().iter().enumerate() {
        let coords = match &edge.geometry {
            Some(line) => ring_coords(line, transform)?,
            None => {
                let endpoint = |id: NodeId| graph.node_index(id).map(|i| graph.node(i).location.0).unwrap_or(Coord { x: f64::NAN, y: f64::NAN });
                ring_coords(&LineString::new(vec![endpoint(edge.source), endpoint(edge.target)]), transform)?
            }
        };

        let mut properties = Map::new();
        properties.insert("kind".to_string(), json!("edge"));
        properties.insert("edge".to_string(), json!(e));
        properties.insert("source".to_string(), json!(edge.source.0));
        properties.insert("target".to_string(), json!(edge.target.0));
        properties.insert("length".to_string(), json!(edge.length));
        properties.insert("coverage".to_string(), json!(edge.coverage));

        features.push(json!({
            "type": "Feature",
            "geometry": { "type": "LineString", "coordinates": coords },
            "properties": properties,
        }));
    }

    Ok(json!({ "type": "FeatureCollection", "features": features }))
}

/// Write a JSON value to `path`.
pub fn write_json(path: &Path, value: &Value) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("[write_json] Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value)
        .with_context(|| format!("[write_json] Failed to serialize {}", path.display()))?;
    writer.flush()?;
    Ok(())
}
