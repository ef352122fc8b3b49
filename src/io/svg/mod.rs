mod color;
mod writer;

use std::{io::Write, path::Path};

use anyhow::{anyhow, Result};
use geo::{BoundingRect, Coord, CoordsIter, LineString, MultiPolygon, Rect};

use crate::{
    camera::Camera,
    hierarchy::CoverageZone,
    network::StreetGraph,
    search::ParetoFrontier,
};

use color::golden_angle_color;
use writer::SvgWriter;

/// Projection function: planar coords -> SVG coords (x,y)
type Projection = dyn Fn(&Coord<f64>) -> (f64, f64);

/// Everything drawn into one SVG: a zone level, optionally with cameras,
/// the street graph and a frontier overlay.
#[derive(Clone, Copy, Debug, Default)]
pub struct SvgScene<'a> {
    pub zones: &'a [CoverageZone],
    pub cameras: &'a [Camera],
    pub graph: Option<&'a StreetGraph>,
    pub frontier: Option<&'a ParetoFrontier>,
}

impl SvgScene<'_> {
    fn bounds(&self) -> Option<Rect<f64>> {
        let zone_rects = self.zones.iter().filter_map(|z| z.geometry.bounding_rect());
        let points = self.cameras.iter().map(Camera::coord)
            .chain(self.graph.into_iter().flat_map(|g| g.nodes().iter().map(|n| n.location.0)))
            .map(|c| Rect::new(c, c));

        zone_rects.chain(points).reduce(|a, b| Rect::new(
            Coord { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
            Coord { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
        ))
    }
}

/// Small wrapper with defaults.
pub fn write_svg(path: &Path, scene: &SvgScene) -> Result<()> {
    write_svg_with_size(path, scene, 1200.0, 10.0)
}

/// Render the scene, `width` pixels wide, preserving aspect ratio.
pub fn write_svg_with_size(path: &Path, scene: &SvgScene, width: f64, margin: f64) -> Result<()> {
    let bounds = scene.bounds()
        .ok_or_else(|| anyhow!("[to_svg] Could not determine bounds; nothing to draw."))?;

    let extent = bounds.width().max(bounds.height()).max(f64::EPSILON);
    let scale = (width - 2.0 * margin) / extent;
    let height = bounds.height() * scale + 2.0 * margin;

    // Map planar coords -> SVG coords (preserve aspect, Y down)
    let project = move |coord: &Coord<f64>| -> (f64, f64) {
        let x = margin + (coord.x - bounds.min().x) * scale;
        let y = margin + (bounds.max().y - coord.y) * scale; // invert vertically
        (x, y)
    };

    let mut writer = SvgWriter::new(path)?;
    writer.write_header(width, height, scale, &bounds)?;
    writer.write_styles()?;

    for (i, zone) in scene.zones.iter().enumerate().filter(|(_, z)| !z.is_empty()) {
        writeln!(
            writer,
            r#"<path class="zone" fill-rule="evenodd" style="fill:{}" data-zone="{}" data-camera="{}" d="{}"/>"#,
            golden_angle_color(i),
            zone.id.0,
            zone.camera.0,
            multipolygon_to_path(&zone.geometry, &project),
        )?;
    }

    if let Some(graph) = scene.graph {
        for edge in graph.edges() {
            let line = match &edge.geometry {
                Some(line) => line.clone(),
                None => LineString::new(
                    [edge.source, edge.target].iter()
                        .filter_map(|&id| graph.node_index(id))
                        .map(|i| graph.node(i).location.0)
                        .collect(),
                ),
            };
            writeln!(writer, r#"<polyline class="edge" fill="none" points="{}"/>"#, line_to_points(&line, &project))?;
        }
    }

    for camera in scene.cameras {
        let (x, y) = project(&camera.coord());
        writeln!(writer, r#"<circle class="camera" cx="{x:.3}" cy="{y:.3}" r="3" data-camera="{}"/>"#, camera.id.0)?;
    }

    if let (Some(graph), Some(frontier)) = (scene.graph, scene.frontier) {
        // Longest first so that the shortest path is drawn on top.
        for (i, path) in frontier.paths.iter().enumerate().rev() {
            let line = path.nodes.iter()
                .filter_map(|&id| graph.node_index(id))
                .map(|i| graph.node(i).location.0)
                .collect::<LineString<f64>>();
            let class = if i == 0 { "route best" } else { "route" };
            writeln!(
                writer,
                r#"<polyline class="{class}" data-length="{:.3}" data-coverage="{:.3}" points="{}"/>"#,
                path.length,
                path.coverage,
                line_to_points(&line, &project),
            )?;
        }
    }

    writer.write_footer()?;
    writer.flush()?;

    Ok(())
}

/// Build an SVG points string for a LineString.
fn line_to_points(line: &LineString<f64>, project: &Projection) -> String {
    let mut out = String::new();

    for (i, coord) in line.coords_iter().enumerate() {
        let (x, y) = project(&coord);
        if i > 0 { out.push(' ') }
        out.push_str(&format!("{x:.3},{y:.3}"));
    }

    out
}

/// Build a compact SVG path string for a MultiPolygon (exteriors + holes).
fn multipolygon_to_path(shape: &MultiPolygon<f64>, project: &Projection) -> String {
    let mut out = String::new();

    for polygon in &shape.0 {
        out.push_str(&ring_to_path(polygon.exterior(), project));
        for interior in polygon.interiors() {
            out.push_str(&ring_to_path(interior, project));
        }
    }

    out
}

/// Build a compact SVG path string for a LineString (ring).
fn ring_to_path(ring: &LineString<f64>, project: &Projection) -> String {
    let mut out = String::new();

    let mut coords = ring.coords_iter()
        .map(|coord| project(&coord));
    if let Some((x, y)) = coords.next() {
        out.push_str(&format!(" M{x:.3},{y:.3}"));
        for (x, y) in coords {
            out.push_str(&format!(" L{x:.3},{y:.3}"));
        }
        out.push('Z');
    }

    out
}
