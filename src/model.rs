use std::path::Path as FilePath;

use geo::{BoundingRect, Coord, MapCoords, Polygon};
use serde_json::Value;
use tracing::info;

use crate::{
    camera::Camera,
    config::{Config, Coordinates},
    error::{Result, SearchError},
    geom::Projector,
    hierarchy::{CoverageZone, ZoneHierarchy},
    ids::NodeId,
    io::{self, SvgScene, Transform},
    network::{build_graph, RoadNetwork, StreetGraph},
    search::{self, ParetoFrontier},
    voronoi,
};

/// Everything derived from one set of inputs: the zone hierarchy and the
/// annotated street graph. Immutable once built; rebuild to change inputs.
#[derive(Clone, Debug)]
pub struct CoverageModel {
    cameras: Vec<Camera>,
    boundary: Polygon<f64>,
    hierarchy: ZoneHierarchy,
    graph: StreetGraph,
    projector: Option<Projector>,
    config: Config,
}

impl CoverageModel {
    /// Partition the corridor, build the resolution hierarchy and annotate
    /// the street network. Geographic inputs are projected to UTM metres
    /// first; given edge lengths are taken to be metres.
    pub fn build(cameras: &[Camera], boundary: &Polygon<f64>, network: &RoadNetwork, config: &Config) -> Result<Self> {
        let (cameras, boundary, network, projector) = match config.input.coordinates {
            Coordinates::Planar => (cameras.to_vec(), boundary.clone(), network.clone(), None),
            Coordinates::Geographic => {
                let center = boundary.bounding_rect().map_or(Coord { x: 0.0, y: 0.0 }, |rect| rect.center());
                let projector = Projector::utm_for(center);
                let (cameras, boundary, network) = project_inputs(&projector, cameras, boundary, network)?;
                info!(zone = projector.zone(), "[model] projected geographic input to UTM");
                (cameras, boundary, network, Some(projector))
            }
        };

        let zones = voronoi::partition(&cameras, &boundary, &config.partition)?;
        let hierarchy = ZoneHierarchy::build(zones, &cameras, &config.hierarchy)?;
        let graph = build_graph(&network, &hierarchy, &config.scoring)?;

        Ok(Self { cameras, boundary, hierarchy, graph, projector, config: config.clone() })
    }

    /// Cameras in working (planar) coordinates.
    #[inline] pub fn cameras(&self) -> &[Camera] { &self.cameras }

    /// Corridor boundary in working (planar) coordinates.
    #[inline] pub fn boundary(&self) -> &Polygon<f64> { &self.boundary }

    #[inline] pub fn hierarchy(&self) -> &ZoneHierarchy { &self.hierarchy }

    #[inline] pub fn graph(&self) -> &StreetGraph { &self.graph }

    #[inline] pub fn config(&self) -> &Config { &self.config }

    /// The projection applied to geographic input, if any.
    #[inline] pub fn projector(&self) -> Option<&Projector> { self.projector.as_ref() }

    /// Get the number of resolution levels actually built.
    #[inline] pub fn num_levels(&self) -> usize { self.hierarchy.num_levels() }

    /// Zones of a resolution level (0 = finest).
    pub fn zones(&self, level: usize) -> Option<&[CoverageZone]> {
        self.hierarchy.layer(level).map(|layer| layer.zones())
    }

    /// Pareto frontier of (length, coverage) paths at `level`.
    pub fn pareto_paths(&self, start: NodeId, goal: NodeId, level: usize) -> Result<ParetoFrontier, SearchError> {
        search::pareto_paths(&self.graph, start, goal, level, &self.config.search)
    }

    /// Independent frontier queries, run in parallel.
    pub fn pareto_paths_many(&self, queries: &[(NodeId, NodeId)], level: usize) -> Vec<Result<ParetoFrontier, SearchError>> {
        search::pareto_paths_many(&self.graph, queries, level, &self.config.search)
    }

    /// Shortest path length ignoring coverage.
    pub fn shortest_path_length(&self, start: NodeId, goal: NodeId) -> Result<f64, SearchError> {
        search::shortest_path_length(&self.graph, start, goal)
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Output coordinates: lon/lat again for geographic input.
    fn export_transform(&self) -> Result<Box<Transform>> {
        match self.projector {
            Some(projector) => Ok(Box::new(projector.unprojection()?)),
            None => Ok(Box::new(io::planar)),
        }
    }

    fn level_zones(&self, level: usize) -> anyhow::Result<&[CoverageZone]> {
        self.zones(level).ok_or_else(|| SearchError::InvalidLevel { level, levels: self.num_levels() }.into())
    }

    /// Zones of one level as a GeoJSON FeatureCollection.
    pub fn zones_geojson(&self, level: usize) -> anyhow::Result<Value> {
        io::zones_to_geojson(self.level_zones(level)?, level, &*self.export_transform()?)
    }

    /// Zones of every level in one FeatureCollection, finest first.
    pub fn all_zones_geojson(&self) -> anyhow::Result<Value> {
        let mut features = Vec::new();
        for level in 0..self.num_levels() {
            let mut collection = self.zones_geojson(level)?;
            if let Value::Array(level_features) = collection["features"].take() {
                features.extend(level_features);
            }
        }
        Ok(serde_json::json!({ "type": "FeatureCollection", "features": features }))
    }

    /// The annotated street graph as GeoJSON.
    pub fn graph_geojson(&self) -> anyhow::Result<Value> {
        io::graph_to_geojson(&self.graph, &*self.export_transform()?)
    }

    /// Write the zones of every level to a GeoJSON file.
    pub fn write_zones(&self, path: &FilePath) -> anyhow::Result<()> {
        io::write_json(path, &self.all_zones_geojson()?)
    }

    /// Write the annotated street graph to a GeoJSON file.
    pub fn write_graph(&self, path: &FilePath) -> anyhow::Result<()> {
        io::write_json(path, &self.graph_geojson()?)
    }

    /// Render one zone level, the cameras, the street graph and an optional
    /// frontier as SVG, in working coordinates.
    pub fn write_svg(&self, path: &FilePath, level: usize, frontier: Option<&ParetoFrontier>) -> anyhow::Result<()> {
        let scene = SvgScene {
            zones: self.level_zones(level)?,
            cameras: &self.cameras,
            graph: (self.graph.node_count() > 0).then_some(&self.graph),
            frontier,
        };
        io::write_svg(path, &scene)
    }
}

/// Project cameras, boundary and network from lon/lat to `projector`'s UTM zone.
fn project_inputs(
    projector: &Projector,
    cameras: &[Camera],
    boundary: &Polygon<f64>,
    network: &RoadNetwork,
) -> Result<(Vec<Camera>, Polygon<f64>, RoadNetwork)> {
    let project = projector.projection()?;

    let cameras = cameras.iter()
        .map(|camera| {
            let location = project(camera.coord())?;
            Ok(Camera { location: location.into(), ..camera.clone() })
        })
        .collect::<Result<Vec<_>>>()?;

    let boundary = boundary.try_map_coords(|coord: Coord<f64>| project(coord))?;

    let mut network = network.clone();
    for node in &mut network.nodes {
        let c = project(Coord { x: node.x, y: node.y })?;
        (node.x, node.y) = (c.x, c.y);
    }
    for edge in &mut network.edges {
        if let Some(coords) = &mut edge.coords {
            for pair in coords.iter_mut() {
                let c = project(Coord { x: pair[0], y: pair[1] })?;
                *pair = [c.x, c.y];
            }
        }
    }

    Ok((cameras, boundary, network))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Area, LineString};

    use crate::{
        config::HierarchyConfig,
        network::{RoadNode, RoadSegment},
    };

    fn cameras() -> Vec<Camera> {
        vec![Camera::new(1, 0.0, 0.0), Camera::new(2, 10.0, 0.0), Camera::new(3, 5.0, 10.0)]
    }

    fn boundary() -> Polygon<f64> {
        Polygon::new(LineString::from(vec![(-5.0, -5.0), (15.0, -5.0), (15.0, 15.0), (-5.0, 15.0)]), vec![])
    }

    fn network() -> RoadNetwork {
        let node = |id, x, y| RoadNode { id: NodeId(id), x, y };
        let segment = |from, to| RoadSegment { from: NodeId(from), to: NodeId(to), length: None, coords: None };
        RoadNetwork {
            nodes: vec![node(1, -4.0, 0.0), node(2, 5.0, -4.0), node(3, 14.0, 0.0), node(4, 5.0, 14.0)],
            edges: vec![segment(1, 2), segment(2, 3), segment(3, 4), segment(4, 1), segment(1, 3)],
        }
    }

    #[test]
    fn build_and_query() {
        let config = Config { hierarchy: HierarchyConfig { levels: 2, ..HierarchyConfig::default() }, ..Config::default() };
        let model = CoverageModel::build(&cameras(), &boundary(), &network(), &config).unwrap();

        assert_eq!(model.num_levels(), 2);
        assert_eq!(model.zones(0).map(<[_]>::len), Some(3));
        assert_eq!(model.zones(1).map(<[_]>::len), Some(2));
        assert!(model.zones(2).is_none());

        let total = model.zones(0).unwrap().iter().map(|z| z.area).sum::<f64>();
        assert!((total - model.boundary().unsigned_area()).abs() < 1e-6);

        let frontier = model.pareto_paths(NodeId(1), NodeId(3), 0).unwrap();
        assert_eq!(frontier.shortest().map(|p| p.length), Some(18.0));
        assert_eq!(model.shortest_path_length(NodeId(1), NodeId(3)), Ok(18.0));

        let many = model.pareto_paths_many(&[(NodeId(1), NodeId(3)), (NodeId(2), NodeId(4))], 1);
        assert!(many.iter().all(Result::is_ok));
    }

    #[test]
    fn model_is_shareable_across_threads() {
        fn check<T: Send + Sync>() {}
        check::<CoverageModel>();
    }

    #[test]
    fn zones_geojson_covers_every_level() {
        let config = Config { hierarchy: HierarchyConfig { levels: 3, ..HierarchyConfig::default() }, ..Config::default() };
        let model = CoverageModel::build(&cameras(), &boundary(), &RoadNetwork::default(), &config).unwrap();

        let value = model.all_zones_geojson().unwrap();
        let levels = value["features"].as_array().unwrap().iter()
            .map(|f| f["properties"]["level"].as_u64().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(levels, vec![0, 0, 0, 1, 1, 2]);
        assert!(model.zones_geojson(7).is_err());
        assert_eq!(model.graph().node_count(), 0);
    }

    #[test]
    fn geographic_input_is_exported_as_lon_lat() {
        let cameras = vec![Camera::new(1, 103.80, 1.30), Camera::new(2, 103.82, 1.30)];
        let boundary = Polygon::new(
            LineString::from(vec![(103.79, 1.29), (103.83, 1.29), (103.83, 1.31), (103.79, 1.31)]),
            vec![],
        );
        let mut config = Config::default();
        config.input.coordinates = Coordinates::Geographic;

        let model = CoverageModel::build(&cameras, &boundary, &RoadNetwork::default(), &config).unwrap();
        assert_eq!(model.projector().map(Projector::zone), Some(48));
        // Working coordinates are metres: the two cameras are ~2.2 km apart.
        let dx = model.cameras()[1].location.x() - model.cameras()[0].location.x();
        assert!(dx > 2000.0 && dx < 2400.0, "dx = {dx}");

        let value = model.zones_geojson(0).unwrap();
        let first = &value["features"][0]["geometry"]["coordinates"][0][0][0];
        let lon = first[0].as_f64().unwrap();
        let lat = first[1].as_f64().unwrap();
        assert!((103.78..103.84).contains(&lon) && (1.28..1.32).contains(&lat), "({lon}, {lat})");
    }
}
