use std::{fs, path::Path};

use camcover::{
    cli::{Cli, Commands},
    commands::{route, zones},
    config::{Config, HierarchyConfig},
    io::{read_boundary, read_cameras, read_frontiers, read_network},
    CoverageModel, NodeId,
};
use clap::Parser;
use serde_json::{json, Value};

/// Three cameras in a 20 x 20 corridor and a four-node street network with
/// three routes from node 1 to node 3:
///   1-3    straight, 16 long, one zone;
///   1-2-3  via the south, ~17.9 long, two zones;
///   1-4-3  via the north, ~32.3 long, two zones (dominated).
fn write_inputs(dir: &Path) {
    let cameras = json!([
        { "id": 1, "x": 0.0, "y": 0.0 },
        { "id": 2, "x": 10.0, "y": 0.0, "priority": 2.0 },
        { "id": 3, "x": 5.0, "y": 10.0, "name": "north" },
    ]);
    let boundary = json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[-5.0, -5.0], [15.0, -5.0], [15.0, 15.0], [-5.0, 15.0], [-5.0, -5.0]]],
            },
        }],
    });
    let network = json!({
        "nodes": [
            { "id": 1, "x": -4.0, "y": 0.0 },
            { "id": 2, "x": 5.0, "y": -4.0 },
            { "id": 3, "x": 12.0, "y": 0.0 },
            { "id": 4, "x": 5.0, "y": 14.0 },
        ],
        "edges": [
            { "from": 1, "to": 3 },
            { "from": 1, "to": 2 },
            { "from": 2, "to": 3 },
            { "from": 1, "to": 4 },
            { "from": 4, "to": 3 },
        ],
    });

    fs::write(dir.join("cameras.json"), cameras.to_string()).unwrap();
    fs::write(dir.join("boundary.geojson"), boundary.to_string()).unwrap();
    fs::write(dir.join("network.json"), network.to_string()).unwrap();
}

#[test]
fn model_from_files() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());

    let cameras = read_cameras(&dir.path().join("cameras.json")).unwrap();
    let boundary = read_boundary(&dir.path().join("boundary.geojson")).unwrap();
    let network = read_network(&dir.path().join("network.json")).unwrap();
    let config = Config { hierarchy: HierarchyConfig { levels: 2, ..HierarchyConfig::default() }, ..Config::default() };

    let model = CoverageModel::build(&cameras, &boundary, &network, &config).unwrap();
    assert_eq!(model.num_levels(), 2);
    assert_eq!(model.graph().node_count(), 4);
    assert_eq!(model.graph().num_levels(), 2);

    let frontier = model.pareto_paths(NodeId(1), NodeId(3), 0).unwrap();
    let summary = frontier.paths().iter()
        .map(|p| (p.nodes.iter().map(|n| n.0).collect::<Vec<_>>(), p.coverage))
        .collect::<Vec<_>>();
    assert_eq!(summary, vec![(vec![1, 3], 1.0), (vec![1, 2, 3], 2.0)]);
    assert_eq!(frontier.paths()[0].length, 16.0);
    assert!((frontier.paths()[1].length - (97f64.sqrt() + 65f64.sqrt())).abs() < 1e-9);

    let nodes = model.graph().nodes();
    assert_eq!(nodes[0].zones[0].len(), 1);
    assert_eq!(nodes[3].zones[0].iter().map(|z| z.0).collect::<Vec<_>>(), vec![2]);
}

#[test]
fn route_command_writes_every_output() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    let path = |name: &str| dir.path().join(name).to_string_lossy().into_owned();

    let cli = Cli::parse_from([
        "camcover".to_string(), "route".to_string(),
        path("cameras.json"), path("boundary.geojson"), path("network.json"),
        "--start".to_string(), "1".to_string(), "--goal".to_string(), "3".to_string(),
        "--levels".to_string(), "2".to_string(), "--level".to_string(), "1".to_string(),
        "-o".to_string(), path("frontier.json"),
        "--graph".to_string(), path("graph.geojson"),
        "--svg".to_string(), path("route.svg"),
    ]);
    let Commands::Route(args) = &cli.command else { panic!("expected route") };
    route::run(&cli, args).unwrap();

    let frontiers = read_frontiers(&dir.path().join("frontier.json")).unwrap();
    assert_eq!(frontiers.len(), 1);
    assert_eq!(frontiers[0].level, 1);
    assert_eq!(frontiers[0].shortest().map(|p| p.length), Some(16.0));

    let graph: Value = serde_json::from_str(&fs::read_to_string(dir.path().join("graph.geojson")).unwrap()).unwrap();
    assert_eq!(graph["features"].as_array().unwrap().len(), 9);

    let svg = fs::read_to_string(dir.path().join("route.svg")).unwrap();
    assert_eq!(svg.matches(r#"class="route best""#).count(), 1);

    // Outputs are not overwritten without --force.
    assert!(route::run(&cli, args).is_err());
}

#[test]
fn zones_command_writes_all_levels() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    let output = dir.path().join("zones.geojson");

    let cli = Cli::parse_from([
        "camcover", "zones",
        dir.path().join("cameras.json").to_str().unwrap(),
        dir.path().join("boundary.geojson").to_str().unwrap(),
        "--levels", "3",
        "-o", output.to_str().unwrap(),
    ]);
    let Commands::Zones(args) = &cli.command else { panic!("expected zones") };
    zones::run(&cli, args).unwrap();

    let value: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let levels = value["features"].as_array().unwrap().iter()
        .map(|f| f["properties"]["level"].as_u64().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(levels, vec![0, 0, 0, 1, 1, 2]);

    let weights = value["features"].as_array().unwrap().iter()
        .filter(|f| f["properties"]["level"] == 2)
        .map(|f| f["properties"]["weight"].as_f64().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(weights, vec![4.0]);
}
