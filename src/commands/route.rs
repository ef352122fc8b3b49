use anyhow::Result;
use tracing::{debug, info, warn};

use crate::{
    cli::{Cli, RouteArgs},
    commands::{check_output, load_config, load_inputs},
    io, CoverageModel, NodeId,
};

pub fn run(_cli: &Cli, args: &RouteArgs) -> Result<()> {
    let common = &args.common;
    check_output(&args.output, common.force)?;
    for extra in [&args.graph, &common.svg].into_iter().flatten() {
        check_output(extra, common.force)?;
    }

    let mut config = load_config(common)?;
    if let Some(cap) = args.max_labels { config.search.max_labels_per_node = Some(cap.max(1)) }
    debug!(?config, "[route] configuration");

    let (cameras, boundary) = load_inputs(common)?;
    let network = io::read_network(&args.network)?;
    info!(
        cameras = cameras.len(),
        nodes = network.nodes.len(),
        edges = network.edges.len(),
        "[route] {} -> {} at level {}",
        args.start,
        args.goal,
        args.level,
    );

    let model = CoverageModel::build(&cameras, &boundary, &network, &config)?;
    let frontier = model.pareto_paths(NodeId(args.start), NodeId(args.goal), args.level)?;
    if frontier.truncated {
        warn!("[route] label cap reached; the frontier may be incomplete");
    }
    for path in &frontier.paths {
        info!(length = path.length, coverage = path.coverage, hops = path.nodes.len().saturating_sub(1), "[route] frontier path");
    }

    io::write_frontiers(&args.output, std::slice::from_ref(&frontier))?;
    println!("Wrote {} paths -> {}", frontier.len(), args.output.display());

    if let Some(graph) = &args.graph {
        model.write_graph(graph)?;
        println!("Wrote graph -> {}", graph.display());
    }

    if let Some(svg) = &common.svg {
        model.write_svg(svg, args.level, Some(&frontier))?;
        println!("Wrote svg -> {}", svg.display());
    }

    Ok(())
}
