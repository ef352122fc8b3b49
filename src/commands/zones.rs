use anyhow::Result;
use tracing::{debug, info};

use crate::{
    cli::{Cli, ZonesArgs},
    commands::{check_output, load_config, load_inputs},
    network::RoadNetwork,
    CoverageModel,
};

pub fn run(_cli: &Cli, args: &ZonesArgs) -> Result<()> {
    check_output(&args.output, args.common.force)?;
    if let Some(svg) = &args.common.svg { check_output(svg, args.common.force)? }

    let config = load_config(&args.common)?;
    debug!(?config, "[zones] configuration");

    let (cameras, boundary) = load_inputs(&args.common)?;
    info!(
        cameras = cameras.len(),
        levels = config.hierarchy.levels,
        "[zones] {} + {} -> {}",
        args.common.cameras.display(),
        args.common.boundary.display(),
        args.output.display(),
    );

    let model = CoverageModel::build(&cameras, &boundary, &RoadNetwork::default(), &config)?;
    for (level, layer) in model.hierarchy().layers().iter().enumerate() {
        info!(level, zones = layer.len(), nonempty = layer.num_nonempty(), "[zones] level built");
    }

    model.write_zones(&args.output)?;
    println!("Wrote {} levels -> {}", model.num_levels(), args.output.display());

    if let Some(svg) = &args.common.svg {
        model.write_svg(svg, 0, None)?;
        println!("Wrote svg -> {}", svg.display());
    }

    Ok(())
}
