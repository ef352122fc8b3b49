use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

/// Camera coverage zones and coverage-aware routing
#[derive(Parser, Debug)]
#[command(name = "camcover", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv, -vvv); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Partition the corridor into camera coverage zones (forbids stdout)
    Zones(ZonesArgs),

    /// Compute the Pareto frontier between two street nodes (forbids stdout)
    Route(RouteArgs),
}

/// Inputs and options shared by every subcommand.
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Camera manifest (JSON array of { id, lat, lon } or { id, x, y })
    #[arg(value_hint = ValueHint::FilePath)]
    pub cameras: PathBuf,

    /// Corridor boundary (GeoJSON Polygon/MultiPolygon or [[x, y], ...])
    #[arg(value_hint = ValueHint::FilePath)]
    pub boundary: PathBuf,

    /// Configuration file (JSON); missing fields take their defaults
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Number of resolution levels (overrides the config file)
    #[arg(long)]
    pub levels: Option<usize>,

    /// Treat input coordinates as WGS84 lon/lat (overrides the config file)
    #[arg(long)]
    pub geographic: bool,

    /// Also render an SVG to this path
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub svg: Option<PathBuf>,

    /// Overwrite output files that already exist
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ZonesArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Output zones file (GeoJSON, every level; "-" is rejected)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct RouteArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Street network (JSON { nodes, edges })
    #[arg(value_hint = ValueHint::FilePath)]
    pub network: PathBuf,

    /// Start node id
    #[arg(long)]
    pub start: u64,

    /// Goal node id
    #[arg(long)]
    pub goal: u64,

    /// Resolution level to score coverage at (0 = finest)
    #[arg(long, default_value_t = 0)]
    pub level: usize,

    /// Maximum labels kept per node (overrides the config file)
    #[arg(long)]
    pub max_labels: Option<usize>,

    /// Output frontier file (JSON; "-" is rejected)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: PathBuf,

    /// Also write the annotated street graph (GeoJSON) to this path
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub graph: Option<PathBuf>,
}
