use std::{fs, path::Path};

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

/// How input coordinates are to be interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Coordinates {
    /// Projected x/y; distances are used as given.
    #[default]
    Planar,
    /// WGS84 lon/lat degrees; projected to UTM metres before any computation.
    Geographic,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub coordinates: Coordinates,
}

/// Tessellation post-condition settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionConfig {
    /// Tolerance for overlap and coverage checks, relative to the boundary area.
    pub epsilon: f64,
    /// Run the overlap/coverage post-condition check.
    pub check: bool,
}

impl Default for PartitionConfig {
    fn default() -> Self { Self { epsilon: 1e-6, check: true } }
}

/// Which zones may be merged into one coarser zone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Zones sharing a border strictly longer than `min_shared_length`.
    SharedBoundary {
        #[serde(default)]
        min_shared_length: f64,
    },
    /// Zones whose owning cameras are among each other's `k` nearest cameras.
    NearestCameras { k: usize },
}

impl Default for MergeStrategy {
    fn default() -> Self { Self::SharedBoundary { min_shared_length: 0.0 } }
}

/// Resolution hierarchy settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchyConfig {
    /// Number of resolution levels, including the finest.
    pub levels: usize,
    /// Optional zone-count target for each coarser level (level 1 first).
    /// Missing entries halve the previous level's count.
    pub targets: Option<Vec<usize>>,
    pub strategy: MergeStrategy,
}

impl Default for HierarchyConfig {
    fn default() -> Self { Self { levels: 1, targets: None, strategy: MergeStrategy::default() } }
}

/// Edge coverage scoring scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringScheme {
    /// Number of distinct zones the edge passes through.
    #[default]
    Count,
    /// Sum of the priority weights of the distinct zones the edge passes through.
    Weighted,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub scheme: ScoringScheme,
    /// Points sampled along each edge; `1` samples the midpoint only.
    pub samples: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self { Self { scheme: ScoringScheme::Count, samples: 1 } }
}

/// Safety valves for the Pareto search. Both are unbounded by default;
/// dense graphs should set `max_labels_per_node`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub max_labels_per_node: Option<usize>,
    /// Discard paths longer than this multiple of the shortest path length.
    pub max_length_ratio: Option<f64>,
}

/// Complete run configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub partition: PartitionConfig,
    pub hierarchy: HierarchyConfig,
    pub scoring: ScoringConfig,
    pub search: SearchConfig,
}

impl Config {
    /// Read a configuration from a JSON file. Missing sections take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check option ranges.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.hierarchy.levels >= 1, "[Config] hierarchy.levels must be at least 1");
        ensure!(self.scoring.samples >= 1, "[Config] scoring.samples must be at least 1");
        ensure!(self.partition.epsilon >= 0.0, "[Config] partition.epsilon must be non-negative");
        if let MergeStrategy::NearestCameras { k } = self.hierarchy.strategy {
            ensure!(k >= 1, "[Config] hierarchy.strategy.k must be at least 1");
        }
        if let Some(cap) = self.search.max_labels_per_node {
            ensure!(cap >= 1, "[Config] search.max_labels_per_node must be at least 1");
        }
        if let Some(ratio) = self.search.max_length_ratio {
            ensure!(ratio >= 1.0, "[Config] search.max_length_ratio must be at least 1");
        }
        Ok(())
    }
}
