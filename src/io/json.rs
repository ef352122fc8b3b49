use std::{fs::File, io::{BufWriter, Write}, path::Path};

use anyhow::{Context, Result};

use crate::search::ParetoFrontier;

/// Write frontiers as a JSON array of `{ start, goal, level, truncated, paths }` records.
pub fn write_frontiers(path: &Path, frontiers: &[ParetoFrontier]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("[write_frontiers] Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, frontiers)
        .with_context(|| format!("[write_frontiers] Failed to serialize {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

/// Read frontier records written by [`write_frontiers`].
pub fn read_frontiers(path: &Path) -> Result<Vec<ParetoFrontier>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to read frontier file: {}", path.display()))?;
    serde_json::from_reader(std::io::BufReader::new(file))
        .with_context(|| format!("[read_frontiers] Failed to parse {}", path.display()))
}
