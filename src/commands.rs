pub mod route;
pub mod zones;

use std::path::Path;

use anyhow::{bail, Result};

use crate::{
    cli::CommonArgs,
    config::{Config, Coordinates},
    io, Camera,
};

/// Reject stdout and, unless `force` is set, existing files.
pub(crate) fn check_output(path: &Path, force: bool) -> Result<()> {
    if path == Path::new("-") { bail!("stdout is not supported."); }
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    Ok(())
}

/// Load the configuration file (if any) and apply command-line overrides.
pub(crate) fn load_config(args: &CommonArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(levels) = args.levels { config.hierarchy.levels = levels }
    if args.geographic { config.input.coordinates = Coordinates::Geographic }
    config.validate()?;
    Ok(config)
}

/// Read the camera manifest and the corridor boundary.
pub(crate) fn load_inputs(args: &CommonArgs) -> Result<(Vec<Camera>, geo::Polygon<f64>)> {
    Ok((io::read_cameras(&args.cameras)?, io::read_boundary(&args.boundary)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args(config: Option<PathBuf>) -> CommonArgs {
        CommonArgs {
            cameras: PathBuf::from("c.json"),
            boundary: PathBuf::from("b.json"),
            config,
            levels: Some(4),
            geographic: true,
            svg: None,
            force: false,
        }
    }

    #[test]
    fn stdout_and_existing_files_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("out.json");
        std::fs::write(&existing, "{}").unwrap();

        assert!(check_output(Path::new("-"), true).is_err());
        assert!(check_output(&existing, false).is_err());
        assert!(check_output(&existing, true).is_ok());
        assert!(check_output(&dir.path().join("new.json"), false).is_ok());
    }

    #[test]
    fn flags_override_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "hierarchy": { "levels": 2 }, "scoring": { "scheme": "weighted" } }"#).unwrap();

        let config = load_config(&args(Some(path))).unwrap();
        assert_eq!(config.hierarchy.levels, 4);
        assert_eq!(config.input.coordinates, Coordinates::Geographic);
        assert_eq!(config.scoring.scheme, crate::config::ScoringScheme::Weighted);

        let mut bad = args(None);
        bad.levels = Some(0);
        assert!(load_config(&bad).is_err());
    }
}
