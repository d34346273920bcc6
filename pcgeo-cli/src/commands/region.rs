//! Region set commands: `build`, `regions`, `invalidate`.

use std::path::{Path, PathBuf};

use pcgeo::config::{config_file_path, ConfigFile};
use pcgeo::pipeline::{load_regional_data, RegionalRequest};
use pcgeo::store::{BuildOptions, BuildOrigin, RegionStore};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for `pcgeo build`.
#[derive(Debug, clap::Args)]
pub struct BuildArgs {
    /// Region name (default: region.default from config)
    #[arg(long)]
    pub region: Option<String>,

    /// Metrics file whose postcode column defines the region
    #[arg(long)]
    pub metrics: Option<PathBuf>,

    /// Root of the postcode shapefile collection
    #[arg(long)]
    pub shapefiles: Option<PathBuf>,

    /// Directory of persisted region sets
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Resolve again even if a persisted set exists
    #[arg(long)]
    pub force: bool,
}

/// Build (or reuse) the region's geometry set.
pub fn run_build(args: BuildArgs, debug: bool) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(debug)?;
    runner.log_startup("build");

    let region = runner.region(args.region);
    let metrics_path = runner.metrics_file(args.metrics)?;
    let store = runner.store(args.store);
    let request = RegionalRequest::new(&region, runner.shapefile_dir(args.shapefiles)?)
        .with_store_dir(store.directory())
        .with_build_options(BuildOptions {
            force_rebuild: args.force,
            ..BuildOptions::default()
        });

    let data = load_regional_data(&request, &metrics_path)?;

    println!("Region:          {}", data.region);
    println!("Postcode column: {}", data.postcode_column);
    if !data.quality.looks_standard() {
        println!(
            "Warning: only {}/{} sampled postcodes look like UK postcodes",
            data.quality.valid, data.quality.sampled
        );
    }

    if let Some(failure) = data.failure {
        return Err(CliError::Region { region, failure });
    }

    if let Some(set) = &data.geometry {
        println!("Polygons:        {}", set.table.len());
    }
    match &data.origin {
        Some(BuildOrigin::Loaded { path }) => {
            println!("Source:          existing file {}", path.display());
            println!("(use --force or `pcgeo invalidate` to rebuild)");
        }
        Some(BuildOrigin::Resolved {
            summary, persisted, ..
        }) => {
            println!("Resolved:        {}", summary);
            match persisted {
                Some(path) => println!("Saved:           {}", path.display()),
                None => println!("Saved:           no (see log)"),
            }
        }
        None => {}
    }

    Ok(())
}

/// Arguments for `pcgeo regions`.
#[derive(Debug, clap::Args)]
pub struct RegionsArgs {
    /// Directory of persisted region sets
    #[arg(long)]
    pub store: Option<PathBuf>,
}

/// List regions with a persisted set.
pub fn run_regions(args: RegionsArgs) -> Result<(), CliError> {
    let store = store_from_config(args.store, &config_file_path())?;
    let regions = store.list_regions()?;

    if regions.is_empty() {
        println!("No regions built in {}", store.directory().display());
    } else {
        for region in regions {
            println!("{}", region);
        }
    }

    Ok(())
}

/// Arguments for `pcgeo invalidate`.
#[derive(Debug, clap::Args)]
pub struct InvalidateArgs {
    /// Region whose persisted set is deleted
    #[arg(long)]
    pub region: String,

    /// Directory of persisted region sets
    #[arg(long)]
    pub store: Option<PathBuf>,
}

/// Delete a region's persisted set so the next build resolves it again.
pub fn run_invalidate(args: InvalidateArgs, debug: bool) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(debug)?;
    runner.log_startup("invalidate");

    let store = runner.store(args.store);
    if store.invalidate(&args.region)? {
        println!("Removed {}", store.region_path(&args.region).display());
    } else {
        println!("Region '{}' has no persisted set", args.region);
    }

    Ok(())
}

/// Store for commands that do not set up logging.
///
/// `--store` wins; otherwise the config file at `config_path` decides, and a
/// config that fails to load is an error.
fn store_from_config(
    cli_path: Option<PathBuf>,
    config_path: &Path,
) -> Result<RegionStore, CliError> {
    let directory = match cli_path {
        Some(path) => path,
        None => ConfigFile::load_from(config_path)?.store.directory,
    };
    Ok(RegionStore::new(directory))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_store_from_config_prefers_flag() {
        let temp = TempDir::new().unwrap();
        let store =
            store_from_config(Some(temp.path().join("flag")), &temp.path().join("absent.ini"))
                .unwrap();
        assert_eq!(store.directory(), temp.path().join("flag"));
    }

    #[test]
    fn test_store_from_config_reads_store_directory() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.ini");
        std::fs::write(&config_path, "[store]\ndirectory = /srv/regions\n").unwrap();

        let store = store_from_config(None, &config_path).unwrap();
        assert_eq!(store.directory(), Path::new("/srv/regions"));
    }

    #[test]
    fn test_store_from_config_rejects_invalid_config() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.ini");
        std::fs::write(&config_path, "[region]\ndefault = ../EE\n").unwrap();

        let err = store_from_config(None, &config_path).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }
}
