//! `pcgeo join` - merge a metrics file with its region's polygons.

use std::path::PathBuf;

use pcgeo::join::ColumnSelection;
use pcgeo::pipeline::{load_regional_data, RegionalRequest};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for `pcgeo join`.
#[derive(Debug, clap::Args)]
pub struct JoinArgs {
    /// Region name (default: region.default from config)
    #[arg(long)]
    pub region: Option<String>,

    /// Metrics file (CSV or JSON)
    #[arg(long)]
    pub metrics: Option<PathBuf>,

    /// Root of the postcode shapefile collection
    #[arg(long)]
    pub shapefiles: Option<PathBuf>,

    /// Directory of persisted region sets
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Metric column to summarise (repeatable; default: metrics.columns from config)
    #[arg(long = "metric")]
    pub metrics_columns: Vec<String>,

    /// Fail if more than one column looks like a postcode column
    #[arg(long)]
    pub strict_column: bool,

    /// Write joined rows as a GeoJSON FeatureCollection
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Include rows without geometry in the GeoJSON output
    #[arg(long, requires = "output")]
    pub include_unmatched: bool,
}

/// Run the pipeline and report match statistics.
pub fn run(args: JoinArgs, debug: bool) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(debug)?;
    runner.log_startup("join");

    let region = runner.region(args.region);
    let metrics_path = runner.metrics_file(args.metrics)?;
    let store = runner.store(args.store);
    let selection = if args.strict_column {
        ColumnSelection::Unambiguous
    } else {
        ColumnSelection::First
    };
    let request = RegionalRequest::new(&region, runner.shapefile_dir(args.shapefiles)?)
        .with_store_dir(store.directory())
        .with_metric_columns(runner.metric_columns(args.metrics_columns))
        .with_column_selection(selection);

    let data = load_regional_data(&request, &metrics_path)?;
    if let Some(failure) = data.failure {
        return Err(CliError::Region { region, failure });
    }

    println!("Region:          {}", data.region);
    println!("Postcode column: {}", data.postcode_column);
    if let Some(stats) = &data.stats {
        println!("Matched rows:    {}", stats);
    }
    for missing in &data.missing_metrics {
        println!("Warning: metric column '{}' not found", missing);
    }

    let Some(joined) = &data.joined else {
        return Ok(());
    };

    if !data.metric_columns.is_empty() {
        println!();
        println!("{:<28} {:>8} {:>12} {:>12} {:>12}", "Metric", "Count", "Min", "Max", "Mean");
        for column in &data.metric_columns {
            // Columns were checked against the table by the pipeline.
            match joined.metric_summary(column) {
                Ok(Some(s)) => println!(
                    "{:<28} {:>8} {:>12.2} {:>12.2} {:>12.2}",
                    column, s.count, s.min, s.max, s.mean
                ),
                Ok(None) => println!("{:<28} {:>8}", column, "no data"),
                Err(e) => println!("{:<28} {}", column, e),
            }
        }
    }

    if let Some(output) = &args.output {
        let collection = joined.to_feature_collection(args.include_unmatched);
        let count = collection.features.len();
        let text = serde_json::to_string_pretty(&collection)
            .map_err(|e| CliError::Encode(e.to_string()))?;
        runner.write_output(output, &text)?;
        println!();
        println!("Wrote {} features to {}", count, output.display());
    }

    Ok(())
}
