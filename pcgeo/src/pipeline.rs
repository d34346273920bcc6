//! Regional pipeline: metrics table in, joined geometry out.
//!
//! ```text
//!  metrics file ──► MetricsTable ──► postcode column ──► unique postcodes
//!                                                              │
//!                      RegionStore::get_or_build ◄─────────────┘
//!                              │
//!                              ▼
//!                     join(metrics, geometry) ──► RegionalData
//! ```
//!
//! Resolution for a region always completes before the join starts. Region
//! level failures (no postcodes, nothing resolved) come back inside
//! [`RegionalData`] with the raw metrics table still attached; only malformed
//! input (unreadable file, no postcode column) is an `Err`.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

use crate::join::{self, detect_postcode_column, ColumnSelection, JoinError, JoinedTable, MatchStats};
use crate::postcode::{assess_sample, PostcodeQuality, QUALITY_SAMPLE_SIZE};
use crate::resolve::{GeometryResolver, ResolutionSummary};
use crate::shard::{ShapefileShards, ShardSource};
use crate::store::{BuildOptions, BuildOrigin, RegionGeoSet, RegionStore, StoreError};
use crate::table::{load_metrics, CellValue, MetricsTable, TableError};

/// Default region name.
pub const DEFAULT_REGION: &str = "EE";

/// Default directory of persisted region sets.
pub const DEFAULT_STORE_DIR: &str = "./geo_files";

/// Errors that stop the pipeline for a region.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Join(#[from] JoinError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Why a region produced no usable joined table.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionFailure {
    /// The postcode column holds no values and no persisted set exists.
    NoPostcodes,
    /// None of the postcodes resolved to a polygon.
    NoGeometryResolved { summary: ResolutionSummary },
    /// The metrics table has no rows.
    NoData,
}

impl fmt::Display for RegionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionFailure::NoPostcodes => write!(f, "no postcodes in the metrics table"),
            RegionFailure::NoGeometryResolved { summary } => {
                write!(f, "no geometry resolved ({})", summary)
            }
            RegionFailure::NoData => write!(f, "metrics table has no rows"),
        }
    }
}

/// What to run the pipeline on.
#[derive(Debug, Clone)]
pub struct RegionalRequest {
    /// Region name; also the persisted file name.
    pub region: String,
    /// Root of the shapefile shard collection.
    pub shapefile_root: PathBuf,
    /// Directory of persisted region sets.
    pub store_dir: PathBuf,
    /// Metric columns the caller wants to display.
    pub metric_columns: Vec<String>,
    /// Postcode column choice.
    pub column_selection: ColumnSelection,
    /// Region set build options.
    pub build: BuildOptions,
}

impl RegionalRequest {
    /// A request with the default store directory and no metric columns.
    pub fn new(region: impl Into<String>, shapefile_root: impl Into<PathBuf>) -> Self {
        Self {
            region: region.into(),
            shapefile_root: shapefile_root.into(),
            store_dir: PathBuf::from(DEFAULT_STORE_DIR),
            metric_columns: Vec::new(),
            column_selection: ColumnSelection::default(),
            build: BuildOptions::default(),
        }
    }

    /// Set the store directory.
    pub fn with_store_dir(mut self, store_dir: impl Into<PathBuf>) -> Self {
        self.store_dir = store_dir.into();
        self
    }

    /// Set the metric columns.
    pub fn with_metric_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metric_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the postcode column choice.
    pub fn with_column_selection(mut self, selection: ColumnSelection) -> Self {
        self.column_selection = selection;
        self
    }

    /// Set the build options.
    pub fn with_build_options(mut self, build: BuildOptions) -> Self {
        self.build = build;
        self
    }
}

/// Everything the presentation layer needs for one region.
#[derive(Debug, Clone)]
pub struct RegionalData {
    pub region: String,
    /// Detected postcode column.
    pub postcode_column: String,
    /// The metrics table as loaded.
    pub metrics: MetricsTable,
    /// Region geometry, absent on failure.
    pub geometry: Option<RegionGeoSet>,
    /// How the geometry was obtained.
    pub origin: Option<BuildOrigin>,
    /// Metrics left-joined with geometry, absent on failure.
    pub joined: Option<JoinedTable>,
    pub stats: Option<MatchStats>,
    /// Requested metric columns present in the table, in request order.
    pub metric_columns: Vec<String>,
    /// Requested metric columns the table lacks.
    pub missing_metrics: Vec<String>,
    /// Advisory check of the postcode column.
    pub quality: PostcodeQuality,
    pub failure: Option<RegionFailure>,
}

impl RegionalData {
    /// True when a joined table was produced.
    pub fn success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Load the metrics file and run the pipeline against on-disk shapefiles.
pub fn load_regional_data(
    request: &RegionalRequest,
    metrics_path: &std::path::Path,
) -> Result<RegionalData, PipelineError> {
    let metrics = load_metrics(metrics_path)?;
    let resolver = GeometryResolver::new(ShapefileShards::new(&request.shapefile_root));
    let store = RegionStore::new(&request.store_dir);
    run_regional(request, metrics, &resolver, &store)
}

/// Run the pipeline on an already loaded metrics table.
pub fn run_regional<S: ShardSource>(
    request: &RegionalRequest,
    metrics: MetricsTable,
    resolver: &GeometryResolver<S>,
    store: &RegionStore,
) -> Result<RegionalData, PipelineError> {
    let region = request.region.as_str();
    let postcode_column =
        detect_postcode_column(metrics.columns(), request.column_selection)?.to_string();

    let (metric_columns, missing_metrics): (Vec<String>, Vec<String>) = request
        .metric_columns
        .iter()
        .cloned()
        .partition(|c| metrics.column_index(c).is_some());
    if !missing_metrics.is_empty() {
        warn!(region = %region, missing = ?missing_metrics, "Requested metric columns not in table");
    }

    let sample: Vec<String> = metrics
        .column(&postcode_column)?
        .filter_map(CellValue::as_key)
        .take(QUALITY_SAMPLE_SIZE)
        .collect();
    let quality = assess_sample(sample.iter().map(String::as_str));
    if !quality.looks_standard() {
        warn!(
            region = %region,
            column = %postcode_column,
            valid = quality.valid,
            sampled = quality.sampled,
            "Postcode column does not look like standard UK postcodes"
        );
    }

    let mut data = RegionalData {
        region: region.to_string(),
        postcode_column,
        metrics,
        geometry: None,
        origin: None,
        joined: None,
        stats: None,
        metric_columns,
        missing_metrics,
        quality,
        failure: None,
    };

    if data.metrics.is_empty() {
        warn!(region = %region, "Metrics table has no rows");
        data.stats = Some(MatchStats::new(0, 0));
        data.failure = Some(RegionFailure::NoData);
        return Ok(data);
    }

    let postcodes = data.metrics.unique_postcodes(&data.postcode_column)?;
    let reusable = !request.build.force_rebuild && store.exists(region);
    if postcodes.is_empty() && !reusable {
        warn!(region = %region, column = %data.postcode_column, "No postcodes to resolve");
        data.failure = Some(RegionFailure::NoPostcodes);
        return Ok(data);
    }

    let build = match store.get_or_build(region, &postcodes, resolver, request.build) {
        Ok(build) => build,
        Err(StoreError::NoGeometryResolved { summary, .. }) => {
            data.failure = Some(RegionFailure::NoGeometryResolved { summary });
            return Ok(data);
        }
        Err(e) => return Err(e.into()),
    };

    let outcome = join::join(&data.metrics, &build.set.table, &data.postcode_column)?;
    info!(
        region = %region,
        rows = outcome.table.len(),
        polygons = build.set.table.len(),
        "Regional data ready"
    );

    data.geometry = Some(build.set);
    data.origin = Some(build.origin);
    data.joined = Some(outcome.table);
    data.stats = Some(outcome.stats);
    Ok(data)
}
