//! pcgeo - UK postcode polygon resolution and tabular joins
//!
//! Resolves postcodes to boundary polygons from a prefix-sharded shapefile
//! collection, caches the resolved set per named region, and left-joins it
//! onto a metrics table with match-rate diagnostics.
//!
//! # High-Level API
//!
//! For most use cases, the [`pipeline`] module runs the whole flow:
//!
//! ```no_run
//! use pcgeo::pipeline::{load_regional_data, RegionalRequest};
//! use std::path::Path;
//!
//! let request = RegionalRequest::new("EE", "/data/codepoint-poly")
//!     .with_metric_columns(["PPI"]);
//! let data = load_regional_data(&request, Path::new("epc.csv"))?;
//! if let Some(stats) = data.stats {
//!     println!("matched {}", stats);
//! }
//! # Ok::<(), pcgeo::pipeline::PipelineError>(())
//! ```
//!
//! The lower layers are usable on their own:
//!
//! - [`postcode`] - postcode validation and shard keys
//! - [`shard`] - shapefile shard loading and per-pass caching
//! - [`resolve`] - postcode to polygon resolution with failure reasons
//! - [`store`] - persisted per-region geometry sets and the region catalog
//! - [`table`] - CSV/JSON metrics tables
//! - [`join`] - left join, match statistics, GeoJSON export

pub mod config;
pub mod geometry;
pub mod join;
pub mod logging;
pub mod pipeline;
pub mod postcode;
pub mod resolve;
pub mod shard;
pub mod store;
pub mod table;

/// Version of the pcgeo library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
