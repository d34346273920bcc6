//! Postcode → polygon resolution.
//!
//! [`GeometryResolver`] turns a list of postcode strings into a
//! [`GeometryTable`](crate::geometry::GeometryTable), loading each needed
//! shard once. Postcodes that cannot be resolved never abort the batch; they
//! are collected in [`Resolution::unresolved`] with a reason and summarized by
//! [`ResolutionSummary`].
//!
//! ```text
//! "CB30DG" ──parse──► Postcode ──shard_key──► "cb" ──ShardCache──► PolygonTable
//!                                                                      │
//!                                                   exact match ◄──────┘
//! ```

mod resolver;
mod summary;

pub use resolver::{resolve_with, GeometryResolver, Resolution, UnresolvedPostcode, UnresolvedReason};
pub use summary::{ReasonCount, ResolutionSummary, MAX_SAMPLES};
