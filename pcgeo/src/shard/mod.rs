//! Polygon shard loading and per-pass memoization.
//!
//! Shards are read through the [`ShardSource`] trait so resolution can run
//! against the on-disk shapefile collection ([`ShapefileShards`]) or any other
//! provider. A [`ShardCache`] wraps a source for the duration of one
//! resolution pass, loading each shard at most once, including failures.

mod cache;
#[cfg(test)]
mod memory;
mod source;
mod table;

pub use cache::{ShardCache, ShardCacheStats};
#[cfg(test)]
pub(crate) use memory::MemoryShards;
pub use source::{ShapefileShards, ShardError, ShardSource};
pub use table::PolygonTable;
