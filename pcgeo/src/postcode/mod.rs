//! UK postcode parsing and shard-key derivation.
//!
//! A [`Postcode`] is the join key used throughout the pipeline. Every postcode
//! lives in exactly one on-disk polygon shard, identified by a [`ShardKey`]
//! derived from its one- or two-letter area prefix.
//!
//! # Shard layout
//!
//! ```text
//! <shapefile root>
//! ├── one_letter_pc_code/
//! │   └── b/b.shp          ← B1 1AA, B12 9XY, ...
//! └── two_letter_pc_code/
//!     └── cb.shp           ← CB3 0DG, CB30DG, ...
//! ```
//!
//! # Usage
//!
//! ```
//! use pcgeo::postcode::{Postcode, ShardKey};
//!
//! let postcode = Postcode::parse("CB3 0DG").unwrap();
//! assert_eq!(postcode.shard_key().as_str(), "cb");
//!
//! assert!(Postcode::parse("123ABC").is_err());
//! assert!(ShardKey::from_postcode("B1 1AA").unwrap().is_single_letter());
//! ```

mod format;
mod quality;
mod shard_key;

pub use format::{Postcode, PostcodeError};
pub use quality::{assess_sample, PostcodeQuality, QUALITY_SAMPLE_SIZE, QUALITY_THRESHOLD};
pub use shard_key::{ShardKey, ONE_LETTER_DIR, TWO_LETTER_DIR};
