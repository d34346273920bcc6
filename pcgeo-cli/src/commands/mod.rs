//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (get, set, list, path, init)
//! - [`join`] - Join a metrics file to its region's polygons
//! - [`region`] - Build, list and invalidate persisted region sets

pub mod config;
pub mod join;
pub mod region;
