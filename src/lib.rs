//! `rx-projections` library crate.
//!
//! The binary (`rxp`) is a thin wrapper around this library so that:
//!
//! - pipeline stages are testable without spawning processes
//! - the snapshot views can be reused by a serving layer
//!
//! Stages, leaf-first: `sources` (+ `normalize`) -> `aggregate` ->
//! `projection` -> `report`, wired together by `app::pipeline`.

pub mod aggregate;
pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod math;
pub mod normalize;
pub mod projection;
pub mod query;
pub mod report;
pub mod sources;
