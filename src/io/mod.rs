//! Input/output helpers.
//!
//! - week label → date resolution (`labels`)
//! - export folder discovery (`discovery`)
//! - CSV ingest into raw tables (`ingest`)
//! - atomic snapshot export (`export`)

pub mod discovery;
pub mod export;
pub mod ingest;
pub mod labels;

pub use discovery::*;
pub use export::*;
pub use ingest::*;
pub use labels::*;
