//! Filesystem boundary: CDR snapshots in, configuration, summary artifacts out.

mod error;
pub use error::StoreError;

pub mod artifacts;
pub mod cdr;
pub mod config;
pub mod discover;

pub use artifacts::ArtifactWriter;
pub use cdr::read_cdr;
pub use config::{load_config, write_config};
pub use discover::latest_snapshot;
