//! Summarization engine: turns call-detail records into zero-filled,
//! per-staff call rollups by hour, day, ISO week and month.

pub mod aggregate;
pub mod complete;
pub mod config;
pub mod enrich;
mod error;
pub mod partition;
pub mod pipeline;
pub mod record;
pub mod resolver;
pub mod schema;

pub use config::{HourRange, SummaryConfig};
pub use enrich::{PerformanceTag, SummaryRow, SummaryTable};
pub use error::ConfigError;
pub use partition::{Granularity, Period, WindowKey};
pub use pipeline::{Summaries, summarize};
pub use record::{CallRecord, NormalizeStats};
pub use resolver::{ExtensionResolver, StaffIdentity};
pub use schema::artifact;
