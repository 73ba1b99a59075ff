use thiserror::Error;

/// Configuration problems that make a summary run impossible.
///
/// Every variant is fatal: without a valid roster and extension map the
/// completeness guarantee cannot hold, so the run stops before aggregation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration has an empty staff roster")]
    EmptyRoster,

    #[error("configuration has an empty extension map")]
    EmptyExtensionMap,

    #[error("staff member {0:?} appears more than once in the roster")]
    DuplicateStaff(String),

    #[error("extension key {0:?} is not a digit sequence (optionally prefixed with '*')")]
    InvalidExtension(String),

    #[error("extension {extension:?} maps to {staff:?}, who is not in the roster")]
    UnknownStaff { extension: String, staff: String },

    #[error("business hours {start}..={end} are not a valid range within 0..=23")]
    InvalidHourRange { start: u32, end: u32 },

    #[error("performance multiplier {0} must be a positive finite number")]
    InvalidMultiplier(f64),

    #[error("configuration parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("configuration encode error: {0}")]
    Encode(#[from] toml::ser::Error),
}
