//! Configuration file I/O.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use callstats_core::SummaryConfig;
use tracing::info;

use crate::StoreError;

/// Load and validate a TOML configuration file.
pub fn load_config(path: &Path) -> Result<SummaryConfig, StoreError> {
    if !path.is_file() {
        return Err(StoreError::ConfigNotFound(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path).map_err(|source| StoreError::ConfigUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let config = SummaryConfig::from_toml_str(&text).map_err(|source| StoreError::ConfigInvalid {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        path = %path.display(),
        staff = config.roster.len(),
        extensions = config.extensions.len(),
        "loaded configuration"
    );
    Ok(config)
}

/// Write `config` as TOML to a new file; an existing file is left alone.
pub fn write_config(path: &Path, config: &SummaryConfig) -> Result<(), StoreError> {
    let text = config.to_toml_string().map_err(|source| StoreError::ConfigInvalid {
        path: path.to_path_buf(),
        source,
    })?;
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            return Err(StoreError::AlreadyExists(path.to_path_buf()));
        }
        Err(e) => return Err(write_err(e)),
    };
    file.write_all(text.as_bytes()).map_err(write_err)?;
    info!(path = %path.display(), "wrote configuration");
    Ok(())
}
