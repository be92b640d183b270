use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::io::paths::config_path;
use crate::model::config::BoardConfig;

/// Error type for reading config.toml
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("config must define at least one column")]
    NoColumns,
    #[error("duplicate column id: {0}")]
    DuplicateColumn(String),
}

/// Read `config.toml` from the data directory. A missing file yields the
/// defaults.
pub fn read_config(data_dir: &Path) -> Result<BoardConfig, ConfigError> {
    let path = config_path(data_dir);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(BoardConfig::default());
        }
        Err(e) => return Err(ConfigError::Read { path, source: e }),
    };
    let config: BoardConfig =
        toml::from_str(&text).map_err(|e| ConfigError::Parse { path, source: e })?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &BoardConfig) -> Result<(), ConfigError> {
    if config.columns.is_empty() {
        return Err(ConfigError::NoColumns);
    }
    let mut seen = HashSet::new();
    for column in &config.columns {
        if !seen.insert(column.id.as_str()) {
            return Err(ConfigError::DuplicateColumn(column.id.to_string()));
        }
    }
    Ok(())
}
