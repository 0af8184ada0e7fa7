//! TOML configuration for the command-line front end.
//!
//! Every section is optional; anything left out keeps the compiled-in 2024
//! tables.
//!
//! ```toml
//! dataset = "data/salarios_mercado.csv"
//! log_file = "cltpj.log"
//!
//! [engine.tax_tables]
//! fgts_rate = "0.08"
//!
//! [engine.contractor]
//! minimum_wage = "1412.00"
//! mei_monthly_levy = "72.00"
//! ```

use std::path::{Path, PathBuf};

use cltpj_core::{ConfigError, EngineConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Dataset looked up in the working directory when none is configured.
pub const DEFAULT_DATASET: &str = "salarios_mercado.csv";

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid engine configuration: {0}")]
    Invalid(#[from] ConfigError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub dataset: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub engine: EngineConfig,
}

impl AppConfig {
    /// Reads and validates a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text, &path.display().to_string())
    }

    /// Parses and validates TOML text; `origin` only appears in errors.
    pub fn parse(text: &str, origin: &str) -> Result<Self, ConfigLoadError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigLoadError::Parse {
            path: origin.to_string(),
            source,
        })?;
        config.engine.validate()?;
        Ok(config)
    }

    /// `override_path` wins over the configured path, which wins over
    /// [`DEFAULT_DATASET`].
    pub fn dataset_path(&self, override_path: Option<&Path>) -> PathBuf {
        override_path
            .map(Path::to_path_buf)
            .or_else(|| self.dataset.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET))
    }
}
