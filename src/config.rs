//! Optional TOML configuration file
//!
//! ```toml
//! database = "ledger.db"
//!
//! [bounds]
//! best_co2g = 10
//! worst_co2g = 2000
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{EcoError, Result};
use crate::models::Bounds;

pub const DEFAULT_DATABASE: &str = "ecoledger.db";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub database: Option<PathBuf>,
    #[serde(default)]
    pub bounds: BoundsConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoundsConfig {
    pub best_co2g: Option<f64>,
    pub worst_co2g: Option<f64>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        let bounds = config.default_bounds();
        if !(bounds.best_co2g >= 0.0 && bounds.worst_co2g >= bounds.best_co2g) {
            return Err(EcoError::invalid_input(format!(
                "configured bounds must satisfy worst >= best >= 0 (best {}, worst {})",
                bounds.best_co2g, bounds.worst_co2g
            )));
        }
        Ok(config)
    }

    /// Database path: explicit flag, then config file, then the built-in default
    pub fn database_path(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.database.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE))
    }

    /// Bounds used when a calculation has no product to take them from
    pub fn default_bounds(&self) -> Bounds {
        let fallback = Bounds::default();
        Bounds {
            best_co2g: self.bounds.best_co2g.unwrap_or(fallback.best_co2g),
            worst_co2g: self.bounds.worst_co2g.unwrap_or(fallback.worst_co2g),
        }
    }
}
