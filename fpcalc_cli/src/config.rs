//! CLI configuration file (`fpcalc.toml`).
//!
//! Lookup order: `--config`, then `FPCALC_CONFIG`, then `fpcalc.toml` in the
//! working directory. A missing default file is not an error; every field has
//! a default.
//!
//! ```toml
//! [usgs]
//! endpoint = "https://earthquake.usgs.gov/ws/designmaps/asce7-22.json"
//! timeout_secs = 15
//! title = "FpCalc"
//! cache_ttl_secs = 3600
//!
//! [geocode]
//! endpoint = "https://nominatim.openstreetmap.org/search"
//! timeout_secs = 15
//! min_interval_ms = 1000
//! cache_ttl_secs = 3600
//!
//! [report]
//! engineer = "Jane Engineer"
//! job_id = "25-001"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};

pub const CONFIG_ENV: &str = "FPCALC_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "fpcalc.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub usgs: UsgsConfig,
    pub geocode: GeocodeConfig,
    pub report: ReportConfig,
}

/// USGS design-maps web service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsgsConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
    /// `title` query parameter sent with each request
    pub title: String,
    pub cache_ttl_secs: u64,
}

impl Default for UsgsConfig {
    fn default() -> Self {
        UsgsConfig {
            endpoint: "https://earthquake.usgs.gov/ws/designmaps/asce7-22.json".to_string(),
            timeout_secs: 15,
            title: "FpCalc".to_string(),
            cache_ttl_secs: 3600,
        }
    }
}

/// Address geocoder (Nominatim search API) settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodeConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
    /// Minimum spacing between requests; the public service allows one per second
    pub min_interval_ms: u64,
    pub cache_ttl_secs: u64,
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        GeocodeConfig {
            endpoint: "https://nominatim.openstreetmap.org/search".to_string(),
            timeout_secs: 15,
            min_interval_ms: 1000,
            cache_ttl_secs: 3600,
        }
    }
}

/// Title-block defaults for PDF reports
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub engineer: String,
    pub job_id: String,
}

impl CliConfig {
    pub fn from_toml(text: &str) -> CliResult<Self> {
        toml::from_str(text).map_err(|e| CliError::Config(e.to_string()))
    }

    /// Load the configuration, falling back to defaults when no file exists.
    pub fn load(explicit: Option<&Path>) -> CliResult<Self> {
        let (path, required) = match explicit {
            Some(p) => (p.to_path_buf(), true),
            None => match std::env::var_os(CONFIG_ENV) {
                Some(p) => (PathBuf::from(p), true),
                None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
            },
        };

        if !required && !path.exists() {
            tracing::debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
            return Ok(CliConfig::default());
        }

        let text = std::fs::read_to_string(&path).map_err(|source| CliError::Io {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_toml(&text)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }
}
