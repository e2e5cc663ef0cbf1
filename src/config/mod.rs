//! Dashboard configuration.
//!
//! ## Loading Order
//!
//! 1. `CAREER_DASH_CONFIG` environment variable (path to TOML file)
//! 2. `career_dash.toml` in the current working directory
//! 3. Built-in defaults (see [`defaults`])
//!
//! `CAREER_DASH_SOURCE` then overrides the dataset location, and command-line
//! flags override everything.
//!
//! ```toml
//! source = "data/df_limpo.csv"
//! fetch_timeout_secs = 10
//!
//! [analysis]
//! top_countries = 20
//! min_country_support = 10
//! ```

pub mod defaults;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::loader::DataSource;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error ({}): {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error ({}): {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("config validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

/// Ranking sizes and thresholds for the analysis tabs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub top_roles: usize,
    pub top_countries: usize,
    pub min_country_support: usize,
    pub top_junior_roles: usize,
    pub junior_spread_roles: usize,
    pub junior_profile_roles: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_roles: defaults::TOP_ROLES,
            top_countries: defaults::TOP_COUNTRIES,
            min_country_support: defaults::MIN_COUNTRY_SUPPORT,
            top_junior_roles: defaults::TOP_JUNIOR_ROLES,
            junior_spread_roles: defaults::JUNIOR_SPREAD_ROLES,
            junior_profile_roles: defaults::JUNIOR_PROFILE_ROLES,
        }
    }
}

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// URL or file path of the CSV dataset.
    pub source: String,
    pub fetch_timeout_secs: u64,
    pub analysis: AnalysisConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: defaults::DEFAULT_SOURCE_URL.to_string(),
            fetch_timeout_secs: defaults::FETCH_TIMEOUT_SECS,
            analysis: AnalysisConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration using the standard search order. Unreadable or
    /// invalid files are logged and skipped.
    pub fn load() -> Self {
        let mut config = Self::load_file_or_default();
        if let Ok(source) = std::env::var(defaults::SOURCE_ENV) {
            log::info!("Dataset source overridden by {}", defaults::SOURCE_ENV);
            config.source = source;
        }
        config
    }

    fn load_file_or_default() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(defaults::CONFIG_ENV) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", p.display());
                        return config;
                    }
                    Err(e) => log::warn!("{e}; falling back"),
                }
            } else {
                log::warn!(
                    "{} points to non-existent file {path}, falling back",
                    defaults::CONFIG_ENV
                );
            }
        }

        // 2. Check ./career_dash.toml
        let local = PathBuf::from(defaults::LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    log::info!("Loaded config from ./{}", defaults::LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => log::warn!("{e}; using defaults"),
            }
        }

        // 3. Defaults
        log::info!("No config file found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&contents).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make a tab meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        if self.source.trim().is_empty() {
            errors.push("source must not be empty".to_string());
        }
        if self.fetch_timeout_secs == 0 {
            errors.push("fetch_timeout_secs must be positive".to_string());
        }
        let a = &self.analysis;
        for (name, value) in [
            ("analysis.top_roles", a.top_roles),
            ("analysis.top_countries", a.top_countries),
            ("analysis.min_country_support", a.min_country_support),
            ("analysis.top_junior_roles", a.top_junior_roles),
            ("analysis.junior_spread_roles", a.junior_spread_roles),
            ("analysis.junior_profile_roles", a.junior_profile_roles),
        ] {
            if value == 0 {
                errors.push(format!("{name} must be at least 1"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    pub fn data_source(&self) -> DataSource {
        DataSource::parse(&self.source)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
