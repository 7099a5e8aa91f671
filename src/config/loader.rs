//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the
//! regulatory tables from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{CreditConfig, EngineConfig, EngineMetadata, TaxYearConfig, UifConfig};

/// Loads and provides access to the engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/za/
/// ├── engine.yaml      # Rule set metadata
/// ├── credit.yaml      # Rate caps, fees, affordability policy
/// ├── uif.yaml         # UIF ceiling, replacement rates, credit days
/// └── tax/
///     └── 2024-2025.yaml  # One file per year of assessment
/// ```
///
/// Tables are loaded once and never change afterwards, so a loader can be
/// shared freely between threads.
///
/// # Example
///
/// ```no_run
/// use estimator_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/za").unwrap();
/// let year = loader.config().tax_year("2024/2025").unwrap();
/// println!("Loaded {} with {} brackets", year.label, year.brackets.len());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if any required file is missing, contains invalid
    /// YAML, or if a tax year's brackets are not contiguous and continuous.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<EngineMetadata>(&path.join("engine.yaml"))?;
        let credit = Self::load_yaml::<CreditConfig>(&path.join("credit.yaml"))?;
        let uif = Self::load_yaml::<UifConfig>(&path.join("uif.yaml"))?;
        let tax_years = Self::load_tax_years(&path.join("tax"))?;

        debug!(
            jurisdiction = %metadata.jurisdiction,
            version = %metadata.version,
            tax_years = tax_years.len(),
            "Loaded estimator configuration"
        );

        Ok(Self {
            config: EngineConfig::new(metadata, credit, uif, tax_years),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads and validates every tax year file in the tax directory.
    fn load_tax_years(tax_dir: &Path) -> EngineResult<Vec<TaxYearConfig>> {
        let tax_dir_str = tax_dir.display().to_string();

        let entries = fs::read_dir(tax_dir).map_err(|_| EngineError::ConfigNotFound {
            path: tax_dir_str.clone(),
        })?;

        let mut years: Vec<TaxYearConfig> = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: tax_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let year = Self::load_yaml::<TaxYearConfig>(&path)?;
                year.validate()?;
                if years.iter().any(|existing| existing.key == year.key) {
                    return Err(EngineError::InvalidConfig {
                        section: path.display().to_string(),
                        message: format!("duplicate tax year key '{}'", year.key),
                    });
                }
                years.push(year);
            }
        }

        if years.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no tax year files found)", tax_dir_str),
            });
        }

        Ok(years)
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the rule set metadata.
    pub fn metadata(&self) -> &EngineMetadata {
        self.config.metadata()
    }
}
