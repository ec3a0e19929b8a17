// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Runtime configuration

use crate::mesh::PolytopeSoup;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file, looked up in the working directory
pub const CONFIG_FILE: &str = "coremesh.toml";

/// Which parts of a soup are Morton sorted on conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    None,
    Vertices,
    Elements,
    All,
}

impl std::str::FromStr for SortMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(SortMode::None),
            "vertices" => Ok(SortMode::Vertices),
            "elements" => Ok(SortMode::Elements),
            "all" => Ok(SortMode::All),
            other => anyhow::bail!("unknown sort mode '{other}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Morton reordering applied by `convert`
    pub morton_sort: SortMode,
    /// Use the rayon code paths
    pub parallel: bool,
    /// Relative tolerance for soup comparison
    pub tolerance: f64,
    /// `tracing` filter directive, overridden by `RUST_LOG`
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            morton_sort: SortMode::None,
            parallel: false,
            tolerance: crate::io::DEFAULT_TOLERANCE,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load `coremesh.toml` if present, then apply `COREMESH_*` environment overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(mode) = var("COREMESH_MORTON_SORT") {
            self.morton_sort = mode.parse()?;
        }
        if let Some(parallel) = var("COREMESH_PARALLEL") {
            self.parallel = parallel
                .parse()
                .with_context(|| format!("COREMESH_PARALLEL must be true or false, got '{parallel}'"))?;
        }
        if let Some(tolerance) = var("COREMESH_TOLERANCE") {
            self.tolerance = tolerance
                .parse()
                .with_context(|| format!("COREMESH_TOLERANCE is not a number: '{tolerance}'"))?;
        }
        if let Some(filter) = var("COREMESH_LOG") {
            self.log_filter = filter;
        }
        Ok(())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Apply the configured Morton reordering in place
    pub fn apply_sort(&self, soup: &mut PolytopeSoup) -> Result<()> {
        if matches!(self.morton_sort, SortMode::Vertices | SortMode::All) {
            if self.parallel {
                soup.par_morton_sort_vertices()?;
            } else {
                soup.morton_sort_vertices()?;
            }
        }
        if matches!(self.morton_sort, SortMode::Elements | SortMode::All) {
            if self.parallel {
                soup.par_morton_sort_elements()?;
            } else {
                soup.morton_sort_elements()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coremesh.toml");
        let config = Config {
            morton_sort: SortMode::All,
            parallel: true,
            ..Config::default()
        };
        config.save(&path).unwrap();
        assert_eq!(Config::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("morton_sort = \"vertices\"").unwrap();
        assert_eq!(config.morton_sort, SortMode::Vertices);
        assert!(!config.parallel);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("COREMESH_MORTON_SORT", "Elements"),
            ("COREMESH_PARALLEL", "true"),
            ("COREMESH_TOLERANCE", "1e-6"),
        ]
        .into_iter()
        .collect();
        let mut config = Config::default();
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.morton_sort, SortMode::Elements);
        assert!(config.parallel);
        assert_eq!(config.tolerance, 1e-6);

        let mut config = Config::default();
        assert!(config
            .apply_env(|key| (key == "COREMESH_PARALLEL").then(|| "maybe".to_string()))
            .is_err());
    }
}
