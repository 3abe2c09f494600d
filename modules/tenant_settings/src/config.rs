//! Configuration for the tenant settings module

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Environment variable prefix; `__` separates nested keys
pub const ENV_PREFIX: &str = "TENANT_SETTINGS__";

/// Tenant settings configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Storage used by settings types that do not name a repository
    #[serde(default)]
    pub default_storage: StorageConfig,

    /// Additional storages addressable by name
    #[serde(default)]
    pub storages: BTreeMap<String, StorageConfig>,
}

/// A single storage backend
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageConfig {
    Database {
        url: String,
        #[serde(default = "default_true")]
        run_migrations: bool,
    },
    File {
        /// Defaults to `tenant_settings_cache.json` in the temp directory
        #[serde(default)]
        path: Option<PathBuf>,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::File { path: None }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load from an optional YAML file with environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment
            .extract()
            .context("invalid tenant settings configuration")
    }

    /// Parse a YAML document without consulting the environment
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Figment::new()
            .merge(Yaml::string(yaml))
            .extract()
            .context("invalid tenant settings configuration")
    }
}
