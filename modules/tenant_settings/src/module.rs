//! Composition root: builds storages from configuration and wires the manager

use crate::config::{Config, StorageConfig};
use crate::domain::{SettingStorage, SettingsManager};
use crate::infra::storage::Migrator;
use crate::infra::{FileStorage, SeaOrmSettingStorage};
use anyhow::{Context, Result};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;

/// Tenant settings module
#[derive(Debug, Clone, Default)]
pub struct SettingsModule {
    config: Config,
}

impl SettingsModule {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Connect every configured storage and return a ready manager
    pub async fn init(&self) -> Result<SettingsManager> {
        let default_storage = Self::build_storage(&self.config.default_storage)
            .await
            .context("building default storage")?;
        let manager = SettingsManager::new(default_storage);

        for (name, storage_config) in &self.config.storages {
            let storage = Self::build_storage(storage_config)
                .await
                .with_context(|| format!("building storage `{name}`"))?;
            manager.add_storage(name.clone(), storage);
        }

        tracing::info!(
            named_storages = self.config.storages.len(),
            "Tenant settings initialized"
        );
        Ok(manager)
    }

    /// Apply pending schema migrations on an existing connection
    pub async fn migrate(db: &DatabaseConnection) -> Result<()> {
        Migrator::up(db, None).await?;
        Ok(())
    }

    async fn build_storage(config: &StorageConfig) -> Result<Arc<dyn SettingStorage>> {
        match config {
            StorageConfig::Database {
                url,
                run_migrations,
            } => {
                let db = Database::connect(url.as_str())
                    .await
                    .with_context(|| format!("connecting to {url}"))?;
                if *run_migrations {
                    Self::migrate(&db).await?;
                }
                tracing::debug!(%url, "database storage ready");
                Ok(Arc::new(SeaOrmSettingStorage::new(Arc::new(db))))
            }
            StorageConfig::File { path } => {
                let storage = match path {
                    Some(path) => FileStorage::new(path),
                    None => FileStorage::in_temp_dir(),
                };
                tracing::debug!(path = %storage.path().display(), "file storage ready");
                Ok(Arc::new(storage))
            }
        }
    }
}
