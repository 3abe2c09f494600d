//! Common test utilities: settings fixtures and storage builders
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::RwLock;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::collections::BTreeMap;
use std::sync::{Arc, Once};
use tenant_settings::{
    FileStorage, Json, Migrator, SeaOrmSettingStorage, SettingFilter, SettingRecord, SettingScope,
    SettingStorage,
};

static TRACING: Once = Once::new();

/// Install a fmt subscriber once per test binary (`RUST_LOG` controls output)
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneralSettings {
    pub site_name: String,
    pub site_active: bool,
    pub max_items: i64,
    pub tax_rate: f64,
    pub supported_locales: Vec<String>,
    pub contact_email: Option<String>,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            site_name: "Marktic".to_string(),
            site_active: true,
            max_items: 10,
            tax_rate: 0.2,
            supported_locales: vec!["en".to_string()],
            contact_email: None,
        }
    }
}

tenant_settings::settings!(GeneralSettings {
    fields { site_name, site_active, max_items, tax_rate, supported_locales, contact_email }
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AutoDerivedSettings {
    pub enabled: bool,
}

tenant_settings::settings!(AutoDerivedSettings {
    fields { enabled }
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameOverrideSettings {
    pub label: String,
}

tenant_settings::settings!(NameOverrideSettings {
    group = "custom_group";
    fields { label }
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamespacedSettings {
    pub retries: u32,
}

tenant_settings::settings!(NamespacedSettings {
    namespace = "mymodule";
    fields { retries }
});

#[derive(Debug, Clone, PartialEq)]
pub struct TenantSettings {
    pub theme: String,
    pub seats: i64,
}

impl Default for TenantSettings {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            seats: 5,
        }
    }
}

tenant_settings::settings!(TenantSettings {
    fields { theme, seats }
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheSettings {
    pub ttl_seconds: i64,
}

tenant_settings::settings!(CacheSettings {
    repository = "cache";
    fields { ttl_seconds }
});

/// Map keyed by tuples, which JSON cannot represent
#[derive(Debug, Clone, Default)]
pub struct RoutingSettings {
    pub label: String,
    pub routes: Json<BTreeMap<(u8, u8), String>>,
}

tenant_settings::settings!(RoutingSettings {
    fields { label, routes }
});

/// Private, migrated in-memory SQLite database
pub async fn database() -> Arc<DatabaseConnection> {
    // One connection, otherwise every pooled connection sees its own database.
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    Arc::new(db)
}

/// Relational storage over a private in-memory SQLite database
pub async fn database_storage() -> Arc<SeaOrmSettingStorage> {
    Arc::new(SeaOrmSettingStorage::new(database().await))
}

/// File storage in a fresh temporary directory
///
/// The directory must outlive the storage.
pub fn file_storage() -> (tempfile::TempDir, Arc<FileStorage>) {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(FileStorage::new(dir.path().join("settings.json")));
    (dir, storage)
}

/// In-memory storage counting writes
#[derive(Default)]
pub struct MockStorage {
    records: RwLock<BTreeMap<i64, SettingRecord>>,
    saves: RwLock<usize>,
}

impl MockStorage {
    pub fn save_count(&self) -> usize {
        *self.saves.read()
    }

    pub fn records(&self) -> Vec<SettingRecord> {
        self.records.read().values().cloned().collect()
    }
}

#[async_trait]
impl SettingStorage for MockStorage {
    async fn find(&self, name: &str, scope: &SettingScope) -> anyhow::Result<Option<SettingRecord>> {
        Ok(self
            .records
            .read()
            .values()
            .find(|r| r.name == name && scope.contains(r))
            .cloned())
    }

    async fn save(&self, mut record: SettingRecord) -> anyhow::Result<SettingRecord> {
        *self.saves.write() += 1;
        let mut records = self.records.write();
        let id = record
            .id
            .unwrap_or_else(|| records.keys().next_back().copied().unwrap_or(0) + 1);
        record.id = Some(id);
        records.insert(id, record.clone());
        Ok(record)
    }

    async fn delete(&self, record: &SettingRecord) -> anyhow::Result<()> {
        if let Some(id) = record.id {
            self.records.write().remove(&id);
        }
        Ok(())
    }

    async fn all(&self, filter: &SettingFilter) -> anyhow::Result<Vec<SettingRecord>> {
        Ok(self
            .records
            .read()
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }
}

/// Storage whose every operation fails
pub struct FailingStorage;

#[async_trait]
impl SettingStorage for FailingStorage {
    async fn find(&self, _: &str, _: &SettingScope) -> anyhow::Result<Option<SettingRecord>> {
        anyhow::bail!("storage offline")
    }

    async fn save(&self, _: SettingRecord) -> anyhow::Result<SettingRecord> {
        anyhow::bail!("storage offline")
    }

    async fn delete(&self, _: &SettingRecord) -> anyhow::Result<()> {
        anyhow::bail!("storage offline")
    }

    async fn all(&self, _: &SettingFilter) -> anyhow::Result<Vec<SettingRecord>> {
        anyhow::bail!("storage offline")
    }
}
