//! Settings manager - instance cache and persistence orchestration

use super::accessor::SettingsAccessor;
use super::hydrator;
use super::repository::SettingStorage;
use crate::contract::{
    SettingRecord, SettingScope, Settings, SettingsError, SettingsTenant, Tenant,
};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Cache key: (settings type, tenant type, tenant id), absent parts as ""
type InstanceKey = (TypeId, String, String);

type CachedInstance = Arc<dyn Any + Send + Sync>;

/// A hydrated settings group bound to one tenant
///
/// The tenant is fixed at construction. Field values are read and changed
/// through [`read`](Self::read) and [`write`](Self::write); changes become
/// persistent once passed to [`SettingsManager::save`].
pub struct SettingsInstance<S> {
    tenant: Option<Tenant>,
    settings: RwLock<S>,
}

impl<S: Settings> SettingsInstance<S> {
    fn new(tenant: Option<Tenant>, settings: S) -> Self {
        Self {
            tenant,
            settings: RwLock::new(settings),
        }
    }

    pub fn tenant(&self) -> Option<&Tenant> {
        self.tenant.as_ref()
    }

    /// Group, namespace and tenant shared by every record of this instance
    pub fn scope(&self) -> SettingScope {
        SettingScope::new(S::group())
            .with_namespace(S::namespace())
            .with_tenant(self.tenant.as_ref())
    }

    pub fn read(&self) -> RwLockReadGuard<'_, S> {
        self.settings.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, S> {
        self.settings.write()
    }
}

/// Entry point for typed settings
///
/// Keeps one instance per (settings type, tenant) so every caller in the
/// process observes the same in-memory state.
pub struct SettingsManager {
    default_storage: Arc<dyn SettingStorage>,
    named_storages: RwLock<HashMap<String, Arc<dyn SettingStorage>>>,
    instances: RwLock<HashMap<InstanceKey, CachedInstance>>,
}

impl SettingsManager {
    pub fn new(default_storage: Arc<dyn SettingStorage>) -> Self {
        Self {
            default_storage,
            named_storages: RwLock::new(HashMap::new()),
            instances: RwLock::new(HashMap::new()),
        }
    }

    /// Register a storage selected by settings types whose `REPOSITORY` is `name`
    pub fn add_storage(&self, name: impl Into<String>, storage: Arc<dyn SettingStorage>) {
        let name = name.into();
        tracing::debug!(storage = %name, "registering named settings storage");
        self.named_storages.write().insert(name, storage);
    }

    /// Hydrated instance of `S` for `tenant`, loaded on first access
    ///
    /// Repeated calls return the same `Arc` until [`flush`](Self::flush).
    pub async fn get<S: Settings>(
        &self,
        tenant: Option<&Tenant>,
    ) -> Result<Arc<SettingsInstance<S>>, SettingsError> {
        let key = instance_key::<S>(tenant);
        if let Some(instance) = self.cached::<S>(&key) {
            tracing::debug!(group = %S::group(), "settings cache hit");
            return Ok(instance);
        }

        let instance = SettingsInstance::new(tenant.cloned(), S::default());
        let scope = instance.scope();
        let records = self.load_scope::<S>(&scope).await?;
        hydrator::hydrate(&mut *instance.write(), &records);
        tracing::debug!(
            group = %scope.group,
            records = records.len(),
            "settings hydrated from storage"
        );

        let instance: CachedInstance = Arc::new(instance);
        let cached = self
            .instances
            .write()
            .entry(key)
            .or_insert(instance)
            .clone();

        // A concurrent `get` may have won the insert; both hold the same type.
        cached
            .downcast::<SettingsInstance<S>>()
            .map_err(|_| SettingsError::Storage {
                operation: "cache",
                group: scope.group,
                source: anyhow::anyhow!("cached instance has an unexpected type"),
            })
    }

    /// Persist every assigned field of `instance`
    ///
    /// Records are matched against the scope's current records so existing
    /// ids are updated rather than duplicated. Returns the stored records.
    pub async fn save<S: Settings>(
        &self,
        instance: &SettingsInstance<S>,
    ) -> Result<Vec<SettingRecord>, SettingsError> {
        let scope = instance.scope();
        let storage = self.storage_for::<S>();
        let existing = self.load_scope::<S>(&scope).await?;

        // Encode everything before writing so a bad field persists nothing.
        let records = hydrator::extract(&*instance.read(), &scope, existing)?;

        let mut saved = Vec::with_capacity(records.len());
        for record in records {
            let record = storage
                .save(record)
                .await
                .map_err(SettingsError::storage("save", &scope.group))?;
            saved.push(record);
        }

        tracing::info!(
            group = %scope.group,
            tenant_type = scope.tenant_type.as_deref().unwrap_or(""),
            fields = saved.len(),
            "settings saved"
        );
        Ok(saved)
    }

    /// Apply raw submitted strings to `instance` and save it
    ///
    /// Keys that do not name a declared field are ignored.
    pub async fn submit<S: Settings>(
        &self,
        instance: &SettingsInstance<S>,
        input: &HashMap<String, String>,
    ) -> Result<Vec<SettingRecord>, SettingsError> {
        let ignored = hydrator::apply_input(&mut *instance.write(), input);
        if !ignored.is_empty() {
            tracing::debug!(group = %S::group(), ?ignored, "ignoring unknown submitted fields");
        }
        self.save(instance).await
    }

    /// Named settings of `owner` in the default storage
    pub fn accessor(&self, owner: &impl SettingsTenant) -> SettingsAccessor {
        SettingsAccessor::of(self.default_storage.clone(), owner)
    }

    /// Drop every cached instance; persisted data is untouched
    pub fn flush(&self) {
        let mut instances = self.instances.write();
        tracing::debug!(count = instances.len(), "flushing settings cache");
        instances.clear();
    }

    pub fn cached_instances(&self) -> usize {
        self.instances.read().len()
    }

    fn cached<S: Settings>(&self, key: &InstanceKey) -> Option<Arc<SettingsInstance<S>>> {
        let cached = self.instances.read().get(key).cloned()?;
        cached.downcast::<SettingsInstance<S>>().ok()
    }

    fn storage_for<S: Settings>(&self) -> Arc<dyn SettingStorage> {
        S::REPOSITORY
            .and_then(|name| self.named_storages.read().get(name).cloned())
            .unwrap_or_else(|| self.default_storage.clone())
    }

    /// Records of exactly `scope`
    ///
    /// Backend filters treat absent components as wildcards, which would pull
    /// in other tenants' records for the global scope; narrow them here.
    async fn load_scope<S: Settings>(
        &self,
        scope: &SettingScope,
    ) -> Result<Vec<SettingRecord>, SettingsError> {
        let storage = self.storage_for::<S>();
        let mut records = storage
            .all(&scope.filter())
            .await
            .map_err(SettingsError::storage("load", &scope.group))?;
        records.retain(|record| scope.contains(record));
        Ok(records)
    }
}

fn instance_key<S: Settings>(tenant: Option<&Tenant>) -> InstanceKey {
    let tenant_type = tenant.map(|t| t.tenant_type.clone()).unwrap_or_default();
    let tenant_id = tenant
        .and_then(|t| t.id.as_ref())
        .map(ToString::to_string)
        .unwrap_or_default();
    (TypeId::of::<S>(), tenant_type, tenant_id)
}
