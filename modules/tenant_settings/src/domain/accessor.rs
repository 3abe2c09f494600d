//! Ad-hoc access to single named settings of one tenant
//!
//! Complements typed settings groups for values that have no declared field:
//! each call addresses one record by name and group within the tenant's
//! non-namespaced scope.

use super::repository::SettingStorage;
use crate::contract::{
    SettingRecord, SettingScope, SettingType, SettingValue, SettingsError,
    SettingsTenant, Tenant, DEFAULT_GROUP,
};
use std::sync::Arc;

/// Named settings of one tenant over a storage backend
pub struct SettingsAccessor {
    storage: Arc<dyn SettingStorage>,
    tenant: Tenant,
}

impl SettingsAccessor {
    pub fn new(storage: Arc<dyn SettingStorage>, tenant: Tenant) -> Self {
        Self { storage, tenant }
    }

    /// Accessor for a domain object owning settings
    pub fn of(storage: Arc<dyn SettingStorage>, owner: &impl SettingsTenant) -> Self {
        Self::new(storage, owner.settings_tenant())
    }

    pub fn tenant(&self) -> &Tenant {
        &self.tenant
    }

    fn scope(&self, group: Option<&str>) -> SettingScope {
        SettingScope::new(group.unwrap_or(DEFAULT_GROUP)).with_tenant(Some(&self.tenant))
    }

    /// Stored record `name` in `group` (`default` when `None`)
    pub async fn get(
        &self,
        name: &str,
        group: Option<&str>,
    ) -> Result<Option<SettingRecord>, SettingsError> {
        let scope = self.scope(group);
        self.storage
            .find(name, &scope)
            .await
            .map_err(SettingsError::storage("find", &scope.group))
    }

    /// Decoded value of `name`, `None` when nothing is stored
    pub async fn value(
        &self,
        name: &str,
        group: Option<&str>,
    ) -> Result<Option<SettingValue>, SettingsError> {
        Ok(self
            .get(name, group)
            .await?
            .map(|record| record.cast_value()))
    }

    /// Stores `value` under `setting_type`, updating the existing record if any
    pub async fn set(
        &self,
        name: &str,
        value: &SettingValue,
        group: Option<&str>,
        setting_type: SettingType,
    ) -> Result<SettingRecord, SettingsError> {
        let scope = self.scope(group);
        let mut record = self.get(name, group).await?.unwrap_or_else(|| SettingRecord {
            name: name.to_string(),
            group: scope.group.clone(),
            tenant_type: scope.tenant_type.clone(),
            tenant_id: scope.tenant_id.clone(),
            ..SettingRecord::default()
        });
        record.r#type = setting_type;
        record
            .set_value(value)
            .map_err(|source| SettingsError::Encoding {
                group: scope.group.clone(),
                field: name.to_string(),
                source,
            })?;

        let saved = self
            .storage
            .save(record)
            .await
            .map_err(SettingsError::storage("save", &scope.group))?;
        tracing::debug!(group = %scope.group, setting = %name, "named setting saved");
        Ok(saved)
    }

    /// Every record of `group` belonging to this tenant
    pub async fn by_group(&self, group: &str) -> Result<Vec<SettingRecord>, SettingsError> {
        let scope = self.scope(Some(group));
        let mut records = self
            .storage
            .all(&scope.filter())
            .await
            .map_err(SettingsError::storage("load", &scope.group))?;
        records.retain(|record| scope.contains(record));
        Ok(records)
    }

    /// Deletes record `name`; returns whether one existed
    pub async fn delete(&self, name: &str, group: Option<&str>) -> Result<bool, SettingsError> {
        let Some(record) = self.get(name, group).await? else {
            return Ok(false);
        };
        self.storage
            .delete(&record)
            .await
            .map_err(SettingsError::storage("delete", &record.group))?;
        Ok(true)
    }
}
