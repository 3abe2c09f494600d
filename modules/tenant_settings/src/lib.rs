//! Tenant Settings Module
//!
//! Typed, tenant-scoped application settings. A settings type is a plain
//! struct whose fields are persisted one attribute record per field, scoped
//! by group, optional namespace and optional tenant, in a relational table
//! or a flat JSON file.

// Public exports
pub mod contract;
pub use contract::{
    FieldDescriptor, Json, SettingField, SettingFilter, SettingRecord, SettingScope, SettingType,
    SettingValue, Settings, SettingsDescription, SettingsError, SettingsTenant, Tenant, TenantId,
};

pub mod domain;
pub use domain::{
    registered_settings, RegisteredSettings, SettingStorage, SettingsAccessor, SettingsInstance,
    SettingsManager,
};

pub mod infra;
pub use infra::storage::Migrator;
pub use infra::{FileStorage, SeaOrmSettingStorage};

pub mod config;
pub use config::{Config, StorageConfig};

pub mod module;
pub use module::SettingsModule;

// Used by the declaration macros
#[doc(hidden)]
pub use inventory;
#[doc(hidden)]
pub use serde_json;
