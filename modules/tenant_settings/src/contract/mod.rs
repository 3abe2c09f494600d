//! Contract layer - public types shared by the engine, backends and callers
//!
//! Models here are storage-agnostic; serde formats live with the backends.

pub mod error;
pub mod model;
pub mod settings;

pub use error::{CodecError, SettingsError};
pub use model::{
    SettingFilter, SettingRecord, SettingScope, SettingType, SettingValue, SettingsTenant, Tenant,
    TenantId, UnknownSettingType, DEFAULT_GROUP,
};
pub use settings::{
    derive_group, FieldDescriptor, Json, SettingField, Settings, SettingsDescription,
};
