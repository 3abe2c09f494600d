//! Domain layer - codec, hydration and the settings manager

pub mod accessor;
pub mod codec;
pub mod hydrator;
pub mod registry;
pub mod repository;
pub mod service;

pub use accessor::SettingsAccessor;
pub use registry::{registered_settings, RegisteredSettings};
pub use repository::SettingStorage;
pub use service::{SettingsInstance, SettingsManager};
