//! Infrastructure layer - storage backends

pub mod file;
pub mod storage;

pub use file::FileStorage;
pub use storage::SeaOrmSettingStorage;

use crate::contract::SettingType;

/// Unknown stored type tags are read as strings
pub(crate) fn parse_type_tag(tag: &str, name: &str) -> SettingType {
    tag.parse().unwrap_or_else(|err| {
        tracing::warn!(setting = %name, %err, "treating setting as string");
        SettingType::String
    })
}
