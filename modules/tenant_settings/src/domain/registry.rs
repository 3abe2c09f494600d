//! Link-time registry of settings groups
//!
//! Types submitted with [`crate::register_settings!`] can be listed by admin
//! tooling without knowing them at compile time.

use crate::contract::{Settings, SettingsDescription};

/// Registry entry for one settings type
pub struct RegisteredSettings {
    describe: fn() -> SettingsDescription,
}

impl RegisteredSettings {
    pub const fn of<S: Settings>() -> Self {
        Self {
            describe: S::describe,
        }
    }

    pub fn describe(&self) -> SettingsDescription {
        (self.describe)()
    }
}

inventory::collect!(RegisteredSettings);

/// Descriptions of every registered settings type, ordered by namespace and group
pub fn registered_settings() -> Vec<SettingsDescription> {
    let mut descriptions: Vec<SettingsDescription> = inventory::iter::<RegisteredSettings>
        .into_iter()
        .map(RegisteredSettings::describe)
        .collect();
    descriptions.sort_by(|a, b| (&a.namespace, &a.group).cmp(&(&b.namespace, &b.group)));
    descriptions
}

/// Registers settings types with the link-time registry
#[macro_export]
macro_rules! register_settings {
    ($($settings:ty),+ $(,)?) => {
        $(
            $crate::inventory::submit! {
                $crate::domain::registry::RegisteredSettings::of::<$settings>()
            }
        )+
    };
}
