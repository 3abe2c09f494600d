//! Settings group declaration
//!
//! A settings group is a plain struct whose fields are persisted one record
//! per field. The [`Settings`] trait carries the group's static identity and an
//! explicit field list; [`crate::settings!`] generates the field plumbing.
//!
//! ```ignore
//! #[derive(Debug, Clone)]
//! pub struct GeneralSettings {
//!     pub site_name: String,
//!     pub max_items: i64,
//! }
//!
//! tenant_settings::settings!(GeneralSettings {
//!     fields { site_name, max_items }
//! });
//! ```

use super::model::{SettingType, SettingValue};
use heck::ToSnakeCase;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

const GROUP_SUFFIX: &str = "Settings";

/// Derives a group name from a Rust type name
///
/// `my_app::config::GeneralSettings` becomes `general` and
/// `AutoDerivedSettings` becomes `auto_derived`.
pub fn derive_group(type_name: &str) -> String {
    let without_generics = type_name.split('<').next().unwrap_or(type_name);
    let short = without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics);
    let stem = match short.strip_suffix(GROUP_SUFFIX) {
        Some(stem) if !stem.is_empty() => stem,
        _ => short,
    };
    stem.to_snake_case()
}

/// One declared field of a settings group
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub setting_type: SettingType,
    /// Value held by a freshly constructed instance, `None` when unassigned
    pub default: Option<SettingValue>,
}

impl FieldDescriptor {
    pub fn new(
        name: &'static str,
        setting_type: SettingType,
        default: Option<SettingValue>,
    ) -> Self {
        Self {
            name,
            setting_type,
            default,
        }
    }
}

/// Static shape of a settings group, used by admin collaborators
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsDescription {
    pub type_name: &'static str,
    pub group: String,
    pub namespace: Option<String>,
    pub repository: Option<&'static str>,
    pub fields: Vec<FieldDescriptor>,
}

/// Typed settings group
pub trait Settings: Default + Send + Sync + 'static {
    /// Explicit group name; derived from the type name when absent
    const NAME: Option<&'static str> = None;

    /// Secondary scope separating groups of different modules
    const NAMESPACE: Option<&'static str> = None;

    /// Named storage registered on the manager; default storage when absent
    const REPOSITORY: Option<&'static str> = None;

    fn group() -> String {
        match Self::NAME {
            Some(name) => name.to_string(),
            None => derive_group(std::any::type_name::<Self>()),
        }
    }

    fn namespace() -> Option<String> {
        Self::NAMESPACE.map(str::to_string)
    }

    /// Declared fields in declaration order
    fn fields() -> Vec<FieldDescriptor>;

    /// Current value of a field, `Ok(None)` when unassigned or unknown
    fn field(&self, name: &str) -> Result<Option<SettingValue>, serde_json::Error>;

    /// Assigns a field; returns `false` when no field has that name
    fn set_field(&mut self, name: &str, value: SettingValue) -> bool;

    fn describe() -> SettingsDescription {
        SettingsDescription {
            type_name: std::any::type_name::<Self>(),
            group: Self::group(),
            namespace: Self::namespace(),
            repository: Self::REPOSITORY,
            fields: Self::fields(),
        }
    }
}

/// Conversion between a Rust field type and a [`SettingValue`]
///
/// Types without an explicit tag are stored as strings. Integers are stored
/// as `i64`: unsigned values above `i64::MAX` are saved as `i64::MAX`, so
/// prefer `i64` or a string field for identifiers in that range.
pub trait SettingField: Sized {
    const SETTING_TYPE: SettingType = SettingType::String;

    /// `Ok(None)` means the field holds no value and is not persisted
    fn to_setting_value(&self) -> Result<Option<SettingValue>, serde_json::Error>;

    /// Lenient conversion; mismatched values are coerced, never rejected
    fn from_setting_value(value: SettingValue) -> Self;
}

impl SettingField for bool {
    const SETTING_TYPE: SettingType = SettingType::Boolean;

    fn to_setting_value(&self) -> Result<Option<SettingValue>, serde_json::Error> {
        Ok(Some(SettingValue::Boolean(*self)))
    }

    fn from_setting_value(value: SettingValue) -> Self {
        value.as_bool()
    }
}

macro_rules! integer_field {
    ($($t:ty),+) => {
        $(
            impl SettingField for $t {
                const SETTING_TYPE: SettingType = SettingType::Integer;

                fn to_setting_value(&self) -> Result<Option<SettingValue>, serde_json::Error> {
                    Ok(Some(SettingValue::Integer(
                        i64::try_from(*self).unwrap_or(i64::MAX),
                    )))
                }

                fn from_setting_value(value: SettingValue) -> Self {
                    let wide = value.as_i64();
                    <$t>::try_from(wide).unwrap_or(if wide < 0 { <$t>::MIN } else { <$t>::MAX })
                }
            }
        )+
    };
}

integer_field!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl SettingField for f64 {
    const SETTING_TYPE: SettingType = SettingType::Float;

    fn to_setting_value(&self) -> Result<Option<SettingValue>, serde_json::Error> {
        Ok(Some(SettingValue::Float(*self)))
    }

    fn from_setting_value(value: SettingValue) -> Self {
        value.as_f64()
    }
}

impl SettingField for f32 {
    const SETTING_TYPE: SettingType = SettingType::Float;

    fn to_setting_value(&self) -> Result<Option<SettingValue>, serde_json::Error> {
        Ok(Some(SettingValue::Float(f64::from(*self))))
    }

    fn from_setting_value(value: SettingValue) -> Self {
        value.as_f64() as f32
    }
}

impl SettingField for String {
    fn to_setting_value(&self) -> Result<Option<SettingValue>, serde_json::Error> {
        Ok(Some(SettingValue::String(self.clone())))
    }

    fn from_setting_value(value: SettingValue) -> Self {
        match value {
            SettingValue::String(s) => s,
            other => other.to_text(),
        }
    }
}

impl SettingField for serde_json::Value {
    const SETTING_TYPE: SettingType = SettingType::Json;

    fn to_setting_value(&self) -> Result<Option<SettingValue>, serde_json::Error> {
        Ok(Some(SettingValue::Json(self.clone())))
    }

    fn from_setting_value(value: SettingValue) -> Self {
        value.into_json()
    }
}

fn structured_to_value<T: Serialize>(
    value: &T,
) -> Result<Option<SettingValue>, serde_json::Error> {
    serde_json::to_value(value).map(|json| Some(SettingValue::Json(json)))
}

fn structured_from_value<T: DeserializeOwned + Default>(value: SettingValue) -> T {
    serde_json::from_value(value.into_json()).unwrap_or_default()
}

impl<T: Serialize + DeserializeOwned> SettingField for Vec<T> {
    const SETTING_TYPE: SettingType = SettingType::Json;

    fn to_setting_value(&self) -> Result<Option<SettingValue>, serde_json::Error> {
        structured_to_value(self)
    }

    fn from_setting_value(value: SettingValue) -> Self {
        structured_from_value(value)
    }
}

impl<K, V> SettingField for BTreeMap<K, V>
where
    K: Serialize + DeserializeOwned + Ord,
    V: Serialize + DeserializeOwned,
{
    const SETTING_TYPE: SettingType = SettingType::Json;

    fn to_setting_value(&self) -> Result<Option<SettingValue>, serde_json::Error> {
        structured_to_value(self)
    }

    fn from_setting_value(value: SettingValue) -> Self {
        structured_from_value(value)
    }
}

impl<K, V> SettingField for HashMap<K, V>
where
    K: Serialize + DeserializeOwned + Eq + Hash,
    V: Serialize + DeserializeOwned,
{
    const SETTING_TYPE: SettingType = SettingType::Json;

    fn to_setting_value(&self) -> Result<Option<SettingValue>, serde_json::Error> {
        structured_to_value(self)
    }

    fn from_setting_value(value: SettingValue) -> Self {
        structured_from_value(value)
    }
}

impl<T: SettingField> SettingField for Option<T> {
    const SETTING_TYPE: SettingType = T::SETTING_TYPE;

    fn to_setting_value(&self) -> Result<Option<SettingValue>, serde_json::Error> {
        match self {
            Some(inner) => inner.to_setting_value(),
            None => Ok(None),
        }
    }

    fn from_setting_value(value: SettingValue) -> Self {
        match value {
            SettingValue::Json(serde_json::Value::Null) => None,
            other => Some(T::from_setting_value(other)),
        }
    }
}

/// Stores any serde type as a JSON setting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Json<T>(pub T);

impl<T: Serialize + DeserializeOwned + Default> SettingField for Json<T> {
    const SETTING_TYPE: SettingType = SettingType::Json;

    fn to_setting_value(&self) -> Result<Option<SettingValue>, serde_json::Error> {
        structured_to_value(&self.0)
    }

    fn from_setting_value(value: SettingValue) -> Self {
        Json(structured_from_value(value))
    }
}

/// Implements [`Settings`] for a struct from its field list
///
/// Optional `group`, `namespace` and `repository` entries set the associated
/// constants; they must appear in that order before `fields`.
#[macro_export]
macro_rules! settings {
    (
        $name:ident {
            $(group = $group:literal;)?
            $(namespace = $namespace:literal;)?
            $(repository = $repository:literal;)?
            fields { $($field:ident),+ $(,)? }
        }
    ) => {
        impl $crate::Settings for $name {
            $(const NAME: Option<&'static str> = Some($group);)?
            $(const NAMESPACE: Option<&'static str> = Some($namespace);)?
            $(const REPOSITORY: Option<&'static str> = Some($repository);)?

            fn fields() -> Vec<$crate::FieldDescriptor> {
                let defaults = <Self as Default>::default();
                vec![
                    $(
                        $crate::FieldDescriptor::new(
                            stringify!($field),
                            $crate::domain::hydrator::resolve_field_type_of(&defaults.$field),
                            $crate::SettingField::to_setting_value(&defaults.$field)
                                .ok()
                                .flatten(),
                        ),
                    )+
                ]
            }

            fn field(
                &self,
                name: &str,
            ) -> Result<Option<$crate::SettingValue>, $crate::serde_json::Error> {
                match name {
                    $(stringify!($field) => $crate::SettingField::to_setting_value(&self.$field),)+
                    _ => Ok(None),
                }
            }

            fn set_field(&mut self, name: &str, value: $crate::SettingValue) -> bool {
                match name {
                    $(
                        stringify!($field) => {
                            self.$field = $crate::SettingField::from_setting_value(value);
                            true
                        }
                    )+
                    _ => false,
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_suffix_and_snake_cases() {
        assert_eq!(derive_group("GeneralSettings"), "general");
        assert_eq!(derive_group("app::config::AutoDerivedSettings"), "auto_derived");
        assert_eq!(derive_group("crate::MailServer"), "mail_server");
    }

    #[test]
    fn keeps_bare_suffix_name() {
        assert_eq!(derive_group("my::Settings"), "settings");
    }

    #[test]
    fn ignores_generic_arguments() {
        assert_eq!(derive_group("a::PluginSettings<b::Other>"), "plugin");
    }

    #[test]
    fn option_maps_null_json_to_none() {
        let value: Option<Vec<String>> =
            SettingField::from_setting_value(SettingValue::Json(serde_json::Value::Null));
        assert_eq!(value, None);
        assert!(Option::<i64>::None.to_setting_value().unwrap().is_none());
    }

    #[test]
    fn unsigned_values_above_i64_range_clamp_on_save() {
        let stored = u64::MAX.to_setting_value().unwrap();
        assert_eq!(stored, Some(SettingValue::Integer(i64::MAX)));

        let fits = (i64::MAX as u64).to_setting_value().unwrap();
        assert_eq!(fits, Some(SettingValue::Integer(i64::MAX)));
        let back: u64 = SettingField::from_setting_value(SettingValue::Integer(i64::MAX));
        assert_eq!(back, i64::MAX as u64);
    }

    #[test]
    fn integers_saturate_on_narrowing() {
        let narrow: u8 = SettingField::from_setting_value(SettingValue::Integer(1000));
        assert_eq!(narrow, u8::MAX);
        let negative: u32 = SettingField::from_setting_value(SettingValue::Integer(-5));
        assert_eq!(negative, u32::MIN);
    }

    #[test]
    fn non_string_map_keys_fail_to_encode() {
        let mut map = BTreeMap::new();
        map.insert((1, 2), "pair".to_string());
        assert!(map.to_setting_value().is_err());
    }
}
