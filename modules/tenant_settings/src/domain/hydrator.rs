//! Conversion between typed settings and attribute records

use crate::contract::{
    CodecError, SettingField, SettingRecord, SettingScope, SettingType, Settings, SettingsError,
};
use std::collections::HashMap;

/// Storage type tag for a declared field type
pub fn resolve_field_type<T: SettingField>() -> SettingType {
    T::SETTING_TYPE
}

/// Same as [`resolve_field_type`], inferring the type from a field reference
pub fn resolve_field_type_of<T: SettingField>(_field: &T) -> SettingType {
    resolve_field_type::<T>()
}

/// Assigns every declared field that has a record of the same name
///
/// Fields without a record keep their current (default) value.
pub fn hydrate<S: Settings>(settings: &mut S, records: &[SettingRecord]) {
    let indexed: HashMap<&str, &SettingRecord> = records
        .iter()
        .map(|record| (record.name.as_str(), record))
        .collect();

    for field in S::fields() {
        if let Some(record) = indexed.get(field.name) {
            settings.set_field(field.name, record.cast_value());
        }
    }
}

/// Builds one record per assigned field
///
/// Records in `existing` are reused by name so their ids survive the save;
/// only their type and value are replaced. Unassigned fields are skipped.
pub fn extract<S: Settings>(
    settings: &S,
    scope: &SettingScope,
    existing: Vec<SettingRecord>,
) -> Result<Vec<SettingRecord>, SettingsError> {
    let mut existing: HashMap<String, SettingRecord> = existing
        .into_iter()
        .map(|record| (record.name.clone(), record))
        .collect();

    let encoding_error = |field: &str, source: CodecError| SettingsError::Encoding {
        group: scope.group.clone(),
        field: field.to_string(),
        source,
    };

    let mut records = Vec::new();
    for field in S::fields() {
        let value = settings
            .field(field.name)
            .map_err(|e| encoding_error(field.name, e.into()))?;
        let Some(value) = value else {
            continue;
        };

        let mut record = existing.remove(field.name).unwrap_or_else(|| SettingRecord {
            name: field.name.to_string(),
            group: scope.group.clone(),
            namespace: scope.namespace.clone(),
            tenant_type: scope.tenant_type.clone(),
            tenant_id: scope.tenant_id.clone(),
            ..SettingRecord::default()
        });
        record.r#type = field.setting_type;
        record
            .set_value(&value)
            .map_err(|e| encoding_error(field.name, e))?;
        records.push(record);
    }

    Ok(records)
}

/// Applies raw submitted strings to declared fields
///
/// Each value is cast with its field's type. Returns the keys that matched
/// no declared field.
pub fn apply_input<S: Settings>(settings: &mut S, input: &HashMap<String, String>) -> Vec<String> {
    let fields = S::fields();
    let mut ignored = Vec::new();

    for (name, raw) in input {
        match fields.iter().find(|field| field.name == name.as_str()) {
            Some(field) => {
                let value = super::codec::cast(field.setting_type, raw);
                settings.set_field(field.name, value);
            }
            None => ignored.push(name.clone()),
        }
    }

    ignored.sort();
    ignored
}
