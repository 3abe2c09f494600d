//! On-disk format of the flat-file cache
//!
//! The file is one JSON object. Keys are
//! `{namespace}|{group}|{name}|{tenant_type}|{tenant_id}` with empty strings
//! for absent parts; values are [`FileEntry`] objects.

use crate::contract::{SettingRecord, TenantId, DEFAULT_GROUP};
use crate::infra::parse_type_tag;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cache key of a record
pub(crate) fn cache_key(
    namespace: Option<&str>,
    group: &str,
    name: &str,
    tenant_type: Option<&str>,
    tenant_id: Option<&TenantId>,
) -> String {
    let tenant_id = tenant_id.map(ToString::to_string).unwrap_or_default();
    [
        namespace.unwrap_or_default(),
        group,
        name,
        tenant_type.unwrap_or_default(),
        tenant_id.as_str(),
    ]
    .join("|")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct FileEntry {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_group")]
    pub group: String,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub value: String,
    #[serde(default = "default_type")]
    pub r#type: String,
    #[serde(default)]
    pub tenant_type: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<FileTenantId>,
    #[serde(default, with = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Tenant ids keep their JSON type (number or string)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum FileTenantId {
    Int(i64),
    Str(String),
}

fn default_group() -> String {
    DEFAULT_GROUP.to_string()
}

fn default_type() -> String {
    "string".to_string()
}

impl FileEntry {
    pub fn key(&self) -> String {
        let tenant_id = self.tenant_id.clone().map(TenantId::from);
        cache_key(
            self.namespace.as_deref(),
            &self.group,
            &self.name,
            self.tenant_type.as_deref(),
            tenant_id.as_ref(),
        )
    }
}

impl From<FileTenantId> for TenantId {
    fn from(id: FileTenantId) -> Self {
        match id {
            FileTenantId::Int(i) => TenantId::Int(i),
            FileTenantId::Str(s) => TenantId::Str(s),
        }
    }
}

impl From<&TenantId> for FileTenantId {
    fn from(id: &TenantId) -> Self {
        match id {
            TenantId::Int(i) => FileTenantId::Int(*i),
            TenantId::Str(s) => FileTenantId::Str(s.clone()),
        }
    }
}

impl From<&SettingRecord> for FileEntry {
    fn from(record: &SettingRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            group: record.group.clone(),
            namespace: record.namespace.clone(),
            value: record.value.clone(),
            r#type: record.r#type.as_str().to_string(),
            tenant_type: record.tenant_type.clone(),
            tenant_id: record.tenant_id.as_ref().map(FileTenantId::from),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

impl From<FileEntry> for SettingRecord {
    fn from(entry: FileEntry) -> Self {
        Self {
            id: entry.id,
            r#type: parse_type_tag(&entry.r#type, &entry.name),
            name: entry.name,
            group: entry.group,
            namespace: entry.namespace,
            value: entry.value,
            tenant_type: entry.tenant_type,
            tenant_id: entry.tenant_id.map(TenantId::from),
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

/// `YYYY-MM-DD HH:MM:SS` timestamps in UTC
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => serializer.serialize_str(&dt.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    /// Unparseable timestamps are dropped rather than failing the whole file
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse))
    }

    fn parse(raw: &str) -> Option<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(raw, FORMAT)
            .map(|naive| naive.and_utc())
            .ok()
            .or_else(|| {
                DateTime::parse_from_rfc3339(raw)
                    .map(|dt| dt.with_timezone(&Utc))
                    .ok()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::SettingType;
    use chrono::TimeZone;

    #[test]
    fn key_uses_empty_strings_for_absent_parts() {
        assert_eq!(cache_key(None, "general", "site_name", None, None), "|general|site_name||");
        assert_eq!(
            cache_key(
                Some("shop"),
                "mail",
                "from",
                Some("organization"),
                Some(&TenantId::Int(7))
            ),
            "shop|mail|from|organization|7"
        );
    }

    #[test]
    fn serializes_documented_fields() {
        let record = SettingRecord {
            id: Some(3),
            name: "max_items".to_string(),
            group: "general".to_string(),
            value: "10".to_string(),
            r#type: SettingType::Integer,
            tenant_type: Some("organization".to_string()),
            tenant_id: Some(TenantId::Int(7)),
            created_at: Some(Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 5).unwrap()),
            ..SettingRecord::default()
        };

        let json = serde_json::to_value(FileEntry::from(&record)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": 3,
                "name": "max_items",
                "group": "general",
                "namespace": null,
                "value": "10",
                "type": "integer",
                "tenant_type": "organization",
                "tenant_id": 7,
                "created_at": "2025-03-01 12:30:05",
                "updated_at": null,
            })
        );
    }

    #[test]
    fn reads_entries_with_missing_and_unknown_values() {
        let entry: FileEntry = serde_json::from_value(serde_json::json!({
            "id": 5,
            "name": "theme",
            "type": "color",
            "tenant_id": "acme",
            "created_at": "garbage",
        }))
        .unwrap();
        let record = SettingRecord::from(entry);

        assert_eq!(record.group, "default");
        assert_eq!(record.r#type, SettingType::String);
        assert_eq!(record.tenant_id, Some(TenantId::Str("acme".to_string())));
        assert_eq!(record.created_at, None);
    }
}
