//! Entity to record mappers
//!
//! Conversions between SeaORM rows and contract records

use super::entity;
use crate::contract::{SettingRecord, TenantId};
use crate::infra::parse_type_tag;
use chrono::{DateTime, Utc};

impl From<entity::Model> for SettingRecord {
    fn from(entity: entity::Model) -> Self {
        Self {
            id: Some(entity.id),
            r#type: parse_type_tag(&entity.r#type, &entity.name),
            name: entity.name,
            group: entity.group,
            namespace: entity.namespace,
            value: entity.value,
            tenant_type: entity.tenant_type,
            // Stored as text; no numeric form is guessed back.
            tenant_id: entity.tenant_id.map(TenantId::Str),
            created_at: Some(entity.created_at),
            updated_at: Some(entity.updated_at),
        }
    }
}

/// Active model carrying every column of `record` except the timestamps
/// decided by the caller
pub(super) fn to_active_model(
    record: &SettingRecord,
    created_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
) -> entity::ActiveModel {
    use sea_orm::ActiveValue::{NotSet, Set};

    entity::ActiveModel {
        id: record.id.map_or(NotSet, Set),
        name: Set(record.name.clone()),
        group: Set(record.group.clone()),
        namespace: Set(record.namespace.clone()),
        value: Set(record.value.clone()),
        r#type: Set(record.r#type.as_str().to_string()),
        tenant_type: Set(record.tenant_type.clone()),
        tenant_id: Set(record.tenant_id.as_ref().map(ToString::to_string)),
        created_at: created_at.map_or(NotSet, Set),
        updated_at: Set(updated_at),
    }
}
