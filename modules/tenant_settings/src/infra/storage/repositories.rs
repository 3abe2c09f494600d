//! SeaORM storage implementation

use crate::contract::{SettingFilter, SettingRecord, SettingScope};
use crate::domain::repository::SettingStorage;
use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use std::sync::Arc;

use super::entity;
use super::mapper::to_active_model;

/// Attribute records stored one per row in the `settings` table
pub struct SeaOrmSettingStorage {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmSettingStorage {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SettingStorage for SeaOrmSettingStorage {
    async fn find(&self, name: &str, scope: &SettingScope) -> Result<Option<SettingRecord>> {
        let mut query = entity::Entity::find()
            .filter(entity::Column::Name.eq(name))
            .filter(entity::Column::Group.eq(scope.group.as_str()));

        query = match &scope.namespace {
            Some(namespace) => query.filter(entity::Column::Namespace.eq(namespace.as_str())),
            None => query.filter(entity::Column::Namespace.is_null()),
        };
        query = match &scope.tenant_type {
            Some(tenant_type) => query.filter(entity::Column::TenantType.eq(tenant_type.as_str())),
            None => query.filter(entity::Column::TenantType.is_null()),
        };
        query = match &scope.tenant_id {
            Some(tenant_id) => query.filter(entity::Column::TenantId.eq(tenant_id.to_string())),
            None => query.filter(entity::Column::TenantId.is_null()),
        };

        let result = query.one(&*self.db).await?;
        Ok(result.map(Into::into))
    }

    async fn save(&self, mut record: SettingRecord) -> Result<SettingRecord> {
        let now = chrono::Utc::now();

        // Nullable identity columns defeat the unique index, so an id-less
        // record adopts the row already holding its identity.
        if record.id.is_none() {
            if let Some(existing) = self.find(&record.name, &record.scope()).await? {
                record.id = existing.id;
            }
        }

        let model = if record.id.is_some() {
            let active = to_active_model(&record, None, now);
            entity::Entity::update(active).exec(&*self.db).await?
        } else {
            let active = to_active_model(&record, Some(now), now);
            active.insert(&*self.db).await?
        };

        Ok(model.into())
    }

    async fn delete(&self, record: &SettingRecord) -> Result<()> {
        let Some(id) = record.id else {
            return Ok(());
        };

        entity::Entity::delete_by_id(id).exec(&*self.db).await?;
        Ok(())
    }

    async fn all(&self, filter: &SettingFilter) -> Result<Vec<SettingRecord>> {
        let mut query = entity::Entity::find();

        if let Some(group) = &filter.group {
            query = query.filter(entity::Column::Group.eq(group.as_str()));
        }
        if let Some(namespace) = &filter.namespace {
            query = query.filter(entity::Column::Namespace.eq(namespace.as_str()));
        }
        if let Some(tenant_type) = &filter.tenant_type {
            query = query.filter(entity::Column::TenantType.eq(tenant_type.as_str()));
        }
        if let Some(tenant_id) = &filter.tenant_id {
            query = query.filter(entity::Column::TenantId.eq(tenant_id.to_string()));
        }

        let results = query
            .order_by_asc(entity::Column::Id)
            .all(&*self.db)
            .await?;

        Ok(results.into_iter().map(Into::into).collect())
    }
}
