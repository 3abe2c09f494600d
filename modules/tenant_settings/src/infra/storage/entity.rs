//! SeaORM entity for the settings table

use sea_orm::entity::prelude::*;

/// One attribute record per row
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Field name within the group
    pub name: String,

    /// Settings group
    pub group: String,

    pub namespace: Option<String>,

    /// Text-encoded value
    #[sea_orm(column_type = "Text")]
    pub value: String,

    /// Type tag (string, integer, float, boolean, json)
    pub r#type: String,

    pub tenant_type: Option<String>,

    /// Tenant id in textual form
    pub tenant_id: Option<String>,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
