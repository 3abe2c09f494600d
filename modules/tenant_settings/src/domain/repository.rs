//! Storage trait for attribute records
//!
//! Implementations are in infra/storage (relational) and infra/file (flat
//! JSON cache). Both must apply identical filter semantics so the manager
//! stays backend-agnostic.

use crate::contract::{SettingFilter, SettingRecord, SettingScope};
use anyhow::Result;
use async_trait::async_trait;

/// Backend holding attribute records
#[async_trait]
pub trait SettingStorage: Send + Sync {
    /// Find the record `name` in exactly this scope
    ///
    /// Absent namespace or tenant components only match absent values.
    async fn find(&self, name: &str, scope: &SettingScope) -> Result<Option<SettingRecord>>;

    /// Insert (no id) or update (id present) a record
    ///
    /// Inserts assign the id and `created_at`; both paths refresh
    /// `updated_at`. Returns the stored record.
    async fn save(&self, record: SettingRecord) -> Result<SettingRecord>;

    /// Delete a stored record; records without an id are ignored
    async fn delete(&self, record: &SettingRecord) -> Result<()>;

    /// All records matching every supplied filter component
    async fn all(&self, filter: &SettingFilter) -> Result<Vec<SettingRecord>>;
}
