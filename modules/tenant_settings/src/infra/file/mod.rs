//! Flat-file storage
//!
//! All records live in a single JSON document that is read lazily on first
//! access and rewritten in full after every mutation.

mod entry;

use crate::contract::{SettingFilter, SettingRecord, SettingScope};
use crate::domain::repository::SettingStorage;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use entry::{cache_key, FileEntry};
use indexmap::IndexMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// File name used when no path is configured
pub const DEFAULT_FILE_NAME: &str = "tenant_settings_cache.json";

#[derive(Default)]
struct FileCache {
    loaded: bool,
    entries: IndexMap<String, FileEntry>,
}

/// Attribute records kept in one JSON file
pub struct FileStorage {
    path: PathBuf,
    cache: Mutex<FileCache>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(FileCache::default()),
        }
    }

    /// Storage backed by [`DEFAULT_FILE_NAME`] in the system temp directory
    pub fn in_temp_dir() -> Self {
        Self::new(std::env::temp_dir().join(DEFAULT_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_loaded(&self, cache: &mut FileCache) {
        if cache.loaded {
            return;
        }
        cache.entries = self.read_entries().await;
        cache.loaded = true;
        tracing::debug!(
            path = %self.path.display(),
            count = cache.entries.len(),
            "loaded settings file"
        );
    }

    /// Missing or unreadable files start an empty cache
    async fn read_entries(&self) -> IndexMap<String, FileEntry> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return IndexMap::new(),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "cannot read settings file");
                return IndexMap::new();
            }
        };

        if content.trim().is_empty() {
            return IndexMap::new();
        }

        match serde_json::from_str::<IndexMap<String, FileEntry>>(&content) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "settings file is not a JSON object of records, starting empty"
                );
                IndexMap::new()
            }
        }
    }

    async fn persist(&self, entries: &IndexMap<String, FileEntry>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(entries)?;
        tokio::fs::write(&self.path, content)
            .await
            .with_context(|| format!("writing settings file {}", self.path.display()))?;
        Ok(())
    }
}

#[async_trait]
impl SettingStorage for FileStorage {
    async fn find(&self, name: &str, scope: &SettingScope) -> Result<Option<SettingRecord>> {
        let mut cache = self.cache.lock().await;
        self.ensure_loaded(&mut cache).await;

        let key = cache_key(
            scope.namespace.as_deref(),
            &scope.group,
            name,
            scope.tenant_type.as_deref(),
            scope.tenant_id.as_ref(),
        );
        Ok(cache.entries.get(&key).cloned().map(Into::into))
    }

    async fn save(&self, mut record: SettingRecord) -> Result<SettingRecord> {
        let mut cache = self.cache.lock().await;
        self.ensure_loaded(&mut cache).await;

        let now = Utc::now().trunc_subsecs(0);
        let key = FileEntry::from(&record).key();
        if record.id.is_none() {
            match cache.entries.get(&key) {
                Some(existing) if existing.id.is_some() => {
                    record.id = existing.id;
                    record.created_at = existing.created_at;
                }
                _ => {
                    let next_id =
                        cache.entries.values().filter_map(|e| e.id).max().unwrap_or(0) + 1;
                    record.id = Some(next_id);
                    record.created_at = Some(now);
                }
            }
        }
        record.updated_at = Some(now);

        let entry = FileEntry::from(&record);
        // A record moved to a new identity must not leave its old key behind.
        cache
            .entries
            .retain(|existing_key, existing| existing_key == &key || existing.id != record.id);
        cache.entries.insert(key, entry);

        self.persist(&cache.entries).await?;
        Ok(record)
    }

    async fn delete(&self, record: &SettingRecord) -> Result<()> {
        let Some(id) = record.id else {
            return Ok(());
        };

        let mut cache = self.cache.lock().await;
        self.ensure_loaded(&mut cache).await;

        let before = cache.entries.len();
        cache.entries.retain(|_, entry| entry.id != Some(id));
        if cache.entries.len() != before {
            self.persist(&cache.entries).await?;
        }
        Ok(())
    }

    async fn all(&self, filter: &SettingFilter) -> Result<Vec<SettingRecord>> {
        let mut cache = self.cache.lock().await;
        self.ensure_loaded(&mut cache).await;

        Ok(cache
            .entries
            .values()
            .cloned()
            .map(SettingRecord::from)
            .filter(|record| filter.matches(record))
            .collect())
    }
}
