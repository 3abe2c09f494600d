//! Contract error types for tenant settings

/// Failure to turn a logical value into its stored text form
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Structured value has no JSON representation
    #[error("value is not representable as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tenant settings domain errors
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// A field could not be encoded; nothing was persisted
    #[error("failed to encode setting field '{field}' of group '{group}': {source}")]
    Encoding {
        group: String,
        field: String,
        #[source]
        source: CodecError,
    },

    /// Storage backend failure
    #[error("storage {operation} failed for group '{group}': {source}")]
    Storage {
        operation: &'static str,
        group: String,
        #[source]
        source: anyhow::Error,
    },
}

impl SettingsError {
    pub(crate) fn storage<'a>(
        operation: &'static str,
        group: &'a str,
    ) -> impl FnOnce(anyhow::Error) -> Self + 'a {
        move |source| Self::Storage {
            operation,
            group: group.to_string(),
            source,
        }
    }
}
