use std::time::Duration;

/// Failure kinds the runner reacts to differently.
///
/// Everything else travels as a plain [`anyhow::Error`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("startup configuration error: {0}")]
    StartupConfig(String),

    #[error("login marker did not appear within {timeout:?}")]
    AuthenticationTimeout { timeout: Duration },

    #[error("`{what}` did not appear within {timeout:?}")]
    ElementLookupTimeout { what: String, timeout: Duration },

    #[error("field `{field}` is missing")]
    FieldMissing { field: String },

    #[error("field `{field}` is not a number: `{text}`")]
    FieldUnparseable { field: String, text: String },

    #[error("readings are still inconsistent after {attempts} attempts")]
    InconsistentData { attempts: usize },

    #[error("failed to publish `{entity_id}`: {reason}")]
    Publish { entity_id: String, reason: String },
}

impl Error {
    /// Whether the error came from reading a single field.
    pub const fn is_field_error(&self) -> bool {
        matches!(self, Self::FieldMissing { .. } | Self::FieldUnparseable { .. })
    }
}
