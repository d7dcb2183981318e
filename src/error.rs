use thiserror::Error;

/// Errors surfaced by the activity store and its storage.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// The key-value storage refused a read or a write.
    #[error("Failed to persist activities: {message}")]
    Persistence {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The persisted payload could not be deserialized.
    #[error("Stored activities under '{key}' are corrupt: {source}")]
    CorruptData {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A category key that is not part of the category table.
    #[error("Unknown category '{0}'")]
    UnknownCategory(String),

    /// A candidate activity with missing or malformed fields.
    #[error("Invalid activity: {0}")]
    Validation(String),
}

impl PlannerError {
    pub fn persistence(message: impl Into<String>) -> Self {
        PlannerError::Persistence {
            message: message.into(),
            source: None,
        }
    }
}

impl From<rusqlite::Error> for PlannerError {
    fn from(err: rusqlite::Error) -> Self {
        PlannerError::Persistence {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
