pub mod repository;
pub mod session;
pub mod sqlite;
pub mod status;

pub use repository::*;
pub use session::*;
pub use sqlite::*;
pub use status::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON column error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Referenced {entity_type} with id {id} does not exist")]
    MissingReference { entity_type: String, id: String },

    #[error("Prescription {prescription_id} does not belong to patient {patient_id}")]
    PrescriptionOwnerMismatch { prescription_id: i64, patient_id: i64 },

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },
}

/// Caller-facing error categories. The UI decides presentation per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Reference,
    NotFound,
    Storage,
}

impl DatabaseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } | Self::InvalidEnum { .. } => ErrorKind::Validation,
            Self::MissingReference { .. } | Self::PrescriptionOwnerMismatch { .. } => {
                ErrorKind::Reference
            }
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Sqlite(_)
            | Self::Io(_)
            | Self::Serialization(_)
            | Self::MigrationFailed { .. } => ErrorKind::Storage,
        }
    }

    pub(crate) fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(entity_type: &str, id: i64) -> Self {
        Self::MissingReference {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    pub(crate) fn not_found(entity_type: &str, id: i64) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }
}
