//! Error taxonomy shared by every TaskPulse crate.

use thiserror::Error;

/// Result type alias for core and storage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error.
///
/// `NotConfigured` is kept apart from store failures so callers can prompt for
/// setup instead of treating it as an outage.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Database is not configured")]
    NotConfigured,

    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn is_not_configured(&self) -> bool {
        matches!(self, Self::NotConfigured)
    }
}

/// Store failures. All of them are "unreachable" from the client's point of view.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("Failed to create connection pool: {0}")]
    PoolCreationFailed(String),

    #[error("Failed to initialize schema: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A write could not commit and was rolled back.
    #[error("Transaction rolled back: {0}")]
    TransactionFailed(String),

    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Edit-layer rejections. The edit is never applied when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Group '{group_id}' still has {member_count} member(s)")]
    GroupInUse {
        group_id: String,
        member_count: usize,
    },

    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("{entity} id '{id}' is already in use")]
    DuplicateId { entity: &'static str, id: String },

    #[error("{field} must be between 0 and 100, got {value}")]
    ProgressOutOfRange { field: &'static str, value: i32 },

    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}

impl ValidationError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn duplicate(entity: &'static str, id: impl Into<String>) -> Self {
        Self::DuplicateId {
            entity,
            id: id.into(),
        }
    }
}

/// Failures reading or writing a configuration source.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to write configuration record {path}: {message}")]
    Write { path: String, message: String },

    #[error("Invalid database name '{0}'")]
    InvalidDatabaseName(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_configured_is_distinguished() {
        assert!(Error::NotConfigured.is_not_configured());
        let err = Error::from(DatabaseError::ConnectionFailed("refused".to_string()));
        assert!(!err.is_not_configured());
    }

    #[test]
    fn group_in_use_message_names_group() {
        let err = ValidationError::GroupInUse {
            group_id: "g1".to_string(),
            member_count: 2,
        };
        assert_eq!(err.to_string(), "Group 'g1' still has 2 member(s)");
    }
}
