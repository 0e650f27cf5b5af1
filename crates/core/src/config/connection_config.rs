use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_DB_PORT: u16 = 3306;
pub const DEFAULT_DB_NAME: &str = "taskpulse";
pub const MASKED_PASSWORD: &str = "***";

/// Fully resolved connection parameters for the board store.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl ConnectionConfig {
    /// Copy suitable for untrusted callers: the password is replaced with `***`.
    pub fn masked(&self) -> ConnectionConfigRecord {
        ConnectionConfigRecord {
            host: Some(self.host.clone()),
            port: Some(self.port),
            user: Some(self.user.clone()),
            password: Some(MASKED_PASSWORD.to_string()),
            database: Some(self.database.clone()),
        }
    }

    pub fn to_record(&self) -> ConnectionConfigRecord {
        ConnectionConfigRecord {
            host: Some(self.host.clone()),
            port: Some(self.port),
            user: Some(self.user.clone()),
            password: Some(self.password.clone()),
            database: Some(self.database.clone()),
        }
    }
}

// Hand-written so the password never reaches a log line.
impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &MASKED_PASSWORD)
            .field("database", &self.database)
            .finish()
    }
}

/// Possibly incomplete connection parameters, as stored in the persisted
/// record or posted by the setup flow. Serializes absent fields as absent,
/// so an empty record is `{}`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionConfigRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ConnectionConfigRecord {
    /// `None` unless host, user and database are present and non-empty.
    pub fn into_complete(self) -> Option<ConnectionConfig> {
        Some(ConnectionConfig {
            host: non_empty(self.host)?,
            port: self.port.unwrap_or(DEFAULT_DB_PORT),
            user: non_empty(self.user)?,
            password: self.password.unwrap_or_default(),
            database: non_empty(self.database)?,
        })
    }
}

impl fmt::Debug for ConnectionConfigRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfigRecord")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| MASKED_PASSWORD))
            .field("database", &self.database)
            .finish()
    }
}

/// Response shape of the configuration status endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigStatus {
    pub configured: bool,
    #[serde(default)]
    pub config: ConnectionConfigRecord,
}

impl ConfigStatus {
    pub fn from_resolved(resolved: Option<&ConnectionConfig>) -> Self {
        match resolved {
            Some(config) => Self {
                configured: true,
                config: config.masked(),
            },
            None => Self::default(),
        }
    }
}
