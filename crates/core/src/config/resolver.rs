//! Layered resolution of the store connection.
//!
//! Sources are consulted in order and the first complete one wins. Nothing is
//! cached: every call to [`ConfigResolver::resolve`] reads each source again,
//! so an edited record or environment takes effect on the next request.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, warn};

use super::connection_config::{
    ConnectionConfig, ConnectionConfigRecord, DEFAULT_DB_NAME, DEFAULT_DB_PORT,
};
use crate::errors::{ConfigError, Error, Result};

pub const ENV_DB_HOST: &str = "DB_HOST";
pub const ENV_DB_PORT: &str = "DB_PORT";
pub const ENV_DB_USER: &str = "DB_USER";
pub const ENV_DB_PASSWORD: &str = "DB_PASSWORD";
pub const ENV_DB_NAME: &str = "DB_NAME";

/// Default file name of the persisted configuration record.
pub const CONFIG_RECORD_FILE: &str = "db-config.json";

/// One place connection parameters can come from.
pub trait ConfigSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Complete parameters, or `None` when this source has nothing usable.
    fn load(&self) -> Option<ConnectionConfig>;
}

/// `DB_*` variables. Complete when `DB_HOST` and `DB_USER` are non-empty.
pub struct EnvConfigSource {
    vars: Option<HashMap<String, String>>,
}

impl EnvConfigSource {
    /// Reads the process environment at every load.
    pub fn process() -> Self {
        Self { vars: None }
    }

    /// Reads from a fixed map instead of the process environment.
    pub fn from_vars(vars: HashMap<String, String>) -> Self {
        Self { vars: Some(vars) }
    }

    fn var(&self, key: &str) -> Option<String> {
        let value = match &self.vars {
            Some(vars) => vars.get(key).cloned(),
            None => std::env::var(key).ok(),
        };
        value.filter(|v| !v.trim().is_empty())
    }
}

impl ConfigSource for EnvConfigSource {
    fn name(&self) -> &'static str {
        "environment"
    }

    fn load(&self) -> Option<ConnectionConfig> {
        let host = self.var(ENV_DB_HOST)?;
        let user = self.var(ENV_DB_USER)?;
        let port = match self.var(ENV_DB_PORT) {
            Some(raw) => match raw.trim().parse::<u16>() {
                Ok(port) => port,
                Err(_) => {
                    warn!("[Config] Ignoring environment: {} '{}' is not a port", ENV_DB_PORT, raw);
                    return None;
                }
            },
            None => DEFAULT_DB_PORT,
        };

        Some(ConnectionConfig {
            host,
            port,
            user,
            password: self.var(ENV_DB_PASSWORD).unwrap_or_default(),
            database: self
                .var(ENV_DB_NAME)
                .unwrap_or_else(|| DEFAULT_DB_NAME.to_string()),
        })
    }
}

/// JSON record written by the setup flow.
#[derive(Debug, Clone)]
pub struct FileConfigSource {
    path: PathBuf,
}

impl FileConfigSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored record as written, complete or not.
    pub fn read_record(&self) -> Option<ConnectionConfigRecord> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("[Config] Failed to read {}: {}", self.path.display(), e);
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("[Config] Ignoring unparsable {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Replace the record atomically (temp file, then rename).
    pub fn save(&self, record: &ConnectionConfigRecord) -> Result<()> {
        let write_err = |e: &dyn std::fmt::Display| ConfigError::Write {
            path: self.path.display().to_string(),
            message: e.to_string(),
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| write_err(&e))?;
        }
        let body = serde_json::to_string_pretty(record)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body).map_err(|e| write_err(&e))?;
        fs::rename(&tmp, &self.path).map_err(|e| write_err(&e))?;
        debug!("[Config] Saved configuration record to {}", self.path.display());
        Ok(())
    }
}

impl ConfigSource for FileConfigSource {
    fn name(&self) -> &'static str {
        "config-file"
    }

    fn load(&self) -> Option<ConnectionConfig> {
        self.read_record()?.into_complete()
    }
}

/// Ordered list of sources plus the writable record.
#[derive(Clone)]
pub struct ConfigResolver {
    sources: Vec<Arc<dyn ConfigSource>>,
    record: Arc<FileConfigSource>,
}

impl ConfigResolver {
    /// Environment first, then the persisted record.
    pub fn layered(env: EnvConfigSource, record: FileConfigSource) -> Self {
        let record = Arc::new(record);
        Self {
            sources: vec![Arc::new(env), record.clone()],
            record,
        }
    }

    /// Process environment over the record at `record_path`.
    pub fn from_process_env(record_path: impl Into<PathBuf>) -> Self {
        Self::layered(EnvConfigSource::process(), FileConfigSource::new(record_path))
    }

    pub fn resolve(&self) -> Result<ConnectionConfig> {
        self.try_resolve().ok_or(Error::NotConfigured)
    }

    pub fn try_resolve(&self) -> Option<ConnectionConfig> {
        self.sources.iter().find_map(|source| {
            let config = source.load();
            if config.is_some() {
                debug!("[Config] Resolved store connection from {}", source.name());
            }
            config
        })
    }

    /// Writes only the persisted record. The environment is never modified, so
    /// a complete environment keeps taking precedence.
    pub fn save(&self, record: &ConnectionConfigRecord) -> Result<()> {
        self.record.save(record)
    }

    pub fn record_path(&self) -> &Path {
        self.record.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn env(pairs: &[(&str, &str)]) -> EnvConfigSource {
        EnvConfigSource::from_vars(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn record(host: &str) -> ConnectionConfigRecord {
        ConnectionConfigRecord {
            host: Some(host.to_string()),
            port: Some(3307),
            user: Some("file-user".to_string()),
            password: Some("secret".to_string()),
            database: Some("board".to_string()),
        }
    }

    #[test]
    fn nothing_configured_resolves_to_not_configured() {
        let dir = tempdir().unwrap();
        let resolver = ConfigResolver::layered(
            env(&[]),
            FileConfigSource::new(dir.path().join(CONFIG_RECORD_FILE)),
        );
        assert!(resolver.resolve().unwrap_err().is_not_configured());
    }

    #[test]
    fn environment_wins_over_record() {
        let dir = tempdir().unwrap();
        let file = FileConfigSource::new(dir.path().join(CONFIG_RECORD_FILE));
        file.save(&record("file-host")).unwrap();

        let resolver = ConfigResolver::layered(
            env(&[(ENV_DB_HOST, "env-host"), (ENV_DB_USER, "env-user")]),
            file,
        );
        let config = resolver.resolve().unwrap();
        assert_eq!(config.host, "env-host");
        assert_eq!(config.port, DEFAULT_DB_PORT);
        assert_eq!(config.database, DEFAULT_DB_NAME);
    }

    #[test]
    fn incomplete_environment_falls_through_to_record() {
        let dir = tempdir().unwrap();
        let file = FileConfigSource::new(dir.path().join(CONFIG_RECORD_FILE));
        file.save(&record("file-host")).unwrap();

        let resolver = ConfigResolver::layered(env(&[(ENV_DB_HOST, "env-host")]), file);
        let config = resolver.resolve().unwrap();
        assert_eq!(config.host, "file-host");
        assert_eq!(config.port, 3307);
    }

    #[test]
    fn bad_port_makes_environment_incomplete() {
        let source = env(&[
            (ENV_DB_HOST, "h"),
            (ENV_DB_USER, "u"),
            (ENV_DB_PORT, "not-a-port"),
        ]);
        assert!(source.load().is_none());
    }

    #[test]
    fn save_is_visible_on_next_resolve() {
        let dir = tempdir().unwrap();
        let resolver = ConfigResolver::layered(
            env(&[]),
            FileConfigSource::new(dir.path().join("nested").join(CONFIG_RECORD_FILE)),
        );
        assert!(resolver.try_resolve().is_none());

        resolver.save(&record("first")).unwrap();
        assert_eq!(resolver.resolve().unwrap().host, "first");

        resolver.save(&record("second")).unwrap();
        assert_eq!(resolver.resolve().unwrap().host, "second");
    }

    #[test]
    fn corrupt_record_reads_as_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_RECORD_FILE);
        std::fs::write(&path, "{not json").unwrap();
        assert!(FileConfigSource::new(path).load().is_none());
    }
}
