//! Database file layout, connection pooling and migrations.

pub mod write_actor;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::{Connection, SqliteConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::{debug, info};

use taskpulse_core::errors::{ConfigError, DatabaseError};
use taskpulse_core::Result;

use crate::errors::StorageError;

pub use write_actor::WriteHandle;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const DB_FILE_EXTENSION: &str = "db";
const POOL_MAX_SIZE: u32 = 8;
const BUSY_TIMEOUT_MS: u64 = 5_000;
const POOL_CONNECTION_TIMEOUT_SECS: u64 = 10;

#[derive(Debug)]
struct ConnectionOptions;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {}; PRAGMA journal_mode = WAL;",
            BUSY_TIMEOUT_MS
        ))
        .map_err(r2d2::Error::QueryError)
    }
}

/// Database names become file names, so anything that could escape the data
/// directory is refused.
fn validate_database_name(database: &str) -> Result<()> {
    let name = database.trim();
    let invalid = name.is_empty()
        || name.contains("..")
        || name
            .chars()
            .any(|c| matches!(c, '/' | '\\' | ':' | '\0'));
    if invalid {
        return Err(ConfigError::InvalidDatabaseName(database.to_string()).into());
    }
    Ok(())
}

/// `<data_dir>/<database>.db`
pub fn database_path(data_dir: &str, database: &str) -> Result<String> {
    validate_database_name(database)?;
    let file = format!("{}.{}", database.trim(), DB_FILE_EXTENSION);
    Ok(Path::new(data_dir).join(file).to_string_lossy().to_string())
}

/// Make sure the data directory exists and return the database file path.
pub fn init(data_dir: &str, database: &str) -> Result<String> {
    let db_path = database_path(data_dir, database)?;
    std::fs::create_dir_all(data_dir)?;
    debug!("[Storage] Using database file {}", db_path);
    Ok(db_path)
}

pub fn create_pool(db_path: &str) -> Result<Arc<DbPool>> {
    let manager = ConnectionManager::<SqliteConnection>::new(db_path);
    let pool = Pool::builder()
        .max_size(POOL_MAX_SIZE)
        .connection_timeout(Duration::from_secs(POOL_CONNECTION_TIMEOUT_SECS))
        .connection_customizer(Box::new(ConnectionOptions))
        .build(manager)
        .map_err(|e| DatabaseError::PoolCreationFailed(e.to_string()))?;
    Ok(Arc::new(pool))
}

pub fn get_connection(pool: &Arc<DbPool>) -> Result<DbConnection> {
    Ok(pool.get().map_err(StorageError::from)?)
}

/// Apply pending migrations. Safe to call repeatedly.
pub fn run_migrations(db_path: &str) -> Result<()> {
    let mut conn = SqliteConnection::establish(db_path).map_err(StorageError::from)?;
    conn.batch_execute("PRAGMA foreign_keys = ON;")
        .map_err(StorageError::from)?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| StorageError::Migration(e.to_string()))?;
    if applied.is_empty() {
        debug!("[Storage] Schema already up to date at {}", db_path);
    } else {
        info!(
            "[Storage] Applied {} migration(s) to {}",
            applied.len(),
            db_path
        );
    }
    Ok(())
}
