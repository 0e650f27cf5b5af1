use std::sync::{Arc, Mutex};

use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use log::info;

use taskpulse_core::config::ConnectionConfig;
use taskpulse_core::errors::{DatabaseError, Error};
use taskpulse_core::Result;

use crate::board::BoardRepository;
use crate::db::{create_pool, init, run_migrations, write_actor::spawn_writer, WriteHandle};

/// An open board database: its pool and its writer.
pub struct BoardStore {
    db_path: String,
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl BoardStore {
    pub fn open(data_dir: &str, config: &ConnectionConfig) -> Result<Self> {
        let db_path = init(data_dir, &config.database)?;
        let pool = create_pool(&db_path)?;
        let writer = spawn_writer(pool.as_ref().clone());
        info!("[Storage] Opened board store at {}", db_path);
        Ok(Self {
            db_path,
            pool,
            writer,
        })
    }

    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    pub fn repository(&self) -> BoardRepository {
        BoardRepository::new(self.pool.clone(), self.writer.clone())
    }

    /// Create the board tables if they do not exist yet. Existing rows are kept.
    pub fn initialize_schema(&self) -> Result<()> {
        run_migrations(&self.db_path)
    }
}

/// Hands out the store for the currently resolved configuration, reusing the
/// open one while the database path stays the same.
pub struct BoardStoreProvider {
    data_dir: String,
    current: Mutex<Option<Arc<BoardStore>>>,
}

impl BoardStoreProvider {
    pub fn new(data_dir: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            current: Mutex::new(None),
        }
    }

    pub fn data_dir(&self) -> &str {
        &self.data_dir
    }

    pub fn open(&self, config: &ConnectionConfig) -> Result<Arc<BoardStore>> {
        let db_path = crate::db::database_path(&self.data_dir, &config.database)?;
        let mut current = self.current.lock().map_err(|_| {
            Error::Database(DatabaseError::Internal(
                "Board store lock poisoned".to_string(),
            ))
        })?;

        if let Some(store) = current.as_ref().filter(|s| s.db_path == db_path) {
            return Ok(store.clone());
        }

        let store = Arc::new(BoardStore::open(&self.data_dir, config)?);
        *current = Some(store.clone());
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskpulse_core::board::{default_graph, BoardRepositoryTrait};
    use tempfile::tempdir;

    fn config(database: &str) -> ConnectionConfig {
        ConnectionConfig {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            database: database.to_string(),
        }
    }

    #[tokio::test]
    async fn provider_reuses_store_for_same_database() {
        let dir = tempdir().unwrap();
        let provider = BoardStoreProvider::new(dir.path().to_string_lossy());

        let first = provider.open(&config("board")).unwrap();
        let again = provider.open(&config("board")).unwrap();
        assert!(Arc::ptr_eq(&first, &again));

        let other = provider.open(&config("other")).unwrap();
        assert!(!Arc::ptr_eq(&first, &other));
        assert!(other.db_path().ends_with("other.db"));
    }

    #[tokio::test]
    async fn initialize_schema_is_idempotent_and_keeps_data() {
        let dir = tempdir().unwrap();
        let provider = BoardStoreProvider::new(dir.path().to_string_lossy());
        let store = provider.open(&config("board")).unwrap();

        store.initialize_schema().unwrap();
        let repo = store.repository();
        let seed = default_graph();
        repo.replace_graph(seed.clone()).await.unwrap();

        store.initialize_schema().unwrap();
        assert_eq!(repo.load_graph().unwrap(), seed);
    }

    #[tokio::test]
    async fn reading_before_initialization_fails() {
        let dir = tempdir().unwrap();
        let provider = BoardStoreProvider::new(dir.path().to_string_lossy());
        let store = provider.open(&config("board")).unwrap();
        assert!(store.repository().load_graph().is_err());
    }
}
