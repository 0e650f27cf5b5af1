//! Single-writer actor.
//!
//! Every write runs on one dedicated thread, one job at a time, each inside an
//! `IMMEDIATE` transaction. Readers use the pool directly.

use diesel::SqliteConnection;
use log::{debug, error};
use tokio::sync::{mpsc, oneshot};

use taskpulse_core::errors::{DatabaseError, Error};
use taskpulse_core::Result;

use super::DbPool;
use crate::errors::StorageError;

type Job = Box<dyn FnOnce(Result<&mut SqliteConnection>) + Send + 'static>;

enum TxError {
    Job(Error),
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for TxError {
    fn from(err: diesel::result::Error) -> Self {
        TxError::Diesel(err)
    }
}

#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::UnboundedSender<Job>,
}

impl WriteHandle {
    /// Run `job` in its own transaction on the writer thread. An `Err` from
    /// the job rolls back everything it did.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel::<Result<T>>();

        let boxed: Job = Box::new(move |conn| {
            let result = conn.and_then(|conn| {
                conn.immediate_transaction::<T, TxError, _>(|conn| job(conn).map_err(TxError::Job))
                    .map_err(|e| match e {
                        TxError::Job(err) => err,
                        TxError::Diesel(err) => {
                            Error::Database(DatabaseError::TransactionFailed(err.to_string()))
                        }
                    })
            });
            let _ = reply_tx.send(result);
        });

        self.tx.send(boxed).map_err(|_| {
            Error::Database(DatabaseError::Internal(
                "Database writer is not running".to_string(),
            ))
        })?;

        reply_rx.await.map_err(|_| {
            Error::Database(DatabaseError::Internal(
                "Database writer dropped the job".to_string(),
            ))
        })?
    }
}

/// Start the writer thread for `pool`. The thread exits once every handle is dropped.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, mut rx) = mpsc::unbounded_channel::<Job>();

    let spawned = std::thread::Builder::new()
        .name("taskpulse-db-writer".to_string())
        .spawn(move || {
            while let Some(job) = rx.blocking_recv() {
                match pool.get() {
                    Ok(mut conn) => job(Ok(&mut *conn)),
                    Err(e) => {
                        error!("[Storage] Writer could not acquire a connection: {}", e);
                        job(Err(StorageError::from(e).into()));
                    }
                }
            }
            debug!("[Storage] Writer thread stopped");
        });

    if let Err(e) = spawned {
        error!("[Storage] Failed to start writer thread: {}", e);
    }

    WriteHandle { tx }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, get_connection, init, run_migrations};
    use crate::schema::groups;
    use diesel::prelude::*;
    use tempfile::tempdir;

    fn group_count(pool: &std::sync::Arc<DbPool>) -> i64 {
        let mut conn = get_connection(pool).unwrap();
        groups::table.count().get_result(&mut conn).unwrap()
    }

    #[tokio::test]
    async fn failed_job_rolls_back() {
        let dir = tempdir().unwrap();
        let db_path = init(&dir.path().to_string_lossy(), "board").unwrap();
        run_migrations(&db_path).unwrap();
        let pool = create_pool(&db_path).unwrap();
        let writer = spawn_writer(pool.as_ref().clone());

        let result: Result<()> = writer
            .exec(|conn| {
                diesel::insert_into(groups::table)
                    .values((
                        groups::id.eq("g1"),
                        groups::name.eq("Eng"),
                        groups::position.eq(0),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Err(Error::Database(DatabaseError::Internal("boom".to_string())))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(group_count(&pool), 0);
    }

    #[tokio::test]
    async fn successful_job_commits_and_returns_value() {
        let dir = tempdir().unwrap();
        let db_path = init(&dir.path().to_string_lossy(), "board").unwrap();
        run_migrations(&db_path).unwrap();
        let pool = create_pool(&db_path).unwrap();
        let writer = spawn_writer(pool.as_ref().clone());

        let inserted = writer
            .exec(|conn| {
                Ok(diesel::insert_into(groups::table)
                    .values((
                        groups::id.eq("g1"),
                        groups::name.eq("Eng"),
                        groups::position.eq(0),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
            .unwrap();

        assert_eq!(inserted, 1);
        assert_eq!(group_count(&pool), 1);
    }
}
