use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;

use taskpulse_core::board::{BoardRepositoryTrait, EntityGraph};
use taskpulse_core::Result;

use super::mapper::{flatten, reconstruct};
use super::model::{BoardRows, DailyLogDB, GroupDB, MemberDB, MilestoneDB, TaskDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{daily_logs, groups, members, milestones, tasks};

/// Rows per INSERT statement; keeps bound parameters well under SQLite's limit.
const INSERT_CHUNK_ROWS: usize = 500;

pub struct BoardRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl BoardRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        BoardRepository { pool, writer }
    }

    pub fn load_rows_impl(&self) -> Result<BoardRows> {
        let mut conn = get_connection(&self.pool)?;
        // One read transaction so the five selects see the same commit.
        let rows = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                Ok(BoardRows {
                    groups: groups::table
                        .order(groups::position.asc())
                        .select(GroupDB::as_select())
                        .load(conn)?,
                    members: members::table
                        .order(members::position.asc())
                        .select(MemberDB::as_select())
                        .load(conn)?,
                    tasks: tasks::table
                        .order(tasks::position.asc())
                        .select(TaskDB::as_select())
                        .load(conn)?,
                    logs: daily_logs::table
                        .order((daily_logs::task_id.asc(), daily_logs::position.asc()))
                        .select(DailyLogDB::as_select())
                        .load(conn)?,
                    milestones: milestones::table
                        .order((milestones::task_id.asc(), milestones::position.asc()))
                        .select(MilestoneDB::as_select())
                        .load(conn)?,
                })
            })
            .map_err(StorageError::from)?;
        Ok(rows)
    }

    pub fn load_graph_impl(&self) -> Result<EntityGraph> {
        Ok(reconstruct(self.load_rows_impl()?))
    }
}

/// Delete every board row, children first, then insert `rows`.
/// Must run inside the caller's transaction.
pub(crate) fn replace_all(conn: &mut SqliteConnection, rows: &BoardRows) -> Result<()> {
    diesel::delete(daily_logs::table)
        .execute(conn)
        .map_err(StorageError::from)?;
    diesel::delete(milestones::table)
        .execute(conn)
        .map_err(StorageError::from)?;
    diesel::delete(tasks::table)
        .execute(conn)
        .map_err(StorageError::from)?;
    diesel::delete(members::table)
        .execute(conn)
        .map_err(StorageError::from)?;
    diesel::delete(groups::table)
        .execute(conn)
        .map_err(StorageError::from)?;

    for chunk in rows.groups.chunks(INSERT_CHUNK_ROWS) {
        diesel::insert_into(groups::table)
            .values(chunk)
            .execute(conn)
            .map_err(StorageError::from)?;
    }
    for chunk in rows.members.chunks(INSERT_CHUNK_ROWS) {
        diesel::insert_into(members::table)
            .values(chunk)
            .execute(conn)
            .map_err(StorageError::from)?;
    }
    for chunk in rows.tasks.chunks(INSERT_CHUNK_ROWS) {
        diesel::insert_into(tasks::table)
            .values(chunk)
            .execute(conn)
            .map_err(StorageError::from)?;
    }
    for chunk in rows.logs.chunks(INSERT_CHUNK_ROWS) {
        diesel::insert_into(daily_logs::table)
            .values(chunk)
            .execute(conn)
            .map_err(StorageError::from)?;
    }
    for chunk in rows.milestones.chunks(INSERT_CHUNK_ROWS) {
        diesel::insert_into(milestones::table)
            .values(chunk)
            .execute(conn)
            .map_err(StorageError::from)?;
    }
    Ok(())
}

#[async_trait]
impl BoardRepositoryTrait for BoardRepository {
    fn load_graph(&self) -> Result<EntityGraph> {
        self.load_graph_impl()
    }

    async fn replace_graph(&self, graph: EntityGraph) -> Result<()> {
        let rows = flatten(&graph);
        debug!(
            "[Storage] Replacing board: {} group(s), {} member(s), {} task(s), {} log(s), {} milestone(s)",
            rows.groups.len(),
            rows.members.len(),
            rows.tasks.len(),
            rows.logs.len(),
            rows.milestones.len()
        );
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> { replace_all(conn, &rows) })
            .await
    }
}
