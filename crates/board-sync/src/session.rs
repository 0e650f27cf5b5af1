//! Editing session: owns the board in memory and feeds the scheduler.

use std::sync::Arc;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use taskpulse_core::board::{new_entity_id, DailyLog, EntityGraph, Group, Member, Milestone, Task};
use taskpulse_core::errors::ValidationError;
use taskpulse_core::sync::SyncStatus;
use tokio::sync::watch;

use crate::connector::{GraphSaver, RemoteConnector};
use crate::error::Result;
use crate::scheduler::SyncScheduler;

type EditResult<T = ()> = std::result::Result<T, ValidationError>;

/// The client's copy of the board for one session.
///
/// Every edit is validated against a scratch copy first; the live graph is
/// replaced, and a save scheduled, only when the edit succeeds.
pub struct EditSession {
    graph: EntityGraph,
    scheduler: SyncScheduler,
}

impl EditSession {
    /// Fetch the board and start a session on it. The scheduler only starts
    /// after the initial load, so loading never triggers a save.
    pub async fn load(connector: Arc<RemoteConnector>, debounce: Duration) -> Result<Self> {
        let graph = connector.fetch_graph().await?;
        Ok(Self::from_loaded(graph, connector, debounce))
    }

    pub fn from_loaded(graph: EntityGraph, saver: Arc<dyn GraphSaver>, debounce: Duration) -> Self {
        Self {
            graph,
            scheduler: SyncScheduler::spawn(saver, debounce),
        }
    }

    pub fn graph(&self) -> &EntityGraph {
        &self.graph
    }

    pub fn status(&self) -> SyncStatus {
        self.scheduler.status()
    }

    pub fn subscribe(&self) -> watch::Receiver<SyncStatus> {
        self.scheduler.subscribe()
    }

    /// Apply an arbitrary edit. The edited graph must still pass
    /// [`EntityGraph::validate`], otherwise nothing changes.
    pub fn apply<T, F>(&mut self, edit: F) -> EditResult<T>
    where
        F: FnOnce(&mut EntityGraph) -> EditResult<T>,
    {
        let mut next = self.graph.clone();
        let value = edit(&mut next)?;
        next.validate()?;
        self.graph = next;
        self.scheduler.notify(self.graph.clone());
        Ok(value)
    }

    pub fn add_group(&mut self, name: &str) -> EditResult<Group> {
        let group = Group {
            id: new_entity_id(),
            name: name.to_string(),
        };
        let created = group.clone();
        self.apply(|g| g.add_group(group))?;
        Ok(created)
    }

    pub fn rename_group(&mut self, group_id: &str, name: &str) -> EditResult {
        self.apply(|g| g.rename_group(group_id, name))
    }

    pub fn delete_group(&mut self, group_id: &str) -> EditResult {
        self.apply(|g| g.delete_group(group_id))
    }

    pub fn add_member(&mut self, member: Member) -> EditResult {
        self.apply(|g| g.add_member(member))
    }

    pub fn update_member(&mut self, member: Member) -> EditResult {
        self.apply(|g| g.update_member(member))
    }

    pub fn delete_member(&mut self, member_id: &str) -> EditResult {
        self.apply(|g| g.delete_member(member_id))
    }

    pub fn add_task(&mut self, task: Task) -> EditResult {
        self.apply(|g| g.add_task(task))
    }

    pub fn update_task(&mut self, task: Task) -> EditResult {
        self.apply(|g| g.update_task(task))
    }

    pub fn delete_task(&mut self, task_id: &str) -> EditResult {
        self.apply(|g| g.delete_task(task_id))
    }

    /// Set the task's progress and append a log stamped with the current UTC time.
    pub fn record_progress(&mut self, task_id: &str, progress: i32, note: &str) -> EditResult<DailyLog> {
        let log = DailyLog {
            id: new_entity_id(),
            date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            progress_snapshot: progress,
            note: note.to_string(),
        };
        let created = log.clone();
        self.apply(|g| g.record_progress(task_id, log))?;
        Ok(created)
    }

    pub fn add_milestone(&mut self, task_id: &str, title: &str) -> EditResult<Milestone> {
        let milestone = Milestone {
            id: new_entity_id(),
            title: title.to_string(),
            is_completed: false,
        };
        let created = milestone.clone();
        self.apply(|g| g.add_milestone(task_id, milestone))?;
        Ok(created)
    }

    pub fn toggle_milestone(&mut self, task_id: &str, milestone_id: &str) -> EditResult {
        self.apply(|g| g.toggle_milestone(task_id, milestone_id))
    }

    pub fn delete_milestone(&mut self, task_id: &str, milestone_id: &str) -> EditResult {
        self.apply(|g| g.delete_milestone(task_id, milestone_id))
    }

    /// End the session. A pending (not yet started) save is dropped.
    pub async fn close(self) {
        self.scheduler.close().await;
    }
}
