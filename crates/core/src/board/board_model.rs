//! Entity graph models.
//!
//! Field names serialize in camelCase; that spelling is the wire format shared
//! by the HTTP API and the local cache.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub name: String,
    pub role: String,
    pub avatar: String,
    /// Soft reference to a [`Group`]; not enforced by the store.
    pub group_id: String,
}

/// Append-only progress entry owned by a [`Task`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    pub id: String,
    /// ISO-8601 timestamp or date, carried verbatim.
    pub date: String,
    pub progress_snapshot: i32,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: String,
    pub title: String,
    pub is_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub outcome: String,
    /// Soft reference to a [`Member`]; not enforced by the store.
    pub assigned_to: String,
    pub start_date: String,
    pub due_date: String,
    pub progress: i32,
    #[serde(default)]
    pub logs: Vec<DailyLog>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

/// The complete board at a point in time.
///
/// Always persisted and transferred as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityGraph {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl EntityGraph {
    pub fn group(&self, group_id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    pub fn member(&self, member_id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == member_id)
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn members_in_group(&self, group_id: &str) -> usize {
        self.members.iter().filter(|m| m.group_id == group_id).count()
    }
}
