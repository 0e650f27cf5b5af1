//! Translation between the entity graph and the five flat record sets.
//!
//! [`FIELD_MAPPINGS`] is the authoritative column ↔ field table; `flatten` and
//! `reconstruct` implement it and the tests hold them to it.

use std::collections::HashMap;

use log::warn;
use taskpulse_core::board::{DailyLog, EntityGraph, Group, Member, Milestone, Task};

use super::model::{BoardRows, DailyLogDB, GroupDB, MemberDB, MilestoneDB, TaskDB};

/// What a storage column carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldBinding {
    /// A serialized entity field, by its wire name.
    Field(&'static str),
    /// The id of the task that owns the row.
    OwningTask,
    /// Index of the entity in its parent sequence.
    Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    pub table: &'static str,
    pub column: &'static str,
    pub binding: FieldBinding,
}

const fn field(table: &'static str, column: &'static str, name: &'static str) -> FieldMapping {
    FieldMapping {
        table,
        column,
        binding: FieldBinding::Field(name),
    }
}

const fn bound(table: &'static str, column: &'static str, binding: FieldBinding) -> FieldMapping {
    FieldMapping {
        table,
        column,
        binding,
    }
}

pub const FIELD_MAPPINGS: &[FieldMapping] = &[
    field("groups", "id", "id"),
    field("groups", "name", "name"),
    bound("groups", "position", FieldBinding::Position),
    field("members", "id", "id"),
    field("members", "name", "name"),
    field("members", "role", "role"),
    field("members", "avatar", "avatar"),
    field("members", "group_id", "groupId"),
    bound("members", "position", FieldBinding::Position),
    field("tasks", "id", "id"),
    field("tasks", "title", "title"),
    field("tasks", "outcome", "outcome"),
    field("tasks", "assigned_to", "assignedTo"),
    field("tasks", "start_date", "startDate"),
    field("tasks", "due_date", "dueDate"),
    field("tasks", "progress", "progress"),
    bound("tasks", "position", FieldBinding::Position),
    bound("daily_logs", "task_id", FieldBinding::OwningTask),
    field("daily_logs", "id", "id"),
    field("daily_logs", "date", "date"),
    field("daily_logs", "progress_snapshot", "progressSnapshot"),
    field("daily_logs", "note", "note"),
    bound("daily_logs", "position", FieldBinding::Position),
    bound("milestones", "task_id", FieldBinding::OwningTask),
    field("milestones", "id", "id"),
    field("milestones", "title", "title"),
    field("milestones", "is_completed", "isCompleted"),
    bound("milestones", "position", FieldBinding::Position),
];

pub fn column_for_field(table: &str, field_name: &str) -> Option<&'static str> {
    FIELD_MAPPINGS
        .iter()
        .find(|m| m.table == table && matches!(m.binding, FieldBinding::Field(f) if f == field_name))
        .map(|m| m.column)
}

pub fn binding_for_column(table: &str, column: &str) -> Option<FieldBinding> {
    FIELD_MAPPINGS
        .iter()
        .find(|m| m.table == table && m.column == column)
        .map(|m| m.binding)
}

fn position(index: usize) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}

pub fn flatten(graph: &EntityGraph) -> BoardRows {
    let mut rows = BoardRows {
        groups: graph
            .groups
            .iter()
            .enumerate()
            .map(|(i, g)| GroupDB {
                id: g.id.clone(),
                name: g.name.clone(),
                position: position(i),
            })
            .collect(),
        members: graph
            .members
            .iter()
            .enumerate()
            .map(|(i, m)| MemberDB {
                id: m.id.clone(),
                name: m.name.clone(),
                role: m.role.clone(),
                avatar: m.avatar.clone(),
                group_id: m.group_id.clone(),
                position: position(i),
            })
            .collect(),
        ..Default::default()
    };

    for (i, task) in graph.tasks.iter().enumerate() {
        rows.tasks.push(TaskDB {
            id: task.id.clone(),
            title: task.title.clone(),
            outcome: task.outcome.clone(),
            assigned_to: task.assigned_to.clone(),
            start_date: task.start_date.clone(),
            due_date: task.due_date.clone(),
            progress: task.progress,
            position: position(i),
        });
        rows.logs
            .extend(task.logs.iter().enumerate().map(|(j, l)| DailyLogDB {
                task_id: task.id.clone(),
                id: l.id.clone(),
                date: l.date.clone(),
                progress_snapshot: l.progress_snapshot,
                note: l.note.clone(),
                position: position(j),
            }));
        rows.milestones
            .extend(task.milestones.iter().enumerate().map(|(j, m)| MilestoneDB {
                task_id: task.id.clone(),
                id: m.id.clone(),
                title: m.title.clone(),
                is_completed: m.is_completed,
                position: position(j),
            }));
    }

    rows
}

pub fn reconstruct(mut rows: BoardRows) -> EntityGraph {
    rows.groups.sort_by_key(|r| r.position);
    rows.members.sort_by_key(|r| r.position);
    rows.tasks.sort_by_key(|r| r.position);
    rows.logs.sort_by_key(|r| r.position);
    rows.milestones.sort_by_key(|r| r.position);

    let mut logs_by_task: HashMap<String, Vec<DailyLog>> = HashMap::new();
    for row in rows.logs {
        logs_by_task.entry(row.task_id).or_default().push(DailyLog {
            id: row.id,
            date: row.date,
            progress_snapshot: row.progress_snapshot,
            note: row.note,
        });
    }

    let mut milestones_by_task: HashMap<String, Vec<Milestone>> = HashMap::new();
    for row in rows.milestones {
        milestones_by_task
            .entry(row.task_id)
            .or_default()
            .push(Milestone {
                id: row.id,
                title: row.title,
                is_completed: row.is_completed,
            });
    }

    let tasks = rows
        .tasks
        .into_iter()
        .map(|row| Task {
            logs: logs_by_task.remove(&row.id).unwrap_or_default(),
            milestones: milestones_by_task.remove(&row.id).unwrap_or_default(),
            id: row.id,
            title: row.title,
            outcome: row.outcome,
            assigned_to: row.assigned_to,
            start_date: row.start_date,
            due_date: row.due_date,
            progress: row.progress,
        })
        .collect();

    let orphaned: usize = logs_by_task.values().map(Vec::len).sum::<usize>()
        + milestones_by_task.values().map(Vec::len).sum::<usize>();
    if orphaned > 0 {
        warn!(
            "[Storage] Dropped {} log/milestone row(s) without an owning task",
            orphaned
        );
    }

    EntityGraph {
        tasks,
        members: rows
            .members
            .into_iter()
            .map(|row| Member {
                id: row.id,
                name: row.name,
                role: row.role,
                avatar: row.avatar,
                group_id: row.group_id,
            })
            .collect(),
        groups: rows
            .groups
            .into_iter()
            .map(|row| Group {
                id: row.id,
                name: row.name,
            })
            .collect(),
    }
}
