//! Row types for the board tables.

use diesel::prelude::*;

#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::groups)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GroupDB {
    pub id: String,
    pub name: String,
    pub position: i32,
}

#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::members)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MemberDB {
    pub id: String,
    pub name: String,
    pub role: String,
    pub avatar: String,
    pub group_id: String,
    pub position: i32,
}

#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::tasks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TaskDB {
    pub id: String,
    pub title: String,
    pub outcome: String,
    pub assigned_to: String,
    pub start_date: String,
    pub due_date: String,
    pub progress: i32,
    pub position: i32,
}

#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(primary_key(task_id, id))]
#[diesel(table_name = crate::schema::daily_logs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DailyLogDB {
    pub task_id: String,
    pub id: String,
    pub date: String,
    pub progress_snapshot: i32,
    pub note: String,
    pub position: i32,
}

#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(primary_key(task_id, id))]
#[diesel(table_name = crate::schema::milestones)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MilestoneDB {
    pub task_id: String,
    pub id: String,
    pub title: String,
    pub is_completed: bool,
    pub position: i32,
}

/// The five record sets of one board, in storage shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardRows {
    pub groups: Vec<GroupDB>,
    pub members: Vec<MemberDB>,
    pub tasks: Vec<TaskDB>,
    pub logs: Vec<DailyLogDB>,
    pub milestones: Vec<MilestoneDB>,
}
