//! Edit operations on the entity graph.
//!
//! Every operation validates before it mutates: an `Err` leaves the graph
//! exactly as it was.

use std::collections::HashSet;

use super::board_model::{DailyLog, EntityGraph, Group, Member, Milestone, Task};
use crate::errors::ValidationError;

type EditResult = std::result::Result<(), ValidationError>;

fn check_progress(field: &'static str, value: i32) -> EditResult {
    if (0..=100).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::ProgressOutOfRange { field, value })
    }
}

fn check_not_blank(field: &'static str, value: &str) -> EditResult {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyField(field))
    } else {
        Ok(())
    }
}

fn check_unique<'a>(
    entity: &'static str,
    ids: impl IntoIterator<Item = &'a str>,
) -> EditResult {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ValidationError::duplicate(entity, id));
        }
    }
    Ok(())
}

fn check_task_contents(task: &Task) -> EditResult {
    check_not_blank("task id", &task.id)?;
    check_progress("progress", task.progress)?;
    for log in &task.logs {
        check_progress("progressSnapshot", log.progress_snapshot)?;
    }
    check_unique("daily log", task.logs.iter().map(|l| l.id.as_str()))?;
    check_unique("milestone", task.milestones.iter().map(|m| m.id.as_str()))
}

impl EntityGraph {
    /// Structural validation of a whole graph (ids unique per record set,
    /// progress values in range). References between entities are soft and
    /// not checked.
    pub fn validate(&self) -> EditResult {
        check_unique("group", self.groups.iter().map(|g| g.id.as_str()))?;
        check_unique("member", self.members.iter().map(|m| m.id.as_str()))?;
        check_unique("task", self.tasks.iter().map(|t| t.id.as_str()))?;
        self.tasks.iter().try_for_each(check_task_contents)
    }

    fn task_mut(&mut self, task_id: &str) -> std::result::Result<&mut Task, ValidationError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| ValidationError::not_found("task", task_id))
    }

    // Groups

    pub fn add_group(&mut self, group: Group) -> EditResult {
        check_not_blank("group id", &group.id)?;
        check_not_blank("group name", &group.name)?;
        if self.group(&group.id).is_some() {
            return Err(ValidationError::duplicate("group", group.id));
        }
        self.groups.push(group);
        Ok(())
    }

    pub fn rename_group(&mut self, group_id: &str, name: &str) -> EditResult {
        check_not_blank("group name", name)?;
        let group = self
            .groups
            .iter_mut()
            .find(|g| g.id == group_id)
            .ok_or_else(|| ValidationError::not_found("group", group_id))?;
        group.name = name.to_string();
        Ok(())
    }

    /// Rejected while any member still references the group.
    pub fn delete_group(&mut self, group_id: &str) -> EditResult {
        if self.group(group_id).is_none() {
            return Err(ValidationError::not_found("group", group_id));
        }
        let member_count = self.members_in_group(group_id);
        if member_count > 0 {
            return Err(ValidationError::GroupInUse {
                group_id: group_id.to_string(),
                member_count,
            });
        }
        self.groups.retain(|g| g.id != group_id);
        Ok(())
    }

    // Members

    pub fn add_member(&mut self, member: Member) -> EditResult {
        check_not_blank("member id", &member.id)?;
        check_not_blank("member name", &member.name)?;
        if self.member(&member.id).is_some() {
            return Err(ValidationError::duplicate("member", member.id));
        }
        self.members.push(member);
        Ok(())
    }

    pub fn update_member(&mut self, member: Member) -> EditResult {
        check_not_blank("member name", &member.name)?;
        let existing = self
            .members
            .iter_mut()
            .find(|m| m.id == member.id)
            .ok_or_else(|| ValidationError::not_found("member", member.id.clone()))?;
        *existing = member;
        Ok(())
    }

    /// Tasks assigned to the member keep their (now orphaned) assignment.
    pub fn delete_member(&mut self, member_id: &str) -> EditResult {
        if self.member(member_id).is_none() {
            return Err(ValidationError::not_found("member", member_id));
        }
        self.members.retain(|m| m.id != member_id);
        Ok(())
    }

    // Tasks

    pub fn add_task(&mut self, task: Task) -> EditResult {
        check_task_contents(&task)?;
        if self.task(&task.id).is_some() {
            return Err(ValidationError::duplicate("task", task.id));
        }
        self.tasks.push(task);
        Ok(())
    }

    /// Replaces the task's own fields. Logs and milestones are left untouched;
    /// they change only through their dedicated operations.
    pub fn update_task(&mut self, task: Task) -> EditResult {
        check_progress("progress", task.progress)?;
        let existing = self.task_mut(&task.id)?;
        existing.title = task.title;
        existing.outcome = task.outcome;
        existing.assigned_to = task.assigned_to;
        existing.start_date = task.start_date;
        existing.due_date = task.due_date;
        existing.progress = task.progress;
        Ok(())
    }

    /// Removes the task together with its logs and milestones.
    pub fn delete_task(&mut self, task_id: &str) -> EditResult {
        if self.task(task_id).is_none() {
            return Err(ValidationError::not_found("task", task_id));
        }
        self.tasks.retain(|t| t.id != task_id);
        Ok(())
    }

    /// Sets the task's progress and appends a log entry with the same snapshot.
    pub fn record_progress(&mut self, task_id: &str, log: DailyLog) -> EditResult {
        check_progress("progressSnapshot", log.progress_snapshot)?;
        let task = self.task_mut(task_id)?;
        if task.logs.iter().any(|l| l.id == log.id) {
            return Err(ValidationError::duplicate("daily log", log.id));
        }
        task.progress = log.progress_snapshot;
        task.logs.push(log);
        Ok(())
    }

    // Milestones

    pub fn add_milestone(&mut self, task_id: &str, milestone: Milestone) -> EditResult {
        check_not_blank("milestone title", &milestone.title)?;
        let task = self.task_mut(task_id)?;
        if task.milestones.iter().any(|m| m.id == milestone.id) {
            return Err(ValidationError::duplicate("milestone", milestone.id));
        }
        task.milestones.push(milestone);
        Ok(())
    }

    pub fn toggle_milestone(&mut self, task_id: &str, milestone_id: &str) -> EditResult {
        let task = self.task_mut(task_id)?;
        let milestone = task
            .milestones
            .iter_mut()
            .find(|m| m.id == milestone_id)
            .ok_or_else(|| ValidationError::not_found("milestone", milestone_id))?;
        milestone.is_completed = !milestone.is_completed;
        Ok(())
    }

    pub fn delete_milestone(&mut self, task_id: &str, milestone_id: &str) -> EditResult {
        let task = self.task_mut(task_id)?;
        if !task.milestones.iter().any(|m| m.id == milestone_id) {
            return Err(ValidationError::not_found("milestone", milestone_id));
        }
        task.milestones.retain(|m| m.id != milestone_id);
        Ok(())
    }
}
