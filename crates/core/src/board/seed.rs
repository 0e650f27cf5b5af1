//! Seeded dataset shown when neither the store nor the local cache has a board.

use chrono::{Duration, NaiveDate, Utc};

use super::board_model::{DailyLog, EntityGraph, Group, Member, Milestone, Task};

fn day(today: NaiveDate, offset: i64) -> String {
    (today + Duration::days(offset))
        .format("%Y-%m-%d")
        .to_string()
}

fn group(id: &str, name: &str) -> Group {
    Group {
        id: id.to_string(),
        name: name.to_string(),
    }
}

fn member(id: &str, name: &str, role: &str, avatar: &str, group_id: &str) -> Member {
    Member {
        id: id.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        avatar: avatar.to_string(),
        group_id: group_id.to_string(),
    }
}

fn log(id: &str, date: String, progress_snapshot: i32, note: &str) -> DailyLog {
    DailyLog {
        id: id.to_string(),
        date,
        progress_snapshot,
        note: note.to_string(),
    }
}

fn milestone(id: &str, title: &str, is_completed: bool) -> Milestone {
    Milestone {
        id: id.to_string(),
        title: title.to_string(),
        is_completed,
    }
}

/// Build the default board with dates relative to today (UTC).
pub fn default_graph() -> EntityGraph {
    default_graph_for(Utc::now().date_naive())
}

pub(crate) fn default_graph_for(today: NaiveDate) -> EntityGraph {
    let groups = vec![
        group("g1", "Engineering"),
        group("g2", "Design"),
        group("g3", "Product"),
        group("g4", "Marketing"),
    ];

    let members = vec![
        member("m1", "Alex Chen", "Frontend Lead", "https://i.pravatar.cc/150?u=m1", "g1"),
        member("m2", "Sarah Jones", "Backend Engineer", "https://i.pravatar.cc/150?u=m2", "g1"),
        member("m3", "Mike Ross", "Product Designer", "https://i.pravatar.cc/150?u=m3", "g2"),
        member("m4", "Emily Wang", "Product Manager", "https://i.pravatar.cc/150?u=m4", "g3"),
    ];

    let tasks = vec![
        Task {
            id: "t1".to_string(),
            title: "Redesign landing page".to_string(),
            outcome: "Conversion rate up 15%".to_string(),
            assigned_to: "m3".to_string(),
            start_date: day(today, -5),
            due_date: day(today, 2),
            progress: 75,
            logs: vec![
                log("l1", day(today, -4), 20, "Finished wireframes"),
                log("l2", day(today, -1), 75, "High-fidelity mockups in review"),
            ],
            milestones: vec![
                milestone("ms1", "Wireframes", true),
                milestone("ms2", "Visual design", true),
                milestone("ms3", "Developer handoff", false),
            ],
        },
        Task {
            id: "t2".to_string(),
            title: "Migrate API to v2".to_string(),
            outcome: "All clients on the new endpoints".to_string(),
            assigned_to: "m2".to_string(),
            start_date: day(today, -10),
            due_date: day(today, -1),
            progress: 60,
            logs: vec![log("l3", day(today, -3), 60, "Auth endpoints migrated")],
            milestones: vec![
                milestone("ms4", "Schema design", true),
                milestone("ms5", "Endpoint migration", false),
            ],
        },
        Task {
            id: "t3".to_string(),
            title: "Q3 roadmap".to_string(),
            outcome: "Roadmap approved by leadership".to_string(),
            assigned_to: "m4".to_string(),
            start_date: day(today, -2),
            due_date: day(today, 10),
            progress: 30,
            logs: Vec::new(),
            milestones: vec![milestone("ms6", "Collect stakeholder input", true)],
        },
        Task {
            id: "t4".to_string(),
            title: "Mobile navigation fix".to_string(),
            outcome: "Menu usable on small screens".to_string(),
            assigned_to: "m1".to_string(),
            start_date: day(today, -7),
            due_date: day(today, -2),
            progress: 100,
            logs: vec![log("l4", day(today, -2), 100, "Shipped to production")],
            milestones: vec![milestone("ms7", "QA sign-off", true)],
        },
        Task {
            id: "t5".to_string(),
            title: "Database indexing".to_string(),
            outcome: "Dashboard queries under 100ms".to_string(),
            assigned_to: "m2".to_string(),
            start_date: day(today, 0),
            due_date: day(today, 5),
            progress: 10,
            logs: Vec::new(),
            milestones: Vec::new(),
        },
        Task {
            id: "t6".to_string(),
            title: "Launch campaign brief".to_string(),
            outcome: "Campaign brief signed off".to_string(),
            assigned_to: "m4".to_string(),
            start_date: day(today, -1),
            due_date: day(today, 7),
            progress: 0,
            logs: Vec::new(),
            milestones: vec![
                milestone("ms8", "Audience research", false),
                milestone("ms9", "Channel plan", false),
            ],
        },
    ];

    EntityGraph {
        tasks,
        members,
        groups,
    }
}
