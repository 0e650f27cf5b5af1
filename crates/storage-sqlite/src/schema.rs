// Diesel table definitions for the board store.

diesel::table! {
    groups (id) {
        id -> Text,
        name -> Text,
        position -> Integer,
    }
}

diesel::table! {
    members (id) {
        id -> Text,
        name -> Text,
        role -> Text,
        avatar -> Text,
        group_id -> Text,
        position -> Integer,
    }
}

diesel::table! {
    tasks (id) {
        id -> Text,
        title -> Text,
        outcome -> Text,
        assigned_to -> Text,
        start_date -> Text,
        due_date -> Text,
        progress -> Integer,
        position -> Integer,
    }
}

diesel::table! {
    daily_logs (task_id, id) {
        task_id -> Text,
        id -> Text,
        date -> Text,
        progress_snapshot -> Integer,
        note -> Text,
        position -> Integer,
    }
}

diesel::table! {
    milestones (task_id, id) {
        task_id -> Text,
        id -> Text,
        title -> Text,
        is_completed -> Bool,
        position -> Integer,
    }
}

diesel::joinable!(daily_logs -> tasks (task_id));
diesel::joinable!(milestones -> tasks (task_id));

diesel::allow_tables_to_appear_in_same_query!(daily_logs, groups, members, milestones, tasks,);
