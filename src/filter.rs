use std::fmt;

use chrono::NaiveDate;

use crate::models::Task;
use crate::recurrence::check_is_done;

/// Which subset of tasks to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    AssignedToMe,
    Pending,
    Completed,
}

impl TaskFilter {
    /// Parses a filter name. Anything unrecognized means `All`.
    pub fn parse(s: &str) -> TaskFilter {
        match s.trim().to_lowercase().as_str() {
            "assigned_to_me" | "mine" | "me" => TaskFilter::AssignedToMe,
            "pending" | "open" => TaskFilter::Pending,
            "completed" | "done" => TaskFilter::Completed,
            _ => TaskFilter::All,
        }
    }
}

impl fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskFilter::All => "all",
            TaskFilter::AssignedToMe => "assigned_to_me",
            TaskFilter::Pending => "pending",
            TaskFilter::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// Selects the tasks matching `filter`, keeping their order.
///
/// `current_user` is the member id used by `AssignedToMe`; without one that
/// filter matches nothing.
pub fn filter_tasks<'a>(
    tasks: &'a [Task],
    filter: TaskFilter,
    current_user: Option<&str>,
    today: NaiveDate,
) -> Vec<&'a Task> {
    match filter {
        TaskFilter::All => tasks.iter().collect(),
        TaskFilter::AssignedToMe => match current_user {
            Some(user) => tasks
                .iter()
                .filter(|t| t.assigned_to.as_deref() == Some(user))
                .collect(),
            None => Vec::new(),
        },
        TaskFilter::Pending => tasks.iter().filter(|t| !check_is_done(t, today)).collect(),
        TaskFilter::Completed => tasks.iter().filter(|t| check_is_done(t, today)).collect(),
    }
}
