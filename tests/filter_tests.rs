use chrono::NaiveDate;
use hometask::filter::{filter_tasks, TaskFilter};
use hometask::models::{RecurrenceUnit, Task};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn today() -> NaiveDate {
    d(2025, 12, 4)
}

fn task(id: u64) -> Task {
    Task::new(id, format!("Task {}", id), d(2025, 12, 1))
}

fn ids(tasks: &[&Task]) -> Vec<u64> {
    tasks.iter().map(|t| t.id).collect()
}

#[test]
fn test_all_returns_everything() {
    let tasks = vec![task(1), task(2), task(3)];
    let result = filter_tasks(&tasks, TaskFilter::All, Some("user-1"), today());
    assert_eq!(ids(&result), vec![1, 2, 3]);
    assert!(filter_tasks(&[], TaskFilter::All, Some("user-1"), today()).is_empty());
}

#[test]
fn test_assigned_to_me() {
    let tasks = vec![
        task(1).assigned("user-1"),
        task(2).assigned("user-2"),
        task(3).assigned("user-1"),
        task(4),
    ];
    let mine = filter_tasks(&tasks, TaskFilter::AssignedToMe, Some("user-1"), today());
    assert_eq!(ids(&mine), vec![1, 3]);

    let nobody = filter_tasks(&tasks, TaskFilter::AssignedToMe, Some("user-9"), today());
    assert!(nobody.is_empty());

    let no_user = filter_tasks(&tasks, TaskFilter::AssignedToMe, None, today());
    assert!(no_user.is_empty());
}

#[test]
fn test_pending_and_completed() {
    let tasks = vec![task(1), task(2).done_on(d(2025, 12, 2)), task(3)];
    let pending = filter_tasks(&tasks, TaskFilter::Pending, Some("user-1"), today());
    assert_eq!(ids(&pending), vec![1, 3]);
    let completed = filter_tasks(&tasks, TaskFilter::Completed, Some("user-1"), today());
    assert_eq!(ids(&completed), vec![2]);
}

#[test]
fn test_recurring_task_needs_redoing() {
    // weekly from Nov 1; last due is Nov 29, the Nov 8 completion is stale
    let weekly = Task::new(7, "Bins", d(2025, 11, 1))
        .every(1, RecurrenceUnit::Weeks)
        .done_on(d(2025, 11, 8));
    let tasks = vec![weekly];
    assert_eq!(ids(&filter_tasks(&tasks, TaskFilter::Pending, None, today())), vec![7]);
    assert!(filter_tasks(&tasks, TaskFilter::Completed, None, today()).is_empty());
}

#[test]
fn test_recurring_task_done_for_current_period() {
    let weekly = Task::new(8, "Bins", d(2025, 11, 27))
        .every(1, RecurrenceUnit::Weeks)
        .done_on(d(2025, 12, 5));
    let tasks = vec![weekly];
    assert_eq!(ids(&filter_tasks(&tasks, TaskFilter::Completed, None, today())), vec![8]);
}

#[test]
fn test_unknown_filter_means_all() {
    let tasks = vec![task(1), task(2)];
    let filter = TaskFilter::parse("unknown");
    assert_eq!(filter_tasks(&tasks, filter, Some("user-1"), today()).len(), 2);
}
