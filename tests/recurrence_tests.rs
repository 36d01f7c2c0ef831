use chrono::NaiveDate;
use hometask::models::{RecurrenceUnit, Task};
use hometask::recurrence::{add_interval, check_is_done, get_last_due_date, get_next_due_date_after_today};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn today() -> NaiveDate {
    d(2025, 11, 22)
}

fn recurring(due: NaiveDate, interval: i32, unit: RecurrenceUnit) -> Task {
    Task::new(1, "Test Task", due).every(interval, unit)
}

#[test]
fn test_add_interval_units() {
    let date = d(2025, 11, 22);
    assert_eq!(add_interval(date, &RecurrenceUnit::Days, 5), d(2025, 11, 27));
    assert_eq!(add_interval(date, &RecurrenceUnit::Days, -5), d(2025, 11, 17));
    assert_eq!(add_interval(date, &RecurrenceUnit::Days, 0), date);
    assert_eq!(add_interval(date, &RecurrenceUnit::Weeks, 2), d(2025, 12, 6));
    assert_eq!(add_interval(date, &RecurrenceUnit::Months, 3), d(2026, 2, 22));
    assert_eq!(add_interval(date, &RecurrenceUnit::Years, 2), d(2027, 11, 22));
}

#[test]
fn test_add_interval_unknown_unit_is_a_no_op() {
    let date = d(2025, 11, 22);
    assert_eq!(add_interval(date, &RecurrenceUnit::from("bogus"), 5), date);
}

#[test]
fn test_add_interval_leaves_input_untouched() {
    let date = d(2025, 11, 22);
    let before = date;
    let _ = add_interval(date, &RecurrenceUnit::Days, 5);
    assert_eq!(date, before);
}

#[test]
fn test_last_due_date_requires_recurrence() {
    let once = Task::new(1, "Test Task", d(2025, 11, 20));
    assert_eq!(get_last_due_date(&once, today()), None);

    let mut no_due = recurring(d(2025, 11, 20), 1, RecurrenceUnit::Days);
    no_due.due_date = None;
    assert_eq!(get_last_due_date(&no_due, today()), None);

    let mut no_unit = recurring(d(2025, 11, 20), 1, RecurrenceUnit::Days);
    no_unit.recurrence_unit = None;
    assert_eq!(get_last_due_date(&no_unit, today()), None);

    let mut no_interval = recurring(d(2025, 11, 20), 1, RecurrenceUnit::Days);
    no_interval.recurrence_interval = None;
    assert_eq!(get_last_due_date(&no_interval, today()), None);
}

#[test]
fn test_last_due_date_first_occurrence_in_future() {
    let task = recurring(d(2025, 11, 25), 1, RecurrenceUnit::Days);
    assert_eq!(get_last_due_date(&task, today()), None);
}

#[test]
fn test_last_due_date_includes_today() {
    let starts_today = recurring(d(2025, 11, 22), 1, RecurrenceUnit::Days);
    assert_eq!(get_last_due_date(&starts_today, today()), Some(d(2025, 11, 22)));

    let daily = recurring(d(2025, 11, 20), 1, RecurrenceUnit::Days);
    assert_eq!(get_last_due_date(&daily, today()), Some(d(2025, 11, 22)));

    let weekly = recurring(d(2025, 11, 1), 1, RecurrenceUnit::Weeks);
    assert_eq!(get_last_due_date(&weekly, today()), Some(d(2025, 11, 22)));

    let monthly = recurring(d(2025, 9, 22), 1, RecurrenceUnit::Months);
    assert_eq!(get_last_due_date(&monthly, today()), Some(d(2025, 11, 22)));

    let yearly = recurring(d(2023, 11, 22), 1, RecurrenceUnit::Years);
    assert_eq!(get_last_due_date(&yearly, today()), Some(d(2025, 11, 22)));
}

#[test]
fn test_last_due_date_with_larger_interval() {
    // 15, 18, 21, 24
    let task = recurring(d(2025, 11, 15), 3, RecurrenceUnit::Days);
    assert_eq!(get_last_due_date(&task, today()), Some(d(2025, 11, 21)));
}

#[test]
fn test_last_due_date_from_timestamp_record() {
    let json = r#"{"id":1,"title":"Test Task","due_date":"2025-11-20T23:59:59Z",
        "recurring":true,"recurrence_unit":"days","recurrence_interval":1}"#;
    let task: Task = serde_json::from_str(json).unwrap();
    assert_eq!(get_last_due_date(&task, today()), Some(d(2025, 11, 22)));
}

#[test]
fn test_next_due_date_requires_recurrence() {
    let once = Task::new(1, "Test Task", d(2025, 11, 25));
    assert_eq!(get_next_due_date_after_today(&once, today()), None);

    let mut no_unit = recurring(d(2025, 11, 25), 1, RecurrenceUnit::Days);
    no_unit.recurrence_unit = None;
    assert_eq!(get_next_due_date_after_today(&no_unit, today()), None);

    let unknown = recurring(d(2025, 11, 20), 1, RecurrenceUnit::from("fortnights"));
    assert_eq!(get_next_due_date_after_today(&unknown, today()), None);
}

#[test]
fn test_next_due_date_first_occurrence_in_future() {
    let task = recurring(d(2025, 11, 25), 1, RecurrenceUnit::Days);
    assert_eq!(get_next_due_date_after_today(&task, today()), Some(d(2025, 11, 25)));
}

#[test]
fn test_next_due_date_skips_today() {
    let daily = recurring(d(2025, 11, 20), 1, RecurrenceUnit::Days);
    assert_eq!(get_next_due_date_after_today(&daily, today()), Some(d(2025, 11, 23)));

    let weekly = recurring(d(2025, 11, 15), 1, RecurrenceUnit::Weeks);
    assert_eq!(get_next_due_date_after_today(&weekly, today()), Some(d(2025, 11, 29)));

    let monthly = recurring(d(2025, 9, 22), 1, RecurrenceUnit::Months);
    assert_eq!(get_next_due_date_after_today(&monthly, today()), Some(d(2025, 12, 22)));

    let yearly = recurring(d(2024, 11, 22), 1, RecurrenceUnit::Years);
    assert_eq!(get_next_due_date_after_today(&yearly, today()), Some(d(2026, 11, 22)));

    let every_third = recurring(d(2025, 11, 15), 3, RecurrenceUnit::Days);
    assert_eq!(get_next_due_date_after_today(&every_third, today()), Some(d(2025, 11, 24)));
}

#[test]
fn test_monthly_walk_keeps_rollover() {
    // Jan 31 -> Mar 3 -> Apr 3 -> ... -> Nov 3 -> Dec 3
    let task = recurring(d(2025, 1, 31), 1, RecurrenceUnit::Months);
    assert_eq!(get_last_due_date(&task, today()), Some(d(2025, 11, 3)));
    assert_eq!(get_next_due_date_after_today(&task, today()), Some(d(2025, 12, 3)));
}

#[test]
fn test_done_requires_done_date() {
    let task = Task::new(1, "Test Task", d(2025, 11, 20));
    assert!(!check_is_done(&task, today()));
}

#[test]
fn test_done_one_off_task() {
    let early = Task::new(1, "Test Task", d(2025, 11, 25)).done_on(d(2025, 11, 20));
    assert!(!check_is_done(&early, today()));

    let same_day = Task::new(1, "Test Task", d(2025, 11, 22)).done_on(d(2025, 11, 22));
    assert!(!check_is_done(&same_day, today()));

    let after = Task::new(1, "Test Task", d(2025, 11, 22)).done_on(d(2025, 11, 23));
    assert!(check_is_done(&after, today()));
}

#[test]
fn test_done_one_off_without_due_date() {
    let mut task = Task::new(1, "Test Task", d(2025, 11, 20)).done_on(d(2025, 11, 22));
    task.due_date = None;
    assert!(!check_is_done(&task, today()));
}

#[test]
fn test_done_recurring_task() {
    // no occurrence has come due yet
    let future = recurring(d(2025, 11, 25), 1, RecurrenceUnit::Days).done_on(d(2025, 11, 25));
    assert!(!check_is_done(&future, today()));

    let before_last = recurring(d(2025, 11, 15), 1, RecurrenceUnit::Days).done_on(d(2025, 11, 20));
    assert!(!check_is_done(&before_last, today()));

    let on_last = recurring(d(2025, 11, 15), 1, RecurrenceUnit::Days).done_on(d(2025, 11, 22));
    assert!(!check_is_done(&on_last, today()));

    let after_last = recurring(d(2025, 11, 15), 1, RecurrenceUnit::Days).done_on(d(2025, 11, 23));
    assert!(check_is_done(&after_last, today()));

    let every_week = recurring(d(2025, 11, 8), 7, RecurrenceUnit::Days).done_on(d(2025, 11, 23));
    assert!(check_is_done(&every_week, today()));

    let monthly = recurring(d(2025, 9, 22), 1, RecurrenceUnit::Months).done_on(d(2025, 11, 23));
    assert!(check_is_done(&monthly, today()));
}

#[test]
fn test_stale_completion_does_not_count() {
    let weekly = recurring(d(2025, 11, 1), 1, RecurrenceUnit::Weeks).done_on(d(2025, 11, 8));
    assert_eq!(get_last_due_date(&weekly, today()), Some(d(2025, 11, 22)));
    assert!(!check_is_done(&weekly, today()));
}

#[test]
fn test_done_ignores_time_of_day() {
    let json = r#"{"id":1,"title":"Test Task","due_date":"2025-11-15","recurring":true,
        "recurrence_unit":"days","recurrence_interval":1,"done":"2025-11-23T10:30:00Z"}"#;
    let task: Task = serde_json::from_str(json).unwrap();
    assert!(check_is_done(&task, today()));

    let json = r#"{"id":2,"title":"Test Task","due_date":"2025-11-20","done":"2025-11-22T23:59:59Z"}"#;
    let task: Task = serde_json::from_str(json).unwrap();
    assert!(check_is_done(&task, today()));
}

#[test]
fn test_stored_unit_spelling_is_not_normalised() {
    let json = r#"{"id":7,"title":"Bins","due_date":"2025-11-03","recurring":true,
        "recurrence_unit":"Weekly","recurrence_interval":1}"#;
    let task: Task = serde_json::from_str(json).unwrap();
    assert_eq!(get_next_due_date_after_today(&task, today()), None);
    assert_eq!(get_last_due_date(&task, today()), None);
    assert_eq!(add_interval(d(2025, 11, 3), &RecurrenceUnit::from("Weekly"), 1), d(2025, 11, 3));

    let exact = json.replace("Weekly", "weeks");
    let task: Task = serde_json::from_str(&exact).unwrap();
    assert_eq!(get_next_due_date_after_today(&task, today()), Some(d(2025, 11, 24)));
}
