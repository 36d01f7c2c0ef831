//! Due-date engine for recurring tasks.
//!
//! A recurring task repeats from its first due date in fixed calendar steps.
//! Given "today", the engine answers three questions: which occurrence most
//! recently came due, which one comes next, and whether the latest
//! completion closes out the current period.
//!
//! Every function here is total. Incomplete or unusable recurrence data
//! yields `None` or `false`, never an error.

use chrono::{Datelike, Days, NaiveDate, TimeDelta};

use crate::models::{RecurrenceUnit, Task};

/// Adds `interval` steps of `unit` to `date`.
///
/// Months and years roll over when the day of month does not exist in the
/// target month: Jan 31 + 1 month is Mar 3 in a common year, Feb 29 + 1 year
/// is Mar 1. Unknown units leave the date unchanged, and so does a result
/// outside the representable range.
pub fn add_interval(date: NaiveDate, unit: &RecurrenceUnit, interval: i32) -> NaiveDate {
    step(date, unit, interval).unwrap_or(date)
}

fn step(date: NaiveDate, unit: &RecurrenceUnit, interval: i32) -> Option<NaiveDate> {
    let interval = i64::from(interval);
    match unit {
        RecurrenceUnit::Days => date.checked_add_signed(TimeDelta::try_days(interval)?),
        RecurrenceUnit::Weeks => date.checked_add_signed(TimeDelta::try_days(interval * 7)?),
        RecurrenceUnit::Months => shift_months(date, interval),
        RecurrenceUnit::Years => shift_months(date, interval * 12),
        RecurrenceUnit::Unknown(_) => Some(date),
    }
}

/// Moves to the same day-of-month `months` later, overflowing into the
/// following month when that day does not exist.
fn shift_months(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    let total = i64::from(date.year()) * 12 + i64::from(date.month0()) + months;
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    let month = u32::try_from(total.rem_euclid(12)).ok()? + 1;
    NaiveDate::from_ymd_opt(year, month, 1)?.checked_add_days(Days::new(u64::from(date.day0())))
}

/// A complete recurrence: first due date plus a step that moves forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    start: NaiveDate,
    unit: RecurrenceUnit,
    interval: i32,
}

impl RecurrenceRule {
    /// Returns `None` for rules that would never advance: an unknown unit or
    /// a non-positive interval.
    pub fn new(start: NaiveDate, unit: RecurrenceUnit, interval: i32) -> Option<RecurrenceRule> {
        if interval <= 0 || matches!(unit, RecurrenceUnit::Unknown(_)) {
            return None;
        }
        Some(RecurrenceRule { start, unit, interval })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn unit(&self) -> &RecurrenceUnit {
        &self.unit
    }

    pub fn interval(&self) -> i32 {
        self.interval
    }

    /// Lazy sequence of occurrences beginning with the start date.
    pub fn occurrences(&self) -> Occurrences<'_> {
        Occurrences { rule: self, next: Some(self.start) }
    }

    /// Fixed length of one step in days, for units where that exists.
    fn step_days(&self) -> Option<i64> {
        match self.unit {
            RecurrenceUnit::Days => Some(i64::from(self.interval)),
            RecurrenceUnit::Weeks => Some(i64::from(self.interval) * 7),
            _ => None,
        }
    }

    /// Latest occurrence on or before `today`.
    pub fn last_on_or_before(&self, today: NaiveDate) -> Option<NaiveDate> {
        if self.start > today {
            return None;
        }
        if let Some(step) = self.step_days() {
            let elapsed = (today - self.start).num_days();
            return self.start.checked_add_signed(TimeDelta::try_days(elapsed / step * step)?);
        }
        self.occurrences().take_while(|d| *d <= today).last()
    }

    /// Earliest occurrence strictly after `today`.
    pub fn first_after(&self, today: NaiveDate) -> Option<NaiveDate> {
        if self.start > today {
            return Some(self.start);
        }
        if let Some(step) = self.step_days() {
            let elapsed = (today - self.start).num_days();
            return self
                .start
                .checked_add_signed(TimeDelta::try_days((elapsed / step + 1) * step)?);
        }
        self.occurrences().find(|d| *d > today)
    }
}

/// Iterator over the occurrences of a [`RecurrenceRule`].
///
/// Ends only when the calendar runs out of representable dates.
pub struct Occurrences<'a> {
    rule: &'a RecurrenceRule,
    next: Option<NaiveDate>,
}

impl Iterator for Occurrences<'_> {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        self.next = step(current, &self.rule.unit, self.rule.interval).filter(|n| *n > current);
        Some(current)
    }
}

/// What a task's recurrence fields amount to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    /// Non-recurring, due once.
    Once(NaiveDate),
    Recurring(RecurrenceRule),
    /// Missing or unusable fields; no due-date queries are answerable.
    Incomplete,
}

/// Latest occurrence of a recurring task that is not after `today`.
///
/// `None` for non-recurring tasks, incomplete recurrence data, or when the
/// first due date is still in the future.
pub fn get_last_due_date(task: &Task, today: NaiveDate) -> Option<NaiveDate> {
    match task.schedule() {
        Schedule::Recurring(rule) => rule.last_on_or_before(today),
        _ => None,
    }
}

/// Earliest occurrence of a recurring task strictly after `today`.
///
/// A due date equal to today is already "reached", so the result is the one
/// after it.
pub fn get_next_due_date_after_today(task: &Task, today: NaiveDate) -> Option<NaiveDate> {
    match task.schedule() {
        Schedule::Recurring(rule) => rule.first_after(today),
        _ => None,
    }
}

/// Whether the task's completion covers the occurrence currently due.
///
/// The completion must fall strictly after the occurrence it closes: after
/// the due date for one-off tasks, after the latest past-or-present
/// occurrence for recurring ones.
pub fn check_is_done(task: &Task, today: NaiveDate) -> bool {
    let Some(done) = task.done else {
        return false;
    };
    if !task.recurring {
        return task.due_date.is_some_and(|due| done > due);
    }
    get_last_due_date(task, today).is_some_and(|last| done > last)
}

/// Display status of a task relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Done,
    /// Due today, or due later for one-off tasks.
    Pending,
    /// The occurrence currently due lies in the past.
    Overdue,
    /// Recurring task whose first occurrence has not arrived.
    Upcoming,
}

impl TaskStatus {
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Done => "Done",
            TaskStatus::Pending => "Pending",
            TaskStatus::Overdue => "Overdue",
            TaskStatus::Upcoming => "Upcoming",
        }
    }
}

pub fn task_status(task: &Task, today: NaiveDate) -> TaskStatus {
    if check_is_done(task, today) {
        return TaskStatus::Done;
    }
    match task.schedule() {
        Schedule::Once(due) if due < today => TaskStatus::Overdue,
        Schedule::Recurring(rule) => match rule.last_on_or_before(today) {
            None => TaskStatus::Upcoming,
            Some(last) if last < today => TaskStatus::Overdue,
            Some(_) => TaskStatus::Pending,
        },
        _ => TaskStatus::Pending,
    }
}

/// The date a task should be listed under today: the open occurrence while
/// the task is pending, the next one once the current period is done.
pub fn current_due_date(task: &Task, today: NaiveDate) -> Option<NaiveDate> {
    match task.schedule() {
        Schedule::Once(due) => Some(due),
        Schedule::Recurring(rule) => {
            if check_is_done(task, today) {
                rule.first_after(today)
            } else {
                rule.last_on_or_before(today).or_else(|| rule.first_after(today))
            }
        }
        Schedule::Incomplete => task.due_date,
    }
}
