use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::recurrence::{RecurrenceRule, Schedule};

/// Calendar step of a recurring task.
///
/// Strings other than the four known units are kept as `Unknown` so that a
/// record written by another client survives a load/save cycle untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecurrenceUnit {
    Days,
    Weeks,
    Months,
    Years,
    Unknown(String),
}

impl RecurrenceUnit {
    pub fn as_str(&self) -> &str {
        match self {
            RecurrenceUnit::Days => "days",
            RecurrenceUnit::Weeks => "weeks",
            RecurrenceUnit::Months => "months",
            RecurrenceUnit::Years => "years",
            RecurrenceUnit::Unknown(s) => s,
        }
    }

    /// Forgiving parse for command-line input: ignores case and accepts
    /// singular and `-ly` spellings.
    pub fn parse_lenient(s: &str) -> RecurrenceUnit {
        match s.trim().to_lowercase().as_str() {
            "day" | "days" | "daily" => RecurrenceUnit::Days,
            "week" | "weeks" | "weekly" => RecurrenceUnit::Weeks,
            "month" | "months" | "monthly" => RecurrenceUnit::Months,
            "year" | "years" | "yearly" => RecurrenceUnit::Years,
            _ => RecurrenceUnit::Unknown(s.to_string()),
        }
    }
}

/// Exact spellings only; stored records with any other unit stay `Unknown`.
impl From<&str> for RecurrenceUnit {
    fn from(s: &str) -> Self {
        match s {
            "days" => RecurrenceUnit::Days,
            "weeks" => RecurrenceUnit::Weeks,
            "months" => RecurrenceUnit::Months,
            "years" => RecurrenceUnit::Years,
            _ => RecurrenceUnit::Unknown(s.to_string()),
        }
    }
}

impl From<String> for RecurrenceUnit {
    fn from(s: String) -> Self {
        RecurrenceUnit::from(s.as_str())
    }
}

impl From<RecurrenceUnit> for String {
    fn from(unit: RecurrenceUnit) -> Self {
        match unit {
            RecurrenceUnit::Unknown(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RecurrenceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a calendar date, discarding any time-of-day.
///
/// Accepts `YYYY-MM-DD` and full RFC 3339 timestamps; a timestamp is
/// converted to UTC before its date is taken.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
}

/// Serde adapter for optional date-only fields.
pub(crate) mod date_only {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.serialize_str(&d.format("%Y-%m-%d").to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(raw) => super::parse_date(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid date '{}'", raw))),
            None => Ok(None),
        }
    }
}

/// A household chore or errand.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    /// Unique identifier for the task.
    pub id: u64,
    pub title: String,
    /// First occurrence of the task.
    #[serde(default, with = "date_only", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_unit: Option<RecurrenceUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_interval: Option<i32>,
    /// Date the task was last completed.
    #[serde(default, with = "date_only", skip_serializing_if = "Option::is_none")]
    pub done: Option<NaiveDate>,
    /// Member id of the assignee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Timestamp when the task was created (RFC 3339).
    #[serde(default)]
    pub created_at: String,
}

impl Task {
    /// A one-off task due on `due_date`.
    pub fn new(id: u64, title: impl Into<String>, due_date: NaiveDate) -> Task {
        Task {
            id,
            title: title.into(),
            due_date: Some(due_date),
            recurring: false,
            recurrence_unit: None,
            recurrence_interval: None,
            done: None,
            assigned_to: None,
            category: None,
            created_at: Utc::now().to_rfc3339(),
        }
    }

    /// Makes the task repeat every `interval` `unit`s starting at its due date.
    pub fn every(mut self, interval: i32, unit: RecurrenceUnit) -> Task {
        self.recurring = true;
        self.recurrence_interval = Some(interval);
        self.recurrence_unit = Some(unit);
        self
    }

    pub fn done_on(mut self, date: NaiveDate) -> Task {
        self.done = Some(date);
        self
    }

    pub fn assigned(mut self, member_id: impl Into<String>) -> Task {
        self.assigned_to = Some(member_id.into());
        self
    }

    /// Collapses the loose record fields into a checked schedule.
    pub fn schedule(&self) -> Schedule {
        if !self.recurring {
            return match self.due_date {
                Some(d) => Schedule::Once(d),
                None => Schedule::Incomplete,
            };
        }
        match (self.due_date, &self.recurrence_unit, self.recurrence_interval) {
            (Some(start), Some(unit), Some(interval)) => {
                RecurrenceRule::new(start, unit.clone(), interval)
                    .map_or(Schedule::Incomplete, Schedule::Recurring)
            }
            _ => Schedule::Incomplete,
        }
    }

    /// Human-readable recurrence, e.g. `every 2 weeks`.
    pub fn recurrence_label(&self) -> String {
        if !self.recurring {
            return "-".to_string();
        }
        match (&self.recurrence_unit, self.recurrence_interval) {
            (Some(unit), Some(1)) => format!("every {}", unit.as_str().trim_end_matches('s')),
            (Some(unit), Some(n)) => format!("every {} {}", n, unit),
            _ => "every ?".to_string(),
        }
    }
}

/// A person living in the household.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Member {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A label tasks can be grouped under (kitchen, garden, ...).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Money one member paid on behalf of the household.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: u64,
    pub title: String,
    pub amount: f64,
    /// Member id of the payer.
    pub paid_by: String,
    pub date: NaiveDate,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Household {
    pub id: String,
    pub name: String,
    /// Member id of the admin who created the household.
    pub admin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}
