use chrono::{NaiveDate, Utc};

/// Source of "today" for every due-date computation.
///
/// Commands never read the system clock directly; they ask a `Clock`, so a
/// fixed date can be injected in tests or through `HOMETASK_TODAY`.
pub trait Clock {
    /// The current calendar date, normalized to UTC.
    fn today(&self) -> NaiveDate;
}

/// Reads the wall clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Always reports the same date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_reports_its_date() {
        let day = NaiveDate::from_ymd_opt(2025, 11, 22).unwrap();
        assert_eq!(FixedClock(day).today(), day);
    }
}
