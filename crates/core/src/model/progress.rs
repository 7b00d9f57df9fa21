use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of recorded practice activity.
///
/// The series holds at most one entry per calendar date; dates serialize
/// as ISO `YYYY-MM-DD` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub date: NaiveDate,
    pub questions_completed: u32,
    /// Minutes.
    pub time_spent: u32,
}

impl ProgressEntry {
    #[must_use]
    pub fn new(date: NaiveDate, questions_completed: u32, time_spent: u32) -> Self {
        Self {
            date,
            questions_completed,
            time_spent,
        }
    }
}

/// Completions summed over a Sunday-starting week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyBucket {
    pub week_start: NaiveDate,
    pub completed: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_serializes_with_camel_case_and_iso_date() {
        let entry = ProgressEntry::new(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(), 3, 45);
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(
            json,
            r#"{"date":"2024-03-05","questionsCompleted":3,"timeSpent":45}"#
        );
    }

    #[test]
    fn entry_round_trips_through_json() {
        let entry = ProgressEntry::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 0, 30);
        let json = serde_json::to_string(&entry).unwrap();
        let back: ProgressEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
