//! Weekly schedules, their tasks, and the calendar encodings they rely on.
//!
//! Days of the week are integers `0..=6` with `0 = Sunday`. Wall-clock times
//! are zero-padded `HH:MM` or `HH:MM:SS` strings compared lexicographically,
//! which is only sound because the width is fixed. Both encodings are stored
//! verbatim.

use std::cmp::Ordering;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::ids::{CareRecipientId, CaregiverId, ScheduleId, TaskId};

/// Validation errors for [`DayOfWeek`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("day of week must be between 0 (Sunday) and 6 (Saturday), got {0}")]
pub struct DayOfWeekError(pub i64);

/// Day of the week, `0 = Sunday` through `6 = Saturday`.
///
/// # Examples
/// ```
/// use carelink::domain::DayOfWeek;
/// use chrono::NaiveDate;
///
/// let sunday = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
/// assert_eq!(DayOfWeek::from_date(sunday).value(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct DayOfWeek(u8);

impl DayOfWeek {
    /// Validate a raw day number.
    pub fn new(value: i64) -> Result<Self, DayOfWeekError> {
        u8::try_from(value)
            .ok()
            .filter(|day| *day <= 6)
            .map(Self)
            .ok_or(DayOfWeekError(value))
    }

    /// Day of the week for a calendar date.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "num_days_from_sunday is always within 0..=6"
    )]
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.weekday().num_days_from_sunday() as u8)
    }

    /// Raw day number.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl From<DayOfWeek> for i64 {
    fn from(value: DayOfWeek) -> Self {
        i64::from(value.0)
    }
}

impl TryFrom<i64> for DayOfWeek {
    type Error = DayOfWeekError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Validation errors for [`WallTime`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WallTimeError {
    /// The input did not match `HH:MM` or `HH:MM:SS`.
    #[error("time must be formatted as HH:MM or HH:MM:SS")]
    Format,
    /// A component was out of range.
    #[error("time component out of range")]
    Range,
}

/// Zero-padded wall-clock time of day.
///
/// Ordering is the lexicographic ordering of the stored string.
///
/// # Examples
/// ```
/// use carelink::domain::WallTime;
///
/// let early = WallTime::parse("08:30").unwrap();
/// let late = WallTime::parse("09:00:00").unwrap();
/// assert!(early < late);
/// assert!(WallTime::parse("8:30").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WallTime(String);

impl WallTime {
    /// Validate a time string without normalising it.
    pub fn parse(raw: &str) -> Result<Self, WallTimeError> {
        let bytes = raw.as_bytes();
        let has_seconds = match bytes.len() {
            5 => false,
            8 => true,
            _ => return Err(WallTimeError::Format),
        };
        if bytes[2] != b':' || (has_seconds && bytes[5] != b':') {
            return Err(WallTimeError::Format);
        }
        let component = |start: usize| -> Result<u8, WallTimeError> {
            let pair = &bytes[start..start + 2];
            if !pair.iter().all(u8::is_ascii_digit) {
                return Err(WallTimeError::Format);
            }
            Ok((pair[0] - b'0') * 10 + (pair[1] - b'0'))
        };
        let hours = component(0)?;
        let minutes = component(3)?;
        let seconds = if has_seconds { component(6)? } else { 0 };
        if hours > 23 || minutes > 59 || seconds > 59 {
            return Err(WallTimeError::Range);
        }
        Ok(Self(raw.to_owned()))
    }

    /// Stored representation.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<WallTime> for String {
    fn from(value: WallTime) -> Self {
        value.0
    }
}

impl TryFrom<String> for WallTime {
    type Error = WallTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Recurring weekly shift assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// Schedule identifier.
    pub id: ScheduleId,
    /// Recipient receiving care during the shift.
    pub care_recipient_id: CareRecipientId,
    /// Assigned caregiver.
    pub caregiver_id: CaregiverId,
    /// Day the shift recurs on.
    pub day_of_week: DayOfWeek,
    /// Shift start.
    pub start_time: WallTime,
    /// Shift end.
    pub end_time: WallTime,
}

/// Checklist item attached to a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Task identifier.
    pub id: TaskId,
    /// Owning schedule.
    pub schedule_id: ScheduleId,
    /// Short title.
    pub title: String,
    /// Optional longer description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional due time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_time: Option<WallTime>,
    /// Position used when no due time is set.
    pub sort_order: i32,
}

/// Order tasks by due time ascending with untimed tasks last, breaking ties
/// by `sort_order`.
#[must_use]
pub fn compare_tasks(left: &Task, right: &Task) -> Ordering {
    let by_due = match (&left.due_time, &right.due_time) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_due.then_with(|| left.sort_order.cmp(&right.sort_order))
}

/// Sort tasks in place with [`compare_tasks`].
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(compare_tasks);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn task(due: Option<&str>, sort_order: i32) -> Task {
        Task {
            id: TaskId::random(),
            schedule_id: ScheduleId::random(),
            title: format!("task {sort_order}"),
            description: None,
            due_time: due.map(|raw| WallTime::parse(raw).expect("valid time")),
            sort_order,
        }
    }

    #[rstest]
    fn untimed_tasks_follow_timed_tasks_by_sort_order() {
        let mut tasks = vec![
            task(None, 2),
            task(Some("09:00"), 5),
            task(None, 0),
            task(Some("08:30"), 9),
        ];
        sort_tasks(&mut tasks);
        let order: Vec<_> = tasks
            .iter()
            .map(|t| {
                t.due_time
                    .as_ref()
                    .map_or_else(|| format!("sort:{}", t.sort_order), |d| d.to_string())
            })
            .collect();
        assert_eq!(order, ["08:30", "09:00", "sort:0", "sort:2"]);
    }

    #[rstest]
    fn equal_due_times_fall_back_to_sort_order() {
        let mut tasks = vec![task(Some("10:00"), 3), task(Some("10:00"), 1)];
        sort_tasks(&mut tasks);
        assert_eq!(tasks[0].sort_order, 1);
    }

    #[rstest]
    #[case(2024, 6, 2, 0)]
    #[case(2024, 6, 5, 3)]
    #[case(2024, 6, 8, 6)]
    fn day_of_week_counts_from_sunday(
        #[case] year: i32,
        #[case] month: u32,
        #[case] day: u32,
        #[case] expected: u8,
    ) {
        let date = NaiveDate::from_ymd_opt(year, month, day).expect("valid date");
        assert_eq!(DayOfWeek::from_date(date).value(), expected);
    }

    #[rstest]
    #[case(-1)]
    #[case(7)]
    fn day_of_week_rejects_out_of_range(#[case] raw: i64) {
        assert_eq!(DayOfWeek::new(raw), Err(DayOfWeekError(raw)));
    }

    #[rstest]
    #[case("00:00")]
    #[case("23:59")]
    #[case("07:05:09")]
    fn wall_time_accepts_padded_times(#[case] raw: &str) {
        assert_eq!(WallTime::parse(raw).expect("valid").as_str(), raw);
    }

    #[rstest]
    #[case("7:05", WallTimeError::Format)]
    #[case("07-05", WallTimeError::Format)]
    #[case("07:5a", WallTimeError::Format)]
    #[case("24:00", WallTimeError::Range)]
    #[case("12:60", WallTimeError::Range)]
    #[case("12:00:61", WallTimeError::Range)]
    fn wall_time_rejects_malformed_times(#[case] raw: &str, #[case] expected: WallTimeError) {
        assert_eq!(WallTime::parse(raw), Err(expected));
    }
}
