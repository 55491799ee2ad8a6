//! Calendar entry domain model.
//!
//! # Responsibility
//! - Define the user-authored study event record and its reminder policy.
//! - Provide field-range validation shared by write and planning paths.
//!
//! # Invariants
//! - `id` is empty only before first persistence; the planner rejects
//!   entries without a resolved id.
//! - `(year, month, day, hour, minute)` must form a constructible point in
//!   the owner's local calendar.
//!
//! # See also
//! - docs/architecture/reminder-scheduler.md

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One user-authored study event with a local date, time and free text.
///
/// The scheduler never creates or destroys entries; it only reacts to
/// coordinator calls bracketing store writes made by the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
    /// Stable store-assigned id. Empty only before first persistence.
    pub id: String,
    /// Owning user id. Entries are always scoped to one owner.
    pub owner_id: String,
    /// Free-form description shown in reminder messages.
    pub text: String,
    pub year: i32,
    /// 1-12.
    pub month: u32,
    /// 1-31, bounded by the month length.
    pub day: u32,
    /// 0-23, owner-local wall clock.
    pub hour: u32,
    /// 0-59.
    pub minute: u32,
    /// Included in the end-of-day digest sweep when set.
    pub digest_flag: bool,
}

impl CalendarEntry {
    /// Creates an entry that has not been persisted yet (empty id).
    pub fn draft(
        owner_id: impl Into<String>,
        text: impl Into<String>,
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
    ) -> Self {
        Self {
            id: String::new(),
            owner_id: owner_id.into(),
            text: text.into(),
            year,
            month,
            day,
            hour,
            minute,
            digest_flag: false,
        }
    }

    /// Returns whether this entry has been persisted (id resolved).
    pub fn is_persisted(&self) -> bool {
        !self.id.is_empty()
    }

    /// Validates field ranges and calendar-date constructibility.
    ///
    /// # Invariants
    /// - Does not require a resolved `id`; drafts validate too.
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.owner_id.trim().is_empty() {
            return Err(EntryValidationError::EmptyOwner);
        }
        if self.text.trim().is_empty() {
            return Err(EntryValidationError::EmptyText);
        }
        if !(1..=12).contains(&self.month) {
            return Err(EntryValidationError::MonthOutOfRange(self.month));
        }
        if self.hour > 23 {
            return Err(EntryValidationError::HourOutOfRange(self.hour));
        }
        if self.minute > 59 {
            return Err(EntryValidationError::MinuteOutOfRange(self.minute));
        }
        if NaiveDate::from_ymd_opt(self.year, self.month, self.day).is_none() {
            return Err(EntryValidationError::InvalidDate {
                year: self.year,
                month: self.month,
                day: self.day,
            });
        }
        Ok(())
    }
}

/// Reminder behavior chosen by the user for one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderPolicy {
    /// Fire once, at the entry's exact start time.
    Exact,
    /// Fire `n` minutes before the start, plus the exact-time wake.
    ///
    /// Always implies exactly two armed wakes for the entry.
    LeadMinutes(u32),
    /// No discrete wake; the entry is flagged and swept by the daily
    /// digest job instead.
    DailyDigest,
}

/// Validation errors for calendar entry fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    EmptyOwner,
    EmptyText,
    MonthOutOfRange(u32),
    HourOutOfRange(u32),
    MinuteOutOfRange(u32),
    InvalidDate { year: i32, month: u32, day: u32 },
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyOwner => write!(f, "entry owner_id must not be empty"),
            Self::EmptyText => write!(f, "entry text must not be empty"),
            Self::MonthOutOfRange(month) => {
                write!(f, "entry month must be 1-12, got {month}")
            }
            Self::HourOutOfRange(hour) => write!(f, "entry hour must be 0-23, got {hour}"),
            Self::MinuteOutOfRange(minute) => {
                write!(f, "entry minute must be 0-59, got {minute}")
            }
            Self::InvalidDate { year, month, day } => {
                write!(f, "entry date {year:04}-{month:02}-{day:02} does not exist")
            }
        }
    }
}

impl Error for EntryValidationError {}

#[cfg(test)]
mod tests {
    use super::{CalendarEntry, EntryValidationError};

    fn sample_entry() -> CalendarEntry {
        CalendarEntry::draft("owner-1", "algebra revision", 2026, 3, 14, 9, 30)
    }

    #[test]
    fn draft_starts_unpersisted_and_unflagged() {
        let entry = sample_entry();
        assert!(!entry.is_persisted());
        assert!(!entry.digest_flag);
    }

    #[test]
    fn valid_entry_passes_validation() {
        sample_entry().validate().expect("sample entry is valid");
    }

    #[test]
    fn rejects_blank_owner_and_text() {
        let mut entry = sample_entry();
        entry.owner_id = "   ".to_string();
        assert_eq!(
            entry.validate().expect_err("blank owner must fail"),
            EntryValidationError::EmptyOwner
        );

        let mut entry = sample_entry();
        entry.text = String::new();
        assert_eq!(
            entry.validate().expect_err("blank text must fail"),
            EntryValidationError::EmptyText
        );
    }

    #[test]
    fn rejects_out_of_range_time_fields() {
        let mut entry = sample_entry();
        entry.month = 13;
        assert_eq!(
            entry.validate().expect_err("month 13 must fail"),
            EntryValidationError::MonthOutOfRange(13)
        );

        let mut entry = sample_entry();
        entry.hour = 24;
        assert_eq!(
            entry.validate().expect_err("hour 24 must fail"),
            EntryValidationError::HourOutOfRange(24)
        );

        let mut entry = sample_entry();
        entry.minute = 60;
        assert_eq!(
            entry.validate().expect_err("minute 60 must fail"),
            EntryValidationError::MinuteOutOfRange(60)
        );
    }

    #[test]
    fn rejects_nonexistent_calendar_dates() {
        let mut entry = sample_entry();
        entry.month = 2;
        entry.day = 30;
        assert_eq!(
            entry.validate().expect_err("feb 30 must fail"),
            EntryValidationError::InvalidDate {
                year: 2026,
                month: 2,
                day: 30
            }
        );
    }
}
