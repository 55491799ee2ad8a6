//! Reminder planner: pure ticket computation, no I/O.
//!
//! # Responsibility
//! - Compute the zero, one or two wake tickets an entry + policy implies.
//! - Compose the display messages carried in the wake payloads.
//!
//! # Invariants
//! - Identical inputs yield byte-identical request ids (required for
//!   replace-on-edit semantics).
//! - Tickets whose fire time is not strictly in the future are dropped
//!   silently; past reminders are never fired retroactively.
//!
//! # See also
//! - docs/architecture/reminder-scheduler.md

use crate::model::entry::{CalendarEntry, EntryValidationError, ReminderPolicy};
use crate::model::ticket::{request_id, TicketKind, WakePayload, WakeTicket};
use chrono::{DateTime, LocalResult, TimeZone};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

const MINUTE_MS: i64 = 60 * 1000;

/// Computes the concrete wake tickets for one entry under one policy.
///
/// The entry's wall-clock fields are interpreted in `now`'s timezone (the
/// owner's local calendar). `DailyDigest` yields an empty list; the
/// coordinator persists the digest flag instead of arming anything.
///
/// # Errors
/// - `MissingEntryId` when the entry has not been persisted yet.
/// - `Validation` for out-of-range fields.
/// - `ZeroLeadMinutes` for `LeadMinutes(0)`.
/// - `UnrepresentableLocalTime` when the wall clock does not exist in the
///   local calendar (DST gap). Ambiguous times resolve to the earliest.
pub fn plan<Tz: TimeZone>(
    entry: &CalendarEntry,
    policy: ReminderPolicy,
    now: &DateTime<Tz>,
) -> Result<Vec<WakeTicket>, PlanError> {
    if !entry.is_persisted() {
        return Err(PlanError::MissingEntryId);
    }
    entry.validate()?;

    let lead_minutes = match policy {
        ReminderPolicy::DailyDigest => return Ok(Vec::new()),
        ReminderPolicy::Exact => None,
        ReminderPolicy::LeadMinutes(0) => return Err(PlanError::ZeroLeadMinutes),
        ReminderPolicy::LeadMinutes(n) => Some(n),
    };

    let entry_at_ms = local_epoch_ms(entry, &now.timezone())?;
    let now_ms = now.timestamp_millis();
    let mut tickets = Vec::with_capacity(2);

    if let Some(minutes) = lead_minutes {
        let fire_at = entry_at_ms - i64::from(minutes) * MINUTE_MS;
        push_or_drop(
            &mut tickets,
            entry,
            TicketKind::Lead,
            fire_at,
            format!("Coming up: {}", entry.text),
            now_ms,
        );
    }

    push_or_drop(
        &mut tickets,
        entry,
        TicketKind::OnTime,
        entry_at_ms,
        format!("{} is starting now.", entry.text),
        now_ms,
    );

    Ok(tickets)
}

fn push_or_drop(
    tickets: &mut Vec<WakeTicket>,
    entry: &CalendarEntry,
    kind: TicketKind,
    fire_at_epoch_ms: i64,
    display_message: String,
    now_ms: i64,
) {
    if fire_at_epoch_ms <= now_ms {
        info!(
            "event=plan_drop_past module=planner status=noop entry_id={} kind={} fire_at_ms={} now_ms={}",
            entry.id,
            kind.as_str(),
            fire_at_epoch_ms,
            now_ms
        );
        return;
    }

    tickets.push(WakeTicket {
        request_id: request_id(&entry.id, kind),
        kind,
        fire_at_epoch_ms,
        display_message: display_message.clone(),
        payload: WakePayload {
            entry_id: entry.id.clone(),
            owner_id: entry.owner_id.clone(),
            kind,
            display_message,
            hour: entry.hour,
            minute: entry.minute,
        },
    });
}

fn local_epoch_ms<Tz: TimeZone>(entry: &CalendarEntry, tz: &Tz) -> Result<i64, PlanError> {
    let resolved = tz.with_ymd_and_hms(entry.year, entry.month, entry.day, entry.hour, entry.minute, 0);
    match resolved {
        LocalResult::Single(at) => Ok(at.timestamp_millis()),
        // DST overlap: the earliest instant wins.
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.timestamp_millis()),
        LocalResult::None => Err(PlanError::UnrepresentableLocalTime {
            year: entry.year,
            month: entry.month,
            day: entry.day,
            hour: entry.hour,
            minute: entry.minute,
        }),
    }
}

/// Planning errors. All are caller mistakes or calendar edge cases; none
/// involve I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// The entry has no resolved id yet; persist it first.
    MissingEntryId,
    /// `LeadMinutes(0)` carries no meaning; use `Exact` instead.
    ZeroLeadMinutes,
    Validation(EntryValidationError),
    /// The wall clock does not exist in the local calendar (DST gap).
    UnrepresentableLocalTime {
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
    },
}

impl Display for PlanError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingEntryId => {
                write!(f, "cannot plan reminders for an entry without a resolved id")
            }
            Self::ZeroLeadMinutes => {
                write!(f, "lead_minutes must be greater than zero")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::UnrepresentableLocalTime {
                year,
                month,
                day,
                hour,
                minute,
            } => write!(
                f,
                "local time {year:04}-{month:02}-{day:02} {hour:02}:{minute:02} does not exist"
            ),
        }
    }
}

impl Error for PlanError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EntryValidationError> for PlanError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}
