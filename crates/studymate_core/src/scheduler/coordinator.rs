//! Reminder coordinator: planning + arming + digest-flag persistence.
//!
//! # Responsibility
//! - Provide the schedule/cancel entry points the UI layer calls around
//!   entry save/delete.
//! - Keep OS wake state and the persisted digest flag consistent without
//!   knowing an entry's previous policy.
//!
//! # Invariants
//! - `schedule` unconditionally disarms both ticket kinds before arming,
//!   so rapid double-edits never leave duplicate wakes.
//! - The digest flag is written unconditionally (true for `DailyDigest`,
//!   false otherwise) for the same reason.
//! - Store failures after arming are propagated but never roll back the
//!   already-armed wakes.
//!
//! # See also
//! - docs/architecture/reminder-scheduler.md

use crate::model::entry::{CalendarEntry, ReminderPolicy};
use crate::model::ticket::{request_id, TicketKind};
use crate::platform::wake::{WakeArmError, WakeScheduler};
use crate::scheduler::planner::{plan, PlanError};
use crate::store::entry_repo::EntryRepository;
use crate::store::RepoError;
use chrono::{DateTime, TimeZone};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Orchestrates the planner against the OS wake table and the entry store.
pub struct ReminderCoordinator<'a, W, R>
where
    W: WakeScheduler,
    R: EntryRepository,
{
    wake: &'a W,
    entries: &'a R,
}

/// What `schedule` actually did, for caller-side logging and UI copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleOutcome {
    /// Discrete wakes armed.
    pub armed: usize,
    /// Tickets the planner dropped because their fire time had passed.
    pub dropped_past: usize,
    /// Whether the entry is now flagged for the daily digest.
    pub digest_flagged: bool,
}

impl<'a, W, R> ReminderCoordinator<'a, W, R>
where
    W: WakeScheduler,
    R: EntryRepository,
{
    pub fn new(wake: &'a W, entries: &'a R) -> Self {
        Self { wake, entries }
    }

    /// Replaces the entry's armed wakes according to `policy`.
    ///
    /// Safe to call for both first-time saves and edits: previously armed
    /// wakes of either kind are disarmed first.
    ///
    /// # Errors
    /// - `SchedulingDenied` when the platform refuses exact wakes; the
    ///   entry stays saved but un-reminded, and the UI must say so at
    ///   save time.
    /// - `Store` when the digest-flag write fails; armed wakes stay armed
    ///   and the ambient retry policy owns the repair.
    pub fn schedule<Tz: TimeZone>(
        &self,
        entry: &CalendarEntry,
        policy: ReminderPolicy,
        now: &DateTime<Tz>,
    ) -> Result<ScheduleOutcome, ScheduleError> {
        if !entry.is_persisted() {
            return Err(ScheduleError::Plan(PlanError::MissingEntryId));
        }

        self.disarm_both_kinds(&entry.id);

        let tickets = plan(entry, policy, now)?;
        let expected = match policy {
            ReminderPolicy::Exact => 1,
            ReminderPolicy::LeadMinutes(_) => 2,
            ReminderPolicy::DailyDigest => 0,
        };
        let dropped_past = expected - tickets.len();

        for ticket in &tickets {
            self.wake
                .arm(
                    ticket.request_id,
                    ticket.fire_at_epoch_ms,
                    &ticket.payload.encode(),
                )
                .map_err(|err| {
                    warn!(
                        "event=reminder_arm module=coordinator status=error entry_id={} kind={} error={}",
                        entry.id,
                        ticket.kind.as_str(),
                        err
                    );
                    ScheduleError::from(err)
                })?;
        }

        let digest_flagged = matches!(policy, ReminderPolicy::DailyDigest);
        self.entries
            .set_digest_flag(&entry.owner_id, &entry.id, digest_flagged)
            .map_err(ScheduleError::Store)?;

        info!(
            "event=reminder_schedule module=coordinator status=ok entry_id={} armed={} dropped_past={} digest={}",
            entry.id,
            tickets.len(),
            dropped_past,
            digest_flagged
        );

        Ok(ScheduleOutcome {
            armed: tickets.len(),
            dropped_past,
            digest_flagged,
        })
    }

    /// Disarms both possible wakes for an entry id.
    ///
    /// Idempotent: disarming an absent wake is a no-op by the
    /// `WakeScheduler` contract, so this is safe on delete and on entries
    /// that never had reminders.
    pub fn cancel(&self, entry_id: &str) {
        self.disarm_both_kinds(entry_id);
        info!(
            "event=reminder_cancel module=coordinator status=ok entry_id={}",
            entry_id
        );
    }

    fn disarm_both_kinds(&self, entry_id: &str) {
        self.wake.disarm(request_id(entry_id, TicketKind::Lead));
        self.wake.disarm(request_id(entry_id, TicketKind::OnTime));
    }
}

/// Failures surfaced to the interactive caller of schedule/cancel.
#[derive(Debug)]
pub enum ScheduleError {
    /// The platform refused exact-wake scheduling; recoverable via a
    /// user-granted permission.
    SchedulingDenied,
    /// Other platform-side wake registration failure.
    Platform(String),
    /// Digest-flag persistence failed after the wakes were armed.
    Store(RepoError),
    Plan(PlanError),
}

impl Display for ScheduleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SchedulingDenied => {
                write!(f, "reminder not armed: exact wake scheduling denied")
            }
            Self::Platform(detail) => write!(f, "reminder not armed: {detail}"),
            Self::Store(err) => write!(f, "digest flag not persisted: {err}"),
            Self::Plan(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ScheduleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Plan(err) => Some(err),
            Self::SchedulingDenied | Self::Platform(_) => None,
        }
    }
}

impl From<WakeArmError> for ScheduleError {
    fn from(value: WakeArmError) -> Self {
        match value {
            WakeArmError::SchedulingDenied => Self::SchedulingDenied,
            WakeArmError::Platform(detail) => Self::Platform(detail),
        }
    }
}

impl From<PlanError> for ScheduleError {
    fn from(value: PlanError) -> Self {
        Self::Plan(value)
    }
}
