//! Daily digest scheduler: one recurring end-of-day summary wake.
//!
//! # Responsibility
//! - Keep at most one fixed-id wake armed for the owner's 19:00 digest.
//! - On fire, sweep today's digest-flagged entries into one aggregate
//!   notification, then re-arm for tomorrow.
//!
//! # Invariants
//! - Armed state is checked against the OS registration table via
//!   `has_armed`, never a mirrored boolean that could drift after a
//!   reboot cleared the table.
//! - An empty sweep is a silent no-op, not an error.
//!
//! # See also
//! - docs/architecture/reminder-scheduler.md

use crate::platform::grant::{CompletionToken, GrantGuard};
use crate::platform::notify::{NotificationPresenter, TapDestination};
use crate::platform::wake::{WakeArmError, WakeScheduler};
use crate::store::entry_repo::EntryRepository;
use chrono::{DateTime, Datelike, LocalResult, NaiveDate, TimeZone};
use log::{error, info, warn};

/// Fixed registration id for the single digest wake.
pub const DIGEST_REQUEST_ID: i32 = 0x00d1_6e57;
/// Fixed notification id for the aggregate digest notification.
pub const DIGEST_NOTIFICATION_ID: i32 = 0x00d1_6e58;
/// Local wall-clock hour the digest fires at.
pub const DIGEST_FIRE_HOUR: u32 = 19;

/// Marker payload stored in the digest wake registration.
const DIGEST_PAYLOAD: &str = "daily_digest";

/// What `ensure_armed` actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestArmOutcome {
    /// A wake was already registered under the fixed id.
    AlreadyArmed,
    Armed { fire_at_epoch_ms: i64 },
    /// Today's 19:00 has passed; arming waits for the next app init.
    SkippedPastWindow,
}

/// At-most-one-instance recurring digest wake for one owner.
pub struct DailyDigestScheduler<'a, W, N, R>
where
    W: WakeScheduler,
    N: NotificationPresenter,
    R: EntryRepository,
{
    wake: &'a W,
    notifier: &'a N,
    entries: &'a R,
    owner_id: String,
}

impl<'a, W, N, R> DailyDigestScheduler<'a, W, N, R>
where
    W: WakeScheduler,
    N: NotificationPresenter,
    R: EntryRepository,
{
    pub fn new(wake: &'a W, notifier: &'a N, entries: &'a R, owner_id: impl Into<String>) -> Self {
        Self {
            wake,
            notifier,
            entries,
            owner_id: owner_id.into(),
        }
    }

    /// Arms today's 19:00 digest wake unless one is already registered or
    /// the window has passed. Idempotent; called from app init/foreground.
    pub fn ensure_armed<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> Result<DigestArmOutcome, WakeArmError> {
        if self.wake.has_armed(DIGEST_REQUEST_ID) {
            info!("event=digest_arm module=digest status=noop reason=already_armed");
            return Ok(DigestArmOutcome::AlreadyArmed);
        }

        let Some(fire_at_ms) = digest_fire_epoch_ms(now.date_naive(), &now.timezone()) else {
            error!("event=digest_arm module=digest status=error error_code=unrepresentable_fire_time");
            return Ok(DigestArmOutcome::SkippedPastWindow);
        };

        if fire_at_ms <= now.timestamp_millis() {
            info!("event=digest_arm module=digest status=noop reason=window_passed");
            return Ok(DigestArmOutcome::SkippedPastWindow);
        }

        self.wake.arm(DIGEST_REQUEST_ID, fire_at_ms, DIGEST_PAYLOAD)?;
        info!(
            "event=digest_arm module=digest status=ok fire_at_ms={}",
            fire_at_ms
        );
        Ok(DigestArmOutcome::Armed {
            fire_at_epoch_ms: fire_at_ms,
        })
    }

    /// Invoked by the OS when the digest wake fires.
    ///
    /// Query failure is logged and skips the notification for this cycle;
    /// re-arming for tomorrow is attempted regardless, so a transient
    /// store failure costs one digest, not the recurrence.
    pub fn on_fire<Tz: TimeZone>(&self, now: &DateTime<Tz>, token: Box<dyn CompletionToken>) {
        let guard = GrantGuard::new(token);
        let today = now.date_naive();

        match self.entries.digest_entries_for_day(
            &self.owner_id,
            today.year(),
            today.month(),
            today.day(),
        ) {
            Ok(entries) if entries.is_empty() => {
                info!("event=digest_fire module=digest status=noop reason=no_flagged_entries");
            }
            Ok(entries) => {
                let count = entries.len();
                let noun = if count == 1 { "session" } else { "sessions" };
                let body = format!(
                    "You have {count} study {noun} flagged for a daily reminder."
                );
                self.notifier.show(
                    DIGEST_NOTIFICATION_ID,
                    "Daily study digest",
                    &body,
                    TapDestination::CalendarDay {
                        year: today.year(),
                        month: today.month(),
                        day: today.day(),
                    },
                );
                info!(
                    "event=digest_fire module=digest status=ok flagged={}",
                    count
                );
            }
            Err(err) => {
                error!(
                    "event=digest_fire module=digest status=error error_code=digest_query_failed error={}",
                    err
                );
            }
        }

        self.rearm_for_tomorrow(now);
        guard.release();
    }

    fn rearm_for_tomorrow<Tz: TimeZone>(&self, now: &DateTime<Tz>) {
        let Some(tomorrow) = now.date_naive().succ_opt() else {
            error!("event=digest_rearm module=digest status=error error_code=calendar_overflow");
            return;
        };
        let Some(fire_at_ms) = digest_fire_epoch_ms(tomorrow, &now.timezone()) else {
            error!("event=digest_rearm module=digest status=error error_code=unrepresentable_fire_time");
            return;
        };

        match self.wake.arm(DIGEST_REQUEST_ID, fire_at_ms, DIGEST_PAYLOAD) {
            Ok(()) => info!(
                "event=digest_rearm module=digest status=ok fire_at_ms={}",
                fire_at_ms
            ),
            // No interactive caller at fire time; next app init retries.
            Err(err) => warn!(
                "event=digest_rearm module=digest status=error error={}",
                err
            ),
        }
    }
}

fn digest_fire_epoch_ms<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> Option<i64> {
    match tz.with_ymd_and_hms(day.year(), day.month(), day.day(), DIGEST_FIRE_HOUR, 0, 0) {
        LocalResult::Single(at) => Some(at.timestamp_millis()),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.timestamp_millis()),
        LocalResult::None => None,
    }
}
