//! Fire-time wake handler.
//!
//! # Responsibility
//! - Resolve one fired wake payload into a visible notification.
//! - Best-effort append a `schedule_reminder` record to the activity log.
//!
//! # Invariants
//! - The execution grant is taken before any other work and released
//!   exactly once on every path.
//! - Nothing here propagates an error back to the OS dispatcher; failures
//!   are logged and swallowed because there is no interactive caller.
//!
//! # See also
//! - docs/architecture/reminder-scheduler.md

use crate::model::ticket::{request_id, TicketKind, WakePayload};
use crate::platform::grant::{CompletionToken, GrantGuard};
use crate::platform::notify::{NotificationPresenter, TapDestination};
use crate::store::activity_repo::{ActivityKind, ActivityLogRepository, ActivityRecord};
use log::{error, info, warn};

/// Handles one fired wake ticket.
pub struct WakeHandler<'a, N, L>
where
    N: NotificationPresenter,
    L: ActivityLogRepository,
{
    notifier: &'a N,
    activity: &'a L,
}

impl<'a, N, L> WakeHandler<'a, N, L>
where
    N: NotificationPresenter,
    L: ActivityLogRepository,
{
    pub fn new(notifier: &'a N, activity: &'a L) -> Self {
        Self { notifier, activity }
    }

    /// Invoked by the OS dispatcher when a wake fires.
    ///
    /// The payload was fully pre-composed at plan time, so no entry
    /// lookup happens here; the handler runs in a constrained execution
    /// window and must finish quickly.
    pub fn on_fire(&self, payload_json: &str, token: Box<dyn CompletionToken>, now_ms: i64) {
        let guard = GrantGuard::new(token);

        let payload = match WakePayload::decode(payload_json) {
            Ok(payload) => payload,
            Err(err) => {
                error!(
                    "event=wake_fire module=wake_handler status=error error_code=payload_decode_failed error={}",
                    err
                );
                guard.release();
                return;
            }
        };

        let title = match payload.kind {
            TicketKind::Lead => "Upcoming study session",
            TicketKind::OnTime => "Study session starting",
        };
        let body = format!(
            "{} ({:02}:{:02})",
            payload.display_message, payload.hour, payload.minute
        );
        let notification_id = request_id(&payload.entry_id, payload.kind);

        self.notifier
            .show(notification_id, title, &body, TapDestination::ActivityFeed);

        // The notification already happened; a failed log append must not
        // undo that or reach the dispatcher.
        let record = ActivityRecord {
            owner_id: payload.owner_id.clone(),
            kind: ActivityKind::ScheduleReminder,
            message: payload.display_message.clone(),
            created_at_ms: now_ms,
        };
        match self.activity.append(&record) {
            Ok(seq) => info!(
                "event=wake_fire module=wake_handler status=ok entry_id={} kind={} activity_seq={}",
                payload.entry_id,
                payload.kind.as_str(),
                seq
            ),
            Err(err) => warn!(
                "event=wake_fire module=wake_handler status=degraded entry_id={} kind={} error_code=activity_append_failed error={}",
                payload.entry_id,
                payload.kind.as_str(),
                err
            ),
        }

        guard.release();
    }
}
