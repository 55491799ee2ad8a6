//! Reminder scheduling core for the StudyMate app.
//! This crate is the single source of truth for wake-up planning,
//! arming/disarming and fire-time handling invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod platform;
pub mod scheduler;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entry::{CalendarEntry, EntryValidationError, ReminderPolicy};
pub use model::ticket::{request_id, PayloadDecodeError, TicketKind, WakePayload, WakeTicket};
pub use platform::grant::{CompletionToken, GrantGuard};
pub use platform::notify::{NotificationPresenter, TapDestination};
pub use platform::wake::{WakeArmError, WakeScheduler};
pub use scheduler::coordinator::{ReminderCoordinator, ScheduleError, ScheduleOutcome};
pub use scheduler::digest::{
    DailyDigestScheduler, DigestArmOutcome, DIGEST_FIRE_HOUR, DIGEST_NOTIFICATION_ID,
    DIGEST_REQUEST_ID,
};
pub use scheduler::planner::{plan, PlanError};
pub use scheduler::wake_handler::WakeHandler;
pub use store::activity_repo::{
    ActivityKind, ActivityLogRepository, ActivityRecord, SqliteActivityLogRepository,
};
pub use store::entry_repo::{EntryRepository, SqliteEntryRepository};
pub use store::{RepoError, RepoResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
