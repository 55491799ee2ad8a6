//! FFI use-case API for the host application.
//!
//! # Responsibility
//! - Expose stable, use-case-level reminder functions to the host via FRB.
//! - Keep the host's alarm/notification services fed with deterministic
//!   ticket data (the host owns the actual OS registrations).
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Request ids returned here match the ones the core derives at plan
//!   time, so host-side disarm always finds the right registration.

use chrono::{FixedOffset, TimeZone};
use log::warn;
use studymate_core::db::open_db;
use studymate_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    plan, request_id, ActivityKind, ActivityLogRepository, ActivityRecord, CalendarEntry,
    ReminderPolicy, SqliteActivityLogRepository, TicketKind, WakePayload,
};
use std::path::PathBuf;
use std::sync::OnceLock;

const APP_DB_FILE_NAME: &str = "studymate.sqlite3";
static APP_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on
///   failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the app database directory for subsequent record calls.
///
/// # FFI contract
/// - First call wins; later calls with a different directory return an
///   error message instead of silently switching stores.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_app_db(dir: String) -> String {
    let resolved = PathBuf::from(dir).join(APP_DB_FILE_NAME);
    let stored = APP_DB_PATH.get_or_init(|| resolved.clone());
    if stored == &resolved {
        String::new()
    } else {
        format!(
            "app db already configured at `{}`; refusing to switch to `{}`",
            stored.display(),
            resolved.display()
        )
    }
}

/// Calendar entry fields crossing the FFI boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDto {
    pub id: String,
    pub owner_id: String,
    pub text: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub digest_flag: bool,
}

impl From<EntryDto> for CalendarEntry {
    fn from(value: EntryDto) -> Self {
        Self {
            id: value.id,
            owner_id: value.owner_id,
            text: value.text,
            year: value.year,
            month: value.month,
            day: value.day,
            hour: value.hour,
            minute: value.minute,
            digest_flag: value.digest_flag,
        }
    }
}

/// One plannable wake ticket for host-side arming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WakeTicketDto {
    pub request_id: i32,
    /// `lead` or `on_time`.
    pub kind: String,
    pub fire_at_epoch_ms: i64,
    pub display_message: String,
    /// Opaque payload the host stores in the OS registration.
    pub payload_json: String,
}

/// Response envelope for `plan_wake_tickets`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanResponse {
    pub ok: bool,
    pub tickets: Vec<WakeTicketDto>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl PlanResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            tickets: Vec::new(),
            message: message.into(),
        }
    }
}

/// Plans the wake tickets for one entry under one policy.
///
/// Input semantics:
/// - `policy_kind`: one of `exact|lead_minutes|daily_digest`.
/// - `lead_minutes`: required (and > 0) only for `lead_minutes`.
/// - `utc_offset_minutes`: the owner-local UTC offset used to interpret
///   the entry's wall-clock fields.
///
/// # FFI contract
/// - Sync call, pure computation.
/// - Never panics; policy/time problems come back as `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn plan_wake_tickets(
    entry: EntryDto,
    policy_kind: String,
    lead_minutes: Option<u32>,
    now_epoch_ms: i64,
    utc_offset_minutes: i32,
) -> PlanResponse {
    let policy = match parse_policy(&policy_kind, lead_minutes) {
        Ok(policy) => policy,
        Err(message) => return PlanResponse::failure(message),
    };

    let Some(offset) = FixedOffset::east_opt(utc_offset_minutes * 60) else {
        return PlanResponse::failure(format!(
            "invalid utc offset minutes: {utc_offset_minutes}"
        ));
    };
    let Some(now) = offset.timestamp_millis_opt(now_epoch_ms).single() else {
        return PlanResponse::failure(format!("invalid now timestamp: {now_epoch_ms}"));
    };

    match plan(&CalendarEntry::from(entry), policy, &now) {
        Ok(tickets) => PlanResponse {
            ok: true,
            message: format!("planned {} ticket(s)", tickets.len()),
            tickets: tickets
                .into_iter()
                .map(|ticket| WakeTicketDto {
                    request_id: ticket.request_id,
                    kind: ticket.kind.as_str().to_string(),
                    fire_at_epoch_ms: ticket.fire_at_epoch_ms,
                    display_message: ticket.display_message,
                    payload_json: ticket.payload.encode(),
                })
                .collect(),
        },
        Err(err) => PlanResponse::failure(format!("plan failed: {err}")),
    }
}

/// Both derivable request ids for one entry id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderRequestIds {
    pub lead: i32,
    pub on_time: i32,
}

/// Derives the request ids the host must disarm for one entry.
///
/// # FFI contract
/// - Sync call, pure computation, deterministic across restarts.
#[flutter_rust_bridge::frb(sync)]
pub fn reminder_request_ids(entry_id: String) -> ReminderRequestIds {
    ReminderRequestIds {
        lead: request_id(&entry_id, TicketKind::Lead),
        on_time: request_id(&entry_id, TicketKind::OnTime),
    }
}

/// Decoded wake payload envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WakePayloadResponse {
    pub ok: bool,
    pub message: String,
    pub entry_id: String,
    pub owner_id: String,
    /// `lead` or `on_time`; empty on decode failure.
    pub kind: String,
    pub display_message: String,
    pub hour: u32,
    pub minute: u32,
}

/// Decodes an OS wake payload for host-side notification rendering.
///
/// # FFI contract
/// - Sync call, never panics; malformed payloads come back as `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn decode_wake_payload(payload_json: String) -> WakePayloadResponse {
    match WakePayload::decode(&payload_json) {
        Ok(payload) => WakePayloadResponse {
            ok: true,
            message: String::new(),
            entry_id: payload.entry_id,
            owner_id: payload.owner_id,
            kind: payload.kind.as_str().to_string(),
            display_message: payload.display_message,
            hour: payload.hour,
            minute: payload.minute,
        },
        Err(err) => WakePayloadResponse {
            ok: false,
            message: err.to_string(),
            entry_id: String::new(),
            owner_id: String::new(),
            kind: String::new(),
            display_message: String::new(),
            hour: 0,
            minute: 0,
        },
    }
}

/// Generic action response envelope for record calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordResponse {
    pub ok: bool,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl RecordResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Appends the `schedule_reminder` activity record after a fired wake.
///
/// Best-effort by design: the host has already shown the notification, so
/// the caller may ignore a failure here.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; requires `configure_app_db` to have been called.
#[flutter_rust_bridge::frb(sync)]
pub fn record_reminder_fired(payload_json: String, now_epoch_ms: i64) -> RecordResponse {
    let Some(db_path) = APP_DB_PATH.get() else {
        return RecordResponse::failure("app db not configured; call configure_app_db first");
    };

    let payload = match WakePayload::decode(&payload_json) {
        Ok(payload) => payload,
        Err(err) => return RecordResponse::failure(format!("record_reminder_fired failed: {err}")),
    };

    let conn = match open_db(db_path) {
        Ok(conn) => conn,
        Err(err) => return RecordResponse::failure(format!("record_reminder_fired failed: {err}")),
    };

    let log = SqliteActivityLogRepository::new(&conn);
    let record = ActivityRecord {
        owner_id: payload.owner_id,
        kind: ActivityKind::ScheduleReminder,
        message: payload.display_message,
        created_at_ms: now_epoch_ms,
    };

    match log.append(&record) {
        Ok(seq) => RecordResponse {
            ok: true,
            message: format!("recorded activity seq {seq}"),
        },
        Err(err) => {
            warn!(
                "event=record_reminder module=ffi status=error error_code=activity_append_failed error={}",
                err
            );
            RecordResponse::failure(format!("record_reminder_fired failed: {err}"))
        }
    }
}

fn parse_policy(kind: &str, lead_minutes: Option<u32>) -> Result<ReminderPolicy, String> {
    match kind {
        "exact" => Ok(ReminderPolicy::Exact),
        "daily_digest" => Ok(ReminderPolicy::DailyDigest),
        "lead_minutes" => match lead_minutes {
            Some(minutes) if minutes > 0 => Ok(ReminderPolicy::LeadMinutes(minutes)),
            Some(0) => Err("lead_minutes must be greater than zero".to_string()),
            _ => Err("lead_minutes policy requires a lead_minutes value".to_string()),
        },
        other => Err(format!(
            "unsupported policy kind `{other}`; expected exact|lead_minutes|daily_digest"
        )),
    }
}
