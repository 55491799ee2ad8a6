//! Activity/notification log repository.
//!
//! # Responsibility
//! - Append and list per-owner activity feed records.
//! - Tag reminder records so the feed can render them apart from social
//!   notifications.
//!
//! # Invariants
//! - Records are ordered by a store-assigned monotonic sequence.
//! - Appends never mutate existing records.

use crate::store::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

/// Feed record category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    /// Emitted when a scheduled reminder fires.
    ScheduleReminder,
    Like,
    Comment,
    Follow,
}

impl ActivityKind {
    /// Stable string id persisted in the store.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ScheduleReminder => "schedule_reminder",
            Self::Like => "like",
            Self::Comment => "comment",
            Self::Follow => "follow",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "schedule_reminder" => Some(Self::ScheduleReminder),
            "like" => Some(Self::Like),
            "comment" => Some(Self::Comment),
            "follow" => Some(Self::Follow),
            _ => None,
        }
    }
}

/// One activity feed record scoped to an owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRecord {
    pub owner_id: String,
    pub kind: ActivityKind,
    pub message: String,
    pub created_at_ms: i64,
}

/// Repository interface for the per-owner activity log.
pub trait ActivityLogRepository {
    /// Appends one record and returns its store-assigned sequence.
    fn append(&self, record: &ActivityRecord) -> RepoResult<i64>;
    /// Lists the owner's newest records, newest first.
    fn list_for_owner(&self, owner_id: &str, limit: u32) -> RepoResult<Vec<ActivityRecord>>;
}

/// SQLite-backed activity log.
pub struct SqliteActivityLogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteActivityLogRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ActivityLogRepository for SqliteActivityLogRepository<'_> {
    fn append(&self, record: &ActivityRecord) -> RepoResult<i64> {
        if record.owner_id.trim().is_empty() {
            return Err(RepoError::InvalidData(
                "activity record owner_id must not be empty".to_string(),
            ));
        }

        self.conn.execute(
            "INSERT INTO activity_log (owner_id, kind, message, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                record.owner_id.as_str(),
                record.kind.as_str(),
                record.message.as_str(),
                record.created_at_ms,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn list_for_owner(&self, owner_id: &str, limit: u32) -> RepoResult<Vec<ActivityRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT owner_id, kind, message, created_at
             FROM activity_log
             WHERE owner_id = ?1
             ORDER BY seq DESC
             LIMIT ?2;",
        )?;

        let mut rows = stmt.query(params![owner_id, i64::from(limit)])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(parse_activity_row(row)?);
        }

        Ok(records)
    }
}

fn parse_activity_row(row: &Row<'_>) -> RepoResult<ActivityRecord> {
    let kind_text: String = row.get("kind")?;
    let kind = ActivityKind::parse(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid activity kind `{kind_text}` in activity_log.kind"
        ))
    })?;

    Ok(ActivityRecord {
        owner_id: row.get("owner_id")?,
        kind,
        message: row.get("message")?,
        created_at_ms: row.get("created_at")?,
    })
}
