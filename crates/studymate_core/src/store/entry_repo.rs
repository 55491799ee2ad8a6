//! Calendar entry repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the entry read/write surface the scheduler depends on:
//!   create/update/get, digest-flag mutation, digest-day query.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `create_entry` resolves an empty id to a fresh stable id; ids are
//!   never reassigned afterwards.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::model::entry::CalendarEntry;
use crate::store::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const ENTRY_SELECT_SQL: &str = "SELECT
    id,
    owner_id,
    text,
    year,
    month,
    day,
    hour,
    minute,
    digest_flag
FROM entries";

/// Repository interface for calendar entry persistence.
///
/// The scheduler treats this as an external collaborator: a key-value
/// store keyed by owner then entry id.
pub trait EntryRepository {
    /// Persists a new entry and returns its resolved stable id.
    fn create_entry(&self, entry: &CalendarEntry) -> RepoResult<String>;
    /// Overwrites all fields of an existing entry (same id).
    fn update_entry(&self, entry: &CalendarEntry) -> RepoResult<()>;
    fn get_entry(&self, owner_id: &str, id: &str) -> RepoResult<Option<CalendarEntry>>;
    /// Field-level update of the digest flag only.
    fn set_digest_flag(&self, owner_id: &str, id: &str, flag: bool) -> RepoResult<()>;
    /// All of the owner's digest-flagged entries dated exactly this day.
    fn digest_entries_for_day(
        &self,
        owner_id: &str,
        year: i32,
        month: u32,
        day: u32,
    ) -> RepoResult<Vec<CalendarEntry>>;
    fn delete_entry(&self, owner_id: &str, id: &str) -> RepoResult<()>;
}

/// SQLite-backed entry repository.
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEntryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EntryRepository for SqliteEntryRepository<'_> {
    fn create_entry(&self, entry: &CalendarEntry) -> RepoResult<String> {
        entry.validate()?;

        let id = if entry.id.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            entry.id.clone()
        };

        self.conn.execute(
            "INSERT INTO entries (
                id,
                owner_id,
                text,
                year,
                month,
                day,
                hour,
                minute,
                digest_flag
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                id.as_str(),
                entry.owner_id.as_str(),
                entry.text.as_str(),
                entry.year,
                entry.month,
                entry.day,
                entry.hour,
                entry.minute,
                bool_to_int(entry.digest_flag),
            ],
        )?;

        Ok(id)
    }

    fn update_entry(&self, entry: &CalendarEntry) -> RepoResult<()> {
        entry.validate()?;

        let changed = self.conn.execute(
            "UPDATE entries
             SET
                text = ?1,
                year = ?2,
                month = ?3,
                day = ?4,
                hour = ?5,
                minute = ?6,
                digest_flag = ?7,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?8 AND owner_id = ?9;",
            params![
                entry.text.as_str(),
                entry.year,
                entry.month,
                entry.day,
                entry.hour,
                entry.minute,
                bool_to_int(entry.digest_flag),
                entry.id.as_str(),
                entry.owner_id.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(entry.id.clone()));
        }

        Ok(())
    }

    fn get_entry(&self, owner_id: &str, id: &str) -> RepoResult<Option<CalendarEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL}
             WHERE id = ?1 AND owner_id = ?2;"
        ))?;

        let mut rows = stmt.query(params![id, owner_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_entry_row(row)?));
        }

        Ok(None)
    }

    fn set_digest_flag(&self, owner_id: &str, id: &str, flag: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE entries
             SET
                digest_flag = ?1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?2 AND owner_id = ?3;",
            params![bool_to_int(flag), id, owner_id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }

        Ok(())
    }

    fn digest_entries_for_day(
        &self,
        owner_id: &str,
        year: i32,
        month: u32,
        day: u32,
    ) -> RepoResult<Vec<CalendarEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL}
             WHERE owner_id = ?1
               AND year = ?2 AND month = ?3 AND day = ?4
               AND digest_flag = 1
             ORDER BY hour ASC, minute ASC, id ASC;"
        ))?;

        let mut rows = stmt.query(params![owner_id, year, month, day])?;
        let mut entries = Vec::new();

        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }

        Ok(entries)
    }

    fn delete_entry(&self, owner_id: &str, id: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM entries WHERE id = ?1 AND owner_id = ?2;",
            params![id, owner_id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }

        Ok(())
    }
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<CalendarEntry> {
    let digest_flag = match row.get::<_, i64>("digest_flag")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid digest_flag value `{other}` in entries.digest_flag"
            )));
        }
    };

    let entry = CalendarEntry {
        id: row.get("id")?,
        owner_id: row.get("owner_id")?,
        text: row.get("text")?,
        year: row.get("year")?,
        month: row.get("month")?,
        day: row.get("day")?,
        hour: row.get("hour")?,
        minute: row.get("minute")?,
        digest_flag,
    };
    entry.validate()?;
    Ok(entry)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
