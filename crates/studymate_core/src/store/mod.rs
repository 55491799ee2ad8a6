//! Persistence contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define the entry-store and activity-log contracts the scheduler
//!   collaborates with.
//! - Isolate SQL details from scheduler orchestration.
//!
//! # Invariants
//! - Write paths must call `CalendarEntry::validate()` before SQL
//!   mutations.
//! - Repository APIs return semantic errors (`NotFound`) in addition to
//!   DB transport errors.
//!
//! # See also
//! - docs/architecture/reminder-scheduler.md

use crate::db::DbError;
use crate::model::entry::EntryValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod activity_repo;
pub mod entry_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for entry persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(EntryValidationError),
    Db(DbError),
    NotFound(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "entry not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted entry data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<EntryValidationError> for RepoError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
