//! Domain model for calendar entries and their scheduled wake-ups.
//!
//! # Responsibility
//! - Define canonical data structures used by the reminder scheduler.
//! - Keep wake identity derivation pure and deterministic.
//!
//! # Invariants
//! - Every persisted entry is identified by a stable, store-assigned id.
//! - Wake request ids are a pure function of `(entry id, ticket kind)`.
//!
//! # See also
//! - docs/architecture/reminder-scheduler.md

pub mod entry;
pub mod ticket;
