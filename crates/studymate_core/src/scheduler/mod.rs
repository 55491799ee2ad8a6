//! Reminder scheduling orchestration.
//!
//! # Responsibility
//! - Turn calendar entries + reminder policies into armed OS wake-ups.
//! - Handle fire-time wake payloads and the daily digest sweep.
//!
//! # Invariants
//! - All armed state lives in the OS wake table and the persistent store;
//!   nothing survives in memory between invocations.
//! - Disarm-before-rearm keeps at most one live wake per (entry, kind).
//!
//! # See also
//! - docs/architecture/reminder-scheduler.md

pub mod coordinator;
pub mod digest;
pub mod planner;
pub mod wake_handler;
