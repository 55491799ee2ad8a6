//! Injected OS capability contracts.
//!
//! # Responsibility
//! - Define the traits the host platform implements for exact wake-ups,
//!   visible notifications and execution-window grants.
//! - Keep the scheduler testable with deterministic fakes.
//!
//! # Invariants
//! - Capabilities are constructor-injected collaborators, never
//!   process-wide singletons.
//!
//! # See also
//! - docs/architecture/reminder-scheduler.md

pub mod grant;
pub mod notify;
pub mod wake;
