//! Exact-time wake-up capability contract.
//!
//! # Responsibility
//! - Abstract the OS facility that fires one-shot wake-ups at exact
//!   wall-clock instants, surviving process death.
//!
//! # Invariants
//! - `arm` with an already-registered id replaces the registration.
//! - `disarm` of an absent id is a no-op, never an error.
//! - `has_armed` reflects the OS registration table, the single source of
//!   truth for armed state.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// OS wake-registration capability.
///
/// Registrations persist across process restarts but not across app
/// uninstall; they must use "exact, wake device if asleep" semantics.
pub trait WakeScheduler {
    /// Registers a one-shot wake at `fire_at_epoch_ms` carrying `payload`.
    fn arm(&self, request_id: i32, fire_at_epoch_ms: i64, payload: &str)
        -> Result<(), WakeArmError>;

    /// Deregisters a wake. No-op when nothing is registered under the id.
    fn disarm(&self, request_id: i32);

    /// Queries whether a wake is currently registered under the id.
    fn has_armed(&self, request_id: i32) -> bool;
}

/// Failures reported by the OS when registering a wake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WakeArmError {
    /// The caller lacks the exact-alarm permission. Recoverable: the UI
    /// prompts the user to grant it.
    SchedulingDenied,
    /// Any other platform-side registration failure.
    Platform(String),
}

impl Display for WakeArmError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SchedulingDenied => {
                write!(f, "exact wake scheduling denied by the platform")
            }
            Self::Platform(detail) => write!(f, "wake registration failed: {detail}"),
        }
    }
}

impl Error for WakeArmError {}
