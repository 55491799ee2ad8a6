//! Wake ticket model and deterministic request-id derivation.
//!
//! # Responsibility
//! - Define the record the coordinator arms against the OS wake table.
//! - Derive stable integer request ids from `(entry id, ticket kind)`.
//! - Encode/decode the opaque payload carried through the OS registration.
//!
//! # Invariants
//! - `request_id` is a pure function of its inputs: identical across
//!   repeated calls and across process restarts.
//! - Lead and on-time ids for the same entry never collide, so the two
//!   wakes are independently cancellable.
//!
//! # See also
//! - docs/architecture/reminder-scheduler.md

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// The two discrete wake kinds derived from one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketKind {
    /// Advance notice, `n` minutes before the entry time.
    Lead,
    /// Exact-moment notice at the entry time.
    OnTime,
}

impl TicketKind {
    /// Stable string id used in payloads and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lead => "lead",
            Self::OnTime => "on_time",
        }
    }

    /// Discriminator byte mixed into request-id derivation.
    fn discriminator(self) -> u8 {
        match self {
            Self::Lead => 0x4c,
            Self::OnTime => 0x54,
        }
    }
}

/// One concrete scheduled wake-up derived from an entry and a policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WakeTicket {
    /// OS-level registration id. Arming with the same id replaces the
    /// previous registration instead of duplicating it.
    pub request_id: i32,
    pub kind: TicketKind,
    pub fire_at_epoch_ms: i64,
    /// Pre-composed, human-readable message carried in the payload.
    pub display_message: String,
    /// Opaque payload handed to the OS at arm time and back at fire time.
    pub payload: WakePayload,
}

/// Payload round-tripped through the OS wake registration.
///
/// Carries everything the fire-time handler needs, so the handler never
/// re-reads the entry from storage to know what to say.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WakePayload {
    pub entry_id: String,
    pub owner_id: String,
    pub kind: TicketKind,
    pub display_message: String,
    pub hour: u32,
    pub minute: u32,
}

impl WakePayload {
    /// Serializes the payload into the opaque string form the OS stores.
    pub fn encode(&self) -> String {
        // Serialization of this plain-field struct cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Decodes a payload previously produced by `encode`.
    pub fn decode(raw: &str) -> Result<Self, PayloadDecodeError> {
        serde_json::from_str(raw).map_err(|err| PayloadDecodeError {
            detail: err.to_string(),
        })
    }
}

/// Error for malformed or truncated wake payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadDecodeError {
    pub detail: String,
}

impl Display for PayloadDecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid wake payload: {}", self.detail)
    }
}

impl Error for PayloadDecodeError {}

/// Derives the OS registration id for one `(entry id, kind)` pair.
///
/// Uses FNV-1a over the entry id bytes plus a kind discriminator. The std
/// `Hasher` is not stable across releases, and disarm must find the same
/// id long after the arming process died, so the hash is spelled out here.
pub fn request_id(entry_id: &str, kind: TicketKind) -> i32 {
    const FNV_OFFSET: u32 = 0x811c_9dc5;
    const FNV_PRIME: u32 = 0x0100_0193;

    let mut hash = FNV_OFFSET;
    for byte in entry_id.as_bytes() {
        hash ^= u32::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash ^= u32::from(kind.discriminator());
    hash = hash.wrapping_mul(FNV_PRIME);

    hash as i32
}

#[cfg(test)]
mod tests {
    use super::{request_id, PayloadDecodeError, TicketKind, WakePayload};

    #[test]
    fn request_id_is_deterministic() {
        let first = request_id("entry-abc", TicketKind::Lead);
        let second = request_id("entry-abc", TicketKind::Lead);
        assert_eq!(first, second);
    }

    #[test]
    fn request_ids_differ_by_kind_and_entry() {
        let lead = request_id("entry-abc", TicketKind::Lead);
        let on_time = request_id("entry-abc", TicketKind::OnTime);
        assert_ne!(lead, on_time);

        let other = request_id("entry-xyz", TicketKind::Lead);
        assert_ne!(lead, other);
    }

    #[test]
    fn payload_round_trips_through_encode_decode() {
        let payload = WakePayload {
            entry_id: "entry-abc".to_string(),
            owner_id: "owner-1".to_string(),
            kind: TicketKind::OnTime,
            display_message: "physics lab is starting now.".to_string(),
            hour: 14,
            minute: 5,
        };

        let decoded = WakePayload::decode(&payload.encode()).expect("payload decodes");
        assert_eq!(decoded, payload);
    }

    #[test]
    fn decode_rejects_malformed_payloads() {
        let err = WakePayload::decode("not json").expect_err("garbage must fail");
        assert!(matches!(err, PayloadDecodeError { .. }));

        WakePayload::decode("{\"entry_id\":\"x\"}").expect_err("missing fields must fail");
    }
}
