#![allow(dead_code)]

//! Deterministic fakes for the injected OS capabilities.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use studymate_core::platform::grant::CompletionToken;
use studymate_core::platform::notify::{NotificationPresenter, TapDestination};
use studymate_core::platform::wake::{WakeArmError, WakeScheduler};

/// One recorded OS wake registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArmedWake {
    pub fire_at_epoch_ms: i64,
    pub payload: String,
}

/// In-memory wake scheduler recording armed/disarmed ids.
#[derive(Default)]
pub struct FakeWakeScheduler {
    armed: Mutex<BTreeMap<i32, ArmedWake>>,
    deny_exact: Mutex<bool>,
    disarm_calls: Mutex<Vec<i32>>,
}

impl FakeWakeScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent `arm` calls fail like a revoked exact-alarm
    /// permission.
    pub fn deny_exact(&self) {
        *self.deny_exact.lock().unwrap() = true;
    }

    pub fn armed_ids(&self) -> Vec<i32> {
        self.armed.lock().unwrap().keys().copied().collect()
    }

    pub fn armed_count(&self) -> usize {
        self.armed.lock().unwrap().len()
    }

    pub fn armed_wake(&self, request_id: i32) -> Option<ArmedWake> {
        self.armed.lock().unwrap().get(&request_id).cloned()
    }

    pub fn disarm_calls(&self) -> Vec<i32> {
        self.disarm_calls.lock().unwrap().clone()
    }
}

impl WakeScheduler for FakeWakeScheduler {
    fn arm(
        &self,
        request_id: i32,
        fire_at_epoch_ms: i64,
        payload: &str,
    ) -> Result<(), WakeArmError> {
        if *self.deny_exact.lock().unwrap() {
            return Err(WakeArmError::SchedulingDenied);
        }
        self.armed.lock().unwrap().insert(
            request_id,
            ArmedWake {
                fire_at_epoch_ms,
                payload: payload.to_string(),
            },
        );
        Ok(())
    }

    fn disarm(&self, request_id: i32) {
        self.disarm_calls.lock().unwrap().push(request_id);
        self.armed.lock().unwrap().remove(&request_id);
    }

    fn has_armed(&self, request_id: i32) -> bool {
        self.armed.lock().unwrap().contains_key(&request_id)
    }
}

/// One recorded visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownNotification {
    pub notification_id: i32,
    pub title: String,
    pub body: String,
    pub tap: TapDestination,
}

/// Notification presenter recording everything it is asked to show.
#[derive(Default)]
pub struct FakeNotifier {
    shown: Mutex<Vec<ShownNotification>>,
}

impl FakeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown(&self) -> Vec<ShownNotification> {
        self.shown.lock().unwrap().clone()
    }
}

impl NotificationPresenter for FakeNotifier {
    fn show(&self, notification_id: i32, title: &str, body: &str, tap: TapDestination) {
        self.shown.lock().unwrap().push(ShownNotification {
            notification_id,
            title: title.to_string(),
            body: body.to_string(),
            tap,
        });
    }
}

struct CountingToken {
    releases: Arc<AtomicUsize>,
}

impl CompletionToken for CountingToken {
    fn release(self: Box<Self>) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

/// Returns a completion token plus the counter of its releases.
pub fn counting_token() -> (Box<dyn CompletionToken>, Arc<AtomicUsize>) {
    let releases = Arc::new(AtomicUsize::new(0));
    (
        Box::new(CountingToken {
            releases: Arc::clone(&releases),
        }),
        releases,
    )
}
