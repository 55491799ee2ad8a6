//! Execution-window grant scoping for fire-time handlers.
//!
//! # Responsibility
//! - Wrap the OS completion token handed to wake handlers so it is
//!   released exactly once, on every path.
//!
//! # Invariants
//! - A token is never released twice.
//! - Dropping an unreleased guard releases the token (the
//!   `finally`-equivalent required by the OS dispatcher contract).

use log::warn;

/// Completion token for one extended execution window.
///
/// The OS kills the process shortly after handler return unless the
/// handler holds such a grant; leaking it draws a resource warning from
/// the dispatcher, so release must happen exactly once.
pub trait CompletionToken {
    /// Signals the OS that the handler's asynchronous work is finished.
    fn release(self: Box<Self>);
}

/// Drop-guard ensuring a completion token is released exactly once.
pub struct GrantGuard {
    token: Option<Box<dyn CompletionToken>>,
}

impl GrantGuard {
    /// Takes ownership of the token before any fallible work starts.
    pub fn new(token: Box<dyn CompletionToken>) -> Self {
        Self { token: Some(token) }
    }

    /// Releases the token explicitly at the end of the happy path.
    pub fn release(mut self) {
        if let Some(token) = self.token.take() {
            token.release();
        }
    }
}

impl Drop for GrantGuard {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            warn!("event=grant_release module=platform status=implicit");
            token.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CompletionToken, GrantGuard};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingToken {
        releases: Arc<AtomicUsize>,
    }

    impl CompletionToken for CountingToken {
        fn release(self: Box<Self>) {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn counting_token() -> (Box<CountingToken>, Arc<AtomicUsize>) {
        let releases = Arc::new(AtomicUsize::new(0));
        (
            Box::new(CountingToken {
                releases: Arc::clone(&releases),
            }),
            releases,
        )
    }

    #[test]
    fn explicit_release_fires_once() {
        let (token, releases) = counting_token();
        let guard = GrantGuard::new(token);
        guard.release();
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_without_release_still_fires_once() {
        let (token, releases) = counting_token();
        {
            let _guard = GrantGuard::new(token);
        }
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_releases_on_panic_path() {
        let (token, releases) = counting_token();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = GrantGuard::new(token);
            panic!("handler blew up");
        }));
        assert!(result.is_err());
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }
}
