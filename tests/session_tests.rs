use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use cms_portal::auth::{Principal, Role};
use cms_portal::navigation::{
    AuthResolutionError, SessionProvider, SessionResolver, SessionState,
};
use uuid::Uuid;

// --- Mock Providers ---

/// Completes immediately with a fixed answer.
struct ImmediateProvider {
    principal: Option<Principal>,
}

#[async_trait]
impl SessionProvider for ImmediateProvider {
    async fn authenticate(&self) -> Result<Option<Principal>, AuthResolutionError> {
        Ok(self.principal.clone())
    }
}

/// Fails every attempt, counting them.
struct FailingProvider {
    attempts: AtomicU32,
}

#[async_trait]
impl SessionProvider for FailingProvider {
    async fn authenticate(&self) -> Result<Option<Principal>, AuthResolutionError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(AuthResolutionError::Unavailable("connection refused".to_string()))
    }
}

/// Never completes within any reasonable bound.
struct HangingProvider {
    attempts: AtomicU32,
}

#[async_trait]
impl SessionProvider for HangingProvider {
    async fn authenticate(&self) -> Result<Option<Principal>, AuthResolutionError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(None)
    }
}

/// Fails once, then succeeds.
struct FlakyProvider {
    attempts: AtomicU32,
    principal: Principal,
}

#[async_trait]
impl SessionProvider for FlakyProvider {
    async fn authenticate(&self) -> Result<Option<Principal>, AuthResolutionError> {
        if self.attempts.fetch_add(1, Ordering::SeqCst) == 0 {
            Err(AuthResolutionError::Unavailable("transient".to_string()))
        } else {
            Ok(Some(self.principal.clone()))
        }
    }
}

fn admin() -> Principal {
    Principal::new(Uuid::new_v4(), Some(Role::Admin))
}

// --- Tests ---

#[tokio::test]
async fn valid_session_resolves_to_authenticated() {
    let principal = admin();
    let resolver = SessionResolver::new(
        ImmediateProvider {
            principal: Some(principal.clone()),
        },
        Duration::from_millis(100),
    );

    assert_eq!(
        resolver.resolve().await,
        SessionState::Authenticated(principal)
    );
}

#[tokio::test]
async fn missing_session_resolves_to_unauthenticated_without_retry() {
    let resolver = SessionResolver::new(
        ImmediateProvider { principal: None },
        Duration::from_millis(100),
    );

    assert_eq!(resolver.resolve().await, SessionState::Unauthenticated);
}

#[tokio::test]
async fn backend_failure_degrades_to_unauthenticated_after_one_retry() {
    let provider = FailingProvider {
        attempts: AtomicU32::new(0),
    };
    let resolver = SessionResolver::new(provider, Duration::from_millis(100));

    let state = resolver.resolve().await;

    assert_eq!(state, SessionState::Unauthenticated);
    // The failure path is never surfaced as an error; it degrades.
    assert!(!state.is_resolving());
}

#[tokio::test]
async fn failing_provider_is_retried_exactly_once() {
    let provider = Arc::new(FailingProvider {
        attempts: AtomicU32::new(0),
    });
    let resolver = SessionResolver::new(provider.clone(), Duration::from_millis(100));

    let _ = resolver.resolve().await;

    assert_eq!(provider.attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn hanging_backend_is_bounded_by_the_timeout() {
    let provider = Arc::new(HangingProvider {
        attempts: AtomicU32::new(0),
    });
    let resolver = SessionResolver::new(provider.clone(), Duration::from_millis(50));

    let started = std::time::Instant::now();
    let state = resolver.resolve().await;

    assert_eq!(state, SessionState::Unauthenticated);
    // Two bounded attempts, nowhere near the provider's 30s sleep: the
    // machine cannot get stuck in Resolving.
    assert_eq!(provider.attempts.load(Ordering::SeqCst), 2);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn transient_failure_recovers_on_the_retry() {
    let principal = admin();
    let resolver = SessionResolver::new(
        FlakyProvider {
            attempts: AtomicU32::new(0),
            principal: principal.clone(),
        },
        Duration::from_millis(100),
    );

    assert_eq!(
        resolver.resolve().await,
        SessionState::Authenticated(principal)
    );
}

#[tokio::test]
async fn resolution_reaches_exactly_one_terminal_state() {
    // Same provider state, same terminal outcome: never both, never stuck.
    let principal = admin();
    for (provider_principal, expected) in [
        (Some(principal.clone()), SessionState::Authenticated(principal)),
        (None, SessionState::Unauthenticated),
    ] {
        let resolver = SessionResolver::new(
            ImmediateProvider {
                principal: provider_principal,
            },
            Duration::from_millis(100),
        );
        let state = resolver.resolve().await;
        assert!(!state.is_resolving());
        assert_eq!(state, expected);
    }
}
