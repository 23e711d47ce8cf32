//! Unit tests for the desktop token lifecycle service

use std::sync::Arc;

use chrono::Duration;
use uuid::Uuid;

use crate::domain::entities::desktop_token::DesktopToken;
use crate::domain::entities::user::User;
use crate::errors::{DesktopTokenError, DomainError};
use crate::repositories::{DesktopTokenRepository, MockDesktopTokenRepository, MockUserRepository};
use crate::services::desktop_token::{DesktopTokenService, FixedClock, ManualTaskRunner};

struct Harness {
    service: DesktopTokenService<MockDesktopTokenRepository, MockUserRepository>,
    tokens: Arc<MockDesktopTokenRepository>,
    users: Arc<MockUserRepository>,
    runner: Arc<ManualTaskRunner>,
    clock: Arc<FixedClock>,
}

fn harness() -> Harness {
    let tokens = Arc::new(MockDesktopTokenRepository::new());
    let users = Arc::new(MockUserRepository::new());
    let runner = Arc::new(ManualTaskRunner::new());
    let clock = Arc::new(FixedClock::new(0));

    let service = DesktopTokenService::new(tokens.clone(), users.clone(), runner.clone())
        .with_clock(clock.clone());

    Harness {
        service,
        tokens,
        users,
        runner,
        clock,
    }
}

fn register_user(users: &MockUserRepository, username: &str) -> User {
    let user = User::new(username, format!("{}@example.com", username));
    users.users.lock().unwrap().push(user.clone());
    user
}

#[tokio::test]
async fn test_create_token_inserts_unbound_record() {
    let h = harness();

    h.service.create_token("abc", 0).await.unwrap();

    let record = h.tokens.get("abc").await.unwrap();
    assert_eq!(record.created_at, 0);
    assert!(!record.is_authenticated());
    assert_eq!(h.runner.pending(), 0);
}

#[tokio::test]
async fn test_create_token_twice_is_collision() {
    let h = harness();

    h.service.create_token("abc", 0).await.unwrap();
    let result = h.service.create_token("abc", 5).await;

    assert!(matches!(result, Err(DesktopTokenError::Collision)));
    assert_eq!(h.tokens.get("abc").await.unwrap().created_at, 0);
}

#[tokio::test]
async fn test_create_token_collides_with_expired_leftover() {
    let h = harness();

    h.service.create_token("abc", 0).await.unwrap();
    h.clock.set(10_000);

    let result = h.service.create_token("abc", 10_000).await;
    assert!(matches!(result, Err(DesktopTokenError::Collision)));
}

#[tokio::test]
async fn test_create_token_store_failure() {
    let h = harness();
    h.tokens.set_failing(true);

    let result = h.service.create_token("abc", 0).await;

    match result {
        Err(DesktopTokenError::StoreFailure { operation, source }) => {
            assert_eq!(operation, "create_token");
            assert!(matches!(*source, DomainError::Internal { .. }));
        }
        other => panic!("expected StoreFailure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_issue_token_uses_clock() {
    let h = harness();
    h.clock.set(1_700_000_000);

    let token = h.service.issue_token("abc").await.unwrap();

    assert_eq!(token.created_at, 1_700_000_000);
    assert_eq!(h.tokens.get("abc").await.unwrap().created_at, 1_700_000_000);
}

#[tokio::test]
async fn test_authenticate_binds_user() {
    let h = harness();
    let user = register_user(&h.users, "alice");

    h.service.create_token("abc", 0).await.unwrap();
    h.clock.set(30);
    h.service
        .authenticate_token("abc", Duration::seconds(60), &user)
        .await
        .unwrap();

    assert_eq!(h.tokens.get("abc").await.unwrap().user_id, Some(user.id));
    assert_eq!(h.runner.pending(), 0);
}

#[tokio::test]
async fn test_authenticate_missing_token_schedules_delete() {
    let h = harness();
    let user = register_user(&h.users, "alice");

    let result = h
        .service
        .authenticate_token("missing", Duration::seconds(60), &user)
        .await;

    assert!(matches!(result, Err(DesktopTokenError::InvalidOrExpired)));
    assert_eq!(h.runner.pending_names(), vec!["delete_desktop_token"]);
    assert_eq!(h.runner.run_pending().await, 1);
}

#[tokio::test]
async fn test_authenticate_expired_token_is_eventually_deleted() {
    let h = harness();
    let user = register_user(&h.users, "alice");

    h.service.create_token("abc", 0).await.unwrap();
    h.clock.set(61);

    let result = h
        .service
        .authenticate_token("abc", Duration::seconds(60), &user)
        .await;

    assert!(matches!(result, Err(DesktopTokenError::InvalidOrExpired)));
    // Deletion is deferred until the runner executes it
    assert!(h.tokens.get("abc").await.is_some());

    h.runner.run_pending().await;
    assert!(h.tokens.get("abc").await.is_none());
}

#[tokio::test]
async fn test_authenticate_at_window_boundary_succeeds() {
    let h = harness();
    let user = register_user(&h.users, "alice");

    h.service.create_token("abc", 0).await.unwrap();
    h.clock.set(60);

    h.service
        .authenticate_token("abc", Duration::seconds(60), &user)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_authenticate_never_rebinds() {
    let h = harness();
    let alice = register_user(&h.users, "alice");
    let mallory = register_user(&h.users, "mallory");

    h.service.create_token("abc", 0).await.unwrap();
    h.service
        .authenticate_token("abc", Duration::seconds(60), &alice)
        .await
        .unwrap();

    let result = h
        .service
        .authenticate_token("abc", Duration::seconds(60), &mallory)
        .await;

    assert!(matches!(result, Err(DesktopTokenError::InvalidOrExpired)));
    assert_eq!(h.tokens.get("abc").await.unwrap().user_id, Some(alice.id));
}

#[tokio::test]
async fn test_authenticate_store_failure_does_not_schedule_delete() {
    let h = harness();
    let user = register_user(&h.users, "alice");
    h.tokens.set_failing(true);

    let result = h
        .service
        .authenticate_token("abc", Duration::seconds(60), &user)
        .await;

    assert!(matches!(
        result,
        Err(DesktopTokenError::StoreFailure {
            operation: "authenticate_token",
            ..
        })
    ));
    assert_eq!(h.runner.pending(), 0);
}

#[tokio::test]
async fn test_validate_unbound_token_keeps_record() {
    let h = harness();

    h.service.create_token("abc", 0).await.unwrap();
    h.clock.set(30);

    let result = h.service.validate_token("abc", Duration::seconds(60)).await;

    assert!(matches!(result, Err(DesktopTokenError::NotYetAuthenticated)));
    assert_eq!(h.runner.pending(), 0);
    assert!(h.tokens.get("abc").await.is_some());
}

#[tokio::test]
async fn test_validate_expired_token_is_eventually_deleted() {
    let h = harness();

    h.service.create_token("xyz", 0).await.unwrap();
    h.clock.set(20);

    let result = h.service.validate_token("xyz", Duration::seconds(10)).await;

    assert!(matches!(result, Err(DesktopTokenError::Expired)));
    assert!(h.tokens.get("xyz").await.is_some());

    h.runner.run_pending().await;
    assert!(h.tokens.get("xyz").await.is_none());
}

#[tokio::test]
async fn test_validate_missing_token_is_expired() {
    let h = harness();

    let result = h.service.validate_token("nope", Duration::seconds(60)).await;

    assert!(matches!(result, Err(DesktopTokenError::Expired)));
    assert_eq!(h.runner.pending(), 1);
}

#[tokio::test]
async fn test_validate_returns_user_and_clears_all_user_tokens() {
    let h = harness();
    let alice = register_user(&h.users, "alice");
    let bob = register_user(&h.users, "bob");

    for token in ["first", "second", "bobs"] {
        h.service.create_token(token, 0).await.unwrap();
    }
    let window = Duration::seconds(60);
    h.service.authenticate_token("first", window, &alice).await.unwrap();
    h.service.authenticate_token("second", window, &alice).await.unwrap();
    h.service.authenticate_token("bobs", window, &bob).await.unwrap();

    let user = h.service.validate_token("first", window).await.unwrap();
    assert_eq!(user, alice);
    assert_eq!(h.runner.pending_names(), vec!["delete_user_desktop_tokens"]);

    h.runner.run_pending().await;

    assert!(h.tokens.get("first").await.is_none());
    assert!(h.tokens.get("second").await.is_none());
    assert!(h.tokens.get("bobs").await.is_some());
}

#[tokio::test]
async fn test_validate_unknown_user_fails_and_deletes() {
    let h = harness();
    let ghost = register_user(&h.users, "ghost");

    h.service.create_token("abc", 0).await.unwrap();
    h.service
        .authenticate_token("abc", Duration::seconds(60), &ghost)
        .await
        .unwrap();
    h.users.remove(ghost.id);

    let result = h.service.validate_token("abc", Duration::seconds(60)).await;

    assert!(matches!(
        result,
        Err(DesktopTokenError::UserResolutionFailed { .. })
    ));
    h.runner.run_pending().await;
    assert!(h.tokens.get("abc").await.is_none());
}

#[tokio::test]
async fn test_validate_directory_error_fails_and_deletes() {
    let h = harness();
    let user = register_user(&h.users, "alice");

    h.service.create_token("abc", 0).await.unwrap();
    h.service
        .authenticate_token("abc", Duration::seconds(60), &user)
        .await
        .unwrap();
    h.users.set_failing(true);

    let result = h.service.validate_token("abc", Duration::seconds(60)).await;

    match result {
        Err(DesktopTokenError::UserResolutionFailed { reason }) => {
            assert!(reason.contains("User directory unavailable"));
        }
        other => panic!("expected UserResolutionFailed, got {:?}", other),
    }
    assert_eq!(h.runner.pending_names(), vec!["delete_desktop_token"]);
}

#[tokio::test]
async fn test_validate_store_failure_does_not_schedule_delete() {
    let h = harness();
    h.tokens.set_failing(true);

    let result = h.service.validate_token("abc", Duration::seconds(60)).await;

    assert!(matches!(
        result,
        Err(DesktopTokenError::StoreFailure {
            operation: "validate_token",
            ..
        })
    ));
    assert_eq!(h.runner.pending(), 0);
}

#[tokio::test]
async fn test_failed_background_delete_does_not_surface() {
    let h = harness();

    let result = h.service.validate_token("abc", Duration::seconds(60)).await;
    assert!(matches!(result, Err(DesktopTokenError::Expired)));

    h.tokens.set_failing(true);
    assert_eq!(h.runner.run_pending().await, 1);
}

#[tokio::test]
async fn test_pairing_walkthrough() {
    let h = harness();
    let u1 = register_user(&h.users, "u1");
    let window = Duration::seconds(60);

    h.service.create_token("abc", 0).await.unwrap();

    h.clock.set(30);
    assert!(matches!(
        h.service.validate_token("abc", window).await,
        Err(DesktopTokenError::NotYetAuthenticated)
    ));
    h.service.authenticate_token("abc", window, &u1).await.unwrap();

    h.clock.set(40);
    let user = h.service.validate_token("abc", window).await.unwrap();
    assert_eq!(user.id, u1.id);

    h.runner.run_pending().await;

    h.clock.set(41);
    assert!(matches!(
        h.service.validate_token("abc", window).await,
        Err(DesktopTokenError::Expired)
    ));
}

#[tokio::test]
async fn test_second_validate_before_cleanup_may_succeed() {
    let h = harness();
    let user = register_user(&h.users, "alice");
    let window = Duration::seconds(60);

    h.service.create_token("abc", 0).await.unwrap();
    h.service.authenticate_token("abc", window, &user).await.unwrap();

    h.service.validate_token("abc", window).await.unwrap();
    let again = h.service.validate_token("abc", window).await.unwrap();

    assert_eq!(again.id, user.id);
    assert_eq!(h.runner.pending(), 2);
}

#[tokio::test]
async fn test_token_bound_outside_service_is_resolved() {
    let h = harness();
    let user = register_user(&h.users, "alice");

    let mut record = DesktopToken::new("abc", 0);
    record.user_id = Some(user.id);
    h.tokens.insert(&record).await.unwrap();

    let resolved = h
        .service
        .validate_token("abc", Duration::seconds(60))
        .await
        .unwrap();
    assert_eq!(resolved.id, user.id);
    assert_ne!(resolved.id, Uuid::nil());
}
