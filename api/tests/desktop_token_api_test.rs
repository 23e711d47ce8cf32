//! Integration tests for the desktop token endpoints

use std::sync::Arc;

use actix_web::{http::StatusCode, test, web};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use uuid::Uuid;

use dp_api::app::{create_app, AppState};
use dp_core::domain::entities::{SessionClaims, User};
use dp_core::services::{DesktopTokenService, FixedClock, ManualTaskRunner};
use dp_infra::memory::{InMemoryDesktopTokenRepository, InMemoryUserRepository};
use dp_shared::config::{CorsConfig, DesktopTokenConfig, JwtConfig};
use dp_shared::errors::error_codes;

const SECRET: &str = "integration-test-secret";
const START: i64 = 1_700_000_000;

struct Fixture {
    state: web::Data<AppState<InMemoryDesktopTokenRepository, InMemoryUserRepository>>,
    tokens: Arc<InMemoryDesktopTokenRepository>,
    users: Arc<InMemoryUserRepository>,
    runner: Arc<ManualTaskRunner>,
    clock: Arc<FixedClock>,
}

impl Fixture {
    fn new() -> Self {
        let tokens = Arc::new(InMemoryDesktopTokenRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let runner = Arc::new(ManualTaskRunner::new());
        let clock = Arc::new(FixedClock::new(START));

        let service = Arc::new(
            DesktopTokenService::new(tokens.clone(), users.clone(), runner.clone())
                .with_clock(clock.clone()),
        );
        let config = DesktopTokenConfig {
            ttl_seconds: 60,
            ..DesktopTokenConfig::default()
        };
        let state = web::Data::new(AppState::new(service, users.clone(), config));

        Self {
            state,
            tokens,
            users,
            runner,
            clock,
        }
    }

    async fn add_user(&self, username: &str) -> User {
        let user = User::new(username, format!("{}@example.com", username));
        self.users.upsert(user.clone()).await;
        user
    }
}

macro_rules! init_app {
    ($fixture:expr) => {
        test::init_service(create_app(
            $fixture.state.clone(),
            JwtConfig::new(SECRET),
            &CorsConfig::development(),
            64 * 1024,
        ))
        .await
    };
}

fn session_for(user_id: Uuid) -> String {
    let now = chrono::Utc::now().timestamp();
    let token = encode(
        &Header::new(Algorithm::HS256),
        &SessionClaims::new(user_id, now, 3600),
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();
    format!("Bearer {}", token)
}

#[actix_web::test]
async fn test_create_token() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);

    let req = test::TestRequest::post()
        .uri("/api/v1/desktop-tokens")
        .set_json(json!({ "token": "abc" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["token"], "abc");
    assert_eq!(body["created_at"], START);
    assert!(fixture.tokens.get("abc").await.is_some());
}

#[actix_web::test]
async fn test_create_duplicate_token_conflicts() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);

    for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
        let req = test::TestRequest::post()
            .uri("/api/v1/desktop-tokens")
            .set_json(json!({ "token": "abc" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected);

        if expected == StatusCode::CONFLICT {
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], error_codes::TOKEN_COLLISION);
        }
    }
}

#[actix_web::test]
async fn test_create_rejects_invalid_body() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);

    let req = test::TestRequest::post()
        .uri("/api/v1/desktop-tokens")
        .set_json(json!({ "token": "x".repeat(65) }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], error_codes::VALIDATION_ERROR);

    let req = test::TestRequest::post()
        .uri("/api/v1/desktop-tokens")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_authenticate_requires_session() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);

    let req = test::TestRequest::post()
        .uri("/api/v1/desktop-tokens/authenticate")
        .set_json(json!({ "token": "abc" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], error_codes::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_authenticate_unknown_session_user() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);
    fixture.tokens_insert("abc").await;

    let req = test::TestRequest::post()
        .uri("/api/v1/desktop-tokens/authenticate")
        .insert_header(("Authorization", session_for(Uuid::new_v4())))
        .set_json(json!({ "token": "abc" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(fixture.tokens.get("abc").await.unwrap().user_id.is_none());
}

#[actix_web::test]
async fn test_authenticate_expired_token() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);
    let user = fixture.add_user("alice").await;
    fixture.tokens_insert("abc").await;

    fixture.clock.advance(61);

    let req = test::TestRequest::post()
        .uri("/api/v1/desktop-tokens/authenticate")
        .insert_header(("Authorization", session_for(user.id)))
        .set_json(json!({ "token": "abc" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], error_codes::TOKEN_INVALID_OR_EXPIRED);

    fixture.runner.run_pending().await;
    assert!(fixture.tokens.get("abc").await.is_none());
}

#[actix_web::test]
async fn test_full_pairing_flow() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);
    let user = fixture.add_user("alice").await;

    let req = test::TestRequest::post()
        .uri("/api/v1/desktop-tokens")
        .set_json(json!({ "token": "abc" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    // Desktop polls before the browser approves
    fixture.clock.advance(30);
    let req = test::TestRequest::post()
        .uri("/api/v1/desktop-tokens/validate")
        .set_json(json!({ "token": "abc" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], error_codes::TOKEN_NOT_AUTHENTICATED);

    let req = test::TestRequest::post()
        .uri("/api/v1/desktop-tokens/authenticate")
        .insert_header(("Authorization", session_for(user.id)))
        .set_json(json!({ "token": "abc" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    fixture.clock.advance(10);
    let req = test::TestRequest::post()
        .uri("/api/v1/desktop-tokens/validate")
        .set_json(json!({ "token": "abc" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["id"], user.id.to_string());
    assert_eq!(body["user"]["username"], "alice");

    fixture.runner.run_pending().await;

    fixture.clock.advance(1);
    let req = test::TestRequest::post()
        .uri("/api/v1/desktop-tokens/validate")
        .set_json(json!({ "token": "abc" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], error_codes::TOKEN_EXPIRED);
}

#[actix_web::test]
async fn test_validate_unknown_user_is_internal_error() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);
    let user = fixture.add_user("ghost").await;
    fixture.tokens_insert("abc").await;

    let req = test::TestRequest::post()
        .uri("/api/v1/desktop-tokens/authenticate")
        .insert_header(("Authorization", session_for(user.id)))
        .set_json(json!({ "token": "abc" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    fixture.users.remove(user.id).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/desktop-tokens/validate")
        .set_json(json!({ "token": "abc" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], error_codes::USER_RESOLUTION_FAILED);
}

#[actix_web::test]
async fn test_errors_are_localized() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);

    let req = test::TestRequest::post()
        .uri("/api/v1/desktop-tokens/validate")
        .insert_header(("Accept-Language", "zh-CN,zh;q=0.9"))
        .set_json(json!({ "token": "missing" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "桌面令牌已过期");
}

#[actix_web::test]
async fn test_health_and_not_found() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["token_store"]["status"], "healthy");

    let req = test::TestRequest::get().uri("/api/v1/nothing").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

impl Fixture {
    async fn tokens_insert(&self, token: &str) {
        use dp_core::repositories::DesktopTokenRepository;
        use dp_core::domain::entities::DesktopToken;

        self.tokens
            .insert(&DesktopToken::new(token, self.clock_now()))
            .await
            .unwrap();
    }

    fn clock_now(&self) -> i64 {
        use dp_core::services::Clock;
        self.clock.now()
    }
}
