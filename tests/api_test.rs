use std::env;
use std::sync::Once;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::from_fn,
    routing::get,
    Router,
};
use tower::ServiceExt;
use uuid::Uuid;

static INIT: Once = Once::new();

fn init_test_config() {
    INIT.call_once(|| {
        env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
        env::set_var("DATABASE_URL", "postgres://localhost:5432/tuition_test");
        env::set_var("JWT_SECRET", "test_secret_key");
        env::set_var("PUBLIC_RPS", "100");
        env::set_var("ADMIN_RPS", "100");
        tuition_backend::config::init_config().expect("init config");
    });
}

fn admin_router() -> Router {
    Router::new()
        .route("/guarded", get(|| async { "ok" }))
        .layer(from_fn(tuition_backend::middleware::auth::require_admin))
}

#[tokio::test]
async fn health_returns_ok() {
    init_test_config();
    let app = Router::new().route("/health", get(tuition_backend::routes::health::health));
    let resp = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn admin_routes_reject_missing_token() {
    init_test_config();
    let resp = admin_router()
        .oneshot(
            Request::builder()
                .uri("/guarded")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_reject_teacher_tokens() {
    init_test_config();
    let token =
        tuition_backend::utils::token::issue_token(Uuid::new_v4(), "teacher", 1).unwrap();
    let resp = admin_router()
        .oneshot(
            Request::builder()
                .uri("/guarded")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_routes_accept_admin_tokens() {
    init_test_config();
    let token = tuition_backend::utils::token::issue_token(Uuid::new_v4(), "admin", 1).unwrap();
    let resp = admin_router()
        .oneshot(
            Request::builder()
                .uri("/guarded")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn garbage_bearer_tokens_are_rejected() {
    init_test_config();
    let resp = admin_router()
        .oneshot(
            Request::builder()
                .uri("/guarded")
                .header("authorization", "Bearer not.a.jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
