// These requests are all rejected before any query runs, so a disconnected
// database is enough.
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use globelens_api::{app::build_router, config::AppConfig, state::AppState};
use sea_orm::DatabaseConnection;
use tower::ServiceExt;
use uuid::Uuid;

fn app() -> (Router, AppState) {
    let config = AppConfig::from_lookup(|key| match key {
        "JWT_SECRET" => Some("test-secret".to_string()),
        "PAYPAL_CLIENT_ID" => Some("client".to_string()),
        "PAYPAL_SECRET_KEY" => Some("secret".to_string()),
        _ => None,
    })
    .expect("config");
    let state = AppState::new(DatabaseConnection::Disconnected, config);
    (build_router(state.clone()), state)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn customer_route_requires_token() {
    let (app, _) = app();
    let (status, body) = send(
        app,
        Request::get("/api/auth/me").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Authentication required");
    assert_eq!(body["data"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn staff_route_rejects_garbage_token() {
    let (app, _) = app();
    let (status, body) = send(
        app,
        Request::get("/api/manager/team")
            .header(header::AUTHORIZATION, "Bearer not-a-jwt")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid or expired token");
}

#[tokio::test]
async fn reset_token_cannot_authenticate() {
    let (app, state) = app();
    let token = state.tokens.issue_reset(Uuid::new_v4(), None).unwrap();
    let (status, _) = send(
        app,
        Request::get("/api/purchased-reports")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn payment_without_gateway_data_is_rejected() {
    let (app, _) = app();
    let payload = serde_json::json!({
        "formData": { "fullName": "Jane Doe", "email": "jane@example.com" },
        "reportId": Uuid::new_v4().to_string()
    });
    let (status, body) = send(
        app,
        Request::post("/api/payment-success")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid payment data");
}

#[tokio::test]
async fn unknown_path_uses_envelope() {
    let (app, _) = app();
    let (status, body) = send(
        app,
        Request::get("/api/nope").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Not Found");
    assert_eq!(body["data"]["path"], "/api/nope");
}
