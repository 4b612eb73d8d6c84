use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use globelens_api::{app::build_router, config::AppConfig, state::AppState};
use sea_orm::DatabaseConnection;
use tower::ServiceExt;

fn test_state(mode: &str) -> AppState {
    let mode = mode.to_string();
    let config = AppConfig::from_lookup(move |key| match key {
        "JWT_SECRET" => Some("test-secret".to_string()),
        "PAYPAL_CLIENT_ID" => Some("client".to_string()),
        "PAYPAL_SECRET_KEY" => Some("secret".to_string()),
        "PAYPAL_MODE" => Some(mode.clone()),
        _ => None,
    })
    .expect("config");
    AppState::new(DatabaseConnection::Disconnected, config)
}

#[tokio::test]
async fn health_check_reports_payment_mode() {
    let app = build_router(test_state("live"));

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Health check");
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["paymentMode"], "live");
}
