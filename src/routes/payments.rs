use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::payments::{
        AccessGrant, PaymentDetailView, PaymentSuccessRequest, PaymentSuccessResponse,
        PurchasedReport, UserReportView,
    },
    error::AppResult,
    extract::{ApiJson, ApiPath, ApiQuery},
    middleware::auth::{CustomerAuth, ManagerAuth},
    response::ApiResponse,
    routes::params::Pagination,
    services::payment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/payment-success", post(payment_success))
        .route("/purchased-reports", get(purchased_reports))
        .route("/verify-access/{report_id}", get(verify_access))
        .route("/payment-details", get(payment_details))
        .route("/user-reports", get(user_reports))
}

#[utoipa::path(
    post,
    path = "/api/payment-success",
    request_body = PaymentSuccessRequest,
    responses(
        (status = 200, description = "Payment recorded and access granted. Credentials appear only for newly provisioned accounts", body = ApiResponse<PaymentSuccessResponse>),
        (status = 400, description = "Invalid payment data or payment not completed"),
        (status = 404, description = "Report not found"),
        (status = 502, description = "Payment gateway unavailable"),
    ),
    tag = "Payments"
)]
pub async fn payment_success(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<PaymentSuccessRequest>,
) -> AppResult<Json<ApiResponse<PaymentSuccessResponse>>> {
    let resp = payment_service::payment_success(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/purchased-reports",
    responses(
        (status = 200, description = "Accessible purchases, newest first", body = ApiResponse<Vec<PurchasedReport>>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn purchased_reports(
    State(state): State<AppState>,
    customer: CustomerAuth,
) -> AppResult<Json<ApiResponse<Vec<PurchasedReport>>>> {
    let resp = payment_service::purchased_reports(&state, &customer).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/verify-access/{report_id}",
    params(
        ("report_id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Access counted", body = ApiResponse<AccessGrant>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn verify_access(
    State(state): State<AppState>,
    customer: CustomerAuth,
    ApiPath(report_id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<AccessGrant>>> {
    let resp = payment_service::verify_access(&state, &customer, report_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/payment-details",
    params(Pagination),
    responses(
        (status = 200, description = "Payment records with buyer and report summaries", body = ApiResponse<Vec<PaymentDetailView>>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn payment_details(
    State(state): State<AppState>,
    _staff: ManagerAuth,
    ApiQuery(pagination): ApiQuery<Pagination>,
) -> AppResult<Json<ApiResponse<Vec<PaymentDetailView>>>> {
    let resp = payment_service::payment_details(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/user-reports",
    params(Pagination),
    responses(
        (status = 200, description = "Entitlements with buyer and report summaries", body = ApiResponse<Vec<UserReportView>>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn user_reports(
    State(state): State<AppState>,
    _staff: ManagerAuth,
    ApiQuery(pagination): ApiQuery<Pagination>,
) -> AppResult<Json<ApiResponse<Vec<UserReportView>>>> {
    let resp = payment_service::user_reports(&state, pagination).await?;
    Ok(Json(resp))
}
