use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::leaves::{CreateLeaveRequest, UpdateLeaveStatusRequest},
    error::AppResult,
    extract::{ApiJson, ApiPath},
    middleware::auth::ManagerAuth,
    models::Leave,
    response::ApiResponse,
    services::leave_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(all_leaves).post(apply))
        .route("/employee/{employee_id}", get(employee_leaves))
        .route("/{leave_id}/status", patch(update_status))
}

#[utoipa::path(
    post,
    path = "/api/leaves",
    request_body = CreateLeaveRequest,
    responses(
        (status = 201, description = "Leave requested for the caller", body = ApiResponse<Leave>),
        (status = 400, description = "Missing reason or toDate before fromDate"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Leaves"
)]
pub async fn apply(
    State(state): State<AppState>,
    staff: ManagerAuth,
    ApiJson(payload): ApiJson<CreateLeaveRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Leave>>)> {
    let resp = leave_service::apply(&state, &staff, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/leaves/employee/{employee_id}",
    params(
        ("employee_id" = Uuid, Path, description = "Staff member ID")
    ),
    responses(
        (status = 200, description = "Leave history of one staff member", body = ApiResponse<Vec<Leave>>),
        (status = 403, description = "Manager role required for other members"),
    ),
    security(("bearer_auth" = [])),
    tag = "Leaves"
)]
pub async fn employee_leaves(
    State(state): State<AppState>,
    staff: ManagerAuth,
    ApiPath(employee_id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<Leave>>>> {
    let resp = leave_service::employee_leaves(&state, &staff, employee_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/leaves",
    responses(
        (status = 200, description = "All leave requests", body = ApiResponse<Vec<Leave>>),
        (status = 403, description = "Manager role required"),
    ),
    security(("bearer_auth" = [])),
    tag = "Leaves"
)]
pub async fn all_leaves(
    State(state): State<AppState>,
    staff: ManagerAuth,
) -> AppResult<Json<ApiResponse<Vec<Leave>>>> {
    let resp = leave_service::all_leaves(&state, &staff).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/leaves/{leave_id}/status",
    params(
        ("leave_id" = Uuid, Path, description = "Leave ID")
    ),
    request_body = UpdateLeaveStatusRequest,
    responses(
        (status = 200, description = "Leave approved or denied", body = ApiResponse<Leave>),
        (status = 400, description = "Invalid status"),
        (status = 403, description = "Manager role required"),
        (status = 404, description = "Leave not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Leaves"
)]
pub async fn update_status(
    State(state): State<AppState>,
    staff: ManagerAuth,
    ApiPath(leave_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateLeaveStatusRequest>,
) -> AppResult<Json<ApiResponse<Leave>>> {
    let resp = leave_service::update_status(&state, &staff, leave_id, payload).await?;
    Ok(Json(resp))
}
