use axum::{
    Json, Router,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
    routing::{get, patch, post, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        auth::{ForgotPasswordRequest, ForgotPasswordResponse, ResetPasswordRequest},
        manager::{
            BulkActionRequest, BulkActionResult, CreateUserRequest, ManagerAuthResponse,
            ManagerLoginRequest, ManagerProfileForm, ManagerRegisterForm, UpdateRoleRequest,
            UpdateUserStatusRequest,
        },
    },
    error::AppResult,
    extract::{ApiJson, ApiPath, ApiQuery},
    middleware::auth::ManagerAuth,
    models::{AuditLog, Manager, User},
    response::ApiResponse,
    routes::{params::AuditLogQuery, read_form},
    services::manager_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/profile", get(profile).put(update_profile))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .route("/team", get(list_team))
        .route("/team/{id}/role", patch(update_team_role))
        .route("/users", get(list_users).post(create_user))
        .route("/users/bulk-action", post(bulk_action))
        .route("/users/{user_id}/status", put(update_user_status))
        .route("/users/{user_id}", axum::routing::delete(delete_user))
        .route("/audit-logs", get(list_audit_logs))
}

#[utoipa::path(
    post,
    path = "/api/manager/register",
    request_body(content = ManagerRegisterForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Staff account created with the employee role", body = ApiResponse<ManagerAuthResponse>),
        (status = 400, description = "Missing fields or manager already exists"),
    ),
    tag = "Manager"
)]
pub async fn register(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<ManagerAuthResponse>>)> {
    let form = read_form(&state, multipart).await?;
    let resp = manager_service::register(&state, form).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/manager/login",
    request_body = ManagerLoginRequest,
    responses(
        (status = 200, description = "Signed in", body = ApiResponse<ManagerAuthResponse>),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "Manager"
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ManagerLoginRequest>,
) -> AppResult<Json<ApiResponse<ManagerAuthResponse>>> {
    let resp = manager_service::login(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/manager/profile",
    responses(
        (status = 200, description = "Current staff member", body = ApiResponse<Manager>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Manager"
)]
pub async fn profile(
    State(state): State<AppState>,
    staff: ManagerAuth,
) -> AppResult<Json<ApiResponse<Manager>>> {
    let resp = manager_service::profile(&state, &staff).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/manager/profile",
    request_body(content = ManagerProfileForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<Manager>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Manager"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    staff: ManagerAuth,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<ApiResponse<Manager>>> {
    let form = read_form(&state, multipart).await?;
    let resp = manager_service::update_profile(&state, &staff, form).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/manager/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Same response whether or not the account exists", body = ApiResponse<ForgotPasswordResponse>),
    ),
    tag = "Manager"
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ForgotPasswordRequest>,
) -> AppResult<Json<ApiResponse<ForgotPasswordResponse>>> {
    let resp = manager_service::forgot_password(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/manager/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset"),
        (status = 401, description = "Invalid or expired token"),
    ),
    tag = "Manager"
)]
pub async fn reset_password(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ResetPasswordRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = manager_service::reset_password(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/manager/team",
    responses(
        (status = 200, description = "All staff members", body = ApiResponse<Vec<Manager>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Manager role required"),
    ),
    security(("bearer_auth" = [])),
    tag = "Manager"
)]
pub async fn list_team(
    State(state): State<AppState>,
    staff: ManagerAuth,
) -> AppResult<Json<ApiResponse<Vec<Manager>>>> {
    let resp = manager_service::list_team(&state, &staff).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/manager/team/{id}/role",
    params(
        ("id" = Uuid, Path, description = "Staff member ID")
    ),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = ApiResponse<Manager>),
        (status = 400, description = "Invalid role specified"),
        (status = 403, description = "Manager role required"),
        (status = 404, description = "Team member not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Manager"
)]
pub async fn update_team_role(
    State(state): State<AppState>,
    staff: ManagerAuth,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateRoleRequest>,
) -> AppResult<Json<ApiResponse<Manager>>> {
    let resp = manager_service::update_team_role(&state, &staff, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/manager/users",
    responses(
        (status = 200, description = "All customer accounts", body = ApiResponse<Vec<User>>),
        (status = 403, description = "Manager role required"),
    ),
    security(("bearer_auth" = [])),
    tag = "Manager"
)]
pub async fn list_users(
    State(state): State<AppState>,
    staff: ManagerAuth,
) -> AppResult<Json<ApiResponse<Vec<User>>>> {
    let resp = manager_service::list_users(&state, &staff).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/manager/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Customer created", body = ApiResponse<User>),
        (status = 400, description = "Invalid input or email already registered"),
        (status = 403, description = "Manager role required"),
    ),
    security(("bearer_auth" = [])),
    tag = "Manager"
)]
pub async fn create_user(
    State(state): State<AppState>,
    staff: ManagerAuth,
    ApiJson(payload): ApiJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    let resp = manager_service::create_user(&state, &staff, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/manager/users/{user_id}/status",
    params(
        ("user_id" = Uuid, Path, description = "Customer ID")
    ),
    request_body = UpdateUserStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<User>),
        (status = 403, description = "Manager role required"),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Manager"
)]
pub async fn update_user_status(
    State(state): State<AppState>,
    staff: ManagerAuth,
    ApiPath(user_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateUserStatusRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = manager_service::update_user_status(&state, &staff, user_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/manager/users/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "Customer ID")
    ),
    responses(
        (status = 200, description = "User deleted"),
        (status = 403, description = "Manager role required"),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Manager"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    staff: ManagerAuth,
    ApiPath(user_id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = manager_service::delete_user(&state, &staff, user_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/manager/users/bulk-action",
    request_body = BulkActionRequest,
    responses(
        (status = 200, description = "Bulk action applied", body = ApiResponse<BulkActionResult>),
        (status = 400, description = "No users selected"),
        (status = 403, description = "Manager role required"),
    ),
    security(("bearer_auth" = [])),
    tag = "Manager"
)]
pub async fn bulk_action(
    State(state): State<AppState>,
    staff: ManagerAuth,
    ApiJson(payload): ApiJson<BulkActionRequest>,
) -> AppResult<Json<ApiResponse<BulkActionResult>>> {
    let resp = manager_service::bulk_action(&state, &staff, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/manager/audit-logs",
    params(AuditLogQuery),
    responses(
        (status = 200, description = "Audit trail, newest first", body = ApiResponse<Vec<AuditLog>>),
        (status = 403, description = "Manager role required"),
    ),
    security(("bearer_auth" = [])),
    tag = "Manager"
)]
pub async fn list_audit_logs(
    State(state): State<AppState>,
    staff: ManagerAuth,
    ApiQuery(query): ApiQuery<AuditLogQuery>,
) -> AppResult<Json<ApiResponse<Vec<AuditLog>>>> {
    let resp = manager_service::list_audit_logs(&state, &staff, query).await?;
    Ok(Json(resp))
}
