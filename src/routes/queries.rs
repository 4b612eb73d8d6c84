use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::queries::{CreateQueryRequest, QueryWithUser, RespondQueryRequest, UpdateQueryStatusRequest},
    error::AppResult,
    extract::{ApiJson, ApiPath, ApiQuery},
    middleware::auth::{CustomerAuth, ManagerAuth},
    models::CustomerQuery,
    response::ApiResponse,
    routes::params::Pagination,
    services::query_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_query))
        .route("/user", get(user_queries))
        .route("/all", get(all_queries))
        .route("/{id}/status", patch(update_status))
        .route("/{id}/respond", post(respond))
        .route("/{id}", delete(delete_query))
}

#[utoipa::path(
    post,
    path = "/api/queries",
    request_body = CreateQueryRequest,
    responses(
        (status = 201, description = "Query submitted", body = ApiResponse<CustomerQuery>),
        (status = 400, description = "Missing subject or message"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Queries"
)]
pub async fn create_query(
    State(state): State<AppState>,
    customer: CustomerAuth,
    ApiJson(payload): ApiJson<CreateQueryRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CustomerQuery>>)> {
    let resp = query_service::create_query(&state, &customer, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/queries/user",
    responses(
        (status = 200, description = "Caller's queries, newest first", body = ApiResponse<Vec<CustomerQuery>>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Queries"
)]
pub async fn user_queries(
    State(state): State<AppState>,
    customer: CustomerAuth,
) -> AppResult<Json<ApiResponse<Vec<CustomerQuery>>>> {
    let resp = query_service::user_queries(&state, &customer).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/queries/all",
    params(Pagination),
    responses(
        (status = 200, description = "All queries with the asking customer", body = ApiResponse<Vec<QueryWithUser>>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Queries"
)]
pub async fn all_queries(
    State(state): State<AppState>,
    _staff: ManagerAuth,
    ApiQuery(pagination): ApiQuery<Pagination>,
) -> AppResult<Json<ApiResponse<Vec<QueryWithUser>>>> {
    let resp = query_service::all_queries(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/queries/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Query ID")
    ),
    request_body = UpdateQueryStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<CustomerQuery>),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Query not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Queries"
)]
pub async fn update_status(
    State(state): State<AppState>,
    staff: ManagerAuth,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateQueryStatusRequest>,
) -> AppResult<Json<ApiResponse<CustomerQuery>>> {
    let resp = query_service::update_status(&state, &staff, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/queries/{id}/respond",
    params(
        ("id" = Uuid, Path, description = "Query ID")
    ),
    request_body = RespondQueryRequest,
    responses(
        (status = 200, description = "Response attached and status set to in-progress", body = ApiResponse<CustomerQuery>),
        (status = 400, description = "Response is required"),
        (status = 404, description = "Query not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Queries"
)]
pub async fn respond(
    State(state): State<AppState>,
    staff: ManagerAuth,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<RespondQueryRequest>,
) -> AppResult<Json<ApiResponse<CustomerQuery>>> {
    let resp = query_service::respond(&state, &staff, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/queries/{id}",
    params(
        ("id" = Uuid, Path, description = "Query ID")
    ),
    responses(
        (status = 200, description = "Query deleted"),
        (status = 404, description = "Query not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Queries"
)]
pub async fn delete_query(
    State(state): State<AppState>,
    staff: ManagerAuth,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = query_service::delete_query(&state, &staff, id).await?;
    Ok(Json(resp))
}
