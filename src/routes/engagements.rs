use axum::{
    Json, Router,
    extract::State,
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    dto::catalog::UpdateEngagementRequest,
    error::AppResult,
    extract::{ApiJson, ApiPath, ApiQuery},
    middleware::auth::{CustomerAuth, ManagerAuth},
    models::Engagement,
    response::ApiResponse,
    routes::params::Pagination,
    services::engagement_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_engagements))
        .route("/{report_id}", put(track))
}

#[utoipa::path(
    put,
    path = "/api/engagements/{report_id}",
    params(
        ("report_id" = Uuid, Path, description = "Report ID")
    ),
    request_body = UpdateEngagementRequest,
    responses(
        (status = 200, description = "View counted and progress stored", body = ApiResponse<Engagement>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Report not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Engagements"
)]
pub async fn track(
    State(state): State<AppState>,
    customer: CustomerAuth,
    ApiPath(report_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateEngagementRequest>,
) -> AppResult<Json<ApiResponse<Engagement>>> {
    let resp = engagement_service::track(&state, &customer, report_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/engagements",
    params(Pagination),
    responses(
        (status = 200, description = "Engagement records, most recent first", body = ApiResponse<Vec<Engagement>>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Engagements"
)]
pub async fn list_engagements(
    State(state): State<AppState>,
    _staff: ManagerAuth,
    ApiQuery(pagination): ApiQuery<Pagination>,
) -> AppResult<Json<ApiResponse<Vec<Engagement>>>> {
    let resp = engagement_service::list_engagements(&state, pagination).await?;
    Ok(Json(resp))
}
