use axum::{Json, Router, extract::State, http::StatusCode, routing::get};

use crate::{
    dto::content::CreatePotentialCustomerRequest,
    error::AppResult,
    extract::ApiJson,
    middleware::auth::ManagerAuth,
    models::PotentialCustomer,
    response::ApiResponse,
    services::lead_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_leads).post(create_lead))
}

#[utoipa::path(
    post,
    path = "/api/potential-customers",
    request_body = CreatePotentialCustomerRequest,
    responses(
        (status = 201, description = "Lead saved", body = ApiResponse<PotentialCustomer>),
        (status = 400, description = "All fields are required"),
    ),
    tag = "Leads"
)]
pub async fn create_lead(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreatePotentialCustomerRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<PotentialCustomer>>)> {
    let resp = lead_service::create_lead(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/potential-customers",
    responses(
        (status = 200, description = "Leads, newest first", body = ApiResponse<Vec<PotentialCustomer>>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Leads"
)]
pub async fn list_leads(
    State(state): State<AppState>,
    _staff: ManagerAuth,
) -> AppResult<Json<ApiResponse<Vec<PotentialCustomer>>>> {
    let resp = lead_service::list_leads(&state).await?;
    Ok(Json(resp))
}
