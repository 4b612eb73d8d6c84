use axum::{
    Json, Router,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
    response::Response,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::reports::{ReportForm, ReportPreview},
    error::AppResult,
    extract::{ApiPath, ApiQuery},
    middleware::auth::ManagerAuth,
    models::Report,
    response::ApiResponse,
    routes::{params::ReportListQuery, read_form},
    services::report_service,
    state::AppState,
    upload::Disposition,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reports).post(create_report))
        .route("/industry/{industry}", get(list_by_industry))
        .route(
            "/{id}",
            get(get_report).put(update_report).delete(delete_report),
        )
        .route("/{id}/thumbnail", get(thumbnail))
        .route("/{id}/download", get(download))
        .route("/{id}/sample-pdf", get(sample_pdf))
        .route("/{id}/view", get(view))
        .route("/{id}/preview", get(preview))
}

#[utoipa::path(
    get,
    path = "/api/reports",
    params(ReportListQuery),
    responses(
        (status = 200, description = "Report catalog without binary payloads", body = ApiResponse<Vec<Report>>),
        (status = 400, description = "Invalid filter"),
    ),
    tag = "Reports"
)]
pub async fn list_reports(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ReportListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Report>>>> {
    let resp = report_service::list_reports(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/reports/industry/{industry}",
    params(
        ("industry" = String, Path, description = "Exact industry name")
    ),
    responses(
        (status = 200, description = "Reports in the industry", body = ApiResponse<Vec<Report>>),
        (status = 404, description = "No reports found for the specified industry"),
    ),
    tag = "Reports"
)]
pub async fn list_by_industry(
    State(state): State<AppState>,
    ApiPath(industry): ApiPath<String>,
) -> AppResult<Json<ApiResponse<Vec<Report>>>> {
    let resp = report_service::list_by_industry(&state, industry).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report metadata", body = ApiResponse<Report>),
        (status = 404, description = "Report not found"),
    ),
    tag = "Reports"
)]
pub async fn get_report(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<Report>>> {
    let resp = report_service::get_report(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/reports",
    request_body(content = ReportForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Report created", body = ApiResponse<Report>),
        (status = 400, description = "Missing fields or no PDF file uploaded"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
pub async fn create_report(
    State(state): State<AppState>,
    staff: ManagerAuth,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<Report>>)> {
    let form = read_form(&state, multipart).await?;
    let resp = report_service::create_report(&state, &staff, form).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/reports/{id}",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    request_body(content = ReportForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Report updated", body = ApiResponse<Report>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Report not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
pub async fn update_report(
    State(state): State<AppState>,
    staff: ManagerAuth,
    ApiPath(id): ApiPath<Uuid>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<ApiResponse<Report>>> {
    let form = read_form(&state, multipart).await?;
    let resp = report_service::update_report(&state, &staff, id, form).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/reports/{id}",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Report not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
pub async fn delete_report(
    State(state): State<AppState>,
    staff: ManagerAuth,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = report_service::delete_report(&state, &staff, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/reports/{id}/thumbnail",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Thumbnail image bytes", content_type = "image/*"),
        (status = 404, description = "Thumbnail not found"),
    ),
    tag = "Reports"
)]
pub async fn thumbnail(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Response> {
    let asset = report_service::thumbnail(&state, id).await?;
    Ok(asset.into_download(Disposition::None))
}

#[utoipa::path(
    get,
    path = "/api/reports/{id}/download",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report PDF as an attachment", content_type = "application/pdf"),
        (status = 404, description = "Report not found"),
    ),
    tag = "Reports"
)]
pub async fn download(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Response> {
    let (asset, name) = report_service::document(&state, id).await?;
    Ok(asset.into_download(Disposition::Attachment(format!("{name}.pdf"))))
}

#[utoipa::path(
    get,
    path = "/api/reports/{id}/sample-pdf",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Sample PDF as an attachment", content_type = "application/pdf"),
        (status = 404, description = "Sample PDF not found"),
    ),
    tag = "Reports"
)]
pub async fn sample_pdf(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Response> {
    let (asset, name) = report_service::sample_pdf(&state, id).await?;
    Ok(asset.into_download(Disposition::Attachment(format!("sample-{name}.pdf"))))
}

#[utoipa::path(
    get,
    path = "/api/reports/{id}/view",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report PDF for inline display", content_type = "application/pdf"),
        (status = 404, description = "Report not found"),
    ),
    tag = "Reports"
)]
pub async fn view(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Response> {
    let (asset, _) = report_service::document(&state, id).await?;
    Ok(asset.into_download(Disposition::Inline))
}

#[utoipa::path(
    get,
    path = "/api/reports/{id}/preview",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Sectioned text preview", body = ApiResponse<ReportPreview>),
        (status = 404, description = "Report not found"),
    ),
    tag = "Reports"
)]
pub async fn preview(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<ReportPreview>>> {
    let resp = report_service::preview(&state, id).await?;
    Ok(Json(resp))
}
