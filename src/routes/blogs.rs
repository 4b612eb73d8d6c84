use axum::{
    Json, Router,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
    response::Response,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::content::BlogForm,
    error::AppResult,
    extract::{ApiPath, ApiQuery},
    middleware::auth::ManagerAuth,
    models::Blog,
    response::ApiResponse,
    routes::{params::Pagination, read_form},
    services::blog_service,
    state::AppState,
    upload::Disposition,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_blogs).post(create_blog))
        .route("/{id}", get(get_blog).put(update_blog).delete(delete_blog))
        .route("/{id}/thumbnail", get(thumbnail))
}

#[utoipa::path(
    get,
    path = "/api/blogs",
    params(Pagination),
    responses(
        (status = 200, description = "Published posts, newest first", body = ApiResponse<Vec<Blog>>),
    ),
    tag = "Blogs"
)]
pub async fn list_blogs(
    State(state): State<AppState>,
    ApiQuery(pagination): ApiQuery<Pagination>,
) -> AppResult<Json<ApiResponse<Vec<Blog>>>> {
    let resp = blog_service::list_blogs(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/blogs/{id}",
    params(
        ("id" = Uuid, Path, description = "Blog ID")
    ),
    responses(
        (status = 200, description = "Blog post", body = ApiResponse<Blog>),
        (status = 404, description = "Blog not found"),
    ),
    tag = "Blogs"
)]
pub async fn get_blog(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<Blog>>> {
    let resp = blog_service::get_blog(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/blogs/{id}/thumbnail",
    params(
        ("id" = Uuid, Path, description = "Blog ID")
    ),
    responses(
        (status = 200, description = "Thumbnail image bytes", content_type = "image/*"),
        (status = 404, description = "Blog not found"),
    ),
    tag = "Blogs"
)]
pub async fn thumbnail(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Response> {
    let asset = blog_service::thumbnail(&state, id).await?;
    Ok(asset.into_download(Disposition::None))
}

#[utoipa::path(
    post,
    path = "/api/blogs",
    request_body(content = BlogForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Blog created", body = ApiResponse<Blog>),
        (status = 400, description = "Missing fields or malformed author/content"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Blogs"
)]
pub async fn create_blog(
    State(state): State<AppState>,
    staff: ManagerAuth,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<Blog>>)> {
    let form = read_form(&state, multipart).await?;
    let resp = blog_service::create_blog(&state, &staff, form).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/blogs/{id}",
    params(
        ("id" = Uuid, Path, description = "Blog ID")
    ),
    request_body(content = BlogForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Blog updated", body = ApiResponse<Blog>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Blog not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Blogs"
)]
pub async fn update_blog(
    State(state): State<AppState>,
    staff: ManagerAuth,
    ApiPath(id): ApiPath<Uuid>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<ApiResponse<Blog>>> {
    let form = read_form(&state, multipart).await?;
    let resp = blog_service::update_blog(&state, &staff, id, form).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/blogs/{id}",
    params(
        ("id" = Uuid, Path, description = "Blog ID")
    ),
    responses(
        (status = 200, description = "Blog deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Blog not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Blogs"
)]
pub async fn delete_blog(
    State(state): State<AppState>,
    staff: ManagerAuth,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = blog_service::delete_blog(&state, &staff, id).await?;
    Ok(Json(resp))
}
