use axum::{
    Router,
    extract::{Multipart, multipart::MultipartRejection},
};

use crate::{error::AppResult, state::AppState, upload::MultipartForm};

pub mod addresses;
pub mod auth;
pub mod blogs;
pub mod categories;
pub mod doc;
pub mod engagements;
pub mod health;
pub mod leads;
pub mod leaves;
pub mod manager;
pub mod params;
pub mod payments;
pub mod queries;
pub mod reports;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/manager", manager::router())
        .nest("/reports", reports::router())
        .nest("/queries", queries::router())
        .nest("/blogs", blogs::router())
        .nest("/leaves", leaves::router())
        .nest("/potential-customers", leads::router())
        .nest("/categories", categories::router())
        .nest("/addresses", addresses::router())
        .nest("/engagements", engagements::router())
        .merge(payments::router())
}

/// Buffers a multipart body using the configured per-file size limit.
pub(crate) async fn read_form(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<MultipartForm> {
    MultipartForm::read(multipart?, state.config.max_upload_bytes).await
}
