use axum::{
    Json, Router,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
    routing::{get, post, put},
};

use crate::{
    dto::auth::{
        AuthResponse, ChangePasswordRequest, FacebookSignInRequest, ForgotPasswordRequest,
        ForgotPasswordResponse, GoogleSignInRequest, PhotoForm, ResetPasswordRequest,
        SigninRequest, SignupForm, UpdateProfileRequest,
    },
    error::AppResult,
    extract::ApiJson,
    middleware::auth::CustomerAuth,
    models::User,
    response::ApiResponse,
    routes::read_form,
    services::{auth_service, social_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/update-profile", put(update_profile))
        .route("/update-photo", post(update_photo))
        .route("/change-password", put(change_password))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .route("/google", post(google))
        .route("/facebook", post(facebook))
}

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body(content = SignupForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Account created", body = ApiResponse<AuthResponse>),
        (status = 400, description = "Missing fields or email already registered"),
    ),
    tag = "Auth"
)]
pub async fn signup(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthResponse>>)> {
    let form = read_form(&state, multipart).await?;
    let resp = auth_service::signup(&state, form).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/auth/signin",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Signed in", body = ApiResponse<AuthResponse>),
        (status = 401, description = "Invalid email or password"),
        (status = 403, description = "Account is deactivated"),
    ),
    tag = "Auth"
)]
pub async fn signin(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SigninRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    let resp = auth_service::signin(&state, payload).await?;
    Ok(Json(resp))
}

/// Tokens are stateless; the client discards its copy.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn logout(customer: CustomerAuth) -> Json<ApiResponse<serde_json::Value>> {
    tracing::debug!(user_id = %customer.user_id, "customer logged out");
    Json(ApiResponse::message("Logged out successfully"))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current customer", body = ApiResponse<User>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn me(
    State(state): State<AppState>,
    customer: CustomerAuth,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = auth_service::me(&state, &customer).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/auth/update-profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<User>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    customer: CustomerAuth,
    ApiJson(payload): ApiJson<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = auth_service::update_profile(&state, &customer, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/auth/update-photo",
    request_body(content = PhotoForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Photo updated", body = ApiResponse<User>),
        (status = 400, description = "No file uploaded"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn update_photo(
    State(state): State<AppState>,
    customer: CustomerAuth,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<ApiResponse<User>>> {
    let form = read_form(&state, multipart).await?;
    let resp = auth_service::update_photo(&state, &customer, form).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/auth/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Current password is incorrect"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn change_password(
    State(state): State<AppState>,
    customer: CustomerAuth,
    ApiJson(payload): ApiJson<ChangePasswordRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = auth_service::change_password(&state, &customer, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Same response whether or not the account exists", body = ApiResponse<ForgotPasswordResponse>),
    ),
    tag = "Auth"
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ForgotPasswordRequest>,
) -> AppResult<Json<ApiResponse<ForgotPasswordResponse>>> {
    let resp = auth_service::forgot_password(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset"),
        (status = 401, description = "Invalid or expired token"),
    ),
    tag = "Auth"
)]
pub async fn reset_password(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ResetPasswordRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = auth_service::reset_password(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/auth/google",
    request_body = GoogleSignInRequest,
    responses(
        (status = 200, description = "Signed in with Google", body = ApiResponse<AuthResponse>),
        (status = 401, description = "Identity token rejected"),
    ),
    tag = "Auth"
)]
pub async fn google(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<GoogleSignInRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    let resp = social_service::google_sign_in(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/auth/facebook",
    request_body = FacebookSignInRequest,
    responses(
        (status = 200, description = "Signed in with Facebook", body = ApiResponse<AuthResponse>),
        (status = 401, description = "Access token rejected"),
    ),
    tag = "Auth"
)]
pub async fn facebook(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<FacebookSignInRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    let resp = social_service::facebook_sign_in(&state, payload).await?;
    Ok(Json(resp))
}
