use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

use crate::{
    auth::password,
    dto::auth::{AuthResponse, FacebookSignInRequest, GoogleSignInRequest},
    entity::user_auths::ActiveModel,
    error::{AppError, AppResult},
    integrations::SocialProfile,
    response::ApiResponse,
    services::auth_service::find_by_email,
    state::AppState,
    validation::normalize_email,
};

pub async fn google_sign_in(
    state: &AppState,
    payload: GoogleSignInRequest,
) -> AppResult<ApiResponse<AuthResponse>> {
    if payload.token.trim().is_empty() {
        return Err(AppError::validation("Missing required fields: token"));
    }
    let profile = state.social.verify_google(&payload.token).await?;
    sign_in_with(state, profile, "google").await
}

pub async fn facebook_sign_in(
    state: &AppState,
    payload: FacebookSignInRequest,
) -> AppResult<ApiResponse<AuthResponse>> {
    if payload.access_token.trim().is_empty() {
        return Err(AppError::validation("Missing required fields: accessToken"));
    }
    let profile = state.social.verify_facebook(&payload.access_token).await?;
    sign_in_with(state, profile, "facebook").await
}

/// Finds or creates the local account for a verified external identity.
/// New accounts get a random password nobody knows.
async fn sign_in_with(
    state: &AppState,
    profile: SocialProfile,
    provider: &str,
) -> AppResult<ApiResponse<AuthResponse>> {
    let email = normalize_email(&profile.email)?;

    let user = match find_by_email(&state.orm, &email).await? {
        Some(u) => u,
        None => {
            let full_name = profile
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| email.clone());
            let throwaway = password::random_hex(16);
            let active = ActiveModel {
                id: Set(Uuid::new_v4()),
                email: Set(email.clone()),
                password_hash: Set(password::hash_password(&throwaway)?),
                full_name: Set(full_name),
                profile_pic: Set(profile.picture),
                ..Default::default()
            };
            let user = active
                .insert(&state.orm)
                .await
                .map_err(|e| AppError::unique_violation(e, "Email already registered"))?;
            tracing::info!(user_id = %user.id, provider, "social account created");
            user
        }
    };

    if !user.is_active {
        return Err(AppError::forbidden("Account is deactivated"));
    }

    let token = state.tokens.issue_access(user.id, None)?;
    Ok(ApiResponse::success(
        "Login successful",
        AuthResponse {
            token,
            user: user.into(),
        },
        None,
    ))
}
