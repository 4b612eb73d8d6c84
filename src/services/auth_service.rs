use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    auth::{TokenKind, password},
    dto::auth::{
        AuthResponse, ChangePasswordRequest, ForgotPasswordRequest, ForgotPasswordResponse,
        ResetPasswordRequest, SigninRequest, UpdateProfileRequest,
    },
    entity::{
        UserAuths,
        user_auths::{ActiveModel, Column, Model as UserModel},
    },
    error::{AppError, AppResult},
    middleware::auth::CustomerAuth,
    models::User,
    response::{ApiResponse, Meta},
    state::AppState,
    upload::MultipartForm,
    validation::{check_password, normalize_email, require_fields},
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const RESET_SENT: &str = "If an account exists, password reset instructions have been sent";

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> AppResult<Option<UserModel>> {
    let user = UserAuths::find()
        .filter(Column::Email.eq(email))
        .one(db)
        .await?;
    Ok(user)
}

async fn load_user(state: &AppState, id: Uuid) -> AppResult<UserModel> {
    let user = UserAuths::find_by_id(id).one(&state.orm).await?;
    match user {
        Some(u) => Ok(u),
        None => Err(AppError::not_found("User not found")),
    }
}

pub async fn signup(state: &AppState, mut form: MultipartForm) -> AppResult<ApiResponse<AuthResponse>> {
    require_fields(&[
        ("email", form.text("email")),
        ("password", form.text("password")),
        ("fullName", form.text("fullName")),
    ])?;
    let email = normalize_email(form.text("email").unwrap_or_default())?;
    let password = form.fields.get("password").cloned().unwrap_or_default();
    check_password(&password)?;

    if find_by_email(&state.orm, &email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let profile_pic = form.take_image("profilePic")?.map(|asset| asset.to_data_uri());
    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email),
        password_hash: Set(password::hash_password(&password)?),
        full_name: Set(form.text("fullName").unwrap_or_default().to_string()),
        phone: Set(form.text("phone").map(str::to_string)),
        nationality: Set(form.text("nationality").map(str::to_string)),
        profile_pic: Set(profile_pic),
        ..Default::default()
    };
    let user = active
        .insert(&state.orm)
        .await
        .map_err(|e| AppError::unique_violation(e, "Email already registered"))?;

    tracing::info!(user_id = %user.id, "customer signed up");
    let token = state.tokens.issue_access(user.id, None)?;
    Ok(ApiResponse::success(
        "User created successfully",
        AuthResponse {
            token,
            user: user.into(),
        },
        None,
    ))
}

pub async fn signin(state: &AppState, payload: SigninRequest) -> AppResult<ApiResponse<AuthResponse>> {
    let SigninRequest { email, password } = payload;
    let email = email.trim().to_lowercase();

    let user = match find_by_email(&state.orm, &email).await? {
        Some(u) => u,
        None => {
            password::verify_dummy(&password);
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }
    };

    if !password::verify_password(&password, &user.password_hash) {
        return Err(AppError::unauthorized(INVALID_CREDENTIALS));
    }
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
        Some(Meta::empty()),
    ))
}

pub async fn me(state: &AppState, customer: &CustomerAuth) -> AppResult<ApiResponse<User>> {
    let user = load_user(state, customer.user_id).await?;
    Ok(ApiResponse::success("Profile", user.into(), None))
}

pub async fn update_profile(
    state: &AppState,
    customer: &CustomerAuth,
    payload: UpdateProfileRequest,
) -> AppResult<ApiResponse<User>> {
    let existing = load_user(state, customer.user_id).await?;

    let mut active: ActiveModel = existing.into();
    if let Some(full_name) = payload.full_name.filter(|v| !v.trim().is_empty()) {
        active.full_name = Set(full_name);
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(nationality) = payload.nationality {
        active.nationality = Set(Some(nationality));
    }
    if let Some(v) = payload.address_line1 {
        active.address_line1 = Set(Some(v));
    }
    if let Some(v) = payload.address_line2 {
        active.address_line2 = Set(Some(v));
    }
    if let Some(v) = payload.city {
        active.city = Set(Some(v));
    }
    if let Some(v) = payload.state {
        active.state = Set(Some(v));
    }
    if let Some(v) = payload.zip_code {
        active.zip_code = Set(Some(v));
    }
    if let Some(v) = payload.country {
        active.country = Set(Some(v));
    }
    active.updated_at = Set(Utc::now().into());

    let user = active.update(&state.orm).await?;
    Ok(ApiResponse::success("Profile updated successfully", user.into(), None))
}

pub async fn update_photo(
    state: &AppState,
    customer: &CustomerAuth,
    mut form: MultipartForm,
) -> AppResult<ApiResponse<User>> {
    let asset = match form.take_image("profilePic")? {
        Some(a) => a,
        None => return Err(AppError::validation("No file uploaded")),
    };
    let existing = load_user(state, customer.user_id).await?;

    let mut active: ActiveModel = existing.into();
    active.profile_pic = Set(Some(asset.to_data_uri()));
    active.updated_at = Set(Utc::now().into());
    let user = active.update(&state.orm).await?;

    Ok(ApiResponse::success("Profile photo updated successfully", user.into(), None))
}

pub async fn change_password(
    state: &AppState,
    customer: &CustomerAuth,
    payload: ChangePasswordRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    check_password(&payload.new_password)?;
    let existing = load_user(state, customer.user_id).await?;
    if !password::verify_password(&payload.current_password, &existing.password_hash) {
        return Err(AppError::validation("Current password is incorrect"));
    }

    let mut active: ActiveModel = existing.into();
    active.password_hash = Set(password::hash_password(&payload.new_password)?);
    active.updated_at = Set(Utc::now().into());
    active.update(&state.orm).await?;

    Ok(ApiResponse::message("Password changed successfully"))
}

pub async fn forgot_password(
    state: &AppState,
    payload: ForgotPasswordRequest,
) -> AppResult<ApiResponse<ForgotPasswordResponse>> {
    let email = payload.email.trim().to_lowercase();
    let mut data = ForgotPasswordResponse::default();

    if let Some(user) = find_by_email(&state.orm, &email).await? {
        let token = state.tokens.issue_reset(user.id, None)?;
        tracing::debug!(user_id = %user.id, reset_token = %token, "customer reset token issued");
        if state.config.reset_token_in_response {
            data.reset_token = Some(token);
        }
    }

    Ok(ApiResponse::success(RESET_SENT, data, None))
}

pub async fn reset_password(
    state: &AppState,
    payload: ResetPasswordRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    check_password(&payload.new_password)?;
    let claims = state.tokens.verify(&payload.token, TokenKind::Reset)?;
    if claims.role.is_some() {
        return Err(AppError::unauthorized("Invalid or expired token"));
    }

    let existing = load_user(state, claims.user_id).await?;
    let mut active: ActiveModel = existing.into();
    active.password_hash = Set(password::hash_password(&payload.new_password)?);
    active.updated_at = Set(Utc::now().into());
    active.update(&state.orm).await?;

    Ok(ApiResponse::message("Password reset successfully"))
}
