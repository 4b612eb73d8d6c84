use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    audit::record,
    auth::{TokenKind, password},
    dto::{
        auth::{ForgotPasswordRequest, ForgotPasswordResponse, ResetPasswordRequest},
        manager::{
            BulkAction, BulkActionRequest, BulkActionResult, CreateUserRequest,
            ManagerAuthResponse, ManagerLoginRequest, UpdateRoleRequest, UpdateUserStatusRequest,
        },
    },
    entity::{AuditLogs, ManagerAuths, UserAuths, audit_logs, manager_auths, user_auths},
    error::{AppError, AppResult},
    middleware::auth::{ManagerAuth, ensure_manager},
    models::{AuditLog, Manager, Role, User},
    response::{ApiResponse, Meta},
    routes::params::AuditLogQuery,
    services::auth_service::find_by_email,
    state::AppState,
    upload::MultipartForm,
    validation::{check_password, normalize_email, require_fields},
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const USER_HAS_PAYMENTS: &str = "User has payment records and cannot be deleted";
const RESET_SENT: &str = "If an account exists, password reset instructions have been sent";

fn parse_role(raw: &str) -> AppResult<Role> {
    raw.parse::<Role>()
        .map_err(|_| AppError::validation("Invalid role specified"))
}

fn issue_for(state: &AppState, manager: &manager_auths::Model) -> AppResult<String> {
    let role = parse_role(&manager.role)?;
    state.tokens.issue_access(manager.id, Some(role))
}

async fn load_manager(state: &AppState, id: Uuid) -> AppResult<manager_auths::Model> {
    let manager = ManagerAuths::find_by_id(id).one(&state.orm).await?;
    match manager {
        Some(m) => Ok(m),
        None => Err(AppError::not_found("Manager not found")),
    }
}

/// Self-registration. The role is always `employee`; promotion goes through
/// the team endpoints.
pub async fn register(
    state: &AppState,
    mut form: MultipartForm,
) -> AppResult<ApiResponse<ManagerAuthResponse>> {
    require_fields(&[
        ("email", form.text("email")),
        ("password", form.text("password")),
        ("fullName", form.text("fullName")),
        ("lastName", form.text("lastName")),
        ("phone", form.text("phone")),
    ])?;
    let email = normalize_email(form.text("email").unwrap_or_default())?;
    let password = form.fields.get("password").cloned().unwrap_or_default();
    check_password(&password)?;

    let existing = ManagerAuths::find()
        .filter(manager_auths::Column::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("Manager already exists".to_string()));
    }

    let profile_pic = form.take_image("profilePic")?.map(|asset| asset.to_data_uri());
    let active = manager_auths::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email),
        password_hash: Set(password::hash_password(&password)?),
        full_name: Set(form.text("fullName").unwrap_or_default().to_string()),
        last_name: Set(form.text("lastName").unwrap_or_default().to_string()),
        phone: Set(form.text("phone").unwrap_or_default().to_string()),
        profile_pic: Set(profile_pic),
        role: Set(Role::Employee.as_str().to_string()),
        ..Default::default()
    };
    let manager = active
        .insert(&state.orm)
        .await
        .map_err(|e| AppError::unique_violation(e, "Manager already exists"))?;

    tracing::info!(manager_id = %manager.id, "staff member registered");
    let token = issue_for(state, &manager)?;
    Ok(ApiResponse::success(
        "Manager registered successfully",
        ManagerAuthResponse {
            token,
            manager: manager.into(),
        },
        None,
    ))
}

pub async fn login(
    state: &AppState,
    payload: ManagerLoginRequest,
) -> AppResult<ApiResponse<ManagerAuthResponse>> {
    let email = payload.email.trim().to_lowercase();
    let manager = ManagerAuths::find()
        .filter(manager_auths::Column::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;

    let manager = match manager {
        Some(m) => m,
        None => {
            password::verify_dummy(&payload.password);
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }
    };
    if !password::verify_password(&payload.password, &manager.password_hash) {
        return Err(AppError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = issue_for(state, &manager)?;
    Ok(ApiResponse::success(
        "Login successful",
        ManagerAuthResponse {
            token,
            manager: manager.into(),
        },
        Some(Meta::empty()),
    ))
}

pub async fn profile(state: &AppState, staff: &ManagerAuth) -> AppResult<ApiResponse<Manager>> {
    let manager = load_manager(state, staff.manager_id).await?;
    Ok(ApiResponse::success("Profile", manager.into(), None))
}

pub async fn update_profile(
    state: &AppState,
    staff: &ManagerAuth,
    mut form: MultipartForm,
) -> AppResult<ApiResponse<Manager>> {
    let picture = form.take_image("profilePic")?;
    let existing = load_manager(state, staff.manager_id).await?;

    let mut active: manager_auths::ActiveModel = existing.into();
    if let Some(full_name) = form.text("fullName") {
        active.full_name = Set(full_name.to_string());
    }
    if let Some(last_name) = form.text("lastName") {
        active.last_name = Set(last_name.to_string());
    }
    if let Some(phone) = form.text("phone") {
        active.phone = Set(phone.to_string());
    }
    if let Some(asset) = picture {
        active.profile_pic = Set(Some(asset.to_data_uri()));
    }
    active.updated_at = Set(Utc::now().into());

    let manager = active.update(&state.orm).await?;
    Ok(ApiResponse::success("Profile updated successfully", manager.into(), None))
}

pub async fn forgot_password(
    state: &AppState,
    payload: ForgotPasswordRequest,
) -> AppResult<ApiResponse<ForgotPasswordResponse>> {
    let email = payload.email.trim().to_lowercase();
    let manager = ManagerAuths::find()
        .filter(manager_auths::Column::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;

    let mut data = ForgotPasswordResponse::default();
    if let Some(manager) = manager {
        let role = parse_role(&manager.role)?;
        let token = state.tokens.issue_reset(manager.id, Some(role))?;
        tracing::debug!(manager_id = %manager.id, reset_token = %token, "staff reset token issued");
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
    if claims.role.is_none() {
        return Err(AppError::unauthorized("Invalid or expired token"));
    }

    let existing = load_manager(state, claims.user_id).await?;
    let mut active: manager_auths::ActiveModel = existing.into();
    active.password_hash = Set(password::hash_password(&payload.new_password)?);
    active.updated_at = Set(Utc::now().into());
    active.update(&state.orm).await?;

    Ok(ApiResponse::message("Password reset successfully"))
}

pub async fn list_team(state: &AppState, staff: &ManagerAuth) -> AppResult<ApiResponse<Vec<Manager>>> {
    ensure_manager(staff)?;
    let team: Vec<Manager> = ManagerAuths::find()
        .order_by_asc(manager_auths::Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Manager::from)
        .collect();
    let total = team.len() as i64;
    Ok(ApiResponse::success("Team members", team, Some(Meta::total(total))))
}

pub async fn update_team_role(
    state: &AppState,
    staff: &ManagerAuth,
    id: Uuid,
    payload: UpdateRoleRequest,
) -> AppResult<ApiResponse<Manager>> {
    ensure_manager(staff)?;
    let role = parse_role(&payload.role)?;

    let existing = ManagerAuths::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(m) => m,
        None => return Err(AppError::not_found("Team member not found")),
    };
    let previous = existing.role.clone();

    let mut active: manager_auths::ActiveModel = existing.into();
    active.role = Set(role.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    let manager = active.update(&state.orm).await?;

    record(
        state,
        staff,
        "team_role_update",
        "manager_auths",
        serde_json::json!({ "manager_id": id, "from": previous, "to": role.as_str() }),
    )
    .await;

    Ok(ApiResponse::success("Role updated successfully", manager.into(), None))
}

pub async fn list_users(state: &AppState, staff: &ManagerAuth) -> AppResult<ApiResponse<Vec<User>>> {
    ensure_manager(staff)?;
    let users: Vec<User> = UserAuths::find()
        .order_by_desc(user_auths::Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(User::from)
        .collect();
    let total = users.len() as i64;
    Ok(ApiResponse::success("Users", users, Some(Meta::total(total))))
}

pub async fn create_user(
    state: &AppState,
    staff: &ManagerAuth,
    payload: CreateUserRequest,
) -> AppResult<ApiResponse<User>> {
    ensure_manager(staff)?;
    require_fields(&[
        ("fullName", Some(payload.full_name.as_str())),
        ("email", Some(payload.email.as_str())),
        ("password", Some(payload.password.as_str())),
    ])?;
    let email = normalize_email(&payload.email)?;
    check_password(&payload.password)?;

    if find_by_email(&state.orm, &email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let active = user_auths::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email),
        password_hash: Set(password::hash_password(&payload.password)?),
        full_name: Set(payload.full_name),
        phone: Set(payload.phone),
        nationality: Set(payload.nationality),
        ..Default::default()
    };
    let user = active
        .insert(&state.orm)
        .await
        .map_err(|e| AppError::unique_violation(e, "Email already registered"))?;

    record(
        state,
        staff,
        "user_create",
        "user_auths",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success("User created", user.into(), None))
}

pub async fn update_user_status(
    state: &AppState,
    staff: &ManagerAuth,
    user_id: Uuid,
    payload: UpdateUserStatusRequest,
) -> AppResult<ApiResponse<User>> {
    ensure_manager(staff)?;
    let existing = UserAuths::find_by_id(user_id).one(&state.orm).await?;
    let existing = match existing {
        Some(u) => u,
        None => return Err(AppError::not_found("User not found")),
    };

    let mut active: user_auths::ActiveModel = existing.into();
    active.is_active = Set(payload.is_active);
    active.updated_at = Set(Utc::now().into());
    let user = active.update(&state.orm).await?;

    record(
        state,
        staff,
        "user_status_update",
        "user_auths",
        serde_json::json!({ "user_id": user_id, "is_active": payload.is_active }),
    )
    .await;

    Ok(ApiResponse::success("User status updated successfully", user.into(), None))
}

pub async fn delete_user(
    state: &AppState,
    staff: &ManagerAuth,
    user_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_manager(staff)?;
    let result = UserAuths::delete_by_id(user_id)
        .exec(&state.orm)
        .await
        .map_err(|e| AppError::still_referenced(e, USER_HAS_PAYMENTS))?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("User not found"));
    }

    record(
        state,
        staff,
        "user_delete",
        "user_auths",
        serde_json::json!({ "user_id": user_id }),
    )
    .await;

    Ok(ApiResponse::message("User deleted successfully"))
}

pub async fn bulk_action(
    state: &AppState,
    staff: &ManagerAuth,
    payload: BulkActionRequest,
) -> AppResult<ApiResponse<BulkActionResult>> {
    ensure_manager(staff)?;
    if payload.user_ids.is_empty() {
        return Err(AppError::validation("userIds must not be empty"));
    }

    let ids = payload.user_ids.clone();
    let affected = match payload.action {
        BulkAction::Delete => {
            UserAuths::delete_many()
                .filter(user_auths::Column::Id.is_in(ids))
                .exec(&state.orm)
                .await
                .map_err(|e| AppError::still_referenced(e, USER_HAS_PAYMENTS))?
                .rows_affected
        }
        BulkAction::Activate | BulkAction::Deactivate => {
            let is_active = payload.action == BulkAction::Activate;
            UserAuths::update_many()
                .col_expr(user_auths::Column::IsActive, Expr::value(is_active))
                .col_expr(user_auths::Column::UpdatedAt, Expr::value(Utc::now().fixed_offset()))
                .filter(user_auths::Column::Id.is_in(ids))
                .exec(&state.orm)
                .await?
                .rows_affected
        }
    };

    record(
        state,
        staff,
        "user_bulk_action",
        "user_auths",
        serde_json::json!({
            "action": payload.action.as_str(),
            "user_ids": payload.user_ids,
            "affected": affected,
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Bulk action completed successfully",
        BulkActionResult {
            action: payload.action,
            affected,
        },
        None,
    ))
}

pub async fn list_audit_logs(
    state: &AppState,
    staff: &ManagerAuth,
    query: AuditLogQuery,
) -> AppResult<ApiResponse<Vec<AuditLog>>> {
    ensure_manager(staff)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(manager_id) = query.manager_id {
        condition = condition.add(audit_logs::Column::ManagerId.eq(manager_id));
    }
    if let Some(action) = query.action_type.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(audit_logs::Column::ActionType.eq(action.as_str()));
    }

    let finder = AuditLogs::find()
        .filter(condition)
        .order_by_desc(audit_logs::Column::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(AuditLog::from)
        .collect();

    Ok(ApiResponse::success(
        "Audit logs",
        items,
        Some(Meta::new(page, limit, total)),
    ))
}
