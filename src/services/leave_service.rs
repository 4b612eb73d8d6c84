use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit::record,
    dto::leaves::{CreateLeaveRequest, UpdateLeaveStatusRequest},
    entity::{
        Leaves, ManagerAuths,
        leaves::{ActiveModel, Column},
    },
    error::{AppError, AppResult},
    middleware::auth::{ManagerAuth, ensure_manager},
    models::{Leave, LeaveStatus},
    response::{ApiResponse, Meta},
    state::AppState,
};

fn decision(raw: &str) -> AppResult<LeaveStatus> {
    match raw.parse::<LeaveStatus>() {
        Ok(status @ (LeaveStatus::Approved | LeaveStatus::Denied)) => Ok(status),
        _ => Err(AppError::validation(
            "Invalid status. Must be approved or denied",
        )),
    }
}

pub async fn apply(
    state: &AppState,
    staff: &ManagerAuth,
    payload: CreateLeaveRequest,
) -> AppResult<ApiResponse<Leave>> {
    if payload.reason.trim().is_empty() {
        return Err(AppError::validation("Missing required fields: reason"));
    }
    if payload.to_date < payload.from_date {
        return Err(AppError::validation("toDate must not be before fromDate"));
    }

    let profile = match ManagerAuths::find_by_id(staff.manager_id)
        .one(&state.orm)
        .await?
    {
        Some(p) => p,
        None => return Err(AppError::not_found("Employee not found")),
    };
    let pick = |given: Option<String>, fallback: String| {
        given
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(fallback)
    };
    let default_name = format!("{} {}", profile.full_name, profile.last_name)
        .trim()
        .to_string();

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        employee_id: Set(staff.manager_id),
        full_name: Set(pick(payload.full_name, default_name)),
        email: Set(pick(payload.email, profile.email)),
        phone: Set(pick(payload.phone, profile.phone)),
        from_date: Set(payload.from_date.into()),
        to_date: Set(payload.to_date.into()),
        reason: Set(payload.reason.trim().to_string()),
        status: Set(LeaveStatus::Pending.as_str().to_string()),
        applied_date: Set(Utc::now().into()),
        ..Default::default()
    };
    let leave = active.insert(&state.orm).await?;
    tracing::info!(leave_id = %leave.id, employee_id = %staff.manager_id, "leave requested");

    Ok(ApiResponse::success("Leave application submitted", leave.into(), None))
}

/// Staff may read their own history; reading someone else's needs the manager role.
pub async fn employee_leaves(
    state: &AppState,
    staff: &ManagerAuth,
    employee_id: Uuid,
) -> AppResult<ApiResponse<Vec<Leave>>> {
    if employee_id != staff.manager_id {
        ensure_manager(staff)?;
    }

    let items: Vec<Leave> = Leaves::find()
        .filter(Column::EmployeeId.eq(employee_id))
        .order_by_desc(Column::AppliedDate)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Leave::from)
        .collect();

    let total = items.len() as i64;
    Ok(ApiResponse::success("Leaves", items, Some(Meta::total(total))))
}

pub async fn all_leaves(state: &AppState, staff: &ManagerAuth) -> AppResult<ApiResponse<Vec<Leave>>> {
    ensure_manager(staff)?;

    let items: Vec<Leave> = Leaves::find()
        .order_by_desc(Column::AppliedDate)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Leave::from)
        .collect();

    let total = items.len() as i64;
    Ok(ApiResponse::success("Leaves", items, Some(Meta::total(total))))
}

pub async fn update_status(
    state: &AppState,
    staff: &ManagerAuth,
    leave_id: Uuid,
    payload: UpdateLeaveStatusRequest,
) -> AppResult<ApiResponse<Leave>> {
    ensure_manager(staff)?;
    let status = decision(payload.status.trim())?;

    let existing = match Leaves::find_by_id(leave_id).one(&state.orm).await? {
        Some(l) => l,
        None => return Err(AppError::not_found("Leave not found")),
    };

    let now = Utc::now();
    let mut active: ActiveModel = existing.into();
    active.status = Set(status.as_str().to_string());
    active.response_date = Set(Some(now.into()));
    active.response_by = Set(Some(staff.manager_id));
    active.comments = Set(payload.comments.filter(|c| !c.trim().is_empty()));
    active.updated_at = Set(now.into());
    let leave = active.update(&state.orm).await?;

    record(
        state,
        staff,
        "leave_status_update",
        "leaves",
        serde_json::json!({ "leave_id": leave_id, "status": status }),
    )
    .await;

    Ok(ApiResponse::success(
        format!("Leave {}", status.as_str()),
        leave.into(),
        None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_final_decisions_are_accepted() {
        assert_eq!(decision("approved").unwrap(), LeaveStatus::Approved);
        assert_eq!(decision("denied").unwrap(), LeaveStatus::Denied);
        assert!(decision("pending").is_err());
        assert!(decision("maybe").is_err());
    }
}
