use chrono::Utc;
use sea_orm::{
    EntityTrait, PaginatorTrait, QueryOrder, QuerySelect, Set,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use crate::{
    dto::catalog::UpdateEngagementRequest,
    entity::{
        Engagements, Reports,
        engagements::{ActiveModel, Column},
    },
    error::{AppError, AppResult},
    middleware::auth::CustomerAuth,
    models::Engagement,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

fn clamp_progress(progress: i32) -> i32 {
    progress.clamp(0, 100)
}

/// Records one view for the caller and, when given, the reading progress.
/// Insert and increment happen in one upsert statement.
pub async fn track(
    state: &AppState,
    customer: &CustomerAuth,
    report_id: Uuid,
    payload: UpdateEngagementRequest,
) -> AppResult<ApiResponse<Engagement>> {
    if Reports::find_by_id(report_id)
        .select_only()
        .column(crate::entity::reports::Column::Id)
        .into_tuple::<Uuid>()
        .one(&state.orm)
        .await?
        .is_none()
    {
        return Err(AppError::not_found("Report not found"));
    }

    let progress = payload.reading_progress.map(clamp_progress);
    let now = Utc::now().fixed_offset();
    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(customer.user_id),
        report_id: Set(report_id),
        views: Set(1),
        reading_progress: Set(progress.unwrap_or(0)),
        last_accessed: Set(now),
        ..Default::default()
    };

    let mut on_conflict = OnConflict::columns([Column::UserId, Column::ReportId]);
    on_conflict
        .value(Column::Views, Expr::col((Engagements, Column::Views)).add(1))
        .value(Column::LastAccessed, Expr::value(now))
        .value(Column::UpdatedAt, Expr::value(now));
    if let Some(progress) = progress {
        on_conflict.value(Column::ReadingProgress, Expr::value(progress));
    }

    let engagement = Engagements::insert(active)
        .on_conflict(on_conflict.to_owned())
        .exec_with_returning(&state.orm)
        .await?;

    Ok(ApiResponse::success("Engagement updated", engagement.into(), None))
}

pub async fn list_engagements(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<Vec<Engagement>>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = Engagements::find().order_by_desc(Column::LastAccessed);
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Engagement::from)
        .collect();

    Ok(ApiResponse::success(
        "Engagements",
        items,
        Some(Meta::new(page, limit, total)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_clamped_to_percent() {
        assert_eq!(clamp_progress(-5), 0);
        assert_eq!(clamp_progress(42), 42);
        assert_eq!(clamp_progress(250), 100);
    }
}
