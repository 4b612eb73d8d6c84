use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::record,
    dto::queries::{CreateQueryRequest, QueryWithUser, RespondQueryRequest, UpdateQueryStatusRequest},
    entity::{
        CustomerQueries,
        customer_queries::{ActiveModel, Column, Model as QueryModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{CustomerAuth, ManagerAuth},
    models::{CustomerQuery, QueryPriority, QueryStatus},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::payment_service::user_refs,
    state::AppState,
    validation::require_fields,
};

const QUERY_NOT_FOUND: &str = "Query not found";

async fn load_query(state: &AppState, id: Uuid) -> AppResult<QueryModel> {
    match CustomerQueries::find_by_id(id).one(&state.orm).await? {
        Some(q) => Ok(q),
        None => Err(AppError::not_found(QUERY_NOT_FOUND)),
    }
}

pub async fn create_query(
    state: &AppState,
    customer: &CustomerAuth,
    payload: CreateQueryRequest,
) -> AppResult<ApiResponse<CustomerQuery>> {
    require_fields(&[
        ("subject", Some(payload.subject.as_str())),
        ("message", Some(payload.message.as_str())),
    ])?;

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(customer.user_id),
        subject: Set(payload.subject.trim().to_string()),
        message: Set(payload.message.trim().to_string()),
        status: Set(QueryStatus::Pending.as_str().to_string()),
        priority: Set(payload
            .priority
            .unwrap_or(QueryPriority::Medium)
            .as_str()
            .to_string()),
        ..Default::default()
    };
    let query = active.insert(&state.orm).await?;
    tracing::info!(query_id = %query.id, user_id = %customer.user_id, "support query created");

    Ok(ApiResponse::success("Query submitted successfully", query.into(), None))
}

pub async fn user_queries(
    state: &AppState,
    customer: &CustomerAuth,
) -> AppResult<ApiResponse<Vec<CustomerQuery>>> {
    let items: Vec<CustomerQuery> = CustomerQueries::find()
        .filter(Column::UserId.eq(customer.user_id))
        .order_by_desc(Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(CustomerQuery::from)
        .collect();

    let total = items.len() as i64;
    Ok(ApiResponse::success("Queries", items, Some(Meta::total(total))))
}

pub async fn all_queries(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<Vec<QueryWithUser>>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = CustomerQueries::find().order_by_desc(Column::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;
    let queries = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let users = user_refs(state, queries.iter().map(|q| q.user_id).collect()).await?;
    let items = queries
        .into_iter()
        .map(|q| QueryWithUser {
            user: users.get(&q.user_id).cloned(),
            query: q.into(),
        })
        .collect();

    Ok(ApiResponse::success(
        "Queries",
        items,
        Some(Meta::new(page, limit, total)),
    ))
}

/// Any status may follow any other.
pub async fn update_status(
    state: &AppState,
    staff: &ManagerAuth,
    id: Uuid,
    payload: UpdateQueryStatusRequest,
) -> AppResult<ApiResponse<CustomerQuery>> {
    let existing = load_query(state, id).await?;
    let previous = existing.status.clone();

    let mut active: ActiveModel = existing.into();
    active.status = Set(payload.status.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    let query = active.update(&state.orm).await?;

    record(
        state,
        staff,
        "query_status_update",
        "customer_queries",
        serde_json::json!({ "query_id": id, "from": previous, "to": payload.status }),
    )
    .await;

    Ok(ApiResponse::success("Query status updated", query.into(), None))
}

pub async fn respond(
    state: &AppState,
    staff: &ManagerAuth,
    id: Uuid,
    payload: RespondQueryRequest,
) -> AppResult<ApiResponse<CustomerQuery>> {
    let response = payload.response.trim();
    if response.is_empty() {
        return Err(AppError::validation("Response is required"));
    }
    let existing = load_query(state, id).await?;

    let now = Utc::now();
    let mut active: ActiveModel = existing.into();
    active.manager_response = Set(Some(response.to_string()));
    active.responded_by = Set(Some(staff.manager_id));
    active.responded_at = Set(Some(now.into()));
    active.status = Set(QueryStatus::InProgress.as_str().to_string());
    active.updated_at = Set(now.into());
    let query = active.update(&state.orm).await?;

    record(
        state,
        staff,
        "query_respond",
        "customer_queries",
        serde_json::json!({ "query_id": id }),
    )
    .await;

    Ok(ApiResponse::success("Response added successfully", query.into(), None))
}

pub async fn delete_query(
    state: &AppState,
    staff: &ManagerAuth,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = CustomerQueries::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found(QUERY_NOT_FOUND));
    }

    record(
        state,
        staff,
        "query_delete",
        "customer_queries",
        serde_json::json!({ "query_id": id }),
    )
    .await;

    Ok(ApiResponse::message("Query deleted successfully"))
}
