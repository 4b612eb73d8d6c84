use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    dto::catalog::CreateAddressRequest,
    entity::{
        Addresses,
        addresses::{ActiveModel, Column},
    },
    error::{AppError, AppResult},
    middleware::auth::CustomerAuth,
    models::Address,
    response::{ApiResponse, Meta},
    state::AppState,
};

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub async fn list_addresses(
    state: &AppState,
    customer: &CustomerAuth,
) -> AppResult<ApiResponse<Vec<Address>>> {
    let items: Vec<Address> = Addresses::find()
        .filter(Column::UserId.eq(customer.user_id))
        .order_by_desc(Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Address::from)
        .collect();

    let total = items.len() as i64;
    Ok(ApiResponse::success("Addresses", items, Some(Meta::total(total))))
}

pub async fn create_address(
    state: &AppState,
    customer: &CustomerAuth,
    payload: CreateAddressRequest,
) -> AppResult<ApiResponse<Address>> {
    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(customer.user_id),
        address_line1: Set(clean(payload.address_line1)),
        address_line2: Set(clean(payload.address_line2)),
        locality: Set(clean(payload.locality)),
        city: Set(clean(payload.city)),
        pin_code: Set(clean(payload.pin_code)),
        country: Set(clean(payload.country)),
        ..Default::default()
    };
    let address = active.insert(&state.orm).await?;

    Ok(ApiResponse::success("Address saved", address.into(), None))
}

/// Deletes only the caller's own address; other users' ids read as missing.
pub async fn delete_address(
    state: &AppState,
    customer: &CustomerAuth,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Addresses::delete_many()
        .filter(Column::Id.eq(id))
        .filter(Column::UserId.eq(customer.user_id))
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("Address not found"));
    }

    Ok(ApiResponse::message("Address deleted successfully"))
}
