use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit::record,
    dto::catalog::CreateCategoryRequest,
    entity::{
        Categories,
        categories::{ActiveModel, Column},
    },
    error::{AppError, AppResult},
    middleware::auth::{ManagerAuth, ensure_manager},
    models::Category,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<Vec<Category>>> {
    let items: Vec<Category> = Categories::find()
        .order_by_asc(Column::CategoryName)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Category::from)
        .collect();

    let total = items.len() as i64;
    Ok(ApiResponse::success("Categories", items, Some(Meta::total(total))))
}

pub async fn create_category(
    state: &AppState,
    staff: &ManagerAuth,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_manager(staff)?;
    let name = payload.category_name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Missing required fields: categoryName"));
    }

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        category_name: Set(name.to_string()),
        description: Set(payload.description.filter(|d| !d.trim().is_empty())),
        ..Default::default()
    };
    let category = active
        .insert(&state.orm)
        .await
        .map_err(|e| AppError::unique_violation(e, "Category already exists"))?;

    record(
        state,
        staff,
        "category_create",
        "categories",
        serde_json::json!({ "category_id": category.id, "name": category.category_name }),
    )
    .await;

    Ok(ApiResponse::success("Category created", category.into(), None))
}

pub async fn delete_category(
    state: &AppState,
    staff: &ManagerAuth,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_manager(staff)?;
    let result = Categories::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("Category not found"));
    }

    record(
        state,
        staff,
        "category_delete",
        "categories",
        serde_json::json!({ "category_id": id }),
    )
    .await;

    Ok(ApiResponse::message("Category deleted successfully"))
}
