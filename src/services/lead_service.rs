use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    dto::content::CreatePotentialCustomerRequest,
    entity::{
        PotentialCustomers,
        potential_customers::{ActiveModel, Column},
    },
    error::{AppError, AppResult},
    models::PotentialCustomer,
    response::{ApiResponse, Meta},
    state::AppState,
    validation::normalize_email,
};

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub async fn create_lead(
    state: &AppState,
    payload: CreatePotentialCustomerRequest,
) -> AppResult<ApiResponse<PotentialCustomer>> {
    let report_id = match payload.report_id {
        Some(id) => id,
        None => return Err(AppError::validation("All fields are required")),
    };
    let text_fields = [
        &payload.full_name,
        &payload.business_email,
        &payload.contact_number,
        &payload.country,
        &payload.job_title,
        &payload.company_name,
    ];
    if text_fields.iter().any(|v| is_blank(v)) {
        return Err(AppError::validation("All fields are required"));
    }
    let business_email = normalize_email(&payload.business_email)?;

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        full_name: Set(payload.full_name.trim().to_string()),
        business_email: Set(business_email),
        contact_number: Set(payload.contact_number.trim().to_string()),
        country: Set(payload.country.trim().to_string()),
        job_title: Set(payload.job_title.trim().to_string()),
        company_name: Set(payload.company_name.trim().to_string()),
        report_id: Set(report_id),
        ..Default::default()
    };
    let lead = active.insert(&state.orm).await?;
    tracing::info!(lead_id = %lead.id, report_id = %report_id, "lead captured");

    Ok(ApiResponse::success(
        "Potential customer data saved successfully",
        lead.into(),
        None,
    ))
}

pub async fn list_leads(state: &AppState) -> AppResult<ApiResponse<Vec<PotentialCustomer>>> {
    let items: Vec<PotentialCustomer> = PotentialCustomers::find()
        .order_by_desc(Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(PotentialCustomer::from)
        .collect();

    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Potential customers",
        items,
        Some(Meta::total(total)),
    ))
}
