use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Multipart body for blog create and update.
///
/// `author` and `content` are JSON encoded text parts, e.g.
/// `{"name":"Ada"}` and `[{"type":"heading","content":"Intro"}]`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogForm {
    pub title: String,
    pub author: String,
    pub content: String,
    pub published_date: Option<DateTime<Utc>>,
    pub thumbnail_alt: Option<String>,
    #[schema(value_type = String, format = Binary)]
    pub thumbnail: Vec<u8>,
}

#[derive(Deserialize, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatePotentialCustomerRequest {
    pub full_name: String,
    pub business_email: String,
    pub contact_number: String,
    pub country: String,
    pub job_title: String,
    pub company_name: String,
    pub report_id: Option<Uuid>,
}
