use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

/// Contact fields default to the caller's staff profile when omitted.
#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeaveRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub from_date: DateTime<Utc>,
    pub to_date: DateTime<Utc>,
    pub reason: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct UpdateLeaveStatusRequest {
    /// `approved` or `denied`.
    pub status: String,
    pub comments: Option<String>,
}
