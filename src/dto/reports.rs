use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::preview::PreviewSection;

/// Multipart body for report create and update. On update every part is
/// optional and absent parts keep their stored value.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportForm {
    pub report_name: String,
    pub industry: String,
    pub cost: f64,
    pub description: String,
    pub serial_number: Option<String>,
    /// `active`, `archived` or `draft`; defaults to `active`.
    pub status: Option<String>,
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub thumbnail: Option<Vec<u8>>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub sample_pdf: Option<Vec<u8>>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreviewMetadata {
    pub size: String,
    pub last_modified: DateTime<Utc>,
    pub cost: f64,
    pub total_pages: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportPreview {
    pub report_name: String,
    pub sections: Vec<PreviewSection>,
    pub metadata: PreviewMetadata,
}
