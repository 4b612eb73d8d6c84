use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Entitlement, PaymentRecord, Report, ReportRef, UserRef};

/// Billing details captured by the checkout form.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentFormData {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// What the client received from the gateway. Only the order id is trusted;
/// status and amount are re-read from the gateway.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct PaypalData {
    pub id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSuccessRequest {
    pub form_data: Option<PaymentFormData>,
    pub paypal_data: Option<PaypalData>,
    pub report_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub email: String,
    pub temporary_password: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSuccessResponse {
    pub payment_id: Uuid,
    pub user_report_id: Uuid,
    /// Present only when this payment provisioned a new account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchasedReport {
    pub id: Uuid,
    pub report: Report,
    pub purchase_date: DateTime<Utc>,
    pub last_access_date: DateTime<Utc>,
    pub access_count: i32,
    pub payment_status: String,
    pub is_active: bool,
    pub transaction_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessGrant {
    pub report_id: Uuid,
    pub access_count: i32,
    pub last_access_date: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetailView {
    #[serde(flatten)]
    pub payment: PaymentRecord,
    pub user: Option<UserRef>,
    pub report: Option<ReportRef>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserReportView {
    #[serde(flatten)]
    pub entitlement: Entitlement,
    pub user: Option<UserRef>,
    pub report: Option<ReportRef>,
}
