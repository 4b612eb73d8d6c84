use std::str::FromStr;

use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{
    addresses, audit_logs, categories, customer_queries, engagements, leaves, manager_auths,
    payment_details, potential_customers, reports, user_auths, user_reports,
};

/// Declares a closed set of lowercase wire values stored as TEXT columns.
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    other => Err(format!(
                        "invalid {} `{}`, expected one of: {}",
                        stringify!($name),
                        other,
                        [$($value),+].join(", ")
                    )),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

text_enum!(
    /// Staff privilege level carried in manager tokens.
    Role { Manager => "manager", Employee => "employee" }
);

text_enum!(ReportStatus { Active => "active", Archived => "archived", Draft => "draft" });

text_enum!(PaymentStatus { Pending => "pending", Completed => "completed", Failed => "failed" });

text_enum!(QueryStatus { Pending => "pending", InProgress => "in-progress", Resolved => "resolved" });

text_enum!(QueryPriority { High => "high", Medium => "medium", Low => "low" });

text_enum!(LeaveStatus { Pending => "pending", Approved => "approved", Denied => "denied" });

text_enum!(BlogBlockKind { Text => "text", Heading => "heading", Subheading => "subheading" });

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub nationality: Option<String>,
    pub profile_pic: Option<String>,
    pub is_active: bool,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<user_auths::Model> for User {
    fn from(model: user_auths::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            full_name: model.full_name,
            phone: model.phone,
            nationality: model.nationality,
            profile_pic: model.profile_pic,
            is_active: model.is_active,
            address_line1: model.address_line1,
            address_line2: model.address_line2,
            city: model.city,
            state: model.state,
            zip_code: model.zip_code,
            country: model.country,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

/// Minimal user projection embedded in staff listings.
#[derive(Debug, Clone, Serialize, ToSchema, FromQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
}

impl UserRef {
    pub const COLUMNS: [user_auths::Column; 3] = [
        user_auths::Column::Id,
        user_auths::Column::FullName,
        user_auths::Column::Email,
    ];
}

/// Minimal report projection embedded in staff listings.
#[derive(Debug, Clone, Serialize, ToSchema, FromQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct ReportRef {
    pub id: Uuid,
    pub report_name: String,
    pub industry: String,
}

impl ReportRef {
    pub const COLUMNS: [reports::Column; 3] = [
        reports::Column::Id,
        reports::Column::ReportName,
        reports::Column::Industry,
    ];
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Manager {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub last_name: String,
    pub phone: String,
    pub profile_pic: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<manager_auths::Model> for Manager {
    fn from(model: manager_auths::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            full_name: model.full_name,
            last_name: model.last_name,
            phone: model.phone,
            profile_pic: model.profile_pic,
            role: model.role,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

/// Report metadata. Loaded with an explicit column projection so the binary
/// payloads never leave the database on list or detail reads.
#[derive(Debug, Clone, Serialize, ToSchema, FromQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: Uuid,
    pub serial_number: Option<String>,
    pub report_name: String,
    pub industry: String,
    pub cost: f64,
    pub size: String,
    pub status: String,
    pub file_type: String,
    pub description: String,
    pub file_content_type: String,
    pub thumbnail_type: Option<String>,
    pub sample_pdf_type: Option<String>,
    pub upload_date: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    pub const COLUMNS: [reports::Column; 16] = [
        reports::Column::Id,
        reports::Column::SerialNumber,
        reports::Column::ReportName,
        reports::Column::Industry,
        reports::Column::Cost,
        reports::Column::Size,
        reports::Column::Status,
        reports::Column::FileType,
        reports::Column::Description,
        reports::Column::FileContentType,
        reports::Column::ThumbnailType,
        reports::Column::SamplePdfType,
        reports::Column::UploadDate,
        reports::Column::LastModified,
        reports::Column::CreatedAt,
        reports::Column::UpdatedAt,
    ];
}

impl From<reports::Model> for Report {
    fn from(model: reports::Model) -> Self {
        Self {
            id: model.id,
            serial_number: model.serial_number,
            report_name: model.report_name,
            industry: model.industry,
            cost: model.cost,
            size: model.size,
            status: model.status,
            file_type: model.file_type,
            description: model.description,
            file_content_type: model.file_content_type,
            thumbnail_type: model.thumbnail_type,
            sample_pdf_type: model.sample_pdf_type,
            upload_date: model.upload_date.with_timezone(&Utc),
            last_modified: model.last_modified.with_timezone(&Utc),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub report_id: Uuid,
    pub transaction_id: String,
    pub paypal_order_id: Option<String>,
    pub amount: f64,
    pub payment_status: String,
    pub payment_date: DateTime<Utc>,
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

impl From<payment_details::Model> for PaymentRecord {
    fn from(model: payment_details::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            report_id: model.report_id,
            transaction_id: model.transaction_id,
            paypal_order_id: model.paypal_order_id,
            amount: model.amount,
            payment_status: model.payment_status,
            payment_date: model.payment_date.with_timezone(&Utc),
            full_name: model.full_name,
            email: model.email,
            phone: model.phone,
            address_line1: model.address_line1,
            address_line2: model.address_line2,
            city: model.city,
            state: model.state,
            zip_code: model.zip_code,
            country: model.country,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Entitlement {
    pub id: Uuid,
    pub user_id: Uuid,
    pub report_id: Uuid,
    pub purchase_date: DateTime<Utc>,
    pub transaction_id: String,
    pub last_access_date: DateTime<Utc>,
    pub payment_status: String,
    pub access_count: i32,
    pub is_active: bool,
}

impl From<user_reports::Model> for Entitlement {
    fn from(model: user_reports::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            report_id: model.report_id,
            purchase_date: model.purchase_date.with_timezone(&Utc),
            transaction_id: model.transaction_id,
            last_access_date: model.last_access_date.with_timezone(&Utc),
            payment_status: model.payment_status,
            access_count: model.access_count,
            is_active: model.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerQuery {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub priority: String,
    pub manager_response: Option<String>,
    pub responded_at: Option<DateTime<Utc>>,
    pub responded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<customer_queries::Model> for CustomerQuery {
    fn from(model: customer_queries::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            subject: model.subject,
            message: model.message,
            status: model.status,
            priority: model.priority,
            manager_response: model.manager_response,
            responded_at: model.responded_at.map(|dt| dt.with_timezone(&Utc)),
            responded_by: model.responded_by,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PotentialCustomer {
    pub id: Uuid,
    pub full_name: String,
    pub business_email: String,
    pub contact_number: String,
    pub country: String,
    pub job_title: String,
    pub company_name: String,
    pub report_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<potential_customers::Model> for PotentialCustomer {
    fn from(model: potential_customers::Model) -> Self {
        Self {
            id: model.id,
            full_name: model.full_name,
            business_email: model.business_email,
            contact_number: model.contact_number,
            country: model.country,
            job_title: model.job_title,
            company_name: model.company_name,
            report_id: model.report_id,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct BlogBlock {
    #[serde(rename = "type")]
    pub kind: BlogBlockKind,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct BlogAuthor {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogThumbnail {
    pub content_type: String,
    pub alt: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub thumbnail: BlogThumbnail,
    pub author: BlogAuthor,
    pub published_date: DateTime<Utc>,
    pub content: Vec<BlogBlock>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Leave {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub from_date: DateTime<Utc>,
    pub to_date: DateTime<Utc>,
    pub reason: String,
    pub status: String,
    pub applied_date: DateTime<Utc>,
    pub response_date: Option<DateTime<Utc>>,
    pub response_by: Option<Uuid>,
    pub comments: Option<String>,
}

impl From<leaves::Model> for Leave {
    fn from(model: leaves::Model) -> Self {
        Self {
            id: model.id,
            employee_id: model.employee_id,
            full_name: model.full_name,
            email: model.email,
            phone: model.phone,
            from_date: model.from_date.with_timezone(&Utc),
            to_date: model.to_date.with_timezone(&Utc),
            reason: model.reason,
            status: model.status,
            applied_date: model.applied_date.with_timezone(&Utc),
            response_date: model.response_date.map(|dt| dt.with_timezone(&Utc)),
            response_by: model.response_by,
            comments: model.comments,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: Uuid,
    pub user_id: Uuid,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub locality: Option<String>,
    pub city: Option<String>,
    pub pin_code: Option<String>,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<addresses::Model> for Address {
    fn from(model: addresses::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            address_line1: model.address_line1,
            address_line2: model.address_line2,
            locality: model.locality,
            city: model.city,
            pin_code: model.pin_code,
            country: model.country,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: Uuid,
    pub manager_id: Option<Uuid>,
    pub action_type: String,
    pub target: Option<String>,
    pub ip_address: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

impl From<audit_logs::Model> for AuditLog {
    fn from(model: audit_logs::Model) -> Self {
        Self {
            id: model.id,
            manager_id: model.manager_id,
            action_type: model.action_type,
            target: model.target,
            ip_address: model.ip_address,
            metadata: model.metadata,
            timestamp: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub category_name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<categories::Model> for Category {
    fn from(model: categories::Model) -> Self {
        Self {
            id: model.id,
            category_name: model.category_name,
            description: model.description,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Engagement {
    pub id: Uuid,
    pub user_id: Uuid,
    pub report_id: Uuid,
    pub views: i32,
    pub reading_progress: i32,
    pub last_accessed: DateTime<Utc>,
}

impl From<engagements::Model> for Engagement {
    fn from(model: engagements::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            report_id: model.report_id,
            views: model.views,
            reading_progress: model.reading_progress,
            last_accessed: model.last_accessed.with_timezone(&Utc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_enums_round_trip_wire_values() {
        for status in QueryStatus::ALL {
            assert_eq!(status.as_str().parse::<QueryStatus>().unwrap(), *status);
        }
        assert_eq!(QueryStatus::InProgress.as_str(), "in-progress");
        assert_eq!(
            serde_json::to_value(QueryStatus::InProgress).unwrap(),
            serde_json::json!("in-progress")
        );
    }

    #[test]
    fn unknown_values_list_the_allowed_set() {
        let err = "owner".parse::<Role>().unwrap_err();
        assert!(err.contains("manager, employee"));
    }

    #[test]
    fn blog_blocks_use_type_key() {
        let block: BlogBlock =
            serde_json::from_value(serde_json::json!({ "type": "heading", "content": "Intro" }))
                .unwrap();
        assert_eq!(block.kind, BlogBlockKind::Heading);
    }
}
