use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Manager;

#[derive(Deserialize, Debug, ToSchema)]
pub struct ManagerLoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ManagerAuthResponse {
    pub token: String,
    pub manager: Manager,
}

/// Multipart body for `/api/manager/register`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManagerRegisterForm {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub last_name: String,
    pub phone: String,
    #[schema(value_type = Option<String>, format = Binary)]
    pub profile_pic: Option<Vec<u8>>,
}

/// Multipart body for `PUT /api/manager/profile`. Absent fields are kept.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManagerProfileForm {
    pub full_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub profile_pic: Option<Vec<u8>>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct UpdateRoleRequest {
    /// `manager` or `employee`.
    pub role: String,
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub nationality: Option<String>,
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserStatusRequest {
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BulkAction {
    Activate,
    Deactivate,
    Delete,
}

impl BulkAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            BulkAction::Activate => "activate",
            BulkAction::Deactivate => "deactivate",
            BulkAction::Delete => "delete",
        }
    }
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkActionRequest {
    pub user_ids: Vec<Uuid>,
    pub action: BulkAction,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkActionResult {
    pub action: BulkAction,
    pub affected: u64,
}
