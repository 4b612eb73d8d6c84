use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{CustomerQuery, QueryPriority, QueryStatus, UserRef};

#[derive(Deserialize, Debug, ToSchema)]
pub struct CreateQueryRequest {
    pub subject: String,
    pub message: String,
    /// Defaults to `medium`.
    pub priority: Option<QueryPriority>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct UpdateQueryStatusRequest {
    pub status: QueryStatus,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct RespondQueryRequest {
    pub response: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QueryWithUser {
    #[serde(flatten)]
    pub query: CustomerQuery,
    pub user: Option<UserRef>,
}
