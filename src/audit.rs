use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, Set};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    entity::audit_logs::ActiveModel,
    error::AppResult,
    middleware::auth::ManagerAuth,
    state::AppState,
};

pub async fn log_audit(
    state: &AppState,
    manager: Option<&ManagerAuth>,
    action: &str,
    target: Option<&str>,
    metadata: Option<Value>,
) -> AppResult<()> {
    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        manager_id: Set(manager.map(|m| m.manager_id)),
        action_type: Set(action.to_string()),
        target: Set(target.map(str::to_string)),
        ip_address: Set(manager.and_then(|m| m.ip_address.clone())),
        metadata: Set(metadata),
        created_at: NotSet,
    };
    active.insert(&state.orm).await?;
    Ok(())
}

/// Records a staff action; failures are logged and swallowed.
pub async fn record(
    state: &AppState,
    manager: &ManagerAuth,
    action: &str,
    target: &str,
    metadata: Value,
) {
    if let Err(err) = log_audit(state, Some(manager), action, Some(target), Some(metadata)).await {
        tracing::warn!(error = %err, action, "audit log failed");
    }
}
