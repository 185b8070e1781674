use serde_json::Value;
use uuid::Uuid;

use crate::{db::DbPool, state::AppState};

async fn insert_entry(
    pool: &DbPool,
    user_id: Option<Uuid>,
    action: &str,
    resource: &str,
    metadata: &Value,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO audit_logs (id, user_id, action, resource, metadata) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(action)
    .bind(resource)
    .bind(metadata)
    .execute(pool)
    .await?;
    Ok(())
}

/// Write an audit entry after a successful mutation. Failures are only logged.
pub async fn record(
    state: &AppState,
    user_id: Option<Uuid>,
    action: &str,
    resource: &str,
    metadata: Value,
) {
    if let Err(err) = insert_entry(&state.pool, user_id, action, resource, &metadata).await {
        tracing::warn!(error = %err, action, resource, "audit log failed");
    }
}
