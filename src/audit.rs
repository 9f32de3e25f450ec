use serde_json::Value;
use uuid::Uuid;

use crate::state::AppState;

/// Appends an entry to the audit trail. The write happens outside the
/// caller's transaction, after the change it describes has committed, and
/// a failed write never fails the request.
pub async fn record(
    state: &AppState,
    user_id: Option<Uuid>,
    action: &str,
    resource: &str,
    metadata: Value,
) {
    let inserted = sqlx::query(
        "INSERT INTO audit_logs (id, user_id, action, resource, metadata) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(action)
    .bind(resource)
    .bind(&metadata)
    .execute(&state.pool)
    .await;

    match inserted {
        Ok(_) => tracing::debug!(action, resource, "audit entry recorded"),
        Err(err) => tracing::warn!(error = %err, action, resource, "audit log failed"),
    }
}
