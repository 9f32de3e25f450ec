use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    error::AppResult,
    middleware::auth::AuthUser,
    models::AuditLog,
    response::ApiResponse,
    services::admin_service,
    state::AppState,
    table::{TablePage, TableQuery},
};

pub fn router() -> Router<AppState> {
    Router::new().route("/audit-logs", get(list_audit_logs))
}

#[utoipa::path(
    get,
    path = "/api/admin/audit-logs",
    params(TableQuery),
    responses(
        (status = 200, description = "Recent audit trail (admin only)", body = ApiResponse<TablePage<AuditLog>>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_audit_logs(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<TableQuery>,
) -> AppResult<Json<ApiResponse<TablePage<AuditLog>>>> {
    let resp = admin_service::list_audit_logs(&state, &user, query).await?;
    Ok(Json(resp))
}
