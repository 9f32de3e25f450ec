use chrono::Utc;
use sea_orm::{EntityTrait, QueryOrder, QuerySelect};

use crate::{
    entity::audit_logs::{Column as AuditCol, Entity as AuditLogs, Model as AuditModel},
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    models::AuditLog,
    response::ApiResponse,
    state::AppState,
    table::{Cell, Column, DataTable, TablePage, TableQuery},
};

/// Only the most recent entries are searchable from the back office.
const AUDIT_WINDOW: u64 = 1000;

fn audit_table() -> DataTable<AuditLog> {
    DataTable::new(vec![
        Column::new("action", "Hành động", |a: &AuditLog| Cell::text(&a.action)),
        Column::new("resource", "Đối tượng", |a: &AuditLog| {
            a.resource.as_deref().map(Cell::text).unwrap_or(Cell::Empty)
        }),
        Column::new("userId", "Người thực hiện", |a: &AuditLog| {
            a.user_id.map(Cell::text).unwrap_or(Cell::Empty)
        }),
        Column::new("createdAt", "Thời gian", |a: &AuditLog| Cell::Time(a.created_at)),
    ])
}

pub async fn list_audit_logs(
    state: &AppState,
    user: &AuthUser,
    query: TableQuery,
) -> AppResult<ApiResponse<TablePage<AuditLog>>> {
    ensure_admin(user)?;
    let rows = AuditLogs::find()
        .order_by_desc(AuditCol::CreatedAt)
        .limit(AUDIT_WINDOW)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(audit_from_entity)
        .collect();
    let (page, meta) = audit_table().apply(rows, &query)?;
    Ok(ApiResponse::success("Audit logs", page, Some(meta)))
}

fn audit_from_entity(model: AuditModel) -> AuditLog {
    AuditLog {
        id: model.id,
        user_id: model.user_id,
        action: model.action,
        resource: model.resource,
        metadata: model.metadata,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
