use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    dto::services::{CreateServiceRequest, UpdateServiceRequest},
    entity::services::{
        ActiveModel as ServiceActive, Column as ServiceCol, Entity as Services,
        Model as ServiceModel,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin, ensure_staff},
    models::Service,
    response::{ApiResponse, Meta},
    state::AppState,
    table::{Cell, Column, DataTable, TablePage, TableQuery},
};

/// Category of catalog entries that describe room stays rather than extras.
/// They never appear in a booking's service selection.
pub const ROOM_CATEGORY: &str = "room";

/// Active extras a guest can add to a booking.
pub async fn list_services(state: &AppState) -> AppResult<ApiResponse<Vec<Service>>> {
    let items = Services::find()
        .filter(ServiceCol::IsActive.eq(true))
        .filter(ServiceCol::Category.ne(ROOM_CATEGORY))
        .order_by_asc(ServiceCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(service_from_entity)
        .collect();
    Ok(ApiResponse::success("Services", items, Some(Meta::empty())))
}

fn service_table() -> DataTable<Service> {
    DataTable::new(vec![
        Column::new("name", "Tên dịch vụ", |s: &Service| Cell::text(&s.name)),
        Column::new("category", "Danh mục", |s: &Service| Cell::text(&s.category)),
        Column::new("price", "Giá", |s: &Service| Cell::Int(s.price)),
        Column::new("unitDisplay", "Đơn vị", |s: &Service| Cell::text(&s.unit_display)),
        Column::new("isActive", "Đang bán", |s: &Service| Cell::Bool(s.is_active)),
    ])
}

/// Back-office listing of the whole catalog, inactive entries included.
pub async fn list_all(
    state: &AppState,
    user: &AuthUser,
    query: TableQuery,
) -> AppResult<ApiResponse<TablePage<Service>>> {
    ensure_staff(user)?;
    let rows = Services::find()
        .order_by_asc(ServiceCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(service_from_entity)
        .collect();
    let (page, meta) = service_table().apply(rows, &query)?;
    Ok(ApiResponse::success("Services", page, Some(meta)))
}

pub async fn create_service(
    state: &AppState,
    user: &AuthUser,
    payload: CreateServiceRequest,
) -> AppResult<ApiResponse<Service>> {
    ensure_admin(user)?;
    payload.validate()?;

    let created = ServiceActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        price: Set(payload.price),
        unit: Set(payload.unit),
        unit_display: Set(payload.unit_display),
        category: Set(payload.category),
        is_active: Set(true),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        Some(user.user_id),
        "service_create",
        "services",
        serde_json::json!({ "service_id": created.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Service created",
        service_from_entity(created),
        Some(Meta::empty()),
    ))
}

pub async fn update_service(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateServiceRequest,
) -> AppResult<ApiResponse<Service>> {
    ensure_admin(user)?;
    if payload.price.is_some_and(|price| price < 0) {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }
    let blank = |value: &Option<String>| value.as_deref().is_some_and(|v| v.trim().is_empty());
    if blank(&payload.name) || blank(&payload.unit) || blank(&payload.category) {
        return Err(AppError::BadRequest("fields must not be empty".into()));
    }

    let existing = Services::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ServiceActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(unit) = payload.unit {
        active.unit = Set(unit);
    }
    if let Some(unit_display) = payload.unit_display {
        active.unit_display = Set(unit_display);
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    let updated = active.update(&state.orm).await?;

    audit::record(
        state,
        Some(user.user_id),
        "service_update",
        "services",
        serde_json::json!({ "service_id": updated.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Service updated",
        service_from_entity(updated),
        Some(Meta::empty()),
    ))
}

fn service_from_entity(model: ServiceModel) -> Service {
    Service {
        id: model.id,
        name: model.name,
        price: model.price,
        unit: model.unit,
        unit_display: model.unit_display,
        category: model.category,
        is_active: model.is_active,
    }
}
