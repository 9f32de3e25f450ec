use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, EntityTrait, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    dto::inventories::{AdjustInventoryRequest, CreateInventoryRequest},
    entity::inventories::{
        ActiveModel as InventoryActive, Column as InventoryCol, Entity as Inventories,
        Model as InventoryModel,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin, ensure_staff},
    models::{Inventory, is_low_stock},
    response::{ApiResponse, Meta},
    state::AppState,
    table::{Cell, Column, DataTable, TablePage, TableQuery},
};

fn inventory_table() -> DataTable<Inventory> {
    DataTable::new(vec![
        Column::new("name", "Tên vật tư", |i: &Inventory| Cell::text(&i.name)),
        Column::new("category", "Danh mục", |i: &Inventory| Cell::text(i.category)),
        Column::new("type", "Loại", |i: &Inventory| Cell::text(i.item_type)),
        Column::new("quantity", "Số lượng", |i: &Inventory| {
            Cell::Int(i64::from(i.quantity))
        }),
        Column::new("minQuantity", "Tối thiểu", |i: &Inventory| {
            Cell::Int(i64::from(i.min_quantity))
        }),
        Column::new("isLowStock", "Sắp hết", |i: &Inventory| Cell::Bool(i.is_low_stock)),
    ])
}

pub async fn list_inventories(
    state: &AppState,
    user: &AuthUser,
    query: TableQuery,
) -> AppResult<ApiResponse<TablePage<Inventory>>> {
    ensure_staff(user)?;
    let rows = all_items(state).await?;
    let (page, meta) = inventory_table().apply(rows, &query)?;
    Ok(ApiResponse::success("Inventories", page, Some(meta)))
}

/// Items at or below their minimum, emptiest first.
pub async fn list_low_stock(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<Vec<Inventory>>> {
    ensure_staff(user)?;
    let mut items: Vec<Inventory> = all_items(state)
        .await?
        .into_iter()
        .filter(|item| item.is_low_stock)
        .collect();
    items.sort_by_key(|item| item.quantity - item.min_quantity);
    Ok(ApiResponse::success("Low stock", items, Some(Meta::empty())))
}

pub async fn create_inventory(
    state: &AppState,
    user: &AuthUser,
    payload: CreateInventoryRequest,
) -> AppResult<ApiResponse<Inventory>> {
    ensure_admin(user)?;
    payload.validate()?;

    let created = InventoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        category: Set(payload.category),
        item_type: Set(payload.item_type),
        quantity: Set(payload.quantity),
        min_quantity: Set(payload.min_quantity),
        unit: Set(payload.unit),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        Some(user.user_id),
        "inventory_create",
        "inventories",
        serde_json::json!({ "inventory_id": created.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Inventory created",
        inventory_from_entity(created),
        Some(Meta::empty()),
    ))
}

/// Applies a signed stock movement; the quantity never drops below zero.
pub async fn adjust_inventory(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: AdjustInventoryRequest,
) -> AppResult<ApiResponse<Inventory>> {
    ensure_staff(user)?;
    if payload.delta == 0 {
        return Err(AppError::BadRequest("delta must not be 0".into()));
    }

    let txn = state.orm.begin().await?;
    let item = Inventories::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let quantity = item
        .quantity
        .checked_add(payload.delta)
        .filter(|quantity| *quantity >= 0)
        .ok_or_else(|| AppError::BadRequest("quantity cannot be negative".into()))?;

    let mut active: InventoryActive = item.into();
    active.quantity = Set(quantity);
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    if is_low_stock(updated.quantity, updated.min_quantity) {
        tracing::warn!(
            inventory_id = %updated.id,
            quantity = updated.quantity,
            min_quantity = updated.min_quantity,
            "inventory low on stock"
        );
    }
    audit::record(
        state,
        Some(user.user_id),
        "inventory_adjust",
        "inventories",
        serde_json::json!({ "inventory_id": updated.id, "delta": payload.delta }),
    )
    .await;

    Ok(ApiResponse::success(
        "Inventory updated",
        inventory_from_entity(updated),
        Some(Meta::empty()),
    ))
}

async fn all_items(state: &AppState) -> AppResult<Vec<Inventory>> {
    let items = Inventories::find()
        .order_by_asc(InventoryCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(inventory_from_entity)
        .collect();
    Ok(items)
}

fn inventory_from_entity(model: InventoryModel) -> Inventory {
    Inventory {
        is_low_stock: is_low_stock(model.quantity, model.min_quantity),
        id: model.id,
        name: model.name,
        category: model.category,
        item_type: model.item_type,
        quantity: model.quantity,
        min_quantity: model.min_quantity,
        unit: model.unit,
    }
}
