use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    dto::inventories::{AdjustInventoryRequest, CreateInventoryRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Inventory,
    response::ApiResponse,
    services::inventory_service,
    state::AppState,
    table::{TablePage, TableQuery},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_inventories).post(create_inventory))
        .route("/low-stock", get(list_low_stock))
        .route("/{id}", put(adjust_inventory))
}

#[utoipa::path(
    get,
    path = "/api/inventories",
    params(TableQuery),
    responses(
        (status = 200, description = "Inventory table", body = ApiResponse<TablePage<Inventory>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Inventories"
)]
pub async fn list_inventories(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<TableQuery>,
) -> AppResult<Json<ApiResponse<TablePage<Inventory>>>> {
    let resp = inventory_service::list_inventories(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/inventories/low-stock",
    responses(
        (status = 200, description = "Items at or below their minimum", body = ApiResponse<Vec<Inventory>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Inventories"
)]
pub async fn list_low_stock(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<Inventory>>>> {
    let resp = inventory_service::list_low_stock(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/inventories",
    request_body = CreateInventoryRequest,
    responses(
        (status = 200, description = "Inventory item created", body = ApiResponse<Inventory>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Inventories"
)]
pub async fn create_inventory(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateInventoryRequest>,
) -> AppResult<Json<ApiResponse<Inventory>>> {
    let resp = inventory_service::create_inventory(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/inventories/{id}",
    params(("id" = Uuid, Path, description = "Inventory item ID")),
    request_body = AdjustInventoryRequest,
    responses(
        (status = 200, description = "Stock adjusted", body = ApiResponse<Inventory>),
        (status = 400, description = "Invalid adjustment"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Inventories"
)]
pub async fn adjust_inventory(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdjustInventoryRequest>,
) -> AppResult<Json<ApiResponse<Inventory>>> {
    let resp = inventory_service::adjust_inventory(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
