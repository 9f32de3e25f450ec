use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::rooms::{
        AvailabilityResponse, CreateRoomRequest, CreateRoomTypeRequest, UpdateRoomStatusRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Room, RoomType},
    response::ApiResponse,
    routes::params::AvailabilityQuery,
    services::room_service,
    state::AppState,
    table::{TablePage, TableQuery},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rooms).post(create_room))
        .route("/available", get(available))
        .route("/types", get(list_room_types).post(create_room_type))
        .route("/types/{id}", get(get_room_type))
        .route("/{id}/status", patch(update_room_status))
}

#[utoipa::path(
    get,
    path = "/api/room/types",
    responses(
        (status = 200, description = "All room types", body = ApiResponse<Vec<RoomType>>)
    ),
    tag = "Rooms"
)]
pub async fn list_room_types(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<RoomType>>>> {
    let resp = room_service::list_room_types(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/room/types/{id}",
    params(("id" = Uuid, Path, description = "Room type ID")),
    responses(
        (status = 200, description = "Room type", body = ApiResponse<RoomType>),
        (status = 404, description = "Not Found")
    ),
    tag = "Rooms"
)]
pub async fn get_room_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<RoomType>>> {
    let resp = room_service::get_room_type(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/room/types",
    request_body = CreateRoomTypeRequest,
    responses(
        (status = 200, description = "Room type created", body = ApiResponse<RoomType>),
        (status = 400, description = "Invalid room type"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Rooms"
)]
pub async fn create_room_type(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateRoomTypeRequest>,
) -> AppResult<Json<ApiResponse<RoomType>>> {
    let resp = room_service::create_room_type(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/room",
    params(TableQuery),
    responses(
        (status = 200, description = "Rooms table", body = ApiResponse<TablePage<Room>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Rooms"
)]
pub async fn list_rooms(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<TableQuery>,
) -> AppResult<Json<ApiResponse<TablePage<Room>>>> {
    let resp = room_service::list_rooms(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/room",
    request_body = CreateRoomRequest,
    responses(
        (status = 200, description = "Room created", body = ApiResponse<Room>),
        (status = 409, description = "Room number already used"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Rooms"
)]
pub async fn create_room(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateRoomRequest>,
) -> AppResult<Json<ApiResponse<Room>>> {
    let resp = room_service::create_room(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/room/{id}/status",
    params(("id" = Uuid, Path, description = "Room ID")),
    request_body = UpdateRoomStatusRequest,
    responses(
        (status = 200, description = "Room status changed", body = ApiResponse<Room>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Rooms"
)]
pub async fn update_room_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRoomStatusRequest>,
) -> AppResult<Json<ApiResponse<Room>>> {
    let resp = room_service::update_room_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/room/available",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Rooms grouped by type for a stay", body = ApiResponse<AvailabilityResponse>),
        (status = 400, description = "Invalid date range")
    ),
    tag = "Rooms"
)]
pub async fn available(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<ApiResponse<AvailabilityResponse>>> {
    let resp = room_service::available(&state, query.check_in, query.check_out).await?;
    Ok(Json(resp))
}
