use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, post, put},
};
use uuid::Uuid;

use crate::{
    domain::availability::RoomOptions,
    dto::bookings::{
        AddRoomRequest, AddServicesRequest, BookingDetail, BookingLookupRequest,
        ConfirmBookingRequest, RemoveRoomRequest, UpdateBookingStatusRequest,
        UpdateTempBookingRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Booking,
    response::ApiResponse,
    services::booking_service,
    state::AppState,
    table::{TablePage, TableQuery},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_bookings))
        .route("/temp", post(create_temp))
        .route("/lookup", post(lookup))
        .route("/code/{code}", get(get_by_code))
        .route("/update/temp/{id}", put(update_temp))
        .route("/add-room/{id}", put(add_room))
        .route("/remove-room/{id}", put(remove_room))
        .route("/add-service/{id}", put(add_services))
        .route("/reset-room/{id}", put(reset_rooms))
        .route("/reset-date/{id}", put(reset_dates))
        .route("/confirm-booking/{id}", put(confirm_booking))
        .route("/{id}", get(get_booking))
        .route("/{id}/room-options", get(room_options))
        .route("/{id}/status", patch(update_status))
}

#[utoipa::path(
    post,
    path = "/api/booking/temp",
    responses(
        (status = 200, description = "Start an empty booking", body = ApiResponse<BookingDetail>)
    ),
    tag = "Booking"
)]
pub async fn create_temp(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<BookingDetail>>> {
    let resp = booking_service::create_temp(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/booking/{id}",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking with price breakdown", body = ApiResponse<BookingDetail>),
        (status = 404, description = "Not Found")
    ),
    tag = "Booking"
)]
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<BookingDetail>>> {
    let resp = booking_service::get_booking(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/booking/code/{code}",
    params(("code" = String, Path, description = "Booking code")),
    responses(
        (status = 200, description = "Booking by code", body = ApiResponse<BookingDetail>),
        (status = 404, description = "Not Found")
    ),
    tag = "Booking"
)]
pub async fn get_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<ApiResponse<BookingDetail>>> {
    let resp = booking_service::get_by_code(&state, &code).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/booking/update/temp/{id}",
    params(("id" = Uuid, Path, description = "Booking ID")),
    request_body = UpdateTempBookingRequest,
    responses(
        (status = 200, description = "Stay dates and room slots set", body = ApiResponse<BookingDetail>),
        (status = 409, description = "Not allowed in the current stage")
    ),
    tag = "Booking"
)]
pub async fn update_temp(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTempBookingRequest>,
) -> AppResult<Json<ApiResponse<BookingDetail>>> {
    let resp = booking_service::update_temp(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/booking/{id}/room-options",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Room types selectable for the next slot", body = ApiResponse<RoomOptions>),
        (status = 400, description = "Booking has no dates")
    ),
    tag = "Booking"
)]
pub async fn room_options(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<RoomOptions>>> {
    let resp = booking_service::room_options(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/booking/add-room/{id}",
    params(("id" = Uuid, Path, description = "Booking ID")),
    request_body = AddRoomRequest,
    responses(
        (status = 200, description = "Room type assigned to a slot", body = ApiResponse<BookingDetail>),
        (status = 409, description = "Room type no longer available")
    ),
    tag = "Booking"
)]
pub async fn add_room(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddRoomRequest>,
) -> AppResult<Json<ApiResponse<BookingDetail>>> {
    let resp = booking_service::add_room(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/booking/remove-room/{id}",
    params(("id" = Uuid, Path, description = "Booking ID")),
    request_body = RemoveRoomRequest,
    responses(
        (status = 200, description = "Slot unassigned", body = ApiResponse<BookingDetail>),
        (status = 409, description = "Not allowed in the current stage")
    ),
    tag = "Booking"
)]
pub async fn remove_room(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RemoveRoomRequest>,
) -> AppResult<Json<ApiResponse<BookingDetail>>> {
    let resp = booking_service::remove_room(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/booking/add-service/{id}",
    params(("id" = Uuid, Path, description = "Booking ID")),
    request_body = AddServicesRequest,
    responses(
        (status = 200, description = "Service selection replaced", body = ApiResponse<BookingDetail>),
        (status = 400, description = "Unknown or inactive service")
    ),
    tag = "Booking"
)]
pub async fn add_services(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddServicesRequest>,
) -> AppResult<Json<ApiResponse<BookingDetail>>> {
    let resp = booking_service::add_services(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/booking/reset-room/{id}",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Room assignments cleared", body = ApiResponse<BookingDetail>)
    ),
    tag = "Booking"
)]
pub async fn reset_rooms(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<BookingDetail>>> {
    let resp = booking_service::reset_rooms(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/booking/reset-date/{id}",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking back to draft", body = ApiResponse<BookingDetail>)
    ),
    tag = "Booking"
)]
pub async fn reset_dates(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<BookingDetail>>> {
    let resp = booking_service::reset_dates(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/booking/confirm-booking/{id}",
    params(("id" = Uuid, Path, description = "Booking ID")),
    request_body = ConfirmBookingRequest,
    responses(
        (status = 200, description = "Booking confirmed or awaiting payment", body = ApiResponse<BookingDetail>),
        (status = 409, description = "Rooms incomplete or customer missing")
    ),
    tag = "Booking"
)]
pub async fn confirm_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ConfirmBookingRequest>,
) -> AppResult<Json<ApiResponse<BookingDetail>>> {
    let resp = booking_service::confirm_booking(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/booking/lookup",
    request_body = BookingLookupRequest,
    responses(
        (status = 200, description = "Booking for the guest", body = ApiResponse<BookingDetail>),
        (status = 404, description = "No booking with that code and email")
    ),
    tag = "Booking"
)]
pub async fn lookup(
    State(state): State<AppState>,
    Json(payload): Json<BookingLookupRequest>,
) -> AppResult<Json<ApiResponse<BookingDetail>>> {
    let resp = booking_service::lookup(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/booking",
    params(TableQuery),
    responses(
        (status = 200, description = "Bookings table", body = ApiResponse<TablePage<Booking>>),
        (status = 400, description = "Unknown sort column"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Booking"
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<TableQuery>,
) -> AppResult<Json<ApiResponse<TablePage<Booking>>>> {
    let resp = booking_service::list_bookings(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/booking/{id}/status",
    params(("id" = Uuid, Path, description = "Booking ID")),
    request_body = UpdateBookingStatusRequest,
    responses(
        (status = 200, description = "Booking status changed", body = ApiResponse<BookingDetail>),
        (status = 409, description = "Status change not allowed"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Booking"
)]
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBookingStatusRequest>,
) -> AppResult<Json<ApiResponse<BookingDetail>>> {
    let resp = booking_service::update_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
