use std::collections::HashMap;

use chrono::{Duration, NaiveDate, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    domain::{
        availability::{self, RoomTypeGroup},
        booking_flow::BookingStage,
    },
    dto::rooms::{
        AvailabilityResponse, CreateRoomRequest, CreateRoomTypeRequest, UpdateRoomStatusRequest,
    },
    entity::{
        booking_rooms::{self, Column as SlotCol, Entity as BookingRooms},
        bookings::Column as BookingCol,
        room_types::{
            ActiveModel as RoomTypeActive, Column as RoomTypeCol, Entity as RoomTypes,
            Model as RoomTypeModel, StringList,
        },
        rooms::{ActiveModel as RoomActive, Column as RoomCol, Entity as Rooms, Model as RoomModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin, ensure_staff},
    models::{BookingStatus, Room, RoomStatus, RoomType},
    response::{ApiResponse, Meta},
    state::AppState,
    table::{Cell, Column, DataTable, TablePage, TableQuery},
};

/// How long a booking still being assembled keeps its assigned room types
/// out of the availability count. Bookings waiting on the gateway hold
/// until they are paid, cancelled or reset.
pub const PENDING_HOLD_MINUTES: i64 = 30;

pub async fn list_room_types(state: &AppState) -> AppResult<ApiResponse<Vec<RoomType>>> {
    let items = RoomTypes::find()
        .order_by_asc(RoomTypeCol::PricePerNight)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(room_type_from_entity)
        .collect();
    Ok(ApiResponse::success("Room types", items, Some(Meta::empty())))
}

pub async fn get_room_type(state: &AppState, id: Uuid) -> AppResult<ApiResponse<RoomType>> {
    let room_type = RoomTypes::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success(
        "Room type",
        room_type_from_entity(room_type),
        Some(Meta::empty()),
    ))
}

pub async fn create_room_type(
    state: &AppState,
    user: &AuthUser,
    payload: CreateRoomTypeRequest,
) -> AppResult<ApiResponse<RoomType>> {
    ensure_admin(user)?;
    payload.validate()?;
    if payload.max_guest < payload.capacity {
        return Err(AppError::BadRequest(
            "maxGuest must not be lower than capacity".into(),
        ));
    }

    let created = RoomTypeActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        description: Set(payload.description),
        capacity: Set(payload.capacity),
        max_guest: Set(payload.max_guest),
        price_per_night: Set(payload.price_per_night),
        extra_bed_allowed: Set(payload.extra_bed_allowed),
        extra_bed_price: Set(payload.extra_bed_price),
        amenities: Set(StringList(payload.amenities)),
        images: Set(StringList(payload.images)),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        Some(user.user_id),
        "room_type_create",
        "room_types",
        serde_json::json!({ "room_type_id": created.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Room type created",
        room_type_from_entity(created),
        Some(Meta::empty()),
    ))
}

fn room_table() -> DataTable<Room> {
    DataTable::new(vec![
        Column::new("roomNumber", "Số phòng", |r: &Room| Cell::text(&r.room_number)),
        Column::new("floor", "Tầng", |r: &Room| Cell::Int(i64::from(r.floor))),
        Column::new("status", "Trạng thái", |r: &Room| Cell::text(r.status)),
        Column::new("typeId", "Loại phòng", |r: &Room| Cell::text(r.type_id)),
    ])
}

pub async fn list_rooms(
    state: &AppState,
    user: &AuthUser,
    query: TableQuery,
) -> AppResult<ApiResponse<TablePage<Room>>> {
    ensure_staff(user)?;
    let rows: Vec<Room> = Rooms::find()
        .order_by_asc(RoomCol::RoomNumber)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(room_from_entity)
        .collect();
    let (page, meta) = room_table().apply(rows, &query)?;
    Ok(ApiResponse::success("Rooms", page, Some(meta)))
}

pub async fn create_room(
    state: &AppState,
    user: &AuthUser,
    payload: CreateRoomRequest,
) -> AppResult<ApiResponse<Room>> {
    ensure_admin(user)?;
    payload.validate()?;
    RoomTypes::find_by_id(payload.type_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::BadRequest("Unknown room type".into()))?;

    let exists = Rooms::find()
        .filter(RoomCol::RoomNumber.eq(payload.room_number.clone()))
        .one(&state.orm)
        .await?;
    if exists.is_some() {
        return Err(AppError::Conflict(format!(
            "Room {} already exists",
            payload.room_number
        )));
    }

    let created = RoomActive {
        id: Set(Uuid::new_v4()),
        room_number: Set(payload.room_number),
        floor: Set(payload.floor),
        status: Set(RoomStatus::Available),
        type_id: Set(payload.type_id),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Room created",
        room_from_entity(created),
        Some(Meta::empty()),
    ))
}

pub async fn update_room_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateRoomStatusRequest,
) -> AppResult<ApiResponse<Room>> {
    ensure_staff(user)?;
    let room = Rooms::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let previous = room.status;

    let mut active: RoomActive = room.into();
    active.status = Set(payload.status);
    let updated = active.update(&state.orm).await?;

    audit::record(
        state,
        Some(user.user_id),
        "room_status_update",
        "rooms",
        serde_json::json!({ "room_id": updated.id, "from": previous, "to": updated.status }),
    )
    .await;

    Ok(ApiResponse::success(
        "Room updated",
        room_from_entity(updated),
        Some(Meta::empty()),
    ))
}

pub async fn available(
    state: &AppState,
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> AppResult<ApiResponse<AvailabilityResponse>> {
    if check_out <= check_in {
        return Err(AppError::BadRequest(
            "checkOut must be after checkIn".into(),
        ));
    }
    let groups = availability(&state.orm, check_in, check_out, None, None).await?;
    Ok(ApiResponse::success(
        "Available rooms",
        AvailabilityResponse { groups },
        Some(Meta::empty()),
    ))
}

/// Room-type groups for a stay. A stay starting today sees rooms as they
/// physically are; a later stay counts every room of the type. Free rooms
/// claimed by overlapping bookings are then reported as `reserved`.
/// `exclude_booking` leaves one booking's own claims out of the count;
/// `only_type` narrows the result to a single room type.
pub async fn availability<C: ConnectionTrait>(
    conn: &C,
    check_in: NaiveDate,
    check_out: NaiveDate,
    exclude_booking: Option<Uuid>,
    only_type: Option<Uuid>,
) -> AppResult<Vec<RoomTypeGroup>> {
    let mut type_finder = RoomTypes::find().order_by_asc(RoomTypeCol::PricePerNight);
    if let Some(type_id) = only_type {
        type_finder = type_finder.filter(RoomTypeCol::Id.eq(type_id));
    }
    let room_types = type_finder.all(conn).await?;
    let type_ids: Vec<Uuid> = room_types.iter().map(|t| t.id).collect();

    let rooms = Rooms::find()
        .filter(RoomCol::TypeId.is_in(type_ids.clone()))
        .order_by_asc(RoomCol::RoomNumber)
        .all(conn)
        .await?;

    let today = availability::hotel_today();
    let starts_today = check_in <= today;
    let claims = overlapping_claims(
        conn,
        check_in,
        check_out,
        exclude_booking,
        &type_ids,
        !starts_today,
    )
    .await?;

    let mut rooms_by_type: HashMap<Uuid, Vec<Room>> = HashMap::new();
    for room in rooms {
        let mut room = room_from_entity(room);
        room.status = availability::status_for_stay(room.status, check_in, today);
        rooms_by_type.entry(room.type_id).or_default().push(room);
    }

    let groups = room_types
        .into_iter()
        .map(|room_type| {
            let mut rooms = rooms_by_type.remove(&room_type.id).unwrap_or_default();
            let mut claimed = claims.get(&room_type.id).copied().unwrap_or(0);
            for room in rooms.iter_mut() {
                if claimed == 0 {
                    break;
                }
                if room.status == RoomStatus::Available {
                    room.status = RoomStatus::Reserved;
                    claimed -= 1;
                }
            }
            RoomTypeGroup {
                room_type: room_type_from_entity(room_type),
                rooms,
            }
        })
        .collect();

    Ok(groups)
}

/// Slots of other bookings overlapping the stay, counted per room type.
/// Booked, in-house and gateway-pending bookings always count; bookings
/// still being assembled only while their hold is fresh. Slots already
/// holding a physical room count only when `include_attached` is set,
/// since for a stay starting today that room is out of the pool anyway.
async fn overlapping_claims<C: ConnectionTrait>(
    conn: &C,
    check_in: NaiveDate,
    check_out: NaiveDate,
    exclude_booking: Option<Uuid>,
    type_ids: &[Uuid],
    include_attached: bool,
) -> AppResult<HashMap<Uuid, i64>> {
    let hold_since = Utc::now() - Duration::minutes(PENDING_HOLD_MINUTES);
    let active = Condition::any()
        .add(BookingCol::Status.is_in([BookingStatus::Booked, BookingStatus::CheckedIn]))
        .add(
            Condition::all()
                .add(BookingCol::Status.eq(BookingStatus::Pending))
                .add(BookingCol::Stage.eq(BookingStage::AwaitingPayment)),
        )
        .add(
            Condition::all()
                .add(BookingCol::Status.eq(BookingStatus::Pending))
                .add(BookingCol::Stage.ne(BookingStage::Draft))
                .add(BookingCol::UpdatedAt.gt(hold_since)),
        );

    let mut condition = Condition::all()
        .add(SlotCol::DesiredRoomTypeId.is_in(type_ids.to_vec()))
        .add(BookingCol::ExpectedCheckInDate.lt(check_out))
        .add(BookingCol::ExpectedCheckOutDate.gt(check_in))
        .add(active);
    if !include_attached {
        condition = condition.add(SlotCol::RoomId.is_null());
    }
    if let Some(booking_id) = exclude_booking {
        condition = condition.add(BookingCol::Id.ne(booking_id));
    }

    let slots: Vec<booking_rooms::Model> = BookingRooms::find()
        .join(JoinType::InnerJoin, booking_rooms::Relation::Bookings.def())
        .filter(condition)
        .all(conn)
        .await?;

    let mut claims: HashMap<Uuid, i64> = HashMap::new();
    for slot in slots {
        if let Some(type_id) = slot.desired_room_type_id {
            *claims.entry(type_id).or_default() += 1;
        }
    }
    Ok(claims)
}

pub(crate) fn room_type_from_entity(model: RoomTypeModel) -> RoomType {
    RoomType {
        id: model.id,
        name: model.name,
        description: model.description,
        capacity: model.capacity,
        max_guest: model.max_guest,
        price_per_night: model.price_per_night,
        extra_bed_allowed: model.extra_bed_allowed,
        extra_bed_price: model.extra_bed_price,
        amenities: model.amenities.0,
        images: model.images.0,
    }
}

pub(crate) fn room_from_entity(model: RoomModel) -> Room {
    Room {
        id: model.id,
        room_number: model.room_number,
        floor: model.floor,
        status: model.status,
        type_id: model.type_id,
    }
}
