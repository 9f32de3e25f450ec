use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    domain::{
        availability::{self, NO_MATCHING_ROOMS_MESSAGE, RoomOptions, SlotDemand},
        booking_flow::{self, BookingEvent, BookingStage, FlowError},
        pricing::{self, BookingTotals, PricedRoom},
    },
    dto::bookings::{
        AddRoomRequest, AddServicesRequest, BookingDetail, BookingLookupRequest,
        ConfirmBookingRequest, MAX_SERVICE_QUANTITY, RemoveRoomRequest, ServiceSelection,
        UpdateBookingStatusRequest, UpdateTempBookingRequest,
    },
    entity::{
        booking_rooms::{
            ActiveModel as SlotActive, Column as SlotCol, Entity as BookingRooms,
            Model as SlotModel, ServiceLines,
        },
        booking_services::{
            ActiveModel as BookingServiceActive, Column as BookingServiceCol,
            Entity as BookingServices, Model as BookingServiceModel,
        },
        bookings::{
            ActiveModel as BookingActive, Column as BookingCol, Entity as Bookings,
            Model as BookingModel,
        },
        customers::Entity as Customers,
        room_types::{Column as RoomTypeCol, Entity as RoomTypes},
        rooms::{ActiveModel as RoomActive, Column as RoomCol, Entity as Rooms},
        services::{Column as ServiceCol, Entity as Services},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_staff},
    models::{
        Booking, BookingRoom, BookingServiceItem, BookingStatus, PaymentStatus, RoomSnapshot,
        RoomStatus, ServiceLine,
    },
    response::{ApiResponse, Meta},
    services::{catalog_service::ROOM_CATEGORY, room_service},
    state::AppState,
    table::{Cell, Column, DataTable, TablePage, TableQuery},
};

pub async fn create_temp(state: &AppState) -> AppResult<ApiResponse<BookingDetail>> {
    let id = Uuid::new_v4();
    let booking = BookingActive {
        id: Set(id),
        booking_code: Set(build_booking_code(id)),
        status: Set(BookingStatus::Pending),
        payment_status: Set(PaymentStatus::Unpaid),
        payment_method: Set(None),
        stage: Set(BookingStage::Draft),
        expected_check_in_date: Set(None),
        expected_check_out_date: Set(None),
        customer_id: Set(None),
        customer_snapshot: Set(None),
        total_price: Set(0),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::debug!(booking_id = %booking.id, code = %booking.booking_code, "temporary booking created");
    let detail = detail_of(&state.orm, booking).await?;
    Ok(ApiResponse::success(
        "Booking created",
        detail,
        Some(Meta::empty()),
    ))
}

pub async fn get_booking(state: &AppState, id: Uuid) -> AppResult<ApiResponse<BookingDetail>> {
    let booking = Bookings::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let detail = detail_of(&state.orm, booking).await?;
    Ok(ApiResponse::success("Booking", detail, Some(Meta::empty())))
}

pub async fn get_by_code(state: &AppState, code: &str) -> AppResult<ApiResponse<BookingDetail>> {
    let booking = find_by_code(&state.orm, code).await?;
    let detail = detail_of(&state.orm, booking).await?;
    Ok(ApiResponse::success("Booking", detail, Some(Meta::empty())))
}

pub async fn update_temp(
    state: &AppState,
    id: Uuid,
    payload: UpdateTempBookingRequest,
) -> AppResult<ApiResponse<BookingDetail>> {
    if payload.rooms.iter().any(|room| room.number_of_children < 0) {
        return Err(AppError::BadRequest(
            "numberOfChildren must not be negative".into(),
        ));
    }

    let txn = state.orm.begin().await?;
    let booking = lock_booking(&txn, id).await?;
    let slots = load_slots(&txn, id).await?;

    let event = BookingEvent::SetDates {
        check_in: payload.check_in_date,
        check_out: payload.check_out_date,
        adults: payload.rooms.iter().map(|room| room.number_of_adults).collect(),
        today: availability::hotel_today(),
    };
    let next = booking_flow::transition(booking.stage, booking.status, &demands(&slots), &event)?;

    BookingRooms::delete_many()
        .filter(SlotCol::BookingId.eq(id))
        .exec(&txn)
        .await?;

    for (position, room) in payload.rooms.iter().enumerate() {
        SlotActive {
            id: Set(Uuid::new_v4()),
            booking_id: Set(id),
            position: Set(position as i32),
            desired_room_type_id: Set(None),
            room_id: Set(None),
            room_snapshot: Set(None),
            number_of_adults: Set(room.number_of_adults),
            number_of_children: Set(room.number_of_children),
            price_per_night: Set(0),
            expected_check_in_date: Set(Some(payload.check_in_date)),
            expected_check_out_date: Set(Some(payload.check_out_date)),
            actual_check_in_date: Set(None),
            actual_check_out_date: Set(None),
            status: Set(booking.status),
            additional_services: Set(ServiceLines::default()),
        }
        .insert(&txn)
        .await?;
    }

    let mut active: BookingActive = booking.into();
    active.expected_check_in_date = Set(Some(payload.check_in_date));
    active.expected_check_out_date = Set(Some(payload.check_out_date));
    let booking = active.update(&txn).await?;
    let booking = finish(&txn, booking, next).await?;
    let detail = detail_of(&txn, booking).await?;
    txn.commit().await?;

    audit::record(
        state,
        None,
        "booking_dates_set",
        "bookings",
        serde_json::json!({
            "booking_id": id,
            "check_in": payload.check_in_date,
            "check_out": payload.check_out_date,
            "rooms": payload.rooms.len(),
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Booking updated",
        detail,
        Some(Meta::empty()),
    ))
}

/// Selectable room types for the first slot still lacking one.
pub async fn room_options(state: &AppState, id: Uuid) -> AppResult<ApiResponse<RoomOptions>> {
    let booking = Bookings::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let (check_in, check_out) = stay_dates(&booking)?;
    let slots = load_slots(&state.orm, id).await?;

    let groups =
        room_service::availability(&state.orm, check_in, check_out, Some(id), None).await?;
    let options = availability::room_options(
        &groups,
        &demands(&slots),
        pricing::nights(check_in, check_out),
    );

    let message = match &options {
        RoomOptions::AllRoomsAssigned { message } => message.clone(),
        RoomOptions::NoMatchingRooms { message, .. } => message.clone(),
        RoomOptions::Available { .. } => "Room options".to_string(),
    };
    Ok(ApiResponse::success(message, options, Some(Meta::empty())))
}

pub async fn add_room(
    state: &AppState,
    id: Uuid,
    payload: AddRoomRequest,
) -> AppResult<ApiResponse<BookingDetail>> {
    let txn = state.orm.begin().await?;
    let booking = lock_booking(&txn, id).await?;
    let (check_in, check_out) = stay_dates(&booking)?;
    let slots = load_slots(&txn, id).await?;
    let demand = demands(&slots);

    let next = booking_flow::transition(
        booking.stage,
        booking.status,
        &demand,
        &BookingEvent::AssignRoom {
            slot_index: payload.room_index,
        },
    )?;
    let slot = slots
        .get(payload.room_index)
        .cloned()
        .ok_or(FlowError::SlotNotFound(payload.room_index))?;

    // Serializes assignments of the same room type across bookings.
    let room_type = RoomTypes::find_by_id(payload.room_type_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::BadRequest("Unknown room type".into()))?;

    let groups = room_service::availability(
        &txn,
        check_in,
        check_out,
        Some(id),
        Some(room_type.id),
    )
    .await?;
    let option = availability::selectable(
        &groups,
        &demand,
        slot.number_of_adults,
        pricing::nights(check_in, check_out),
    )
    .into_iter()
    .find(|option| option.room_type.id == room_type.id)
    .ok_or_else(|| AppError::Conflict(NO_MATCHING_ROOMS_MESSAGE.to_string()))?;

    let snapshot = RoomSnapshot {
        room_type_name: option.room_type.name.clone(),
        capacity: option.room_type.capacity,
        room_number: None,
        floor: None,
    };
    let mut active: SlotActive = slot.into();
    active.desired_room_type_id = Set(Some(room_type.id));
    active.price_per_night = Set(option.price.per_night);
    active.room_snapshot = Set(Some(snapshot));
    active.update(&txn).await?;

    let booking = finish(&txn, booking, next).await?;
    let detail = detail_of(&txn, booking).await?;
    txn.commit().await?;

    tracing::info!(
        booking_id = %id,
        room_type_id = %room_type.id,
        slot = payload.room_index,
        price_per_night = option.price.per_night,
        "room type assigned"
    );

    Ok(ApiResponse::success("Room added", detail, Some(Meta::empty())))
}

pub async fn remove_room(
    state: &AppState,
    id: Uuid,
    payload: RemoveRoomRequest,
) -> AppResult<ApiResponse<BookingDetail>> {
    let txn = state.orm.begin().await?;
    let booking = lock_booking(&txn, id).await?;
    let slots = load_slots(&txn, id).await?;

    let next = booking_flow::transition(
        booking.stage,
        booking.status,
        &demands(&slots),
        &BookingEvent::RemoveRoom {
            slot_index: payload.room_index,
        },
    )?;
    let slot = slots
        .get(payload.room_index)
        .cloned()
        .ok_or(FlowError::SlotNotFound(payload.room_index))?;

    clear_assignment(&txn, slot).await?;

    let booking = finish(&txn, booking, next).await?;
    let detail = detail_of(&txn, booking).await?;
    txn.commit().await?;

    Ok(ApiResponse::success(
        "Room removed",
        detail,
        Some(Meta::empty()),
    ))
}

/// Replaces the booking-level service selection.
pub async fn add_services(
    state: &AppState,
    id: Uuid,
    payload: AddServicesRequest,
) -> AppResult<ApiResponse<BookingDetail>> {
    payload.validate()?;
    let wanted = merge_selections(&payload.services)?;

    let txn = state.orm.begin().await?;
    let booking = lock_booking(&txn, id).await?;
    let slots = load_slots(&txn, id).await?;
    let next = booking_flow::transition(
        booking.stage,
        booking.status,
        &demands(&slots),
        &BookingEvent::ChooseServices,
    )?;

    let catalog: HashMap<Uuid, _> = Services::find()
        .filter(ServiceCol::Id.is_in(wanted.keys().copied().collect::<Vec<_>>()))
        .all(&txn)
        .await?
        .into_iter()
        .map(|service| (service.id, service))
        .collect();

    BookingServices::delete_many()
        .filter(BookingServiceCol::BookingId.eq(id))
        .exec(&txn)
        .await?;

    for (service_id, quantity) in &wanted {
        let service = catalog
            .get(service_id)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown service {service_id}")))?;
        if !service.is_active || service.category == ROOM_CATEGORY {
            return Err(AppError::BadRequest(format!(
                "Service {} is not available for booking",
                service.name
            )));
        }
        BookingServiceActive {
            id: Set(Uuid::new_v4()),
            booking_id: Set(id),
            service_id: Set(*service_id),
            quantity: Set(*quantity),
            price: Set(service.price),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
    }

    let booking = finish(&txn, booking, next).await?;
    let detail = detail_of(&txn, booking).await?;
    txn.commit().await?;

    Ok(ApiResponse::success(
        "Services updated",
        detail,
        Some(Meta::empty()),
    ))
}

/// Folds repeated lines for one service into a single quantity. Zero lines
/// are dropped; merged totals stay within `MAX_SERVICE_QUANTITY`.
pub fn merge_selections(selections: &[ServiceSelection]) -> AppResult<BTreeMap<Uuid, i32>> {
    let mut wanted: BTreeMap<Uuid, i32> = BTreeMap::new();
    for selection in selections {
        if selection.quantity < 0 {
            return Err(AppError::BadRequest("quantity must not be negative".into()));
        }
        if selection.quantity == 0 {
            continue;
        }
        let quantity = wanted.entry(selection.service_id).or_default();
        *quantity = quantity
            .checked_add(selection.quantity)
            .filter(|sum| *sum <= MAX_SERVICE_QUANTITY)
            .ok_or_else(|| {
                AppError::BadRequest(format!(
                    "quantity of service {} must not exceed {MAX_SERVICE_QUANTITY}",
                    selection.service_id
                ))
            })?;
    }
    Ok(wanted)
}

/// Clears every room-type assignment and the service selection; dates stay.
pub async fn reset_rooms(state: &AppState, id: Uuid) -> AppResult<ApiResponse<BookingDetail>> {
    let txn = state.orm.begin().await?;
    let booking = lock_booking(&txn, id).await?;
    let slots = load_slots(&txn, id).await?;
    let next = booking_flow::transition(
        booking.stage,
        booking.status,
        &demands(&slots),
        &BookingEvent::ResetRooms,
    )?;

    for slot in slots.into_iter().filter(|slot| slot.desired_room_type_id.is_some()) {
        clear_assignment(&txn, slot).await?;
    }
    BookingServices::delete_many()
        .filter(BookingServiceCol::BookingId.eq(id))
        .exec(&txn)
        .await?;

    let mut active: BookingActive = booking.into();
    active.payment_method = Set(None);
    let booking = active.update(&txn).await?;
    let booking = finish(&txn, booking, next).await?;
    let detail = detail_of(&txn, booking).await?;
    txn.commit().await?;

    audit::record(
        state,
        None,
        "booking_reset_rooms",
        "bookings",
        serde_json::json!({ "booking_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Room selection reset",
        detail,
        Some(Meta::empty()),
    ))
}

/// Drops dates, room slots and services, returning the booking to a draft.
pub async fn reset_dates(state: &AppState, id: Uuid) -> AppResult<ApiResponse<BookingDetail>> {
    let txn = state.orm.begin().await?;
    let booking = lock_booking(&txn, id).await?;
    let slots = load_slots(&txn, id).await?;
    let next = booking_flow::transition(
        booking.stage,
        booking.status,
        &demands(&slots),
        &BookingEvent::ResetDates,
    )?;

    BookingRooms::delete_many()
        .filter(SlotCol::BookingId.eq(id))
        .exec(&txn)
        .await?;
    BookingServices::delete_many()
        .filter(BookingServiceCol::BookingId.eq(id))
        .exec(&txn)
        .await?;

    let mut active: BookingActive = booking.into();
    active.expected_check_in_date = Set(None);
    active.expected_check_out_date = Set(None);
    active.payment_method = Set(None);
    let booking = active.update(&txn).await?;
    let booking = finish(&txn, booking, next).await?;
    let detail = detail_of(&txn, booking).await?;
    txn.commit().await?;

    audit::record(
        state,
        None,
        "booking_reset_dates",
        "bookings",
        serde_json::json!({ "booking_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Booking dates reset",
        detail,
        Some(Meta::empty()),
    ))
}

pub async fn confirm_booking(
    state: &AppState,
    id: Uuid,
    payload: ConfirmBookingRequest,
) -> AppResult<ApiResponse<BookingDetail>> {
    let txn = state.orm.begin().await?;
    let booking = lock_booking(&txn, id).await?;
    let slots = load_slots(&txn, id).await?;
    let customer = Customers::find_by_id(payload.customer_id).one(&txn).await?;

    let next = booking_flow::transition(
        booking.stage,
        booking.status,
        &demands(&slots),
        &BookingEvent::Confirm {
            method: payload.payment_method,
            customer_linked: customer.is_some(),
        },
    )?;
    let Some(customer) = customer else {
        return Err(FlowError::CustomerMissing.into());
    };
    ensure_rooms_free(&txn, &booking).await?;

    let mut active: BookingActive = booking.into();
    active.customer_id = Set(Some(customer.id));
    active.customer_snapshot = Set(Some(serde_json::json!({
        "fullName": customer.full_name,
        "email": customer.email,
        "phone": customer.phone,
        "nationality": customer.nationality,
    })));
    active.payment_method = Set(Some(payload.payment_method));
    let booking = active.update(&txn).await?;
    let booking = finish(&txn, booking, next).await?;
    let detail = detail_of(&txn, booking).await?;
    txn.commit().await?;

    audit::record(
        state,
        None,
        "booking_confirm",
        "bookings",
        serde_json::json!({
            "booking_id": id,
            "customer_id": customer.id,
            "payment_method": payload.payment_method,
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Booking confirmed",
        detail,
        Some(Meta::empty()),
    ))
}

/// Public lookup: the booking code must belong to the given email.
pub async fn lookup(
    state: &AppState,
    payload: BookingLookupRequest,
) -> AppResult<ApiResponse<BookingDetail>> {
    payload.validate()?;
    let booking = find_for_guest(&state.orm, &payload.booking_code, &payload.email).await?;
    let detail = detail_of(&state.orm, booking).await?;
    Ok(ApiResponse::success("Booking", detail, Some(Meta::empty())))
}

fn booking_table() -> DataTable<Booking> {
    DataTable::new(vec![
        Column::new("bookingCode", "Mã đặt phòng", |b: &Booking| {
            Cell::text(&b.booking_code)
        }),
        Column::new("customer", "Khách hàng", |b: &Booking| {
            b.customer_snapshot
                .as_ref()
                .and_then(|snapshot| snapshot.get("fullName"))
                .and_then(|name| name.as_str())
                .map(Cell::text)
                .unwrap_or(Cell::Empty)
        }),
        Column::new("checkIn", "Nhận phòng", |b: &Booking| {
            Cell::from(b.expected_check_in_date)
        }),
        Column::new("checkOut", "Trả phòng", |b: &Booking| {
            Cell::from(b.expected_check_out_date)
        }),
        Column::new("status", "Trạng thái", |b: &Booking| Cell::text(b.status)),
        Column::new("paymentStatus", "Thanh toán", |b: &Booking| {
            Cell::text(b.payment_status)
        }),
        Column::new("totalPrice", "Tổng tiền", |b: &Booking| Cell::Int(b.total_price)),
        Column::new("createdAt", "Ngày tạo", |b: &Booking| Cell::Time(b.created_at)),
    ])
}

pub async fn list_bookings(
    state: &AppState,
    user: &AuthUser,
    query: TableQuery,
) -> AppResult<ApiResponse<TablePage<Booking>>> {
    ensure_staff(user)?;
    let bookings = Bookings::find()
        .order_by_desc(BookingCol::CreatedAt)
        .all(&state.orm)
        .await?;
    let rows = assemble(&state.orm, bookings)
        .await?
        .into_iter()
        .map(|detail| detail.booking)
        .collect();
    let (page, meta) = booking_table().apply(rows, &query)?;
    Ok(ApiResponse::success("Bookings", page, Some(meta)))
}

pub async fn update_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateBookingStatusRequest,
) -> AppResult<ApiResponse<BookingDetail>> {
    ensure_staff(user)?;
    let txn = state.orm.begin().await?;
    let booking = lock_booking(&txn, id).await?;
    let previous = booking.status;

    if previous.is_final() {
        return Err(FlowError::BookingClosed(previous).into());
    }
    if !previous.can_become(payload.status) {
        return Err(AppError::Conflict(format!(
            "Cannot change booking status from {previous} to {}",
            payload.status
        )));
    }

    let now = Utc::now();
    let mut slot_update = BookingRooms::update_many()
        .col_expr(SlotCol::Status, Expr::value(payload.status))
        .filter(SlotCol::BookingId.eq(id));
    match payload.status {
        BookingStatus::CheckedIn => {
            slot_update = slot_update.col_expr(
                SlotCol::ActualCheckInDate,
                Expr::value(chrono::DateTime::<chrono::FixedOffset>::from(now)),
            );
        }
        BookingStatus::CheckedOut => {
            slot_update = slot_update.col_expr(
                SlotCol::ActualCheckOutDate,
                Expr::value(chrono::DateTime::<chrono::FixedOffset>::from(now)),
            );
        }
        _ => {}
    }
    slot_update.exec(&txn).await?;
    match payload.status {
        BookingStatus::CheckedIn => attach_rooms(&txn, id).await?,
        BookingStatus::CheckedOut => release_rooms(&txn, id).await?,
        _ => {}
    }

    let mut active: BookingActive = booking.into();
    active.status = Set(payload.status);
    active.updated_at = Set(now.into());
    let booking = active.update(&txn).await?;
    let detail = detail_of(&txn, booking).await?;
    txn.commit().await?;

    audit::record(
        state,
        Some(user.user_id),
        "booking_status_update",
        "bookings",
        serde_json::json!({ "booking_id": id, "from": previous, "to": payload.status }),
    )
    .await;

    Ok(ApiResponse::success(
        "Booking status updated",
        detail,
        Some(Meta::empty()),
    ))
}

/// Gives every slot a physical room of its assigned type and marks the room occupied.
async fn attach_rooms(txn: &DatabaseTransaction, booking_id: Uuid) -> AppResult<()> {
    for slot in load_slots(txn, booking_id).await? {
        let Some(type_id) = slot.desired_room_type_id else {
            continue;
        };
        if slot.room_id.is_some() {
            continue;
        }
        let room = Rooms::find()
            .filter(RoomCol::TypeId.eq(type_id))
            .filter(RoomCol::Status.eq(RoomStatus::Available))
            .order_by_asc(RoomCol::RoomNumber)
            .lock(LockType::Update)
            .one(txn)
            .await?
            .ok_or_else(|| {
                AppError::Conflict(format!("No free room left for room {}", slot.position + 1))
            })?;

        let mut snapshot = slot.room_snapshot.clone().unwrap_or_default();
        snapshot.room_number = Some(room.room_number.clone());
        snapshot.floor = Some(room.floor);
        let room_id = room.id;

        let mut room: RoomActive = room.into();
        room.status = Set(RoomStatus::Occupied);
        room.update(txn).await?;

        let mut active: SlotActive = slot.into();
        active.room_id = Set(Some(room_id));
        active.room_snapshot = Set(Some(snapshot));
        active.update(txn).await?;
    }
    Ok(())
}

async fn release_rooms(txn: &DatabaseTransaction, booking_id: Uuid) -> AppResult<()> {
    let room_ids: Vec<Uuid> = load_slots(txn, booking_id)
        .await?
        .into_iter()
        .filter_map(|slot| slot.room_id)
        .collect();
    if room_ids.is_empty() {
        return Ok(());
    }
    Rooms::update_many()
        .col_expr(RoomCol::Status, Expr::value(RoomStatus::NeedCleaning))
        .filter(RoomCol::Id.is_in(room_ids))
        .exec(txn)
        .await?;
    Ok(())
}

/// Re-counts the booking's room types under their row locks. An assembly
/// hold can lapse before confirmation, and another booking may have taken
/// the last room of a type in the meantime.
pub(crate) async fn ensure_rooms_free(
    txn: &DatabaseTransaction,
    booking: &BookingModel,
) -> AppResult<()> {
    let (check_in, check_out) = stay_dates(booking)?;
    let slots = load_slots(txn, booking.id).await?;
    let type_ids: Vec<Uuid> = slots
        .iter()
        .filter_map(|slot| slot.desired_room_type_id)
        .collect();
    if type_ids.is_empty() {
        return Ok(());
    }

    RoomTypes::find()
        .filter(RoomTypeCol::Id.is_in(type_ids))
        .order_by_asc(RoomTypeCol::Id)
        .lock(LockType::Update)
        .all(txn)
        .await?;

    let groups =
        room_service::availability(txn, check_in, check_out, Some(booking.id), None).await?;
    match availability::first_shortage(&groups, &demands(&slots)) {
        None => Ok(()),
        Some(type_id) => {
            let name = groups
                .iter()
                .find(|group| group.room_type.id == type_id)
                .map(|group| group.room_type.name.clone())
                .unwrap_or_else(|| type_id.to_string());
            Err(AppError::Conflict(format!(
                "{name} is fully booked for these dates"
            )))
        }
    }
}

/// Cancels a booking that never reached `booked`, together with its slots.
pub(crate) async fn cancel_pending(
    txn: &DatabaseTransaction,
    booking: BookingModel,
) -> AppResult<BookingModel> {
    BookingRooms::update_many()
        .col_expr(SlotCol::Status, Expr::value(BookingStatus::Cancelled))
        .filter(SlotCol::BookingId.eq(booking.id))
        .exec(txn)
        .await?;
    let mut active: BookingActive = booking.into();
    active.status = Set(BookingStatus::Cancelled);
    active.updated_at = Set(Utc::now().into());
    let booking = active.update(txn).await?;
    Ok(booking)
}

/// Applies an event that changes only the stage (e.g. a payment outcome).
pub(crate) async fn advance(
    txn: &DatabaseTransaction,
    booking: BookingModel,
    event: &BookingEvent,
) -> AppResult<BookingModel> {
    let slots = load_slots(txn, booking.id).await?;
    let next = booking_flow::transition(booking.stage, booking.status, &demands(&slots), event)?;
    finish(txn, booking, next).await
}

pub(crate) async fn lock_booking(txn: &DatabaseTransaction, id: Uuid) -> AppResult<BookingModel> {
    Bookings::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or(AppError::NotFound)
}

pub(crate) async fn find_by_code<C: ConnectionTrait>(
    conn: &C,
    code: &str,
) -> AppResult<BookingModel> {
    Bookings::find()
        .filter(BookingCol::BookingCode.eq(code.trim().to_uppercase()))
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)
}

/// Resolves a booking from its code, provided `email` is the address the
/// guest confirmed it with. Mismatches look like unknown codes.
pub(crate) async fn find_for_guest<C: ConnectionTrait>(
    conn: &C,
    code: &str,
    email: &str,
) -> AppResult<BookingModel> {
    let booking = find_by_code(conn, code).await?;

    let snapshot_email = booking
        .customer_snapshot
        .as_ref()
        .and_then(|snapshot| snapshot.get("email"))
        .and_then(|email| email.as_str())
        .map(str::to_string);
    let booking_email = match (snapshot_email, booking.customer_id) {
        (Some(email), _) => Some(email),
        (None, Some(customer_id)) => Customers::find_by_id(customer_id)
            .one(conn)
            .await?
            .map(|customer| customer.email),
        (None, None) => None,
    };

    if booking_email.is_some_and(|known| known.eq_ignore_ascii_case(email.trim())) {
        Ok(booking)
    } else {
        Err(AppError::NotFound)
    }
}

fn stay_dates(booking: &BookingModel) -> AppResult<(NaiveDate, NaiveDate)> {
    match (booking.expected_check_in_date, booking.expected_check_out_date) {
        (Some(check_in), Some(check_out)) => Ok((check_in, check_out)),
        _ => Err(AppError::BadRequest("Booking has no stay dates yet".into())),
    }
}

async fn load_slots<C: ConnectionTrait>(conn: &C, booking_id: Uuid) -> AppResult<Vec<SlotModel>> {
    let slots = BookingRooms::find()
        .filter(SlotCol::BookingId.eq(booking_id))
        .order_by_asc(SlotCol::Position)
        .all(conn)
        .await?;
    Ok(slots)
}

fn demands(slots: &[SlotModel]) -> Vec<SlotDemand> {
    slots
        .iter()
        .map(|slot| SlotDemand {
            desired_room_type_id: slot.desired_room_type_id,
            number_of_adults: slot.number_of_adults,
        })
        .collect()
}

async fn clear_assignment(txn: &DatabaseTransaction, slot: SlotModel) -> AppResult<()> {
    let mut active: SlotActive = slot.into();
    active.desired_room_type_id = Set(None);
    active.room_id = Set(None);
    active.room_snapshot = Set(None);
    active.price_per_night = Set(0);
    active.update(txn).await?;
    Ok(())
}

fn totals(
    booking: &BookingModel,
    slots: &[SlotModel],
    services: &[BookingServiceModel],
) -> BookingTotals {
    let nights = pricing::nights_between(
        booking.expected_check_in_date,
        booking.expected_check_out_date,
    );
    let rooms: Vec<PricedRoom> = slots
        .iter()
        .map(|slot| PricedRoom {
            price_per_night: slot.price_per_night,
            additional_services: slot.additional_services.0.clone(),
        })
        .collect();
    let lines: Vec<ServiceLine> = services
        .iter()
        .map(|service| ServiceLine {
            service_id: service.service_id,
            quantity: service.quantity,
            price: service.price,
        })
        .collect();
    pricing::booking_totals(nights, &rooms, &lines)
}

/// Stores the new stage and recomputed total; entering a stage that
/// implies a status (confirmation) moves the booking and its rooms too.
async fn finish(
    txn: &DatabaseTransaction,
    booking: BookingModel,
    stage: BookingStage,
) -> AppResult<BookingModel> {
    let slots = load_slots(txn, booking.id).await?;
    let services = BookingServices::find()
        .filter(BookingServiceCol::BookingId.eq(booking.id))
        .all(txn)
        .await?;
    let total = totals(&booking, &slots, &services).total;
    let entered = booking_flow::status_on_enter(stage).filter(|status| *status != booking.status);

    let booking_id = booking.id;
    let mut active: BookingActive = booking.into();
    active.stage = Set(stage);
    active.total_price = Set(total);
    active.updated_at = Set(Utc::now().into());
    if let Some(status) = entered {
        active.status = Set(status);
    }
    let booking = active.update(txn).await?;

    if let Some(status) = entered {
        BookingRooms::update_many()
            .col_expr(SlotCol::Status, Expr::value(status))
            .filter(SlotCol::BookingId.eq(booking_id))
            .exec(txn)
            .await?;
    }
    Ok(booking)
}

pub(crate) async fn detail_of<C: ConnectionTrait>(
    conn: &C,
    booking: BookingModel,
) -> AppResult<BookingDetail> {
    assemble(conn, vec![booking])
        .await?
        .pop()
        .ok_or(AppError::NotFound)
}

async fn assemble<C: ConnectionTrait>(
    conn: &C,
    bookings: Vec<BookingModel>,
) -> AppResult<Vec<BookingDetail>> {
    let ids: Vec<Uuid> = bookings.iter().map(|booking| booking.id).collect();

    let mut slots_by_booking: HashMap<Uuid, Vec<SlotModel>> = HashMap::new();
    for slot in BookingRooms::find()
        .filter(SlotCol::BookingId.is_in(ids.clone()))
        .order_by_asc(SlotCol::Position)
        .all(conn)
        .await?
    {
        slots_by_booking.entry(slot.booking_id).or_default().push(slot);
    }

    let mut services_by_booking: HashMap<Uuid, Vec<BookingServiceModel>> = HashMap::new();
    for service in BookingServices::find()
        .filter(BookingServiceCol::BookingId.is_in(ids))
        .order_by_asc(BookingServiceCol::CreatedAt)
        .all(conn)
        .await?
    {
        services_by_booking
            .entry(service.booking_id)
            .or_default()
            .push(service);
    }

    let service_ids: Vec<Uuid> = services_by_booking
        .values()
        .flatten()
        .map(|service| service.service_id)
        .collect();
    let names: HashMap<Uuid, String> = Services::find()
        .filter(ServiceCol::Id.is_in(service_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|service| (service.id, service.name))
        .collect();

    Ok(bookings
        .into_iter()
        .map(|booking| {
            let slots = slots_by_booking.remove(&booking.id).unwrap_or_default();
            let services = services_by_booking.remove(&booking.id).unwrap_or_default();
            let totals = totals(&booking, &slots, &services);
            BookingDetail {
                booking: booking_from_entity(booking, slots, services, &names),
                totals,
            }
        })
        .collect())
}

fn booking_from_entity(
    model: BookingModel,
    slots: Vec<SlotModel>,
    services: Vec<BookingServiceModel>,
    names: &HashMap<Uuid, String>,
) -> Booking {
    Booking {
        id: model.id,
        booking_code: model.booking_code,
        status: model.status,
        payment_status: model.payment_status,
        payment_method: model.payment_method,
        stage: model.stage,
        expected_check_in_date: model.expected_check_in_date,
        expected_check_out_date: model.expected_check_out_date,
        customer_id: model.customer_id,
        customer_snapshot: model.customer_snapshot,
        total_price: model.total_price,
        rooms: slots.into_iter().map(booking_room_from_entity).collect(),
        services: services
            .into_iter()
            .map(|service| BookingServiceItem {
                name: names.get(&service.service_id).cloned().unwrap_or_default(),
                service_id: service.service_id,
                quantity: service.quantity,
                price: service.price,
            })
            .collect(),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn booking_room_from_entity(model: SlotModel) -> BookingRoom {
    BookingRoom {
        id: model.id,
        position: model.position,
        desired_room_type_id: model.desired_room_type_id,
        room_id: model.room_id,
        room_snapshot: model.room_snapshot,
        number_of_adults: model.number_of_adults,
        number_of_children: model.number_of_children,
        price_per_night: model.price_per_night,
        expected_check_in_date: model.expected_check_in_date,
        expected_check_out_date: model.expected_check_out_date,
        actual_check_in_date: model.actual_check_in_date.map(|dt| dt.with_timezone(&Utc)),
        actual_check_out_date: model.actual_check_out_date.map(|dt| dt.with_timezone(&Utc)),
        status: model.status,
        additional_services: model.additional_services.0,
    }
}

pub fn build_booking_code(id: Uuid) -> String {
    let date = Utc::now().format("%y%m%d");
    let suffix = id.simple().to_string();
    format!("BK{}{}", date, suffix[..6].to_uppercase())
}
