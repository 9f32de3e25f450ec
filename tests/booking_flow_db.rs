use std::{collections::BTreeMap, sync::Arc};

use chrono::{Duration, NaiveDate, Utc};
use hotel_booking_api::{
    config::{AppConfig, VnpayConfig},
    db::{create_pool, orm_from_pool, run_migrations},
    domain::{
        availability::{RoomOptions, RoomTypeGroup, hotel_today},
        booking_flow::BookingStage,
    },
    dto::{
        bookings::{
            AddRoomRequest, AddServicesRequest, BookingLookupRequest, ConfirmBookingRequest,
            RoomSlotRequest, ServiceSelection, UpdateBookingStatusRequest,
            UpdateTempBookingRequest,
        },
        customers::CreateCustomerRequest,
        payments::{ManualPaymentRequest, VnpayPaymentRequest, VnpayPaymentResponse},
        reviews::CreateReviewRequest,
    },
    entity::{
        payments::{Column as PaymentCol, Entity as Payments},
        room_types::{ActiveModel as RoomTypeActive, StringList},
        rooms::ActiveModel as RoomActive,
        services::ActiveModel as ServiceActive, users::ActiveModel as UserActive,
    },
    error::AppError,
    middleware::auth::AuthUser,
    models::{
        BookingStatus, PaymentMethod, PaymentRecordStatus, PaymentStatus, RoomStatus, StaffRole,
    },
    payment::vnpay::{encode_query, sign},
    services::{
        booking_service, customer_service,
        payment_service::{self, REFUND_DUE_MESSAGE},
        review_service, room_service,
    },
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

const VNPAY_SECRET: &str = "TESTSECRET";

// Guest books two nights with an extra bed and breakfast, pays at the desk,
// staff walks the stay through check-out, and the guest leaves a review.
#[tokio::test]
async fn hotel_payment_stay_and_review_flow() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let staff = create_staff(&state).await?;
    let (room_type_id, room_id) = create_room_type_with_room(&state, 2, 3).await?;
    let breakfast_id = create_service(&state, 150_000).await?;

    let booking = booking_service::create_temp(&state).await?.data.expect("booking");
    let id = booking.booking.id;
    assert_eq!(booking.booking.stage, BookingStage::Draft);
    assert!(booking.booking.booking_code.starts_with("BK"));

    let check_in = Utc::now().date_naive() + Duration::days(400);
    booking_service::update_temp(
        &state,
        id,
        UpdateTempBookingRequest {
            check_in_date: check_in,
            check_out_date: check_in + Duration::days(2),
            rooms: vec![RoomSlotRequest {
                number_of_adults: 3,
                number_of_children: 1,
            }],
        },
    )
    .await?;

    let options = booking_service::room_options(&state, id).await?.data.expect("options");
    let option = options
        .options()
        .iter()
        .find(|option| option.room_type.id == room_type_id)
        .expect("room type offered");
    assert_eq!(option.price.per_night, 1_200_000);

    let detail = booking_service::add_room(
        &state,
        id,
        AddRoomRequest {
            room_index: 0,
            room_type_id,
        },
    )
    .await?
    .data
    .expect("booking");
    assert_eq!(detail.booking.stage, BookingStage::RoomsComplete);
    assert_eq!(detail.booking.rooms[0].desired_room_type_id, Some(room_type_id));
    assert_eq!(detail.booking.rooms[0].room_id, None);
    assert_eq!(detail.totals.room_total, 2_400_000);

    let options = booking_service::room_options(&state, id).await?.data.expect("options");
    assert!(matches!(options, RoomOptions::AllRoomsAssigned { .. }));

    let detail = booking_service::add_services(
        &state,
        id,
        AddServicesRequest {
            services: vec![ServiceSelection {
                service_id: breakfast_id,
                quantity: 3,
            }],
        },
    )
    .await?
    .data
    .expect("booking");
    assert_eq!(detail.booking.stage, BookingStage::ServicesChosen);
    assert_eq!(detail.totals.service_total, 450_000);
    assert_eq!(detail.booking.total_price, 2_850_000);

    let email = format!("guest-{}@example.com", Uuid::new_v4().simple());
    let customer = create_customer(&state, &email).await?;
    let detail = booking_service::confirm_booking(
        &state,
        id,
        ConfirmBookingRequest {
            customer_id: customer,
            payment_method: PaymentMethod::Hotel,
        },
    )
    .await?
    .data
    .expect("booking");
    assert_eq!(detail.booking.stage, BookingStage::Confirmed);
    assert_eq!(detail.booking.status, BookingStatus::Booked);
    let code = detail.booking.booking_code.clone();

    payment_service::manual_payment(
        &state,
        &staff,
        ManualPaymentRequest {
            booking_id: id,
            amount: 2_850_000,
            note: Some("Tiền mặt".into()),
        },
    )
    .await?;

    let found = booking_service::lookup(
        &state,
        BookingLookupRequest {
            booking_code: code.to_lowercase(),
            email: email.to_uppercase(),
        },
    )
    .await?
    .data
    .expect("booking");
    assert_eq!(found.booking.payment_status, PaymentStatus::Paid);

    let wrong_email = booking_service::lookup(
        &state,
        BookingLookupRequest {
            booking_code: code.clone(),
            email: "someone-else@example.com".into(),
        },
    )
    .await;
    assert!(matches!(wrong_email, Err(AppError::NotFound)));

    let early_review = review_service::create_review(&state, review_request(&code, &email)).await;
    assert!(matches!(early_review, Err(AppError::BadRequest(_))));

    for status in [
        BookingStatus::CheckedIn,
        BookingStatus::CheckedOut,
        BookingStatus::Completed,
    ] {
        let detail = booking_service::update_status(
            &state,
            &staff,
            id,
            UpdateBookingStatusRequest { status },
        )
        .await?
        .data
        .expect("booking");
        assert_eq!(detail.booking.status, status);
        if status == BookingStatus::CheckedIn {
            assert_eq!(detail.booking.rooms[0].room_id, Some(room_id));
            assert!(detail.booking.rooms[0].actual_check_in_date.is_some());
        }
    }

    let closed = booking_service::update_status(
        &state,
        &staff,
        id,
        UpdateBookingStatusRequest {
            status: BookingStatus::Cancelled,
        },
    )
    .await;
    assert!(closed.is_err());

    let review = review_service::create_review(&state, review_request(&code, &email))
        .await?
        .data
        .expect("review");
    assert_eq!(review.rating, 5);

    let duplicate = review_service::create_review(&state, review_request(&code, &email)).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    Ok(())
}

// The single room of a type cannot be claimed twice for overlapping dates.
#[tokio::test]
async fn last_room_cannot_be_double_booked() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let (room_type_id, _) = create_room_type_with_room(&state, 2, 2).await?;
    let check_in = Utc::now().date_naive() + Duration::days(420);

    let mut bookings = Vec::new();
    for _ in 0..2 {
        let id = booking_service::create_temp(&state)
            .await?
            .data
            .expect("booking")
            .booking
            .id;
        booking_service::update_temp(
            &state,
            id,
            UpdateTempBookingRequest {
                check_in_date: check_in,
                check_out_date: check_in + Duration::days(3),
                rooms: vec![RoomSlotRequest {
                    number_of_adults: 2,
                    number_of_children: 0,
                }],
            },
        )
        .await?;
        bookings.push(id);
    }

    let request = |id| AddRoomRequest {
        room_index: 0,
        room_type_id: id,
    };
    booking_service::add_room(&state, bookings[0], request(room_type_id)).await?;
    let second = booking_service::add_room(&state, bookings[1], request(room_type_id)).await;
    assert!(matches!(second, Err(AppError::Conflict(_))));

    let options = booking_service::room_options(&state, bookings[1])
        .await?
        .data
        .expect("options");
    assert!(
        options
            .options()
            .iter()
            .all(|option| option.room_type.id != room_type_id)
    );

    Ok(())
}

// VNPay checkout leaves the booking awaiting payment until a signed success return arrives.
#[tokio::test]
async fn vnpay_return_confirms_booking() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let (room_type_id, _) = create_room_type_with_room(&state, 2, 2).await?;
    let id = booking_service::create_temp(&state)
        .await?
        .data
        .expect("booking")
        .booking
        .id;
    let check_in = Utc::now().date_naive() + Duration::days(440);
    booking_service::update_temp(
        &state,
        id,
        UpdateTempBookingRequest {
            check_in_date: check_in,
            check_out_date: check_in + Duration::days(1),
            rooms: vec![RoomSlotRequest {
                number_of_adults: 2,
                number_of_children: 0,
            }],
        },
    )
    .await?;
    booking_service::add_room(
        &state,
        id,
        AddRoomRequest {
            room_index: 0,
            room_type_id,
        },
    )
    .await?;
    let email = format!("vnpay-{}@example.com", Uuid::new_v4().simple());
    let customer = create_customer(&state, &email).await?;
    let detail = booking_service::confirm_booking(
        &state,
        id,
        ConfirmBookingRequest {
            customer_id: customer,
            payment_method: PaymentMethod::Vnpay,
        },
    )
    .await?
    .data
    .expect("booking");
    assert_eq!(detail.booking.stage, BookingStage::AwaitingPayment);
    assert_eq!(detail.booking.status, BookingStatus::Pending);

    let checkout = payment_service::create_vnpay_payment(
        &state,
        VnpayPaymentRequest { booking_id: id },
        "127.0.0.1".into(),
    )
    .await?
    .data
    .expect("payment url");
    assert!(checkout.payment_url.contains("vnp_Amount=100000000"));

    let mut params = BTreeMap::new();
    params.insert("vnp_TxnRef".to_string(), checkout.txn_ref.clone());
    params.insert("vnp_Amount".to_string(), "100000000".to_string());
    params.insert("vnp_ResponseCode".to_string(), "00".to_string());
    params.insert("vnp_TransactionStatus".to_string(), "00".to_string());
    params.insert("vnp_TransactionNo".to_string(), "14000001".to_string());
    let signature = sign(VNPAY_SECRET, &encode_query(&params)).expect("signature");
    params.insert("vnp_SecureHash".to_string(), signature);

    let result = payment_service::vnpay_return(&state, params.clone())
        .await?
        .data
        .expect("result");
    assert!(result.success);
    assert_eq!(result.payment_status, PaymentStatus::Paid);

    // Replayed callbacks change nothing.
    payment_service::vnpay_return(&state, params).await?;

    let detail = booking_service::get_booking(&state, id)
        .await?
        .data
        .expect("booking");
    assert_eq!(detail.booking.stage, BookingStage::Confirmed);
    assert_eq!(detail.booking.status, BookingStatus::Booked);
    assert_eq!(detail.booking.payment_status, PaymentStatus::Paid);

    Ok(())
}

// A booking waiting on the gateway keeps its room however long the guest
// takes to pay, so nobody else can book it in the meantime.
#[tokio::test]
async fn gateway_pending_booking_keeps_its_room() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let (room_type_id, _) = create_room_type_with_room(&state, 2, 2).await?;
    let check_in = Utc::now().date_naive() + Duration::days(460);

    let first = assemble_booking(&state, room_type_id, check_in, 2).await?;
    confirm(&state, first, PaymentMethod::Vnpay).await?;
    let checkout = open_vnpay(&state, first).await?;
    age_booking(&state, first, 32).await?;

    let second = dated_booking(&state, check_in, 2).await?;
    let taken = booking_service::add_room(
        &state,
        second,
        AddRoomRequest {
            room_index: 0,
            room_type_id,
        },
    )
    .await;
    assert!(matches!(taken, Err(AppError::Conflict(_))));

    let result = payment_service::vnpay_return(&state, vnpay_success(&checkout.txn_ref, 2_000_000)?)
        .await?
        .data
        .expect("result");
    assert!(result.success);

    let detail = booking_service::get_booking(&state, first).await?.data.expect("booking");
    assert_eq!(detail.booking.status, BookingStatus::Booked);
    assert_eq!(detail.booking.stage, BookingStage::Confirmed);

    Ok(())
}

// A booking left idle past its assembly hold cannot be confirmed once
// another guest has taken the last room.
#[tokio::test]
async fn lapsed_hold_is_rechecked_on_confirmation() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let (room_type_id, _) = create_room_type_with_room(&state, 2, 2).await?;
    let check_in = Utc::now().date_naive() + Duration::days(480);

    let idle = assemble_booking(&state, room_type_id, check_in, 1).await?;
    age_booking(&state, idle, 45).await?;

    let quick = assemble_booking(&state, room_type_id, check_in, 1).await?;
    let status = confirm(&state, quick, PaymentMethod::Hotel).await?;
    assert_eq!(status, BookingStatus::Booked);

    let late = confirm(&state, idle, PaymentMethod::Vnpay).await;
    assert!(matches!(late, Err(AppError::Conflict(_))));

    let detail = booking_service::get_booking(&state, idle).await?.data.expect("booking");
    assert_eq!(detail.booking.stage, BookingStage::RoomsComplete);
    assert_eq!(detail.booking.status, BookingStatus::Pending);

    Ok(())
}

// Rooms taken out of service while the guest is at the gateway: the
// payment is kept, the booking is cancelled for refund instead of oversold.
#[tokio::test]
async fn paid_booking_without_a_free_room_is_cancelled_for_refund() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let (room_type_id, _) = create_room_type_with_room(&state, 2, 2).await?;
    let check_in = Utc::now().date_naive() + Duration::days(500);

    let online = assemble_booking(&state, room_type_id, check_in, 1).await?;
    confirm(&state, online, PaymentMethod::Vnpay).await?;
    let checkout = open_vnpay(&state, online).await?;

    let spare = add_room_to_type(&state, room_type_id).await?;
    let walk_in = assemble_booking(&state, room_type_id, check_in, 1).await?;
    confirm(&state, walk_in, PaymentMethod::Hotel).await?;
    sqlx::query("DELETE FROM rooms WHERE id = $1")
        .bind(spare)
        .execute(&state.pool)
        .await?;

    let result = payment_service::vnpay_return(&state, vnpay_success(&checkout.txn_ref, 1_000_000)?)
        .await?
        .data
        .expect("result");
    assert!(!result.success);
    assert_eq!(result.message, REFUND_DUE_MESSAGE);
    assert_eq!(result.payment_status, PaymentStatus::Paid);

    let detail = booking_service::get_booking(&state, online).await?.data.expect("booking");
    assert_eq!(detail.booking.status, BookingStatus::Cancelled);
    assert_eq!(stored_payment_status(&state, &checkout.txn_ref).await?, PaymentRecordStatus::Success);

    Ok(())
}

// Staff cancels while the guest is at the gateway: no new payment URL is
// issued, and a capture that still comes back is stored, not rolled back.
#[tokio::test]
async fn cancelled_booking_keeps_a_late_gateway_capture() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let staff = create_staff(&state).await?;
    let (room_type_id, _) = create_room_type_with_room(&state, 2, 2).await?;
    let check_in = Utc::now().date_naive() + Duration::days(520);

    let id = assemble_booking(&state, room_type_id, check_in, 1).await?;
    confirm(&state, id, PaymentMethod::Vnpay).await?;
    let checkout = open_vnpay(&state, id).await?;

    booking_service::update_status(
        &state,
        &staff,
        id,
        UpdateBookingStatusRequest {
            status: BookingStatus::Cancelled,
        },
    )
    .await?;

    let reopened = open_vnpay(&state, id).await;
    assert!(matches!(reopened, Err(AppError::Conflict(_))));

    let result = payment_service::vnpay_return(&state, vnpay_success(&checkout.txn_ref, 1_000_000)?)
        .await?
        .data
        .expect("result");
    assert!(!result.success);
    assert_eq!(result.message, REFUND_DUE_MESSAGE);
    assert_eq!(result.payment_status, PaymentStatus::Paid);
    assert_eq!(stored_payment_status(&state, &checkout.txn_ref).await?, PaymentRecordStatus::Success);

    let detail = booking_service::get_booking(&state, id).await?.data.expect("booking");
    assert_eq!(detail.booking.status, BookingStatus::Cancelled);
    assert_eq!(detail.booking.stage, BookingStage::AwaitingPayment);

    Ok(())
}

// A guest in the house tonight only blocks the room for tonight.
#[tokio::test]
async fn checked_in_room_is_free_for_later_stays() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let staff = create_staff(&state).await?;
    let (room_type_id, room_id) = create_room_type_with_room(&state, 2, 2).await?;
    let today = hotel_today();

    let tonight = assemble_booking(&state, room_type_id, today, 1).await?;
    confirm(&state, tonight, PaymentMethod::Hotel).await?;
    booking_service::update_status(
        &state,
        &staff,
        tonight,
        UpdateBookingStatusRequest {
            status: BookingStatus::CheckedIn,
        },
    )
    .await?;

    let now = room_service::available(&state, today, today + Duration::days(1))
        .await?
        .data
        .expect("availability");
    assert_eq!(free_rooms(&now.groups, room_type_id), 0);

    let later = room_service::available(
        &state,
        today + Duration::days(365),
        today + Duration::days(367),
    )
    .await?
    .data
    .expect("availability");
    assert_eq!(free_rooms(&later.groups, room_type_id), 1);
    let reported = later
        .groups
        .iter()
        .flat_map(|group| group.rooms.iter())
        .find(|room| room.id == room_id)
        .expect("room listed");
    assert_eq!(reported.status, RoomStatus::Available);

    let next_year = assemble_booking(&state, room_type_id, today + Duration::days(365), 2).await?;
    let status = confirm(&state, next_year, PaymentMethod::Hotel).await?;
    assert_eq!(status, BookingStatus::Booked);

    Ok(())
}

fn free_rooms(groups: &[RoomTypeGroup], room_type_id: Uuid) -> i64 {
    groups
        .iter()
        .find(|group| group.room_type.id == room_type_id)
        .map(RoomTypeGroup::available_count)
        .unwrap_or(0)
}

async fn dated_booking(state: &AppState, check_in: NaiveDate, nights: i64) -> anyhow::Result<Uuid> {
    let id = booking_service::create_temp(state)
        .await?
        .data
        .expect("booking")
        .booking
        .id;
    booking_service::update_temp(
        state,
        id,
        UpdateTempBookingRequest {
            check_in_date: check_in,
            check_out_date: check_in + Duration::days(nights),
            rooms: vec![RoomSlotRequest {
                number_of_adults: 2,
                number_of_children: 0,
            }],
        },
    )
    .await?;
    Ok(id)
}

async fn assemble_booking(
    state: &AppState,
    room_type_id: Uuid,
    check_in: NaiveDate,
    nights: i64,
) -> anyhow::Result<Uuid> {
    let id = dated_booking(state, check_in, nights).await?;
    booking_service::add_room(
        state,
        id,
        AddRoomRequest {
            room_index: 0,
            room_type_id,
        },
    )
    .await?;
    Ok(id)
}

async fn confirm(
    state: &AppState,
    id: Uuid,
    payment_method: PaymentMethod,
) -> Result<BookingStatus, AppError> {
    let email = format!("guest-{}@example.com", Uuid::new_v4().simple());
    let customer = create_customer(state, &email)
        .await
        .map_err(AppError::Internal)?;
    let detail = booking_service::confirm_booking(
        state,
        id,
        ConfirmBookingRequest {
            customer_id: customer,
            payment_method,
        },
    )
    .await?
    .data
    .expect("booking");
    Ok(detail.booking.status)
}

async fn open_vnpay(
    state: &AppState,
    id: Uuid,
) -> Result<VnpayPaymentResponse, AppError> {
    let checkout = payment_service::create_vnpay_payment(
        state,
        VnpayPaymentRequest { booking_id: id },
        "127.0.0.1".into(),
    )
    .await?
    .data
    .expect("payment url");
    Ok(checkout)
}

fn vnpay_success(txn_ref: &str, amount: i64) -> anyhow::Result<BTreeMap<String, String>> {
    let mut params = BTreeMap::new();
    params.insert("vnp_TxnRef".to_string(), txn_ref.to_string());
    params.insert("vnp_Amount".to_string(), (amount * 100).to_string());
    params.insert("vnp_ResponseCode".to_string(), "00".to_string());
    params.insert("vnp_TransactionStatus".to_string(), "00".to_string());
    params.insert("vnp_TransactionNo".to_string(), "14000002".to_string());
    let signature = sign(VNPAY_SECRET, &encode_query(&params))?;
    params.insert("vnp_SecureHash".to_string(), signature);
    Ok(params)
}

async fn age_booking(state: &AppState, id: Uuid, minutes: i32) -> anyhow::Result<()> {
    sqlx::query("UPDATE bookings SET updated_at = now() - make_interval(mins => $2) WHERE id = $1")
        .bind(id)
        .bind(minutes)
        .execute(&state.pool)
        .await?;
    Ok(())
}

async fn stored_payment_status(
    state: &AppState,
    txn_ref: &str,
) -> anyhow::Result<PaymentRecordStatus> {
    let payment = Payments::find()
        .filter(PaymentCol::TransactionRef.eq(txn_ref))
        .one(&state.orm)
        .await?
        .expect("payment row");
    Ok(payment.status)
}

async fn add_room_to_type(state: &AppState, room_type_id: Uuid) -> anyhow::Result<Uuid> {
    let room = RoomActive {
        id: Set(Uuid::new_v4()),
        room_number: Set(format!("S{}", &Uuid::new_v4().simple().to_string()[..8])),
        floor: Set(8),
        status: Set(RoomStatus::Available),
        type_id: Set(room_type_id),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(room.id)
}

async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run booking flow tests.");
            return Ok(None);
        }
    };

    let pool = create_pool(&database_url).await?;
    let orm = orm_from_pool(pool.clone());
    run_migrations(&orm).await?;

    Ok(Some(AppState {
        pool,
        orm,
        config: Arc::new(AppConfig {
            database_url,
            host: "127.0.0.1".into(),
            port: 0,
            jwt_secret: "test-secret".into(),
            request_timeout_secs: 15,
            vnpay: VnpayConfig {
                tmn_code: "TESTTMN1".into(),
                hash_secret: VNPAY_SECRET.into(),
                pay_url: "https://sandbox.vnpayment.vn/paymentv2/vpcpay.html".into(),
                return_url: "http://localhost:5173/booking/vnpay-return".into(),
            },
        }),
    }))
}

async fn create_staff(state: &AppState) -> anyhow::Result<AuthUser> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(format!("staff-{}@example.com", Uuid::new_v4().simple())),
        password_hash: Set("not-a-real-hash".into()),
        full_name: Set("Lễ tân".into()),
        role: Set(StaffRole::Staff),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(AuthUser {
        user_id: user.id,
        role: StaffRole::Staff,
    })
}

async fn create_room_type_with_room(
    state: &AppState,
    capacity: i32,
    max_guest: i32,
) -> anyhow::Result<(Uuid, Uuid)> {
    let suffix = Uuid::new_v4().simple().to_string();
    let room_type = RoomTypeActive {
        id: Set(Uuid::new_v4()),
        name: Set(format!("Test type {suffix}")),
        description: Set(None),
        capacity: Set(capacity),
        max_guest: Set(max_guest),
        price_per_night: Set(1_000_000),
        extra_bed_allowed: Set(max_guest > capacity),
        extra_bed_price: Set(200_000),
        amenities: Set(StringList(vec![])),
        images: Set(StringList(vec![])),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let room = RoomActive {
        id: Set(Uuid::new_v4()),
        room_number: Set(format!("T{}", &suffix[..8])),
        floor: Set(9),
        status: Set(RoomStatus::Available),
        type_id: Set(room_type.id),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok((room_type.id, room.id))
}

async fn create_service(state: &AppState, price: i64) -> anyhow::Result<Uuid> {
    let service = ServiceActive {
        id: Set(Uuid::new_v4()),
        name: Set(format!("Bữa sáng {}", Uuid::new_v4().simple())),
        price: Set(price),
        unit: Set("person".into()),
        unit_display: Set("người".into()),
        category: Set("food".into()),
        is_active: Set(true),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(service.id)
}

async fn create_customer(state: &AppState, email: &str) -> anyhow::Result<Uuid> {
    let customer = customer_service::upsert_customer(
        state,
        CreateCustomerRequest {
            full_name: "Trần Thị B".into(),
            email: email.into(),
            phone: "0912345678".into(),
            nationality: "Việt Nam".into(),
            id_number: None,
        },
    )
    .await?
    .data
    .expect("customer");
    Ok(customer.id)
}

fn review_request(code: &str, email: &str) -> CreateReviewRequest {
    CreateReviewRequest {
        booking_code: code.into(),
        email: email.into(),
        rating: 5,
        comment: "Phòng sạch, nhân viên thân thiện".into(),
    }
}
