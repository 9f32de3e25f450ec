use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    domain::booking_flow::{BookingEvent, BookingStage},
    dto::payments::{
        ManualPaymentRequest, VnpayPaymentRequest, VnpayPaymentResponse, VnpayReturnResponse,
    },
    entity::{
        bookings::{ActiveModel as BookingActive, Model as BookingModel},
        payments::{
            ActiveModel as PaymentActive, Column as PaymentCol, Entity as Payments,
            Model as PaymentModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_staff},
    models::{BookingStatus, Payment, PaymentMethod, PaymentRecordStatus, PaymentStatus},
    payment::vnpay::{self, PaymentRequest, VnpayError},
    response::{ApiResponse, Meta},
    services::booking_service,
    state::AppState,
    table::{Cell, Column, DataTable, TablePage, TableQuery},
};

pub const REFUND_DUE_MESSAGE: &str =
    "Đặt phòng đã bị hủy, khách sạn sẽ liên hệ để hoàn tiền";

/// Cash or card payment taken at the front desk.
pub async fn manual_payment(
    state: &AppState,
    user: &AuthUser,
    payload: ManualPaymentRequest,
) -> AppResult<ApiResponse<Payment>> {
    ensure_staff(user)?;
    payload.validate()?;

    let txn = state.orm.begin().await?;
    let booking = booking_service::lock_booking(&txn, payload.booking_id).await?;
    if booking.status == BookingStatus::Cancelled {
        return Err(AppError::Conflict("Booking is cancelled".into()));
    }
    if booking.customer_id.is_none() {
        return Err(AppError::Conflict("Booking is not confirmed yet".into()));
    }

    let payment = PaymentActive {
        id: Set(Uuid::new_v4()),
        booking_id: Set(booking.id),
        amount: Set(payload.amount),
        method: Set(PaymentMethod::Hotel),
        status: Set(PaymentRecordStatus::Success),
        transaction_ref: Set(format!("HOTEL{}", Uuid::new_v4().simple())),
        gateway_response_code: Set(None),
        note: Set(payload.note),
        created_by: Set(Some(user.user_id)),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let booking = settle(&txn, booking).await?;
    txn.commit().await?;

    tracing::info!(
        booking_id = %booking.id,
        amount = payment.amount,
        payment_status = %booking.payment_status,
        "manual payment recorded"
    );
    audit::record(
        state,
        Some(user.user_id),
        "payment_manual",
        "payments",
        serde_json::json!({
            "payment_id": payment.id,
            "booking_id": booking.id,
            "amount": payment.amount,
        }),
    )
    .await;

    let message = if booking.status == BookingStatus::Cancelled {
        REFUND_DUE_MESSAGE
    } else {
        "Payment recorded"
    };
    Ok(ApiResponse::success(
        message,
        payment_from_entity(payment),
        Some(Meta::empty()),
    ))
}

/// Opens a pending gateway payment for the outstanding balance and returns
/// the signed redirect URL.
pub async fn create_vnpay_payment(
    state: &AppState,
    payload: VnpayPaymentRequest,
    client_ip: String,
) -> AppResult<ApiResponse<VnpayPaymentResponse>> {
    if !state.config.vnpay.is_configured() {
        return Err(VnpayError::NotConfigured.into());
    }

    let txn = state.orm.begin().await?;
    let booking = booking_service::lock_booking(&txn, payload.booking_id).await?;
    if booking.status != BookingStatus::Pending {
        return Err(AppError::Conflict(format!(
            "Booking is {} and cannot be paid online",
            booking.status
        )));
    }
    if booking.stage != BookingStage::AwaitingPayment {
        return Err(AppError::Conflict(
            "Booking is not waiting for an online payment".into(),
        ));
    }

    let paid = paid_amount(&txn, booking.id).await?;
    let amount = booking.total_price - paid;
    if amount <= 0 {
        return Err(AppError::Conflict("Booking is already paid".into()));
    }

    let now = Utc::now();
    let txn_ref = format!("{}{}", booking.booking_code, now.timestamp_millis());
    let url = vnpay::build_payment_url(
        &state.config.vnpay,
        &PaymentRequest {
            txn_ref: txn_ref.clone(),
            amount,
            order_info: format!("Thanh toan dat phong {}", booking.booking_code),
            ip_addr: client_ip,
            created_at: now,
        },
    )?;

    PaymentActive {
        id: Set(Uuid::new_v4()),
        booking_id: Set(booking.id),
        amount: Set(amount),
        method: Set(PaymentMethod::Vnpay),
        status: Set(PaymentRecordStatus::Pending),
        transaction_ref: Set(txn_ref.clone()),
        gateway_response_code: Set(None),
        note: Set(None),
        created_by: Set(None),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    tracing::info!(booking_id = %booking.id, txn_ref = %txn_ref, amount, "vnpay payment opened");

    Ok(ApiResponse::success(
        "Payment URL created",
        VnpayPaymentResponse {
            payment_url: url,
            txn_ref,
        },
        Some(Meta::empty()),
    ))
}

/// Handles the browser redirect back from the gateway. Replays of an
/// already settled transaction report the stored outcome unchanged.
pub async fn vnpay_return(
    state: &AppState,
    params: BTreeMap<String, String>,
) -> AppResult<ApiResponse<VnpayReturnResponse>> {
    let result = vnpay::verify_return(&state.config.vnpay.hash_secret, &params)?;

    let txn = state.orm.begin().await?;
    let payment = Payments::find()
        .filter(PaymentCol::TransactionRef.eq(result.txn_ref.clone()))
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    let booking = booking_service::lock_booking(&txn, payment.booking_id).await?;

    if payment.status != PaymentRecordStatus::Pending {
        txn.commit().await?;
        let settled = payment.status == PaymentRecordStatus::Success;
        return Ok(ApiResponse::success(
            "Payment already processed",
            VnpayReturnResponse {
                success: settled,
                response_code: payment.gateway_response_code.unwrap_or(result.response_code),
                message: result.message.to_string(),
                booking_code: booking.booking_code,
                payment_status: booking.payment_status,
            },
            Some(Meta::empty()),
        ));
    }

    let succeeded = result.success && result.amount == payment.amount;
    if result.success && !succeeded {
        tracing::warn!(
            txn_ref = %result.txn_ref,
            expected = payment.amount,
            received = result.amount,
            "vnpay amount mismatch"
        );
    }

    let payment_id = payment.id;
    let mut active: PaymentActive = payment.into();
    active.status = Set(if succeeded {
        PaymentRecordStatus::Success
    } else {
        PaymentRecordStatus::Failed
    });
    active.gateway_response_code = Set(Some(result.response_code.clone()));
    if let Some(transaction_no) = &result.transaction_no {
        active.note = Set(Some(format!("VNPay transaction {transaction_no}")));
    }
    active.update(&txn).await?;

    let booking = if succeeded {
        settle(&txn, booking).await?
    } else if awaits_gateway(&booking) {
        booking_service::advance(&txn, booking, &BookingEvent::PaymentFailed).await?
    } else {
        booking
    };
    txn.commit().await?;

    let refund_due = succeeded && booking.status == BookingStatus::Cancelled;
    if refund_due {
        tracing::warn!(
            booking_id = %booking.id,
            txn_ref = %result.txn_ref,
            "gateway payment captured for a cancelled booking"
        );
    }

    audit::record(
        state,
        None,
        "payment_vnpay_return",
        "payments",
        serde_json::json!({
            "payment_id": payment_id,
            "booking_id": booking.id,
            "response_code": result.response_code,
            "success": succeeded,
            "refund_due": refund_due,
        }),
    )
    .await;

    let message = if refund_due {
        REFUND_DUE_MESSAGE
    } else if result.success && !succeeded {
        "Số tiền thanh toán không khớp"
    } else {
        result.message
    };
    Ok(ApiResponse::success(
        message,
        VnpayReturnResponse {
            success: succeeded && !refund_due,
            response_code: result.response_code,
            message: message.to_string(),
            booking_code: booking.booking_code,
            payment_status: booking.payment_status,
        },
        Some(Meta::empty()),
    ))
}

fn payment_table() -> DataTable<Payment> {
    DataTable::new(vec![
        Column::new("transactionRef", "Mã giao dịch", |p: &Payment| {
            Cell::text(&p.transaction_ref)
        }),
        Column::new("amount", "Số tiền", |p: &Payment| Cell::Int(p.amount)),
        Column::new("method", "Phương thức", |p: &Payment| Cell::text(p.method)),
        Column::new("status", "Trạng thái", |p: &Payment| Cell::text(p.status)),
        Column::new("createdAt", "Thời gian", |p: &Payment| Cell::Time(p.created_at)),
    ])
}

pub async fn list_payments(
    state: &AppState,
    user: &AuthUser,
    query: TableQuery,
) -> AppResult<ApiResponse<TablePage<Payment>>> {
    ensure_staff(user)?;
    let rows = Payments::find()
        .order_by_desc(PaymentCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(payment_from_entity)
        .collect();
    let (page, meta) = payment_table().apply(rows, &query)?;
    Ok(ApiResponse::success("Payments", page, Some(meta)))
}

async fn paid_amount<C: ConnectionTrait>(conn: &C, booking_id: Uuid) -> AppResult<i64> {
    let paid = Payments::find()
        .filter(PaymentCol::BookingId.eq(booking_id))
        .filter(PaymentCol::Status.eq(PaymentRecordStatus::Success))
        .all(conn)
        .await?
        .iter()
        .map(|payment| payment.amount)
        .sum();
    Ok(paid)
}

fn awaits_gateway(booking: &BookingModel) -> bool {
    booking.status == BookingStatus::Pending && booking.stage == BookingStage::AwaitingPayment
}

/// Recomputes the payment status from successful payments. A booking that
/// was waiting on the gateway is confirmed once it is fully paid, provided
/// its rooms are still free; otherwise it is cancelled and left for refund.
/// Closed bookings only get their payment status updated.
async fn settle(txn: &DatabaseTransaction, booking: BookingModel) -> AppResult<BookingModel> {
    let paid = paid_amount(txn, booking.id).await?;
    let status = PaymentStatus::from_amounts(paid, booking.total_price);

    let mut active: BookingActive = booking.into();
    active.payment_status = Set(status);
    active.updated_at = Set(Utc::now().into());
    let booking = active.update(txn).await?;

    if status != PaymentStatus::Paid || !awaits_gateway(&booking) {
        return Ok(booking);
    }
    match booking_service::ensure_rooms_free(txn, &booking).await {
        Ok(()) => {
            booking_service::advance(txn, booking, &BookingEvent::PaymentSucceeded).await
        }
        Err(AppError::Conflict(reason)) => {
            tracing::warn!(booking_id = %booking.id, %reason, "paid booking lost its rooms");
            booking_service::cancel_pending(txn, booking).await
        }
        Err(err) => Err(err),
    }
}

fn payment_from_entity(model: PaymentModel) -> Payment {
    Payment {
        id: model.id,
        booking_id: model.booking_id,
        amount: model.amount,
        method: model.method,
        status: model.status,
        transaction_ref: model.transaction_ref,
        gateway_response_code: model.gateway_response_code,
        note: model.note,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
