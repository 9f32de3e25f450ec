use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::HeaderMap,
    routing::{get, post},
};

use crate::{
    dto::payments::{
        ManualPaymentRequest, VnpayPaymentRequest, VnpayPaymentResponse, VnpayReturnResponse,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Payment,
    response::ApiResponse,
    services::payment_service,
    state::AppState,
    table::{TablePage, TableQuery},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_payments))
        .route("/manual-payment", post(manual_payment))
        .route("/vnpay-payment", post(vnpay_payment))
}

pub fn gateway_router() -> Router<AppState> {
    Router::new().route("/vnpay-return", get(vnpay_return))
}

/// First hop of `X-Forwarded-For`, as the gateway wants the guest's address.
fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
        .unwrap_or_else(|| "127.0.0.1".to_string())
}

#[utoipa::path(
    post,
    path = "/api/payment/manual-payment",
    request_body = ManualPaymentRequest,
    responses(
        (status = 200, description = "Front-desk payment recorded", body = ApiResponse<Payment>),
        (status = 409, description = "Booking cannot take payments"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn manual_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ManualPaymentRequest>,
) -> AppResult<Json<ApiResponse<Payment>>> {
    let resp = payment_service::manual_payment(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/payment/vnpay-payment",
    request_body = VnpayPaymentRequest,
    responses(
        (status = 200, description = "Signed gateway URL", body = ApiResponse<VnpayPaymentResponse>),
        (status = 409, description = "Booking is not awaiting payment")
    ),
    tag = "Payments"
)]
pub async fn vnpay_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<VnpayPaymentRequest>,
) -> AppResult<Json<ApiResponse<VnpayPaymentResponse>>> {
    let resp = payment_service::create_vnpay_payment(&state, payload, client_ip(&headers)).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/vnpay/vnpay-return",
    params(
        ("vnp_TxnRef" = String, Query, description = "Transaction reference"),
        ("vnp_ResponseCode" = String, Query, description = "Gateway response code"),
        ("vnp_SecureHash" = String, Query, description = "HMAC-SHA512 signature")
    ),
    responses(
        (status = 200, description = "Payment outcome", body = ApiResponse<VnpayReturnResponse>),
        (status = 400, description = "Invalid signature or parameters"),
        (status = 404, description = "Unknown transaction")
    ),
    tag = "Payments"
)]
pub async fn vnpay_return(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> AppResult<Json<ApiResponse<VnpayReturnResponse>>> {
    let resp = payment_service::vnpay_return(&state, params).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/payment",
    params(TableQuery),
    responses(
        (status = 200, description = "Payments table", body = ApiResponse<TablePage<Payment>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn list_payments(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<TableQuery>,
) -> AppResult<Json<ApiResponse<TablePage<Payment>>>> {
    let resp = payment_service::list_payments(&state, &user, query).await?;
    Ok(Json(resp))
}
