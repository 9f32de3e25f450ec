use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::PaymentStatus;

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ManualPaymentRequest {
    pub booking_id: Uuid,
    #[validate(range(min = 1))]
    pub amount: i64,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VnpayPaymentRequest {
    pub booking_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VnpayPaymentResponse {
    pub payment_url: String,
    pub txn_ref: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VnpayReturnResponse {
    pub success: bool,
    pub response_code: String,
    pub message: String,
    pub booking_code: String,
    pub payment_status: PaymentStatus,
}
