//! VNPay gateway: signed payment URLs and verification of the return callback.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use thiserror::Error;

use crate::config::VnpayConfig;

type HmacSha512 = Hmac<Sha512>;

pub const VERSION: &str = "2.1.0";
pub const SUCCESS_CODE: &str = "00";
const SECURE_HASH: &str = "vnp_SecureHash";
const SECURE_HASH_TYPE: &str = "vnp_SecureHashType";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VnpayError {
    #[error("gateway credentials are not configured")]
    NotConfigured,
    #[error("missing parameter {0}")]
    MissingParam(&'static str),
    #[error("invalid parameter {0}")]
    InvalidParam(&'static str),
    #[error("invalid signature")]
    InvalidSignature,
    #[error("signing key rejected")]
    InvalidKey,
}

/// Message shown to the guest for a gateway response code.
pub fn response_message(code: &str) -> &'static str {
    match code {
        "00" => "Giao dịch thành công",
        "07" => "Trừ tiền thành công. Giao dịch bị nghi ngờ (liên quan tới lừa đảo, giao dịch bất thường)",
        "09" => "Thẻ/Tài khoản của khách hàng chưa đăng ký dịch vụ InternetBanking tại ngân hàng",
        "10" => "Khách hàng xác thực thông tin thẻ/tài khoản không đúng quá 3 lần",
        "11" => "Đã hết hạn chờ thanh toán. Xin quý khách vui lòng thực hiện lại giao dịch",
        "12" => "Thẻ/Tài khoản của khách hàng bị khóa",
        "13" => "Quý khách nhập sai mật khẩu xác thực giao dịch (OTP)",
        "24" => "Khách hàng hủy giao dịch",
        "51" => "Tài khoản của quý khách không đủ số dư để thực hiện giao dịch",
        "65" => "Tài khoản của quý khách đã vượt quá hạn mức giao dịch trong ngày",
        "75" => "Ngân hàng thanh toán đang bảo trì",
        "79" => "Quý khách nhập sai mật khẩu thanh toán quá số lần quy định",
        _ => "Giao dịch thất bại",
    }
}

fn mac_for(secret: &str) -> Result<HmacSha512, VnpayError> {
    <HmacSha512 as KeyInit>::new_from_slice(secret.as_bytes()).map_err(|_| VnpayError::InvalidKey)
}

/// Hex HMAC-SHA512 of `data` under the merchant secret.
pub fn sign(secret: &str, data: &str) -> Result<String, VnpayError> {
    let mut mac = mac_for(secret)?;
    mac.update(data.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// `key=value` pairs sorted by key, both form-urlencoded.
pub fn encode_query(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                url::form_urlencoded::byte_serialize(key.as_bytes()).collect::<String>(),
                url::form_urlencoded::byte_serialize(value.as_bytes()).collect::<String>()
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub txn_ref: String,
    pub amount: i64,
    pub order_info: String,
    pub ip_addr: String,
    pub created_at: DateTime<Utc>,
}

/// Gateway timestamps are Vietnam local time (UTC+7).
fn gateway_time(at: DateTime<Utc>) -> String {
    (at + Duration::hours(7)).format("%Y%m%d%H%M%S").to_string()
}

pub fn build_payment_url(
    config: &VnpayConfig,
    request: &PaymentRequest,
) -> Result<String, VnpayError> {
    if !config.is_configured() {
        return Err(VnpayError::NotConfigured);
    }
    if request.amount <= 0 {
        return Err(VnpayError::InvalidParam("vnp_Amount"));
    }

    let mut params = BTreeMap::new();
    params.insert("vnp_Version".to_string(), VERSION.to_string());
    params.insert("vnp_Command".to_string(), "pay".to_string());
    params.insert("vnp_TmnCode".to_string(), config.tmn_code.clone());
    params.insert("vnp_Locale".to_string(), "vn".to_string());
    params.insert("vnp_CurrCode".to_string(), "VND".to_string());
    params.insert("vnp_TxnRef".to_string(), request.txn_ref.clone());
    params.insert("vnp_OrderInfo".to_string(), request.order_info.clone());
    params.insert("vnp_OrderType".to_string(), "other".to_string());
    params.insert("vnp_Amount".to_string(), (request.amount * 100).to_string());
    params.insert("vnp_ReturnUrl".to_string(), config.return_url.clone());
    params.insert("vnp_IpAddr".to_string(), request.ip_addr.clone());
    params.insert("vnp_CreateDate".to_string(), gateway_time(request.created_at));
    params.insert(
        "vnp_ExpireDate".to_string(),
        gateway_time(request.created_at + Duration::minutes(15)),
    );

    let query = encode_query(&params);
    let signature = sign(&config.hash_secret, &query)?;
    Ok(format!(
        "{}?{}&{}={}",
        config.pay_url, query, SECURE_HASH, signature
    ))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnResult {
    pub txn_ref: String,
    pub amount: i64,
    pub response_code: String,
    pub transaction_no: Option<String>,
    pub success: bool,
    pub message: &'static str,
}

/// Checks the callback signature and extracts the transaction outcome.
pub fn verify_return(
    secret: &str,
    params: &BTreeMap<String, String>,
) -> Result<ReturnResult, VnpayError> {
    let provided = params
        .get(SECURE_HASH)
        .ok_or(VnpayError::MissingParam(SECURE_HASH))?;

    let signed: BTreeMap<String, String> = params
        .iter()
        .filter(|(key, value)| {
            key.starts_with("vnp_")
                && key.as_str() != SECURE_HASH
                && key.as_str() != SECURE_HASH_TYPE
                && !value.is_empty()
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let expected = hex::decode(provided).map_err(|_| VnpayError::InvalidSignature)?;
    let mut mac = mac_for(secret)?;
    mac.update(encode_query(&signed).as_bytes());
    mac.verify_slice(&expected)
        .map_err(|_| VnpayError::InvalidSignature)?;

    let txn_ref = params
        .get("vnp_TxnRef")
        .ok_or(VnpayError::MissingParam("vnp_TxnRef"))?
        .clone();
    let amount = params
        .get("vnp_Amount")
        .ok_or(VnpayError::MissingParam("vnp_Amount"))?
        .parse::<i64>()
        .map_err(|_| VnpayError::InvalidParam("vnp_Amount"))?
        / 100;
    let response_code = params
        .get("vnp_ResponseCode")
        .ok_or(VnpayError::MissingParam("vnp_ResponseCode"))?
        .clone();
    let transaction_ok = params
        .get("vnp_TransactionStatus")
        .is_none_or(|status| status == SUCCESS_CODE);

    Ok(ReturnResult {
        txn_ref,
        amount,
        success: response_code == SUCCESS_CODE && transaction_ok,
        message: response_message(&response_code),
        transaction_no: params.get("vnp_TransactionNo").cloned(),
        response_code,
    })
}
