use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use hotel_booking_api::{
    config::VnpayConfig,
    payment::vnpay::{
        PaymentRequest, VnpayError, build_payment_url, encode_query, response_message, sign,
        verify_return,
    },
};

const SECRET: &str = "SECRETKEY123";

fn config() -> VnpayConfig {
    VnpayConfig {
        tmn_code: "HOTEL001".into(),
        hash_secret: SECRET.into(),
        pay_url: "https://sandbox.vnpayment.vn/paymentv2/vpcpay.html".into(),
        return_url: "http://localhost:5173/booking/vnpay-return".into(),
    }
}

fn signed_return(code: &str, amount: i64) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    params.insert("vnp_TxnRef".to_string(), "BK250110ABCDEF1736467200000".to_string());
    params.insert("vnp_Amount".to_string(), (amount * 100).to_string());
    params.insert("vnp_ResponseCode".to_string(), code.to_string());
    params.insert("vnp_TransactionStatus".to_string(), code.to_string());
    params.insert("vnp_TransactionNo".to_string(), "14123456".to_string());
    params.insert("vnp_OrderInfo".to_string(), "Thanh toan dat phong".to_string());
    let signature = sign(SECRET, &encode_query(&params)).unwrap();
    params.insert("vnp_SecureHashType".to_string(), "HmacSHA512".to_string());
    params.insert("vnp_SecureHash".to_string(), signature);
    params
}

#[test]
fn payment_url_is_signed_and_scaled() {
    let request = PaymentRequest {
        txn_ref: "BK250110ABCDEF1".into(),
        amount: 2_400_000,
        order_info: "Thanh toan BK250110ABCDEF".into(),
        ip_addr: "127.0.0.1".into(),
        created_at: Utc.with_ymd_and_hms(2025, 1, 10, 3, 0, 0).unwrap(),
    };
    let url = build_payment_url(&config(), &request).unwrap();

    assert!(url.starts_with("https://sandbox.vnpayment.vn/paymentv2/vpcpay.html?"));
    assert!(url.contains("vnp_Amount=240000000"));
    assert!(url.contains("vnp_CreateDate=20250110100000"));
    assert!(url.contains("vnp_ExpireDate=20250110101500"));
    assert!(url.contains("vnp_TmnCode=HOTEL001"));

    let (query, signature) = url
        .split_once('?')
        .and_then(|(_, rest)| rest.rsplit_once("&vnp_SecureHash="))
        .unwrap();
    assert_eq!(signature, sign(SECRET, query).unwrap());
}

#[test]
fn unconfigured_gateway_refuses_to_build_urls() {
    let mut unconfigured = config();
    unconfigured.hash_secret.clear();
    let request = PaymentRequest {
        txn_ref: "X".into(),
        amount: 1,
        order_info: "x".into(),
        ip_addr: "127.0.0.1".into(),
        created_at: Utc::now(),
    };
    assert_eq!(
        build_payment_url(&unconfigured, &request),
        Err(VnpayError::NotConfigured)
    );
}

#[test]
fn successful_return_verifies() {
    let result = verify_return(SECRET, &signed_return("00", 2_400_000)).unwrap();
    assert!(result.success);
    assert_eq!(result.amount, 2_400_000);
    assert_eq!(result.txn_ref, "BK250110ABCDEF1736467200000");
    assert_eq!(result.transaction_no.as_deref(), Some("14123456"));
    assert_eq!(result.message, "Giao dịch thành công");
}

#[test]
fn cancelled_return_is_verified_but_not_successful() {
    let result = verify_return(SECRET, &signed_return("24", 500_000)).unwrap();
    assert!(!result.success);
    assert_eq!(result.message, "Khách hàng hủy giao dịch");
}

#[test]
fn tampered_amount_is_rejected() {
    let mut params = signed_return("00", 2_400_000);
    params.insert("vnp_Amount".to_string(), "100".to_string());
    assert_eq!(
        verify_return(SECRET, &params),
        Err(VnpayError::InvalidSignature)
    );
}

#[test]
fn wrong_secret_or_missing_hash_is_rejected() {
    let params = signed_return("00", 1_000);
    assert_eq!(
        verify_return("another-secret", &params),
        Err(VnpayError::InvalidSignature)
    );

    let mut unsigned = params;
    unsigned.remove("vnp_SecureHash");
    assert_eq!(
        verify_return(SECRET, &unsigned),
        Err(VnpayError::MissingParam("vnp_SecureHash"))
    );
}

#[test]
fn unknown_codes_fall_back_to_generic_failure() {
    assert_eq!(response_message("51"), "Tài khoản của quý khách không đủ số dư để thực hiện giao dịch");
    assert_eq!(response_message("99"), "Giao dịch thất bại");
}

#[test]
fn signatures_are_full_sha512_hex_for_any_key() {
    let long_key = "k".repeat(300);
    for secret in ["", SECRET, long_key.as_str()] {
        let signature = sign(secret, "vnp_Amount=100").unwrap();
        assert_eq!(signature.len(), 128);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }
    assert_ne!(
        sign("a", "vnp_Amount=100").unwrap(),
        sign("b", "vnp_Amount=100").unwrap()
    );
}
