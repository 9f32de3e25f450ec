use hotel_booking_api::{
    dto::{
        bookings::{AddServicesRequest, MAX_SERVICE_QUANTITY, ServiceSelection},
        customers::{CreateCustomerRequest, validate_phone},
    },
    error::AppError,
    models::{PaymentStatus, TaskStatus, is_low_stock},
    services::booking_service::{build_booking_code, merge_selections},
};
use uuid::Uuid;
use validator::Validate;

#[test]
fn low_stock_is_inclusive_at_the_minimum() {
    assert!(is_low_stock(5, 10));
    assert!(is_low_stock(10, 10));
    assert!(!is_low_stock(11, 10));
}

#[test]
fn phone_numbers() {
    assert!(validate_phone("0912345678").is_ok());
    assert!(validate_phone("091 234 5678").is_ok());
    assert!(validate_phone("+84912345678").is_ok());
    assert!(validate_phone("12345").is_err());
    assert!(validate_phone("09123abc78").is_err());
    assert!(validate_phone("+0912345678").is_err());
}

#[test]
fn customer_request_validates_every_field() {
    let good = CreateCustomerRequest {
        full_name: "Nguyễn Văn A".into(),
        email: "guest@example.com".into(),
        phone: "0912345678".into(),
        nationality: "Việt Nam".into(),
        id_number: None,
    };
    assert!(good.validate().is_ok());

    let bad = CreateCustomerRequest {
        full_name: String::new(),
        email: "not-an-email".into(),
        phone: "123".into(),
        nationality: "V".into(),
        id_number: None,
    };
    let errors = bad.validate().unwrap_err();
    let fields = errors.field_errors();
    for field in ["full_name", "email", "phone", "nationality"] {
        assert!(fields.contains_key(field), "missing error for {field}");
    }
}

#[test]
fn payment_status_follows_amounts() {
    assert_eq!(PaymentStatus::from_amounts(0, 1_000), PaymentStatus::Unpaid);
    assert_eq!(PaymentStatus::from_amounts(400, 1_000), PaymentStatus::PartiallyPaid);
    assert_eq!(PaymentStatus::from_amounts(1_000, 1_000), PaymentStatus::Paid);
}

#[test]
fn task_status_moves_forward_only() {
    assert!(TaskStatus::Pending.can_become(TaskStatus::InProgress));
    assert!(TaskStatus::InProgress.can_become(TaskStatus::Completed));
    assert!(!TaskStatus::Completed.can_become(TaskStatus::Pending));
    assert!(!TaskStatus::Pending.can_become(TaskStatus::Completed));
}

#[test]
fn booking_codes_are_short_and_upper_case() {
    let code = build_booking_code(Uuid::new_v4());
    assert!(code.starts_with("BK"));
    assert_eq!(code.len(), 14);
    assert_eq!(code, code.to_uppercase());
}

fn line(service_id: Uuid, quantity: i32) -> ServiceSelection {
    ServiceSelection {
        service_id,
        quantity,
    }
}

#[test]
fn service_lines_merge_per_service_and_drop_zeroes() {
    let breakfast = Uuid::new_v4();
    let spa = Uuid::new_v4();
    let merged = merge_selections(&[line(breakfast, 2), line(spa, 0), line(breakfast, 3)]).unwrap();
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[&breakfast], 5);
}

#[test]
fn huge_service_quantities_are_rejected_without_overflow() {
    let breakfast = Uuid::new_v4();
    let err = merge_selections(&[line(breakfast, i32::MAX), line(breakfast, i32::MAX)])
        .err()
        .expect("overflowing quantity");
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = merge_selections(&[
        line(breakfast, MAX_SERVICE_QUANTITY),
        line(breakfast, 1),
    ])
    .err()
    .expect("quantity above the cap");
    assert!(matches!(err, AppError::BadRequest(_)));

    assert!(merge_selections(&[line(breakfast, -1)]).is_err());
}

#[test]
fn service_request_bounds_each_line() {
    let ok = AddServicesRequest {
        services: vec![line(Uuid::new_v4(), MAX_SERVICE_QUANTITY)],
    };
    assert!(ok.validate().is_ok());

    let too_many = AddServicesRequest {
        services: vec![line(Uuid::new_v4(), i32::MAX)],
    };
    assert!(too_many.validate().is_err());
}
