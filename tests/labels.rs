use std::str::FromStr;

use hotel_booking_api::{
    domain::labels::{self, LabelDomain},
    models::{BookingStatus, InventoryCategory, TaskStatus},
};
use sea_orm::{ActiveEnum, Iterable};

#[test]
fn every_domain_has_labels() {
    let sets = labels::all();
    assert_eq!(sets.len(), 10);
    assert!(sets.iter().all(|set| !set.entries.is_empty()));
}

#[test]
fn stored_values_all_have_a_label() {
    for status in BookingStatus::iter() {
        assert!(labels::lookup(LabelDomain::BookingStatus, &status.to_value()).is_some());
    }
    for status in TaskStatus::iter() {
        assert!(labels::lookup(LabelDomain::TaskStatus, &status.to_value()).is_some());
    }
    for category in InventoryCategory::iter() {
        assert!(labels::lookup(LabelDomain::InventoryCategory, &category.to_value()).is_some());
    }
}

#[test]
fn known_labels() {
    let checked_in = labels::lookup(LabelDomain::BookingStatus, "checked_in").unwrap();
    assert_eq!(checked_in.label, "Đã nhận phòng");
    let partial = labels::lookup(LabelDomain::PaymentStatus, "partially_paid").unwrap();
    assert_eq!(partial.label, "Thanh toán một phần");
    assert!(labels::lookup(LabelDomain::RoomStatus, "demolished").is_none());
}

#[test]
fn domains_parse_from_path_segments() {
    assert_eq!(
        LabelDomain::from_str("inventory_category").unwrap(),
        LabelDomain::InventoryCategory
    );
    assert!(LabelDomain::from_str("colors").is_err());
}
