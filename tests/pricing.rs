use chrono::{Duration, NaiveDate};
use hotel_booking_api::{
    domain::pricing::{
        PricedRoom, booking_totals, effective_price_per_night, nights, price_night, room_total,
    },
    models::{RoomType, ServiceLine},
};
use proptest::prelude::*;
use uuid::Uuid;

fn room_type(
    capacity: i32,
    max_guest: i32,
    extra_bed_allowed: bool,
    price_per_night: i64,
    extra_bed_price: i64,
) -> RoomType {
    RoomType {
        id: Uuid::new_v4(),
        name: "Deluxe".into(),
        description: None,
        capacity,
        max_guest,
        price_per_night,
        extra_bed_allowed,
        extra_bed_price,
        amenities: vec![],
        images: vec![],
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[test]
fn three_adults_in_a_double_pay_for_the_extra_bed() {
    let deluxe = room_type(2, 3, true, 1_000_000, 200_000);
    let stay = nights(date(2025, 1, 10), date(2025, 1, 12));
    assert_eq!(stay, 2);

    let price = price_night(&deluxe, 3, stay);
    assert_eq!(price.extra_bed, 200_000);
    assert_eq!(price.per_night, 1_200_000);
    assert_eq!(price.total, 2_400_000);

    let totals = booking_totals(
        stay,
        &[PricedRoom {
            price_per_night: price.per_night,
            additional_services: vec![],
        }],
        &[],
    );
    assert_eq!(totals.room_total, 2_400_000);
    assert_eq!(totals.total, 2_400_000);
}

#[test]
fn no_extra_bed_when_adults_fit_capacity() {
    let deluxe = room_type(2, 3, true, 1_000_000, 200_000);
    assert_eq!(effective_price_per_night(&deluxe, 2), 1_000_000);
}

#[test]
fn reversed_dates_yield_no_nights() {
    assert_eq!(nights(date(2025, 3, 5), date(2025, 3, 1)), 0);
    assert_eq!(nights(date(2025, 3, 5), date(2025, 3, 5)), 0);
}

#[test]
fn services_add_price_times_quantity() {
    let lines = vec![
        ServiceLine {
            service_id: Uuid::new_v4(),
            quantity: 2,
            price: 150_000,
        },
        ServiceLine {
            service_id: Uuid::new_v4(),
            quantity: 1,
            price: 350_000,
        },
    ];
    let rooms = vec![PricedRoom {
        price_per_night: 800_000,
        additional_services: vec![],
    }];
    let totals = booking_totals(3, &rooms, &lines);
    assert_eq!(totals.room_total, 2_400_000);
    assert_eq!(totals.service_total, 650_000);
    assert_eq!(totals.total, 3_050_000);
}

proptest! {
    #[test]
    fn extra_bed_charged_only_when_allowed_and_over_capacity(
        capacity in 1i32..6,
        spare in 0i32..3,
        extra_bed_allowed in any::<bool>(),
        base in 0i64..10_000_000,
        extra in 0i64..2_000_000,
        adults in 1i32..10,
    ) {
        let rt = room_type(capacity, capacity + spare, extra_bed_allowed, base, extra);
        let expected = if adults > capacity && extra_bed_allowed { base + extra } else { base };
        prop_assert_eq!(effective_price_per_night(&rt, adults), expected);
    }

    #[test]
    fn positive_ranges_have_at_least_one_night(start in 0i64..20_000, length in 1i64..60) {
        let check_in = date(2020, 1, 1) + Duration::days(start);
        let check_out = check_in + Duration::days(length);
        let stay = nights(check_in, check_out);
        prop_assert_eq!(stay, length);
        prop_assert!(stay >= 1);
    }

    #[test]
    fn zero_nights_cost_nothing(price in 0i64..50_000_000) {
        prop_assert_eq!(room_total(price, 0), 0);
    }

    #[test]
    fn adding_a_service_never_lowers_the_total(
        nights in 0i64..30,
        room_price in 0i64..5_000_000,
        prices in proptest::collection::vec((0i64..2_000_000, 1i32..5), 0..8),
        extra_price in 0i64..2_000_000,
        extra_quantity in 1i32..5,
    ) {
        let rooms = vec![PricedRoom { price_per_night: room_price, additional_services: vec![] }];
        let mut lines: Vec<ServiceLine> = prices
            .into_iter()
            .map(|(price, quantity)| ServiceLine { service_id: Uuid::new_v4(), quantity, price })
            .collect();
        let before = booking_totals(nights, &rooms, &lines).total;
        lines.push(ServiceLine { service_id: Uuid::new_v4(), quantity: extra_quantity, price: extra_price });
        let after = booking_totals(nights, &rooms, &lines).total;
        prop_assert!(after >= before);
    }
}
