use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{RoomType, ServiceLine};

/// Per-night price breakdown for one room slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NightlyPrice {
    pub base: i64,
    pub extra_bed: i64,
    pub per_night: i64,
    pub nights: i64,
    pub total: i64,
}

/// An extra bed is charged only when the room type allows one and the
/// adults exceed its standard capacity.
pub fn needs_extra_bed(room_type: &RoomType, number_of_adults: i32) -> bool {
    room_type.extra_bed_allowed && number_of_adults > room_type.capacity
}

pub fn effective_price_per_night(room_type: &RoomType, number_of_adults: i32) -> i64 {
    if needs_extra_bed(room_type, number_of_adults) {
        room_type.price_per_night + room_type.extra_bed_price
    } else {
        room_type.price_per_night
    }
}

/// Whole calendar nights between two dates; zero when the range is empty or reversed.
pub fn nights(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    (check_out - check_in).num_days().max(0)
}

pub fn nights_between(check_in: Option<NaiveDate>, check_out: Option<NaiveDate>) -> i64 {
    match (check_in, check_out) {
        (Some(check_in), Some(check_out)) => nights(check_in, check_out),
        _ => 0,
    }
}

pub fn room_total(price_per_night: i64, nights: i64) -> i64 {
    price_per_night * nights.max(0)
}

pub fn price_night(room_type: &RoomType, number_of_adults: i32, nights: i64) -> NightlyPrice {
    let extra_bed = if needs_extra_bed(room_type, number_of_adults) {
        room_type.extra_bed_price
    } else {
        0
    };
    let per_night = room_type.price_per_night + extra_bed;
    NightlyPrice {
        base: room_type.price_per_night,
        extra_bed,
        per_night,
        nights: nights.max(0),
        total: room_total(per_night, nights),
    }
}

pub fn service_total<'a>(lines: impl IntoIterator<Item = &'a ServiceLine>) -> i64 {
    lines
        .into_iter()
        .map(|line| line.price * i64::from(line.quantity.max(0)))
        .sum()
}

/// Priced view of a room slot as stored on the booking.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedRoom {
    pub price_per_night: i64,
    pub additional_services: Vec<ServiceLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingTotals {
    pub nights: i64,
    pub room_total: i64,
    pub service_total: i64,
    pub total: i64,
}

pub fn booking_totals(
    nights: i64,
    rooms: &[PricedRoom],
    booking_services: &[ServiceLine],
) -> BookingTotals {
    let room_total: i64 = rooms
        .iter()
        .map(|room| room_total(room.price_per_night, nights))
        .sum();
    let service_total = service_total(booking_services)
        + rooms
            .iter()
            .map(|room| service_total(&room.additional_services))
            .sum::<i64>();
    BookingTotals {
        nights,
        room_total,
        service_total,
        total: room_total + service_total,
    }
}
