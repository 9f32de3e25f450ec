use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    domain::pricing::{self, NightlyPrice},
    models::{Room, RoomStatus, RoomType},
};

pub const ALL_ROOMS_ASSIGNED_MESSAGE: &str = "Tất cả phòng đã được chọn";
pub const NO_MATCHING_ROOMS_MESSAGE: &str = "Không có phòng phù hợp";

/// The hotel keeps Vietnam time, which has no daylight saving.
pub const HOTEL_UTC_OFFSET_HOURS: i64 = 7;

pub fn hotel_today() -> NaiveDate {
    (Utc::now() + Duration::hours(HOTEL_UTC_OFFSET_HOURS)).date_naive()
}

/// Status a room counts with for a stay. Occupancy and cleaning are
/// conditions of today only, so a stay starting later sees every room of
/// the type as free before bookings are subtracted.
pub fn status_for_stay(current: RoomStatus, check_in: NaiveDate, today: NaiveDate) -> RoomStatus {
    if check_in <= today {
        current
    } else {
        RoomStatus::Available
    }
}

/// Rooms of one type as reported for a date range.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomTypeGroup {
    pub room_type: RoomType,
    pub rooms: Vec<Room>,
}

impl RoomTypeGroup {
    pub fn available_count(&self) -> i64 {
        self.rooms
            .iter()
            .filter(|room| room.status == RoomStatus::Available)
            .count() as i64
    }
}

/// The part of a booking slot the filter looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotDemand {
    pub desired_room_type_id: Option<Uuid>,
    pub number_of_adults: i32,
}

impl SlotDemand {
    pub fn is_assigned(&self) -> bool {
        self.desired_room_type_id.is_some()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomOption {
    pub room_type: RoomType,
    pub effective_available: i64,
    pub price: NightlyPrice,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoomOptions {
    AllRoomsAssigned { message: String },
    NoMatchingRooms { slot_index: usize, message: String },
    Available { slot_index: usize, options: Vec<RoomOption> },
}

impl RoomOptions {
    pub fn options(&self) -> &[RoomOption] {
        match self {
            RoomOptions::Available { options, .. } => options,
            _ => &[],
        }
    }
}

/// Guest ceiling for a type: the extra-bed maximum when one is allowed,
/// otherwise the standard capacity.
pub fn guest_limit(room_type: &RoomType) -> i32 {
    if room_type.extra_bed_allowed {
        room_type.max_guest
    } else {
        room_type.capacity
    }
}

pub fn claimed_in_booking(slots: &[SlotDemand], room_type_id: Uuid) -> i64 {
    slots
        .iter()
        .filter(|slot| slot.desired_room_type_id == Some(room_type_id))
        .count() as i64
}

pub fn effective_available(group: &RoomTypeGroup, slots: &[SlotDemand]) -> i64 {
    group.available_count() - claimed_in_booking(slots, group.room_type.id)
}

/// First room type this booking holds more slots of than the groups have
/// free rooms for. `groups` must leave the booking's own claims out.
pub fn first_shortage(groups: &[RoomTypeGroup], slots: &[SlotDemand]) -> Option<Uuid> {
    let mut wanted: BTreeMap<Uuid, i64> = BTreeMap::new();
    for type_id in slots.iter().filter_map(|slot| slot.desired_room_type_id) {
        *wanted.entry(type_id).or_default() += 1;
    }
    wanted.into_iter().find_map(|(type_id, count)| {
        let free = groups
            .iter()
            .find(|group| group.room_type.id == type_id)
            .map(RoomTypeGroup::available_count)
            .unwrap_or(0);
        (count > free).then_some(type_id)
    })
}

pub fn first_unassigned(slots: &[SlotDemand]) -> Option<usize> {
    slots.iter().position(|slot| !slot.is_assigned())
}

/// Selectable types for `required_adults`, excluding capacity already
/// claimed by other slots of the same booking.
pub fn selectable(
    groups: &[RoomTypeGroup],
    slots: &[SlotDemand],
    required_adults: i32,
    nights: i64,
) -> Vec<RoomOption> {
    groups
        .iter()
        .filter_map(|group| {
            let available = effective_available(group, slots);
            if available <= 0 || required_adults > guest_limit(&group.room_type) {
                return None;
            }
            Some(RoomOption {
                room_type: group.room_type.clone(),
                effective_available: available,
                price: pricing::price_night(&group.room_type, required_adults, nights),
            })
        })
        .collect()
}

/// Options for the first unassigned slot of a booking.
pub fn room_options(groups: &[RoomTypeGroup], slots: &[SlotDemand], nights: i64) -> RoomOptions {
    let Some(slot_index) = first_unassigned(slots) else {
        return RoomOptions::AllRoomsAssigned {
            message: ALL_ROOMS_ASSIGNED_MESSAGE.to_string(),
        };
    };
    let options = selectable(groups, slots, slots[slot_index].number_of_adults, nights);
    if options.is_empty() {
        RoomOptions::NoMatchingRooms {
            slot_index,
            message: NO_MATCHING_ROOMS_MESSAGE.to_string(),
        }
    } else {
        RoomOptions::Available { slot_index, options }
    }
}
