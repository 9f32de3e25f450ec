use hotel_booking_api::{
    domain::availability::{
        ALL_ROOMS_ASSIGNED_MESSAGE, NO_MATCHING_ROOMS_MESSAGE, RoomOptions, RoomTypeGroup,
        SlotDemand, effective_available, first_shortage, room_options, selectable,
        status_for_stay,
    },
    models::{Room, RoomStatus, RoomType},
};
use proptest::prelude::*;
use uuid::Uuid;

fn room_type(name: &str, capacity: i32, max_guest: i32, extra_bed_allowed: bool) -> RoomType {
    RoomType {
        id: Uuid::new_v4(),
        name: name.into(),
        description: None,
        capacity,
        max_guest,
        price_per_night: 1_000_000,
        extra_bed_allowed,
        extra_bed_price: 200_000,
        amenities: vec![],
        images: vec![],
    }
}

fn group(room_type: RoomType, available: usize) -> RoomTypeGroup {
    let rooms = (0..available)
        .map(|index| Room {
            id: Uuid::new_v4(),
            room_number: format!("1{index:02}"),
            floor: 1,
            status: RoomStatus::Available,
            type_id: room_type.id,
        })
        .collect();
    RoomTypeGroup { room_type, rooms }
}

fn open_slot(adults: i32) -> SlotDemand {
    SlotDemand {
        desired_room_type_id: None,
        number_of_adults: adults,
    }
}

fn taken_slot(room_type_id: Uuid, adults: i32) -> SlotDemand {
    SlotDemand {
        desired_room_type_id: Some(room_type_id),
        number_of_adults: adults,
    }
}

#[test]
fn fully_assigned_booking_reports_all_rooms_assigned() {
    let standard = group(room_type("Standard", 2, 2, false), 3);
    let slots = vec![
        taken_slot(standard.room_type.id, 2),
        taken_slot(standard.room_type.id, 1),
    ];

    let options = room_options(&[standard], &slots, 2);
    assert!(options.options().is_empty());
    match options {
        RoomOptions::AllRoomsAssigned { message } => {
            assert_eq!(message, ALL_ROOMS_ASSIGNED_MESSAGE);
            assert_ne!(message, NO_MATCHING_ROOMS_MESSAGE);
        }
        other => panic!("unexpected options: {other:?}"),
    }
}

#[test]
fn type_claimed_by_the_booking_is_excluded() {
    let standard = group(room_type("Standard", 2, 2, false), 1);
    let suite = group(room_type("Suite", 4, 5, true), 2);
    let slots = vec![taken_slot(standard.room_type.id, 2), open_slot(2)];
    let groups = vec![standard, suite];

    let options = selectable(&groups, &slots, 2, 1);
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].room_type.name, "Suite");
    assert_eq!(options[0].effective_available, 2);
}

#[test]
fn no_type_fits_the_party() {
    let standard = group(room_type("Standard", 2, 3, false), 4);
    let slots = vec![open_slot(3)];

    match room_options(&[standard], &slots, 1) {
        RoomOptions::NoMatchingRooms {
            slot_index,
            message,
        } => {
            assert_eq!(slot_index, 0);
            assert_eq!(message, NO_MATCHING_ROOMS_MESSAGE);
        }
        other => panic!("unexpected options: {other:?}"),
    }
}

#[test]
fn extra_bed_types_accept_up_to_max_guest() {
    let deluxe = group(room_type("Deluxe", 2, 3, true), 1);
    let slots = vec![open_slot(3)];

    let options = selectable(&[deluxe], &slots, 3, 2);
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].price.per_night, 1_200_000);
    assert_eq!(options[0].price.total, 2_400_000);
}

#[test]
fn options_target_the_first_open_slot() {
    let standard = group(room_type("Standard", 2, 2, false), 5);
    let slots = vec![taken_slot(standard.room_type.id, 2), open_slot(1), open_slot(2)];

    match room_options(&[standard], &slots, 1) {
        RoomOptions::Available {
            slot_index,
            options,
        } => {
            assert_eq!(slot_index, 1);
            assert_eq!(options[0].effective_available, 4);
        }
        other => panic!("unexpected options: {other:?}"),
    }
}

#[test]
fn shortage_counts_every_slot_of_a_type() {
    let deluxe = group(room_type("Deluxe", 2, 3, true), 1);
    let family = group(room_type("Family", 4, 4, false), 2);
    let deluxe_id = deluxe.room_type.id;
    let family_id = family.room_type.id;
    let groups = vec![deluxe, family];

    assert_eq!(
        first_shortage(&groups, &[taken_slot(family_id, 4), taken_slot(family_id, 3)]),
        None
    );
    assert_eq!(
        first_shortage(&groups, &[taken_slot(deluxe_id, 2), taken_slot(deluxe_id, 2)]),
        Some(deluxe_id)
    );
    assert_eq!(first_shortage(&groups, &[open_slot(2)]), None);
    assert!(first_shortage(&groups, &[taken_slot(Uuid::new_v4(), 2)]).is_some());
}

#[test]
fn physical_status_only_matters_for_stays_starting_today() {
    use chrono::NaiveDate;
    let today = NaiveDate::from_ymd_opt(2025, 1, 10).expect("valid date");
    let tomorrow = today.succ_opt().expect("valid date");

    for status in [RoomStatus::Occupied, RoomStatus::NeedCleaning, RoomStatus::Reserved] {
        assert_eq!(status_for_stay(status, today, today), status);
        assert_eq!(status_for_stay(status, tomorrow, today), RoomStatus::Available);
    }
    assert_eq!(
        status_for_stay(RoomStatus::Available, today, today),
        RoomStatus::Available
    );
}

proptest! {
    #[test]
    fn exhausted_types_never_selectable(available in 0usize..5, extra_claims in 0usize..3) {
        let standard = group(room_type("Standard", 2, 2, false), available);
        let id = standard.room_type.id;
        let mut slots: Vec<SlotDemand> = (0..available + extra_claims)
            .map(|_| taken_slot(id, 1))
            .collect();
        slots.push(open_slot(1));

        prop_assert!(effective_available(&standard, &slots) <= 0);
        prop_assert!(selectable(&[standard], &slots, 1, 1).is_empty());
    }

    #[test]
    fn selectable_types_always_have_room(available in 0usize..6, claimed in 0usize..6) {
        let standard = group(room_type("Standard", 2, 2, false), available);
        let id = standard.room_type.id;
        let slots: Vec<SlotDemand> = (0..claimed).map(|_| taken_slot(id, 1)).collect();

        for option in selectable(&[standard], &slots, 1, 1) {
            prop_assert!(option.effective_available > 0);
            prop_assert_eq!(option.effective_available, available as i64 - claimed as i64);
        }
    }
}
