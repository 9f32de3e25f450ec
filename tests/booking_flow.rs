use chrono::NaiveDate;
use hotel_booking_api::{
    domain::{
        availability::SlotDemand,
        booking_flow::{BookingEvent, BookingStage, FlowError, status_on_enter, transition},
    },
    models::{BookingStatus, PaymentMethod},
};
use uuid::Uuid;

use BookingStage::*;

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, d).expect("valid date")
}

fn open(adults: i32) -> SlotDemand {
    SlotDemand {
        desired_room_type_id: None,
        number_of_adults: adults,
    }
}

fn taken(adults: i32) -> SlotDemand {
    SlotDemand {
        desired_room_type_id: Some(Uuid::new_v4()),
        number_of_adults: adults,
    }
}

fn set_dates(check_in: u32, check_out: u32, adults: Vec<i32>) -> BookingEvent {
    BookingEvent::SetDates {
        check_in: date(check_in),
        check_out: date(check_out),
        adults,
        today: date(1),
    }
}

#[test]
fn happy_path_through_hotel_payment() {
    let status = BookingStatus::Pending;

    let stage = transition(Draft, status, &[], &set_dates(10, 12, vec![2, 1])).unwrap();
    assert_eq!(stage, DatesChosen);

    let slots = vec![open(2), open(1)];
    let stage = transition(stage, status, &slots, &BookingEvent::AssignRoom { slot_index: 0 })
        .unwrap();
    assert_eq!(stage, RoomsAssigning);

    let slots = vec![taken(2), open(1)];
    let stage = transition(stage, status, &slots, &BookingEvent::AssignRoom { slot_index: 1 })
        .unwrap();
    assert_eq!(stage, RoomsComplete);

    let slots = vec![taken(2), taken(1)];
    let stage = transition(stage, status, &slots, &BookingEvent::ChooseServices).unwrap();
    assert_eq!(stage, ServicesChosen);

    let confirm = BookingEvent::Confirm {
        method: PaymentMethod::Hotel,
        customer_linked: true,
    };
    let stage = transition(stage, status, &slots, &confirm).unwrap();
    assert_eq!(stage, Confirmed);
    assert_eq!(status_on_enter(stage), Some(BookingStatus::Booked));
}

#[test]
fn vnpay_waits_for_the_gateway() {
    let slots = vec![taken(2)];
    let confirm = BookingEvent::Confirm {
        method: PaymentMethod::Vnpay,
        customer_linked: true,
    };
    let stage = transition(RoomsComplete, BookingStatus::Pending, &slots, &confirm).unwrap();
    assert_eq!(stage, AwaitingPayment);
    assert_eq!(status_on_enter(stage), None);

    let failed =
        transition(stage, BookingStatus::Pending, &slots, &BookingEvent::PaymentFailed).unwrap();
    assert_eq!(failed, AwaitingPayment);

    let paid = transition(
        failed,
        BookingStatus::Pending,
        &slots,
        &BookingEvent::PaymentSucceeded,
    )
    .unwrap();
    assert_eq!(paid, Confirmed);
}

#[test]
fn dates_must_be_ordered_and_rooms_need_adults() {
    let status = BookingStatus::Pending;
    assert_eq!(
        transition(Draft, status, &[], &set_dates(12, 12, vec![2])),
        Err(FlowError::InvalidDates)
    );
    assert_eq!(
        transition(Draft, status, &[], &set_dates(10, 12, vec![])),
        Err(FlowError::NoRooms)
    );
    assert_eq!(
        transition(Draft, status, &[], &set_dates(10, 12, vec![2, 0])),
        Err(FlowError::NoAdults(1))
    );
}

#[test]
fn check_in_cannot_be_before_today() {
    let status = BookingStatus::Pending;
    let stay = |check_in: u32, today: u32| BookingEvent::SetDates {
        check_in: date(check_in),
        check_out: date(check_in + 2),
        adults: vec![2],
        today: date(today),
    };
    assert_eq!(
        transition(Draft, status, &[], &stay(9, 10)),
        Err(FlowError::CheckInPast(date(9)))
    );
    assert_eq!(transition(Draft, status, &[], &stay(10, 10)), Ok(DatesChosen));
    assert_eq!(transition(DatesChosen, status, &[], &stay(11, 10)), Ok(DatesChosen));
}

#[test]
fn confirmation_requires_every_room_and_a_customer() {
    let status = BookingStatus::Pending;
    let confirm = BookingEvent::Confirm {
        method: PaymentMethod::Hotel,
        customer_linked: true,
    };
    assert_eq!(
        transition(RoomsComplete, status, &[taken(2), open(1)], &confirm),
        Err(FlowError::RoomsIncomplete)
    );

    let anonymous = BookingEvent::Confirm {
        method: PaymentMethod::Hotel,
        customer_linked: false,
    };
    assert_eq!(
        transition(RoomsComplete, status, &[taken(2)], &anonymous),
        Err(FlowError::CustomerMissing)
    );
}

#[test]
fn slot_errors_name_the_slot() {
    let status = BookingStatus::Pending;
    let slots = vec![taken(2), open(1)];
    assert_eq!(
        transition(RoomsAssigning, status, &slots, &BookingEvent::AssignRoom { slot_index: 0 }),
        Err(FlowError::SlotAlreadyAssigned(0))
    );
    assert_eq!(
        transition(RoomsAssigning, status, &slots, &BookingEvent::AssignRoom { slot_index: 5 }),
        Err(FlowError::SlotNotFound(5))
    );
    assert_eq!(
        transition(RoomsAssigning, status, &slots, &BookingEvent::RemoveRoom { slot_index: 1 }),
        Err(FlowError::SlotNotAssigned(1))
    );
    assert_eq!(
        transition(RoomsComplete, status, &slots, &BookingEvent::RemoveRoom { slot_index: 0 }),
        Ok(RoomsAssigning)
    );
}

#[test]
fn events_out_of_order_are_rejected() {
    let status = BookingStatus::Pending;
    let result = transition(Draft, status, &[], &BookingEvent::ChooseServices);
    assert!(matches!(
        result,
        Err(FlowError::WrongStage {
            event: "choose_services",
            stage: Draft
        })
    ));
    assert!(transition(Confirmed, BookingStatus::Booked, &[taken(2)], &BookingEvent::ResetRooms)
        .is_err());
    assert!(
        transition(DatesChosen, status, &[open(1)], &BookingEvent::PaymentSucceeded).is_err()
    );
}

#[test]
fn resets_step_back() {
    let status = BookingStatus::Pending;
    let slots = vec![taken(2)];
    assert_eq!(
        transition(ServicesChosen, status, &slots, &BookingEvent::ResetRooms),
        Ok(DatesChosen)
    );
    assert_eq!(
        transition(AwaitingPayment, status, &slots, &BookingEvent::ResetDates),
        Ok(Draft)
    );
}

#[test]
fn closed_bookings_cannot_move() {
    for status in [BookingStatus::Completed, BookingStatus::Cancelled] {
        assert_eq!(
            transition(DatesChosen, status, &[], &BookingEvent::ResetDates),
            Err(FlowError::BookingClosed(status))
        );
    }
}

#[test]
fn booking_status_lifecycle() {
    use BookingStatus::*;
    assert!(Booked.can_become(CheckedIn));
    assert!(CheckedIn.can_become(CheckedOut));
    assert!(CheckedOut.can_become(Completed));
    assert!(Pending.can_become(Cancelled));
    assert!(!Pending.can_become(CheckedIn));
    assert!(!CheckedIn.can_become(Cancelled));
    assert!(!Completed.can_become(Cancelled));
    assert!(Completed.is_final() && Cancelled.is_final());
    assert!(!Booked.is_final());
}
