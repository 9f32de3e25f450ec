use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::{
    domain::availability::SlotDemand,
    models::{BookingStatus, PaymentMethod},
};

/// Wizard stage of a booking, persisted alongside its status.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema, strum::Display, strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BookingStage {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "dates_chosen")]
    DatesChosen,
    #[sea_orm(string_value = "rooms_assigning")]
    RoomsAssigning,
    #[sea_orm(string_value = "rooms_complete")]
    RoomsComplete,
    #[sea_orm(string_value = "services_chosen")]
    ServicesChosen,
    #[sea_orm(string_value = "awaiting_payment")]
    AwaitingPayment,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingEvent {
    SetDates {
        check_in: NaiveDate,
        check_out: NaiveDate,
        adults: Vec<i32>,
        /// Hotel-local date the request is made on.
        today: NaiveDate,
    },
    AssignRoom {
        slot_index: usize,
    },
    RemoveRoom {
        slot_index: usize,
    },
    ChooseServices,
    Confirm {
        method: PaymentMethod,
        customer_linked: bool,
    },
    PaymentSucceeded,
    PaymentFailed,
    ResetRooms,
    ResetDates,
}

impl BookingEvent {
    pub fn name(&self) -> &'static str {
        match self {
            BookingEvent::SetDates { .. } => "set_dates",
            BookingEvent::AssignRoom { .. } => "assign_room",
            BookingEvent::RemoveRoom { .. } => "remove_room",
            BookingEvent::ChooseServices => "choose_services",
            BookingEvent::Confirm { .. } => "confirm",
            BookingEvent::PaymentSucceeded => "payment_succeeded",
            BookingEvent::PaymentFailed => "payment_failed",
            BookingEvent::ResetRooms => "reset_rooms",
            BookingEvent::ResetDates => "reset_dates",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("booking is {0} and can no longer change")]
    BookingClosed(BookingStatus),
    #[error("cannot {event} while booking is in stage {stage}")]
    WrongStage {
        event: &'static str,
        stage: BookingStage,
    },
    #[error("check-out date must be after check-in date")]
    InvalidDates,
    #[error("check-in date {0} is in the past")]
    CheckInPast(NaiveDate),
    #[error("a booking needs at least one room")]
    NoRooms,
    #[error("room {0} needs at least one adult")]
    NoAdults(usize),
    #[error("room {0} does not exist in this booking")]
    SlotNotFound(usize),
    #[error("room {0} already has a room type")]
    SlotAlreadyAssigned(usize),
    #[error("room {0} has no room type yet")]
    SlotNotAssigned(usize),
    #[error("every room needs a room type first")]
    RoomsIncomplete,
    #[error("a customer must be linked before confirmation")]
    CustomerMissing,
}

/// Named guard: the assignment stage is finished.
pub fn all_rooms_assigned(slots: &[SlotDemand]) -> bool {
    !slots.is_empty() && slots.iter().all(SlotDemand::is_assigned)
}

fn expect_stage(
    event: &BookingEvent,
    stage: BookingStage,
    allowed: &[BookingStage],
) -> Result<(), FlowError> {
    if allowed.contains(&stage) {
        Ok(())
    } else {
        Err(FlowError::WrongStage {
            event: event.name(),
            stage,
        })
    }
}

/// Computes the stage a booking moves to for `event`, given its current
/// stage, status and room slots (as they are before the event applies).
pub fn transition(
    stage: BookingStage,
    status: BookingStatus,
    slots: &[SlotDemand],
    event: &BookingEvent,
) -> Result<BookingStage, FlowError> {
    use BookingStage::*;

    if status.is_final() {
        return Err(FlowError::BookingClosed(status));
    }

    match event {
        BookingEvent::SetDates {
            check_in,
            check_out,
            adults,
            today,
        } => {
            expect_stage(event, stage, &[Draft, DatesChosen, RoomsAssigning])?;
            if check_out <= check_in {
                return Err(FlowError::InvalidDates);
            }
            if check_in < today {
                return Err(FlowError::CheckInPast(*check_in));
            }
            if adults.is_empty() {
                return Err(FlowError::NoRooms);
            }
            if let Some(index) = adults.iter().position(|&count| count < 1) {
                return Err(FlowError::NoAdults(index));
            }
            Ok(DatesChosen)
        }
        BookingEvent::AssignRoom { slot_index } => {
            expect_stage(event, stage, &[DatesChosen, RoomsAssigning])?;
            let slot = slots
                .get(*slot_index)
                .ok_or(FlowError::SlotNotFound(*slot_index))?;
            if slot.is_assigned() {
                return Err(FlowError::SlotAlreadyAssigned(*slot_index));
            }
            let rest_assigned = slots
                .iter()
                .enumerate()
                .all(|(index, slot)| index == *slot_index || slot.is_assigned());
            Ok(if rest_assigned { RoomsComplete } else { RoomsAssigning })
        }
        BookingEvent::RemoveRoom { slot_index } => {
            expect_stage(event, stage, &[RoomsAssigning, RoomsComplete, ServicesChosen])?;
            let slot = slots
                .get(*slot_index)
                .ok_or(FlowError::SlotNotFound(*slot_index))?;
            if !slot.is_assigned() {
                return Err(FlowError::SlotNotAssigned(*slot_index));
            }
            Ok(RoomsAssigning)
        }
        BookingEvent::ChooseServices => {
            expect_stage(event, stage, &[RoomsComplete, ServicesChosen])?;
            if !all_rooms_assigned(slots) {
                return Err(FlowError::RoomsIncomplete);
            }
            Ok(ServicesChosen)
        }
        BookingEvent::Confirm {
            method,
            customer_linked,
        } => {
            expect_stage(event, stage, &[RoomsComplete, ServicesChosen])?;
            if !all_rooms_assigned(slots) {
                return Err(FlowError::RoomsIncomplete);
            }
            if !customer_linked {
                return Err(FlowError::CustomerMissing);
            }
            Ok(match method {
                PaymentMethod::Hotel => Confirmed,
                PaymentMethod::Vnpay => AwaitingPayment,
            })
        }
        BookingEvent::PaymentSucceeded => {
            expect_stage(event, stage, &[AwaitingPayment])?;
            Ok(Confirmed)
        }
        BookingEvent::PaymentFailed => {
            expect_stage(event, stage, &[AwaitingPayment])?;
            Ok(AwaitingPayment)
        }
        BookingEvent::ResetRooms => {
            expect_stage(
                event,
                stage,
                &[DatesChosen, RoomsAssigning, RoomsComplete, ServicesChosen, AwaitingPayment],
            )?;
            Ok(DatesChosen)
        }
        BookingEvent::ResetDates => {
            expect_stage(
                event,
                stage,
                &[
                    Draft,
                    DatesChosen,
                    RoomsAssigning,
                    RoomsComplete,
                    ServicesChosen,
                    AwaitingPayment,
                ],
            )?;
            Ok(Draft)
        }
    }
}

/// Booking status a stage implies, if entering it changes the status.
pub fn status_on_enter(stage: BookingStage) -> Option<BookingStatus> {
    match stage {
        BookingStage::Confirmed => Some(BookingStatus::Booked),
        _ => None,
    }
}
