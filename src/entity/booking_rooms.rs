use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

use crate::models::{BookingStatus, RoomSnapshot, ServiceLine};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct ServiceLines(pub Vec<ServiceLine>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "booking_rooms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub booking_id: Uuid,
    pub position: i32,
    pub desired_room_type_id: Option<Uuid>,
    pub room_id: Option<Uuid>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub room_snapshot: Option<RoomSnapshot>,
    pub number_of_adults: i32,
    pub number_of_children: i32,
    pub price_per_night: i64,
    pub expected_check_in_date: Option<Date>,
    pub expected_check_out_date: Option<Date>,
    pub actual_check_in_date: Option<DateTimeWithTimeZone>,
    pub actual_check_out_date: Option<DateTimeWithTimeZone>,
    pub status: BookingStatus,
    #[sea_orm(column_type = "JsonBinary")]
    pub additional_services: ServiceLines,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bookings::Entity",
        from = "Column::BookingId",
        to = "super::bookings::Column::Id"
    )]
    Bookings,
}

impl Related<super::bookings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
