use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{domain::availability::RoomTypeGroup, models::RoomStatus};

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomTypeRequest {
    #[validate(length(min = 1))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub capacity: i32,
    #[validate(range(min = 1))]
    pub max_guest: i32,
    #[validate(range(min = 0))]
    pub price_per_night: i64,
    #[serde(default)]
    pub extra_bed_allowed: bool,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub extra_bed_price: i64,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    #[validate(length(min = 1, max = 32))]
    pub room_number: String,
    pub floor: i32,
    pub type_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRoomStatusRequest {
    pub status: RoomStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityResponse {
    pub groups: Vec<RoomTypeGroup>,
}
