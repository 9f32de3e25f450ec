use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{InventoryCategory, InventoryType};

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInventoryRequest {
    #[validate(length(min = 1))]
    pub name: String,
    pub category: InventoryCategory,
    #[serde(rename = "type")]
    pub item_type: InventoryType,
    #[validate(range(min = 0))]
    pub quantity: i32,
    #[validate(range(min = 0))]
    pub min_quantity: i32,
    #[validate(length(min = 1))]
    pub unit: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdjustInventoryRequest {
    pub delta: i32,
}
