use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use utoipa::ToSchema;

/// Every enum the back-office renders as a colored badge.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, strum::Display,
    strum::EnumString, strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LabelDomain {
    BookingStatus,
    PaymentStatus,
    PaymentMethod,
    RoomStatus,
    TaskStatus,
    TaskType,
    Priority,
    IssueCategory,
    InventoryCategory,
    InventoryType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct LabelEntry {
    pub value: &'static str,
    pub label: &'static str,
    pub color: &'static str,
}

const fn entry(value: &'static str, label: &'static str, color: &'static str) -> LabelEntry {
    LabelEntry {
        value,
        label,
        color,
    }
}

const GRAY: &str = "bg-gray-100 text-gray-800";
const YELLOW: &str = "bg-yellow-100 text-yellow-800";
const BLUE: &str = "bg-blue-100 text-blue-800";
const GREEN: &str = "bg-green-100 text-green-800";
const RED: &str = "bg-red-100 text-red-800";
const PURPLE: &str = "bg-purple-100 text-purple-800";
const ORANGE: &str = "bg-orange-100 text-orange-800";

const BOOKING_STATUS: &[LabelEntry] = &[
    entry("pending", "Chờ xác nhận", YELLOW),
    entry("booked", "Đã đặt", BLUE),
    entry("checked_in", "Đã nhận phòng", PURPLE),
    entry("checked_out", "Đã trả phòng", ORANGE),
    entry("completed", "Hoàn thành", GREEN),
    entry("cancelled", "Đã hủy", RED),
];

const PAYMENT_STATUS: &[LabelEntry] = &[
    entry("unpaid", "Chưa thanh toán", RED),
    entry("partially_paid", "Thanh toán một phần", YELLOW),
    entry("paid", "Đã thanh toán", GREEN),
    entry("refunded", "Đã hoàn tiền", GRAY),
];

const PAYMENT_METHOD: &[LabelEntry] = &[
    entry("hotel", "Thanh toán tại khách sạn", GRAY),
    entry("vnpay", "VNPay", BLUE),
];

const ROOM_STATUS: &[LabelEntry] = &[
    entry("available", "Còn trống", GREEN),
    entry("occupied", "Đang sử dụng", RED),
    entry("reserved", "Đã đặt trước", YELLOW),
    entry("need_cleaning", "Cần dọn dẹp", ORANGE),
];

const TASK_STATUS: &[LabelEntry] = &[
    entry("pending", "Chờ xử lý", YELLOW),
    entry("in-progress", "Đang thực hiện", BLUE),
    entry("completed", "Hoàn thành", GREEN),
    entry("cancelled", "Đã hủy", RED),
];

const TASK_TYPE: &[LabelEntry] = &[
    entry("cleaning", "Dọn phòng", BLUE),
    entry("laundry", "Giặt ủi", PURPLE),
    entry("refill", "Bổ sung vật dụng", ORANGE),
    entry("inspection", "Kiểm tra", YELLOW),
    entry("other", "Khác", GRAY),
];

const PRIORITY: &[LabelEntry] = &[
    entry("low", "Thấp", GREEN),
    entry("medium", "Trung bình", YELLOW),
    entry("high", "Cao", RED),
];

const ISSUE_CATEGORY: &[LabelEntry] = &[
    entry("maintenance", "Bảo trì", ORANGE),
    entry("guest-complaint", "Khiếu nại của khách", RED),
    entry("other", "Khác", GRAY),
];

const INVENTORY_CATEGORY: &[LabelEntry] = &[
    entry("LINEN", "Đồ vải", BLUE),
    entry("TOILETRY", "Đồ dùng vệ sinh", PURPLE),
    entry("CLEANING", "Dụng cụ vệ sinh", GREEN),
    entry("MINIBAR", "Minibar", ORANGE),
    entry("OTHER", "Khác", GRAY),
];

const INVENTORY_TYPE: &[LabelEntry] = &[
    entry("CONSUMABLE", "Tiêu hao", YELLOW),
    entry("REUSABLE", "Tái sử dụng", BLUE),
];

pub fn entries(domain: LabelDomain) -> &'static [LabelEntry] {
    match domain {
        LabelDomain::BookingStatus => BOOKING_STATUS,
        LabelDomain::PaymentStatus => PAYMENT_STATUS,
        LabelDomain::PaymentMethod => PAYMENT_METHOD,
        LabelDomain::RoomStatus => ROOM_STATUS,
        LabelDomain::TaskStatus => TASK_STATUS,
        LabelDomain::TaskType => TASK_TYPE,
        LabelDomain::Priority => PRIORITY,
        LabelDomain::IssueCategory => ISSUE_CATEGORY,
        LabelDomain::InventoryCategory => INVENTORY_CATEGORY,
        LabelDomain::InventoryType => INVENTORY_TYPE,
    }
}

pub fn lookup(domain: LabelDomain, value: &str) -> Option<&'static LabelEntry> {
    entries(domain).iter().find(|entry| entry.value == value)
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LabelSet {
    pub domain: LabelDomain,
    pub entries: Vec<LabelEntry>,
}

pub fn all() -> Vec<LabelSet> {
    LabelDomain::iter()
        .map(|domain| LabelSet {
            domain,
            entries: entries(domain).to_vec(),
        })
        .collect()
}
