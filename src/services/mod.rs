pub mod admin_service;
pub mod auth_service;
pub mod booking_service;
pub mod catalog_service;
pub mod customer_service;
pub mod inventory_service;
pub mod payment_service;
pub mod review_service;
pub mod room_service;
pub mod task_service;
