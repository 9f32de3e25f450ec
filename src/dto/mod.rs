pub mod auth;
pub mod bookings;
pub mod customers;
pub mod inventories;
pub mod payments;
pub mod reviews;
pub mod rooms;
pub mod services;
pub mod tasks;
