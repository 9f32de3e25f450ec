pub mod audit_logs;
pub mod booking_rooms;
pub mod booking_services;
pub mod bookings;
pub mod customers;
pub mod inventories;
pub mod payments;
pub mod reviews;
pub mod room_types;
pub mod rooms;
pub mod services;
pub mod tasks;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use booking_rooms::Entity as BookingRooms;
pub use booking_services::Entity as BookingServices;
pub use bookings::Entity as Bookings;
pub use customers::Entity as Customers;
pub use inventories::Entity as Inventories;
pub use payments::Entity as Payments;
pub use reviews::Entity as Reviews;
pub use room_types::Entity as RoomTypes;
pub use rooms::Entity as Rooms;
pub use services::Entity as Services;
pub use tasks::Entity as Tasks;
pub use users::Entity as Users;
