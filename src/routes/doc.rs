use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    domain::{
        availability::{RoomOption, RoomOptions, RoomTypeGroup},
        booking_flow::BookingStage,
        labels::{LabelDomain, LabelEntry, LabelSet},
        pricing::{BookingTotals, NightlyPrice},
    },
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        bookings::{
            AddRoomRequest, AddServicesRequest, BookingDetail, BookingLookupRequest,
            ConfirmBookingRequest, RemoveRoomRequest, RoomSlotRequest, ServiceSelection,
            UpdateBookingStatusRequest, UpdateTempBookingRequest,
        },
        customers::CreateCustomerRequest,
        inventories::{AdjustInventoryRequest, CreateInventoryRequest},
        payments::{
            ManualPaymentRequest, VnpayPaymentRequest, VnpayPaymentResponse, VnpayReturnResponse,
        },
        reviews::{CreateReviewRequest, UpdateReviewVisibilityRequest},
        rooms::{
            AvailabilityResponse, CreateRoomRequest, CreateRoomTypeRequest,
            UpdateRoomStatusRequest,
        },
        services::{CreateServiceRequest, UpdateServiceRequest},
        tasks::{CreateTaskRequest, HousekeepingRoom, ReportIssueRequest, UpdateTaskStatusRequest},
    },
    models::{
        AuditLog, Booking, BookingRoom, BookingServiceItem, BookingStatus, Customer, Inventory,
        InventoryCategory, InventoryType, IssueCategory, Payment, PaymentMethod,
        PaymentRecordStatus, PaymentStatus, Priority, Review, Room, RoomSnapshot, RoomStatus,
        RoomType, Service, ServiceLine, StaffRole, Task, TaskIssue, TaskStatus, TaskType, User,
    },
    response::{ApiResponse, Meta},
    routes::{
        admin, auth, booking, catalog, customer, health, inventories, labels, params, payment,
        reviews, room, tasks,
    },
    table::{ColumnHeader, TableQuery},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        booking::create_temp,
        booking::get_booking,
        booking::get_by_code,
        booking::update_temp,
        booking::room_options,
        booking::add_room,
        booking::remove_room,
        booking::add_services,
        booking::reset_rooms,
        booking::reset_dates,
        booking::confirm_booking,
        booking::lookup,
        booking::list_bookings,
        booking::update_status,
        room::list_room_types,
        room::get_room_type,
        room::create_room_type,
        room::list_rooms,
        room::create_room,
        room::update_room_status,
        room::available,
        catalog::list_services,
        catalog::list_all,
        catalog::create_service,
        catalog::update_service,
        customer::upsert_customer,
        payment::manual_payment,
        payment::vnpay_payment,
        payment::vnpay_return,
        payment::list_payments,
        tasks::list_tasks,
        tasks::get_task,
        tasks::create_task,
        tasks::update_task_status,
        tasks::report_issue,
        tasks::housekeeping_rooms,
        inventories::list_inventories,
        inventories::list_low_stock,
        inventories::create_inventory,
        inventories::adjust_inventory,
        reviews::create_review,
        reviews::list_visible,
        reviews::list_all,
        reviews::set_visibility,
        reviews::delete_review,
        labels::all_labels,
        labels::domain_labels,
        admin::list_audit_logs
    ),
    components(
        schemas(
            User,
            StaffRole,
            RoomType,
            Room,
            RoomStatus,
            Service,
            Customer,
            Booking,
            BookingRoom,
            BookingServiceItem,
            BookingStatus,
            BookingStage,
            PaymentStatus,
            PaymentMethod,
            PaymentRecordStatus,
            Payment,
            RoomSnapshot,
            ServiceLine,
            Task,
            TaskIssue,
            TaskStatus,
            TaskType,
            Priority,
            IssueCategory,
            Inventory,
            InventoryCategory,
            InventoryType,
            Review,
            AuditLog,
            RoomTypeGroup,
            RoomOption,
            RoomOptions,
            NightlyPrice,
            BookingTotals,
            BookingDetail,
            LabelDomain,
            LabelEntry,
            LabelSet,
            ColumnHeader,
            TableQuery,
            params::Pagination,
            params::SortOrder,
            LoginRequest,
            LoginResponse,
            RegisterRequest,
            RoomSlotRequest,
            UpdateTempBookingRequest,
            AddRoomRequest,
            RemoveRoomRequest,
            ServiceSelection,
            AddServicesRequest,
            ConfirmBookingRequest,
            BookingLookupRequest,
            UpdateBookingStatusRequest,
            CreateCustomerRequest,
            CreateRoomTypeRequest,
            CreateRoomRequest,
            UpdateRoomStatusRequest,
            AvailabilityResponse,
            CreateServiceRequest,
            UpdateServiceRequest,
            ManualPaymentRequest,
            VnpayPaymentRequest,
            VnpayPaymentResponse,
            VnpayReturnResponse,
            CreateTaskRequest,
            UpdateTaskStatusRequest,
            ReportIssueRequest,
            HousekeepingRoom,
            CreateInventoryRequest,
            AdjustInventoryRequest,
            CreateReviewRequest,
            UpdateReviewVisibilityRequest,
            Meta,
            ApiResponse<BookingDetail>,
            ApiResponse<RoomOptions>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Back-office authentication"),
        (name = "Booking", description = "Booking wizard and booking administration"),
        (name = "Rooms", description = "Room types, rooms and availability"),
        (name = "Services", description = "Extra service catalog"),
        (name = "Customers", description = "Guest records"),
        (name = "Payments", description = "Front-desk and VNPay payments"),
        (name = "Tasks", description = "Housekeeping tasks"),
        (name = "Inventories", description = "Stock of consumables and linen"),
        (name = "Reviews", description = "Guest reviews"),
        (name = "Labels", description = "Display labels for enum values"),
        (name = "Admin", description = "Admin endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
