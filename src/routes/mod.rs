use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod booking;
pub mod catalog;
pub mod customer;
pub mod doc;
pub mod health;
pub mod inventories;
pub mod labels;
pub mod params;
pub mod payment;
pub mod reviews;
pub mod room;
pub mod tasks;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/booking", booking::router())
        .nest("/room", room::router())
        .nest("/services", catalog::router())
        .nest("/customer", customer::router())
        .nest("/payment", payment::router())
        .nest("/vnpay", payment::gateway_router())
        .nest("/tasks", tasks::router())
        .nest("/housekeeping", tasks::housekeeping_router())
        .nest("/inventories", inventories::router())
        .nest("/reviews", reviews::router())
        .nest("/labels", labels::router())
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
}
