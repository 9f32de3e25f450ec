use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::customers::CreateCustomerRequest, error::AppResult, models::Customer,
    response::ApiResponse, services::customer_service, state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(upsert_customer))
}

#[utoipa::path(
    post,
    path = "/api/customer",
    request_body = CreateCustomerRequest,
    responses(
        (status = 200, description = "Customer created or updated by email", body = ApiResponse<Customer>),
        (status = 400, description = "Invalid contact details")
    ),
    tag = "Customers"
)]
pub async fn upsert_customer(
    State(state): State<AppState>,
    Json(payload): Json<CreateCustomerRequest>,
) -> AppResult<Json<ApiResponse<Customer>>> {
    let resp = customer_service::upsert_customer(&state, payload).await?;
    Ok(Json(resp))
}
