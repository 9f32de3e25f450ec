use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::customers::CreateCustomerRequest,
    entity::customers::{
        ActiveModel as CustomerActive, Column as CustomerCol, Entity as Customers,
        Model as CustomerModel,
    },
    error::AppResult,
    models::Customer,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Creates the guest record, or refreshes the contact details of the guest
/// already registered under the same email.
pub async fn upsert_customer(
    state: &AppState,
    payload: CreateCustomerRequest,
) -> AppResult<ApiResponse<Customer>> {
    payload.validate()?;
    let email = payload.email.trim().to_lowercase();

    let existing = Customers::find()
        .filter(CustomerCol::Email.eq(email.clone()))
        .one(&state.orm)
        .await?;

    let (customer, message) = match existing {
        Some(customer) => {
            let mut active: CustomerActive = customer.into();
            active.full_name = Set(payload.full_name.trim().to_string());
            active.phone = Set(payload.phone.trim().to_string());
            active.nationality = Set(payload.nationality);
            if payload.id_number.is_some() {
                active.id_number = Set(payload.id_number);
            }
            (active.update(&state.orm).await?, "Customer updated")
        }
        None => {
            let created = CustomerActive {
                id: Set(Uuid::new_v4()),
                full_name: Set(payload.full_name.trim().to_string()),
                email: Set(email),
                phone: Set(payload.phone.trim().to_string()),
                nationality: Set(payload.nationality),
                id_number: Set(payload.id_number),
                created_at: NotSet,
            }
            .insert(&state.orm)
            .await?;
            (created, "Customer created")
        }
    };

    tracing::debug!(customer_id = %customer.id, "customer saved");
    Ok(ApiResponse::success(
        message,
        customer_from_entity(customer),
        Some(Meta::empty()),
    ))
}

fn customer_from_entity(model: CustomerModel) -> Customer {
    Customer {
        id: model.id,
        full_name: model.full_name,
        email: model.email,
        phone: model.phone,
        nationality: model.nationality,
        id_number: model.id_number,
    }
}
