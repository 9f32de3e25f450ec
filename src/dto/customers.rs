use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 255))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[validate(length(min = 2, max = 64))]
    pub nationality: String,
    pub id_number: Option<String>,
}

/// Accepts international numbers (`+` and 9 to 15 digits) and Vietnamese
/// local numbers (`0` followed by 9 or 10 digits). Spaces, dots and dashes
/// are ignored.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let compact: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '.' | '-'))
        .collect();
    let (digits, international) = match compact.strip_prefix('+') {
        Some(rest) => (rest, true),
        None => (compact.as_str(), false),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("phone"));
    }
    let valid = if international {
        (9..=15).contains(&digits.len()) && !digits.starts_with('0')
    } else {
        digits.starts_with('0') && (10..=11).contains(&digits.len())
    };
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("phone"))
    }
}
