use axum::{http::StatusCode, Json};
use bigdecimal::{BigDecimal, Zero};
use regex::Regex;
use serde_json::json;
use std::{borrow::Cow, sync::OnceLock};
use validator::{ValidationError, ValidationErrors};

pub fn into_response(errors: ValidationErrors) -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({"errors": errors})))
}

fn phone_number_regex() -> Option<&'static Regex> {
    static REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    REGEX
        .get_or_init(|| Regex::new(r"^09[0-9]{9}$").ok())
        .as_ref()
}

pub fn is_valid_phone_number(phone_number: &str) -> bool {
    phone_number_regex().is_some_and(|regex| regex.is_match(phone_number))
}

pub fn validate_phone_number(phone_number: &str) -> Result<(), ValidationError> {
    match is_valid_phone_number(phone_number) {
        true => Ok(()),
        false => Err(
            ValidationError::new("INVALID_PHONE_NUMBER").with_message(Cow::from(
                "Phone number must be 11 digits starting with 09 (e.g: 09121234567)",
            )),
        ),
    }
}

pub fn validate_price(price: &BigDecimal) -> Result<(), ValidationError> {
    match price > &BigDecimal::zero() {
        true => Ok(()),
        false => Err(ValidationError::new("INVALID_PRICE")
            .with_message(Cow::from("Price must be greater than zero"))),
    }
}
