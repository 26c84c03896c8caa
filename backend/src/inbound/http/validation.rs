//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every failure becomes an `invalid_request` error whose details name the
//! offending field and a stable machine-readable code.

use std::str::FromStr;

use serde_json::json;

use crate::domain::{DishId, DishValidationError, Error, UserId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValidationCode {
    InvalidUuid,
    EmptyField,
    TooShort,
    OutOfRange,
    InvalidPath,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::InvalidUuid => "invalid_uuid",
            Self::EmptyField => "empty_field",
            Self::TooShort => "too_short",
            Self::OutOfRange => "out_of_range",
            Self::InvalidPath => "invalid_path",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }
}

fn field_error(field: &str, code: ValidationCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.0;
    Error::invalid_request(format!("{field} must be a valid UUID")).with_details(json!({
        "field": field,
        "value": value,
        "code": ValidationCode::InvalidUuid.as_str(),
    }))
}

pub(crate) fn parse_dish_id(value: &str, field: FieldName) -> Result<DishId, Error> {
    DishId::from_str(value).map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn parse_user_id(value: &str, field: FieldName) -> Result<UserId, Error> {
    UserId::new(value).map_err(|_| invalid_uuid_error(field, value))
}

/// Map dish validation failures; `image` is reported under the JSON name.
pub(crate) fn dish_validation_error(error: DishValidationError) -> Error {
    let field = error.field();
    let code = match &error {
        DishValidationError::EmptyField { .. } => ValidationCode::EmptyField,
        DishValidationError::DescriptionTooShort { .. } => ValidationCode::TooShort,
        DishValidationError::StarsOutOfRange { .. }
        | DishValidationError::NonFiniteCoordinate
        | DishValidationError::LatitudeOutOfRange
        | DishValidationError::LongitudeOutOfRange => ValidationCode::OutOfRange,
        DishValidationError::InvalidImagePath => ValidationCode::InvalidPath,
    };
    field_error(field, code, error.to_string())
}
