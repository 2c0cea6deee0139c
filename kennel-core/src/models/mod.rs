//! Domain models with validation at construction
//!
//! Request payloads are validated when converted into these types.
//! Invalid input returns ValidationError, not panic.

pub mod dog;
pub mod patch;
pub mod validation;

pub use dog::{Dog, DogId, NewDog};
pub use patch::DogPatch;
pub use validation::ValidationError;

use serde_json::{Map, Value};

/// Read an optional string field; `null` counts as absent.
pub(crate) fn string_field(
    payload: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match payload.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::InvalidField {
            field,
            expected: "string",
        }),
    }
}

/// Read an optional non-negative price; `null` counts as absent.
pub(crate) fn price_field(payload: &Map<String, Value>) -> Result<Option<f64>, ValidationError> {
    match payload.get("price") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(p) if p.is_finite() && p >= 0.0 => Ok(Some(p)),
            Some(p) if p < 0.0 => Err(ValidationError::NegativePrice),
            _ => Err(ValidationError::InvalidField {
                field: "price",
                expected: "number",
            }),
        },
        Some(_) => Err(ValidationError::InvalidField {
            field: "price",
            expected: "number",
        }),
    }
}
