//! Validation error types

use std::fmt;

/// Client input error for request payloads
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Body is not a JSON object (or not declared as JSON)
    NotJson,

    /// `id` absent, null, zero or empty
    MissingId,

    /// `id` present but not a positive integer
    InvalidId { value: String },

    /// One of the insert fields is absent or empty
    MissingFields,

    /// Update payload carries none of the recognized fields
    NoUpdateFields,

    /// Recognized field with the wrong JSON type
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    /// Price below zero
    NegativePrice,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotJson => write!(f, "Request must be JSON"),
            Self::MissingId => write!(f, "Missing dog id"),
            Self::InvalidId { value } => write!(f, "Invalid dog id: {}", value),
            Self::MissingFields => write!(f, "Missing required fields"),
            Self::NoUpdateFields => write!(f, "No valid fields to update"),
            Self::InvalidField { field, expected } => {
                write!(f, "Invalid value for field '{}': expected {}", field, expected)
            }
            Self::NegativePrice => write!(f, "price must be non-negative"),
        }
    }
}

impl std::error::Error for ValidationError {}
