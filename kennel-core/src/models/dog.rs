//! Dog records and the insert payload

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{price_field, string_field, ValidationError};

/// Store-assigned record id
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DogId(i64);

impl DogId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(self) -> i64 {
        self.0
    }

    /// Parse an id from a JSON value.
    ///
    /// Accepts positive integers and strings holding one. `null`, `0` and
    /// `""` count as missing.
    pub fn from_value(value: Option<&Value>) -> Result<Self, ValidationError> {
        match value {
            None | Some(Value::Null) => Err(ValidationError::MissingId),
            Some(Value::Number(n)) => match n.as_i64() {
                Some(0) => Err(ValidationError::MissingId),
                Some(id) if id > 0 => Ok(Self(id)),
                _ => Err(ValidationError::InvalidId {
                    value: n.to_string(),
                }),
            },
            Some(Value::String(s)) => Self::parse(s),
            Some(other) => Err(ValidationError::InvalidId {
                value: other.to_string(),
            }),
        }
    }

    /// Parse an id from text (query string or JSON string).
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::MissingId);
        }
        match s.parse::<i64>() {
            Ok(0) => Err(ValidationError::MissingId),
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(ValidationError::InvalidId {
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for DogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A row of the `dogs` table.
///
/// Every column except `id` is nullable in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dog {
    pub id: DogId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

/// Insert payload: all four attributes required
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDog {
    pub name: String,
    pub image: String,
    pub breed: String,
    pub price: f64,
}

impl NewDog {
    /// Build from a JSON object, ignoring unknown keys.
    pub fn from_payload(payload: &Map<String, Value>) -> Result<Self, ValidationError> {
        let name = required(string_field(payload, "name")?)?;
        let image = required(string_field(payload, "image")?)?;
        let breed = required(string_field(payload, "breed")?)?;
        let price = price_field(payload)?.ok_or(ValidationError::MissingFields)?;

        Ok(Self {
            name,
            image,
            breed,
            price,
        })
    }

    /// Attach a store-assigned id.
    pub fn into_dog(self, id: DogId) -> Dog {
        Dog {
            id,
            name: Some(self.name),
            image: Some(self.image),
            breed: Some(self.breed),
            price: Some(self.price),
        }
    }
}

fn required(value: Option<String>) -> Result<String, ValidationError> {
    match value {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(ValidationError::MissingFields),
    }
}
