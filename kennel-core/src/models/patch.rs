//! Partial update payload (allow-list merge)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{price_field, string_field, Dog, ValidationError};

/// Keys an update may touch. Everything else in the payload is ignored.
pub const UPDATABLE_FIELDS: [&str; 4] = ["name", "image", "breed", "price"];

/// Typed partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DogPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl DogPatch {
    /// Keep only the recognized keys of `payload`.
    ///
    /// Values of recognized keys are type-checked; `null` counts as absent.
    /// Fails with `NoUpdateFields` when nothing is left.
    pub fn from_payload(payload: &Map<String, Value>) -> Result<Self, ValidationError> {
        let patch = Self {
            name: string_field(payload, "name")?,
            image: string_field(payload, "image")?,
            breed: string_field(payload, "breed")?,
            price: price_field(payload)?,
        };

        if patch.is_empty() {
            return Err(ValidationError::NoUpdateFields);
        }
        Ok(patch)
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.image.is_none() && self.breed.is_none() && self.price.is_none()
    }

    /// Names of the columns this patch sets, in `UPDATABLE_FIELDS` order.
    pub fn fields(&self) -> Vec<&'static str> {
        let set = [
            self.name.is_some(),
            self.image.is_some(),
            self.breed.is_some(),
            self.price.is_some(),
        ];
        UPDATABLE_FIELDS
            .iter()
            .zip(set)
            .filter_map(|(field, is_set)| is_set.then_some(*field))
            .collect()
    }

    /// Merge into an existing record.
    pub fn apply_to(&self, dog: &mut Dog) {
        if let Some(name) = &self.name {
            dog.name = Some(name.clone());
        }
        if let Some(image) = &self.image {
            dog.image = Some(image.clone());
        }
        if let Some(breed) = &self.breed {
            dog.breed = Some(breed.clone());
        }
        if let Some(price) = self.price {
            dog.price = Some(price);
        }
    }
}
