//! Dashboard statistics over the full record set

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::models::Dog;

/// JSON key used for records without a breed
pub const UNSET_BREED_KEY: &str = "null";

/// Breed -> record count. Records without a breed share the `None` key.
///
/// A breed spelled exactly `"null"` is counted in the `None` group, since both
/// serialize under the same JSON key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreedDistribution(BTreeMap<Option<String>, u64>);

fn group_key(breed: Option<&str>) -> Option<String> {
    breed.filter(|b| *b != UNSET_BREED_KEY).map(str::to_owned)
}

impl BreedDistribution {
    pub fn record(&mut self, breed: Option<&str>) {
        *self.0.entry(group_key(breed)).or_insert(0) += 1;
    }

    pub fn get(&self, breed: Option<&str>) -> u64 {
        self.0.get(&group_key(breed)).copied().unwrap_or(0)
    }

    /// Number of distinct breeds
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Option<&str>, u64)> {
        self.0.iter().map(|(k, v)| (k.as_deref(), *v))
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }
}

impl Serialize for BreedDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (breed, count) in &self.0 {
            map.serialize_entry(breed.as_deref().unwrap_or(UNSET_BREED_KEY), count)?;
        }
        map.end()
    }
}

/// Inventory summary shown on the admin dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub total_dogs: u64,
    pub unique_breeds: u64,
    pub breed_distribution: BreedDistribution,
    pub total_inventory_value: f64,
    pub average_price: f64,
}

/// Summarize a complete, unfiltered record set.
///
/// A missing price counts as 0. The empty set yields all-zero statistics.
pub fn summarize(dogs: &[Dog]) -> Statistics {
    if dogs.is_empty() {
        return Statistics::default();
    }

    let mut breeds = BreedDistribution::default();
    let mut total_value = 0.0;

    for dog in dogs {
        breeds.record(dog.breed.as_deref());
        total_value += dog.price.unwrap_or(0.0);
    }

    let total_dogs = dogs.len() as u64;
    Statistics {
        total_dogs,
        unique_breeds: breeds.len() as u64,
        breed_distribution: breeds,
        total_inventory_value: total_value,
        average_price: total_value / total_dogs as f64,
    }
}
