//! In-process record store

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{DogStore, StoreError};
use crate::models::{Dog, DogId, DogPatch, NewDog};
use crate::query::DogQuery;

/// `DogStore` backed by a map; ids are assigned sequentially from 1.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    dogs: BTreeMap<DogId, Dog>,
    last_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with existing records, keeping their ids.
    pub fn with_dogs(dogs: impl IntoIterator<Item = Dog>) -> Self {
        let mut inner = Inner::default();
        for dog in dogs {
            inner.last_id = inner.last_id.max(dog.id.get());
            inner.dogs.insert(dog.id, dog);
        }
        Self {
            inner: RwLock::new(inner),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|i| i.dogs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DogStore for MemoryStore {
    async fn select(&self, query: &DogQuery) -> Result<Vec<Dog>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(query.apply(inner.dogs.values()))
    }

    async fn insert(&self, dog: NewDog) -> Result<Vec<Dog>, StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        inner.last_id += 1;
        let dog = dog.into_dog(DogId::new(inner.last_id));
        inner.dogs.insert(dog.id, dog.clone());
        Ok(vec![dog])
    }

    async fn update(&self, id: DogId, patch: DogPatch) -> Result<Vec<Dog>, StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        Ok(inner
            .dogs
            .get_mut(&id)
            .map(|dog| {
                patch.apply_to(dog);
                vec![dog.clone()]
            })
            .unwrap_or_default())
    }

    async fn delete(&self, id: DogId) -> Result<Vec<Dog>, StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        Ok(inner.dogs.remove(&id).into_iter().collect())
    }
}
