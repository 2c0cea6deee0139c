//! PostgreSQL record store
//!
//! Uses a sqlx PgPool with explicit connection limits. Queries are built with
//! `QueryBuilder` so every filter value is a bind parameter.

use async_trait::async_trait;
use kennel_core::{Dog, DogId, DogPatch, DogQuery, DogStore, NewDog, StoreError};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

/// Default maximum connections for the pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

const COLUMNS: &str = "id, name, image, breed, price";

/// Create a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    create_pool_with_options(database_url, DEFAULT_MAX_CONNECTIONS).await
}

/// Create a PostgreSQL connection pool with custom options.
pub async fn create_pool_with_options(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// SELECT for a list request, ordered by id.
pub fn select_query(query: &DogQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM dogs WHERE TRUE", COLUMNS));
    let filter = &query.filter;

    if !filter.breeds.is_empty() {
        qb.push(" AND breed = ANY(")
            .push_bind(filter.breeds.clone())
            .push(")");
    }
    if let Some(min) = filter.min_price {
        qb.push(" AND price >= ").push_bind(min);
    }
    if let Some(max) = filter.max_price {
        qb.push(" AND price <= ").push_bind(max);
    }

    qb.push(" ORDER BY id ASC");

    if let Some(window) = query.window {
        qb.push(" LIMIT ")
            .push_bind(window.limit_i64())
            .push(" OFFSET ")
            .push_bind(window.offset_i64());
    }

    qb
}

/// UPDATE touching only the columns the patch sets.
///
/// Callers must not pass an empty patch.
pub fn update_query(id: DogId, patch: DogPatch) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE dogs SET ");
    {
        let mut set = qb.separated(", ");
        if let Some(name) = patch.name {
            set.push("name = ").push_bind_unseparated(name);
        }
        if let Some(image) = patch.image {
            set.push("image = ").push_bind_unseparated(image);
        }
        if let Some(breed) = patch.breed {
            set.push("breed = ").push_bind_unseparated(breed);
        }
        if let Some(price) = patch.price {
            set.push("price = ").push_bind_unseparated(price);
        }
    }
    qb.push(" WHERE id = ")
        .push_bind(id.get())
        .push(format!(" RETURNING {}", COLUMNS));
    qb
}

fn dog_from_row(row: &PgRow) -> Result<Dog, sqlx::Error> {
    Ok(Dog {
        id: DogId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        image: row.try_get("image")?,
        breed: row.try_get("breed")?,
        price: row.try_get("price")?,
    })
}

fn dogs_from_rows(rows: Vec<PgRow>) -> Result<Vec<Dog>, StoreError> {
    rows.iter()
        .map(dog_from_row)
        .collect::<Result<_, _>>()
        .map_err(StoreError::backend)
}

/// `DogStore` over a PostgreSQL `dogs` table
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `dogs` table if it does not exist.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        tracing::info!("Ensuring dogs table exists");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS dogs (
                id BIGSERIAL PRIMARY KEY,
                name TEXT,
                image TEXT,
                breed TEXT,
                price DOUBLE PRECISION CHECK (price >= 0)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        sqlx::query("CREATE INDEX IF NOT EXISTS dogs_breed_idx ON dogs (breed)")
            .execute(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        Ok(())
    }
}

#[async_trait]
impl DogStore for PgStore {
    async fn select(&self, query: &DogQuery) -> Result<Vec<Dog>, StoreError> {
        let mut qb = select_query(query);
        tracing::debug!(sql = qb.sql(), "Postgres select");
        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::backend)?;
        dogs_from_rows(rows)
    }

    async fn insert(&self, dog: NewDog) -> Result<Vec<Dog>, StoreError> {
        let rows = sqlx::query(&format!(
            "INSERT INTO dogs (name, image, breed, price) VALUES ($1, $2, $3, $4) RETURNING {}",
            COLUMNS
        ))
        .bind(dog.name)
        .bind(dog.image)
        .bind(dog.breed)
        .bind(dog.price)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::backend)?;
        dogs_from_rows(rows)
    }

    async fn update(&self, id: DogId, patch: DogPatch) -> Result<Vec<Dog>, StoreError> {
        if patch.is_empty() {
            return Err(StoreError::backend("update carries no fields"));
        }
        let mut qb = update_query(id, patch);
        tracing::debug!(sql = qb.sql(), "Postgres update");
        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::backend)?;
        dogs_from_rows(rows)
    }

    async fn delete(&self, id: DogId) -> Result<Vec<Dog>, StoreError> {
        let rows = sqlx::query(&format!("DELETE FROM dogs WHERE id = $1 RETURNING {}", COLUMNS))
            .bind(id.get())
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::backend)?;
        dogs_from_rows(rows)
    }
}
