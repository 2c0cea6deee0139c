//! Route handlers organized by resource

pub mod admin;
pub mod dashboard;
pub mod dogs;
pub mod health;
