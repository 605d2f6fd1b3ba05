//! Service layer for the people registry.
//! - Keeps the table in process and persists it through `storage`.
//! - Exposes record operations behind the `PersonStore` trait.
//! - Reports failures as typed `ServiceError`s for the HTTP edge to map.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod people;
