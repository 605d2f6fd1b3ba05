//! Person records: domain type, store trait and its CSV-backed implementation.

pub mod domain;
pub mod store;
pub mod csv_store;

pub use csv_store::CsvPersonStore;
pub use domain::{Person, HEADER};
pub use store::PersonStore;
