//! Storage abstractions for service layer
//!
//! Contains reusable file-backed stores shared by services that persist
//! a whole table at once.

pub mod csv_table;
