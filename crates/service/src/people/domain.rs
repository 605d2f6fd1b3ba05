use serde::{Deserialize, Serialize};

/// Column order of the persisted table.
pub const HEADER: &[&str] = &["id", "nome", "cognome", "codice_fiscale"];

/// One person entry. Field names double as the JSON keys and the CSV header.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Person {
    pub id: i64,
    pub nome: String,
    pub cognome: String,
    pub codice_fiscale: String,
}
