use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("ID already exists")]
    Duplicate(i64),
    #[error("{0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("corrupt table: {0}")]
    Corrupt(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// Whether the failure comes from the backing file rather than the request.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Corrupt(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(ServiceError::Duplicate(7).to_string(), "ID already exists");
        assert_eq!(ServiceError::not_found("Item").to_string(), "Item not found");
        assert!(ServiceError::Storage("disk full".into()).is_storage());
        assert!(!ServiceError::not_found("Item").is_storage());
    }
}
