use crate::errors::ServiceError;
use crate::people::domain::Person;
use async_trait::async_trait;

/// Trait abstraction for person record storage.
/// Implementations must make each call atomic with respect to the others.
#[async_trait]
pub trait PersonStore: Send + Sync {
    async fn list(&self) -> Vec<Person>;
    async fn get(&self, id: i64) -> Result<Person, ServiceError>;
    async fn create(&self, person: Person) -> Result<Person, ServiceError>;
    async fn update(&self, id: i64, person: Person) -> Result<Person, ServiceError>;
    async fn delete(&self, id: i64) -> Result<Person, ServiceError>;
    async fn count(&self) -> usize;
}
