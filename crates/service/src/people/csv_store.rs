use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::errors::ServiceError;
use crate::people::domain::{Person, HEADER};
use crate::people::store::PersonStore;
use crate::storage::csv_table::CsvTableStore;

const ENTITY: &str = "Item";

/// 文件存储：以 CSV（`id,nome,cognome,codice_fiscale`）持久化人员记录
pub struct CsvPersonStore {
    table: CsvTableStore<Person>,
}

fn position(rows: &[Person], id: i64) -> Result<usize, ServiceError> {
    rows.iter()
        .position(|p| p.id == id)
        .ok_or_else(|| ServiceError::not_found(ENTITY))
}

impl CsvPersonStore {
    /// 初始化存储，若文件不存在则创建仅含表头的文件
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let table = CsvTableStore::open(path, HEADER).await?;
        Ok(Arc::new(Self { table }))
    }

    pub async fn list(&self) -> Vec<Person> {
        self.table.rows().await
    }

    pub async fn get(&self, id: i64) -> Result<Person, ServiceError> {
        self.table
            .read(|rows| position(rows, id).map(|idx| rows[idx].clone()))
            .await
    }

    /// 追加新记录；id 已存在时返回 Duplicate
    pub async fn create(&self, person: Person) -> Result<Person, ServiceError> {
        let created = self
            .table
            .update(|rows| {
                if rows.iter().any(|p| p.id == person.id) {
                    return Err(ServiceError::Duplicate(person.id));
                }
                rows.push(person.clone());
                Ok(person)
            })
            .await?;
        debug!(id = created.id, "person created");
        Ok(created)
    }

    /// Overwrite the row at `id` with `person`, including its id. A new id
    /// that belongs to a different row is rejected.
    pub async fn update(&self, id: i64, person: Person) -> Result<Person, ServiceError> {
        let updated = self
            .table
            .update(|rows| {
                let idx = position(rows, id)?;
                if person.id != id && rows.iter().any(|p| p.id == person.id) {
                    return Err(ServiceError::Duplicate(person.id));
                }
                rows[idx] = person.clone();
                Ok(person)
            })
            .await?;
        debug!(path_id = id, id = updated.id, "person updated");
        Ok(updated)
    }

    /// Remove the row at `id`, returning it.
    pub async fn delete(&self, id: i64) -> Result<Person, ServiceError> {
        let removed = self
            .table
            .update(|rows| {
                let idx = position(rows, id)?;
                Ok(rows.remove(idx))
            })
            .await?;
        debug!(id, "person deleted");
        Ok(removed)
    }

    pub async fn count(&self) -> usize {
        self.table.len().await
    }
}

#[async_trait::async_trait]
impl PersonStore for CsvPersonStore {
    async fn list(&self) -> Vec<Person> {
        self.list().await
    }
    async fn get(&self, id: i64) -> Result<Person, ServiceError> {
        self.get(id).await
    }
    async fn create(&self, person: Person) -> Result<Person, ServiceError> {
        self.create(person).await
    }
    async fn update(&self, id: i64, person: Person) -> Result<Person, ServiceError> {
        self.update(id, person).await
    }
    async fn delete(&self, id: i64) -> Result<Person, ServiceError> {
        self.delete(id).await
    }
    async fn count(&self) -> usize {
        self.count().await
    }
}
