use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, sync::RwLock};
use tracing::{debug, error, info};

use crate::errors::ServiceError;

/// Generic CSV file-backed table.
///
/// Keeps the ordered rows in memory behind a single `RwLock` and rewrites the
/// whole file on every mutation, while the write lock is still held. Readers
/// never see a half-applied mutation and two writers never interleave.
pub struct CsvTableStore<T> {
    rows: RwLock<Vec<T>>,
    file_path: PathBuf,
    header: &'static [&'static str],
}

impl<T> CsvTableStore<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    /// Open the table at `path`. A missing (or zero-byte) file is created with
    /// just the header row; a file that fails to parse is an error.
    pub async fn open<P: Into<PathBuf>>(
        path: P,
        header: &'static [&'static str],
    ) -> Result<Self, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ServiceError::Storage(format!("{}: {e}", parent.display())))?;
        }

        let bytes = match fs::read(&file_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(ServiceError::Storage(format!("{}: {e}", file_path.display())));
            }
        };

        let store = Self { rows: RwLock::new(Vec::new()), file_path, header };
        if bytes.is_empty() {
            store.persist(&[]).await?;
            info!(path = %store.file_path.display(), "created empty table");
        } else {
            let rows = decode(&bytes, header)?;
            info!(path = %store.file_path.display(), rows = rows.len(), "loaded table");
            *store.rows.write().await = rows;
        }
        Ok(store)
    }

    /// Snapshot of every row in storage order.
    pub async fn rows(&self) -> Vec<T> {
        self.rows.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    /// Run `f` against the rows under the read lock.
    pub async fn read<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&[T]) -> R,
    {
        let rows = self.rows.read().await;
        f(rows.as_slice())
    }

    /// Apply a mutation and persist the whole table under the same write lock.
    ///
    /// If `f` fails, or the file cannot be written, the in-memory rows are
    /// restored so memory and disk stay in agreement.
    pub async fn update<R, F>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, ServiceError>,
    {
        let mut rows = self.rows.write().await;
        let snapshot = rows.clone();
        let out = match f(&mut *rows) {
            Ok(out) => out,
            Err(e) => {
                *rows = snapshot;
                return Err(e);
            }
        };
        if let Err(e) = self.persist(rows.as_slice()).await {
            error!(path = %self.file_path.display(), error = %e, "persisting table failed; rolled back");
            *rows = snapshot;
            return Err(e);
        }
        debug!(path = %self.file_path.display(), rows = rows.len(), "table persisted");
        Ok(out)
    }

    async fn persist(&self, rows: &[T]) -> Result<(), ServiceError> {
        let data = encode(rows, self.header)?;
        let tmp = tmp_path(&self.file_path);
        fs::write(&tmp, data)
            .await
            .map_err(|e| ServiceError::Storage(format!("{}: {e}", tmp.display())))?;
        fs::rename(&tmp, &self.file_path)
            .await
            .map_err(|e| ServiceError::Storage(format!("{}: {e}", self.file_path.display())))?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn encode<T: Serialize>(rows: &[T], header: &[&str]) -> Result<Vec<u8>, ServiceError> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    wtr.write_record(header).map_err(|e| ServiceError::Storage(e.to_string()))?;
    for row in rows {
        wtr.serialize(row).map_err(|e| ServiceError::Storage(e.to_string()))?;
    }
    wtr.into_inner().map_err(|e| ServiceError::Storage(e.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8], header: &[&str]) -> Result<Vec<T>, ServiceError> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(bytes);
    let found = rdr.headers().map_err(|e| ServiceError::Corrupt(e.to_string()))?;
    if found.iter().ne(header.iter().copied()) {
        return Err(ServiceError::Corrupt(format!(
            "unexpected header {:?}, expected {:?}",
            found.iter().collect::<Vec<_>>(),
            header
        )));
    }
    rdr.deserialize()
        .map(|row| row.map_err(|e| ServiceError::Corrupt(e.to_string())))
        .collect()
}
