pub mod file;
pub mod sqlite;

pub use file::FileStore;
pub use sqlite::SqliteStore;

use crate::config::StoreKind;
use crate::errors::StoreResult;
use crate::models::{DayStats, SnapshotRow};
use std::path::Path;
use std::sync::Arc;

#[derive(Clone)]
pub enum Store {
    Sqlite(SqliteStore),
    File(Arc<FileStore>),
}

impl Store {
    pub async fn open(kind: StoreKind, path: &Path) -> StoreResult<Self> {
        match kind {
            StoreKind::Sqlite => Ok(Self::Sqlite(SqliteStore::open(path)?)),
            StoreKind::File => Ok(Self::File(Arc::new(FileStore::open(path).await?))),
        }
    }

    pub async fn get(&self, date: &str) -> StoreResult<Vec<SnapshotRow>> {
        match self {
            Self::Sqlite(store) => store.get(date).await,
            Self::File(store) => store.get(date).await,
        }
    }

    pub async fn replace_all(&self, date: &str, rows: Vec<SnapshotRow>) -> StoreResult<()> {
        match self {
            Self::Sqlite(store) => store.replace_all(date, rows).await,
            Self::File(store) => store.replace_all(date, rows).await,
        }
    }

    pub async fn stats(&self, limit: usize) -> StoreResult<Vec<DayStats>> {
        match self {
            Self::Sqlite(store) => store.stats(limit).await,
            Self::File(store) => store.stats(limit).await,
        }
    }
}
