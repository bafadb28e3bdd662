use crate::errors::{StoreError, StoreResult};
use crate::models::{AppData, DayStats, SnapshotRow};
use crate::stats::build_stats;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

pub struct FileStore {
    path: PathBuf,
    data: Mutex<AppData>,
}

impl FileStore {
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let data = load_data(&path).await?;
        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    pub async fn get(&self, date: &str) -> StoreResult<Vec<SnapshotRow>> {
        let data = self.data.lock().await;
        Ok(data.days.get(date).cloned().unwrap_or_default())
    }

    // On a failed persist the previous rows go back before returning.
    pub async fn replace_all(&self, date: &str, rows: Vec<SnapshotRow>) -> StoreResult<()> {
        let rows: Vec<SnapshotRow> = rows
            .into_iter()
            .map(|row| SnapshotRow {
                date: date.to_string(),
                ..row
            })
            .collect();

        let mut data = self.data.lock().await;
        let previous = if rows.is_empty() {
            data.days.remove(date)
        } else {
            data.days.insert(date.to_string(), rows)
        };

        if let Err(err) = persist_data(&self.path, &data).await {
            match previous {
                Some(rows) => data.days.insert(date.to_string(), rows),
                None => data.days.remove(date),
            };
            return Err(err);
        }

        Ok(())
    }

    pub async fn stats(&self, limit: usize) -> StoreResult<Vec<DayStats>> {
        let data = self.data.lock().await;
        Ok(build_stats(&data, limit))
    }
}

async fn load_data(path: &Path) -> StoreResult<AppData> {
    match fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(AppData::default()),
        Err(err) => Err(StoreError::Io(err)),
    }
}

// Written to a sibling file first so a crash mid-write leaves the old document intact.
async fn persist_data(path: &Path, data: &AppData) -> StoreResult<()> {
    let payload = serde_json::to_vec_pretty(data)?;
    let staging = path.with_extension("json.tmp");
    fs::write(&staging, payload).await?;
    fs::rename(&staging, path).await?;
    Ok(())
}
