use crate::errors::StoreResult;
use crate::models::{DayStats, SnapshotRow};
use rusqlite::{params, Connection, TransactionBehavior};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS habits (
    id INTEGER NOT NULL,
    name TEXT NOT NULL,
    type TEXT NOT NULL,
    done INTEGER NOT NULL DEFAULT 0 CHECK (done IN (0, 1)),
    val INTEGER NOT NULL DEFAULT 0,
    icon TEXT NOT NULL DEFAULT '',
    date TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_habits_date ON habits(date);
";

#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::bootstrap(Connection::open(path)?)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::bootstrap(Connection::open_in_memory()?)
    }

    fn bootstrap(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    // A panic mid-transaction drops the transaction, which rolls it back,
    // so the connection is still consistent after poisoning.
    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn rows_for_date(&self, date: &str) -> StoreResult<Vec<SnapshotRow>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id, name, type, done, val, icon, date
             FROM habits
             WHERE date = ?1
             ORDER BY rowid",
        )?;
        let rows = stmt
            .query_map([date], |row| {
                Ok(SnapshotRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    kind: row.get(2)?,
                    done: row.get(3)?,
                    val: row.get(4)?,
                    icon: row.get(5)?,
                    date: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn replace_day(&self, date: &str, rows: &[SnapshotRow]) -> StoreResult<()> {
        let mut conn = self.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM habits WHERE date = ?1", [date])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO habits (id, name, type, done, val, icon, date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for row in rows {
                insert.execute(params![
                    row.id, row.name, row.kind, row.done, row.val, row.icon, date
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn day_stats(&self, limit: usize) -> StoreResult<Vec<DayStats>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT date, COUNT(*) AS total, COALESCE(SUM(done), 0) AS completed
             FROM habits
             GROUP BY date
             ORDER BY date DESC
             LIMIT ?1",
        )?;
        let stats = stmt
            .query_map([limit as i64], |row| {
                Ok(DayStats {
                    date: row.get(0)?,
                    total: row.get(1)?,
                    completed: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(stats)
    }

    pub async fn get(&self, date: &str) -> StoreResult<Vec<SnapshotRow>> {
        let store = self.clone();
        let date = date.to_string();
        tokio::task::spawn_blocking(move || store.rows_for_date(&date)).await?
    }

    pub async fn replace_all(&self, date: &str, rows: Vec<SnapshotRow>) -> StoreResult<()> {
        let store = self.clone();
        let date = date.to_string();
        tokio::task::spawn_blocking(move || store.replace_day(&date, &rows)).await?
    }

    pub async fn stats(&self, limit: usize) -> StoreResult<Vec<DayStats>> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.day_stats(limit)).await?
    }
}
