use crate::models::{AppData, DayStats};

pub const DEFAULT_STATS_LIMIT: usize = 30;

// `completed` sums the stored done flag regardless of habit type.
pub fn build_stats(data: &AppData, limit: usize) -> Vec<DayStats> {
    data.days
        .iter()
        .rev()
        .filter(|(_, rows)| !rows.is_empty())
        .take(limit)
        .map(|(date, rows)| DayStats {
            date: date.clone(),
            total: rows.len() as i64,
            completed: rows.iter().map(|row| i64::from(row.done)).sum(),
        })
        .collect()
}
