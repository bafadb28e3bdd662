use crate::dates::parse_date_key;
use crate::errors::AppError;
use crate::models::{DayStats, SaveRequest, SaveResponse, SnapshotRow};
use crate::state::AppState;
use crate::stats::DEFAULT_STATS_LIMIT;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use std::collections::HashSet;
use tracing::info;

pub async fn get_habits(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<Vec<SnapshotRow>>, AppError> {
    validate_date(&date)?;
    let rows = state.store.get(&date).await?;
    Ok(Json(rows))
}

pub async fn save_habits(
    State(state): State<AppState>,
    Path(date): Path<String>,
    payload: Result<Json<SaveRequest>, JsonRejection>,
) -> Result<Json<SaveResponse>, AppError> {
    validate_date(&date)?;
    let Json(payload) = payload?;

    let mut seen = HashSet::with_capacity(payload.habits.len());
    if let Some(dup) = payload.habits.iter().find(|habit| !seen.insert(habit.id)) {
        return Err(AppError::bad_request(format!(
            "habit id {} appears more than once",
            dup.id
        )));
    }

    let rows: Vec<SnapshotRow> = payload
        .habits
        .into_iter()
        .map(|habit| habit.into_row(&date))
        .collect();
    let count = rows.len();

    state.store.replace_all(&date, rows).await?;
    info!(%date, rows = count, "snapshot replaced");

    Ok(Json(SaveResponse { success: true }))
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<Vec<DayStats>>, AppError> {
    let stats = state.store.stats(DEFAULT_STATS_LIMIT).await?;
    Ok(Json(stats))
}

fn validate_date(raw: &str) -> Result<(), AppError> {
    parse_date_key(raw)
        .map(|_| ())
        .ok_or_else(|| AppError::bad_request(format!("invalid date '{raw}', expected YYYY-MM-DD")))
}
