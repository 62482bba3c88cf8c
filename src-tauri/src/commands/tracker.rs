use crate::db::AppState;
use crate::ledger;
use crate::models::{DailyLog, HistoricalEntry};
use crate::readiness::ReadinessScore;
use crate::targets::Targets;
use serde::Serialize;
use std::sync::Arc;
use tauri::State;

/// Committed entry plus the score breakdown behind it
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCommit {
  pub entry: HistoricalEntry,
  pub score: ReadinessScore,
}

/// Score an in-progress log without persisting it
#[tauri::command]
pub async fn preview_readiness(
  state: State<'_, Arc<AppState>>,
  log: DailyLog,
) -> Result<ReadinessScore, String> {
  let profile = state
    .store
    .load_profile()
    .await
    .map_err(|e| format!("Failed to load profile: {}", e))?;

  Ok(ReadinessScore::compute(&log, &Targets::compute(&profile)))
}

/// Score today's log and write it into the rolling history
#[tauri::command]
pub async fn commit_daily_log(
  state: State<'_, Arc<AppState>>,
  log: DailyLog,
) -> Result<DailyCommit, String> {
  let profile = state
    .store
    .load_profile()
    .await
    .map_err(|e| format!("Failed to load profile: {}", e))?;

  let targets = Targets::compute(&profile);
  let score = ReadinessScore::compute(&log, &targets);

  let entry = ledger::commit(&state.store, &profile, &targets, &log, score.total)
    .await
    .map_err(|e| format!("Failed to commit daily log: {}", e))?;

  Ok(DailyCommit { entry, score })
}

/// Oldest first, at most 30 entries
#[tauri::command]
pub async fn get_history(
  state: State<'_, Arc<AppState>>,
) -> Result<Vec<HistoricalEntry>, String> {
  state
    .store
    .load_history()
    .await
    .map_err(|e| format!("Failed to load history: {}", e))
}
