//! Daily history ledger
//!
//! Commits a scored day into the rolling `athlete_history` collection:
//! - one entry per local calendar day (`MM/DD`), a second commit on the same
//!   day replaces the first in place
//! - new days are appended
//! - only the most recent 30 entries are kept, oldest dropped first

use chrono::{Local, NaiveDate};

use crate::models::{AthleteProfile, DailyLog, HistoricalEntry};
use crate::store::{DocumentStore, StoreError};
use crate::targets::Targets;

pub const HISTORY_CAP: usize = 30;

/// `MM/DD` key for a calendar day
pub fn date_key(date: NaiveDate) -> String {
  date.format("%m/%d").to_string()
}

/// Build the entry recorded for a day
pub fn build_entry(
  date: NaiveDate,
  profile: &AthleteProfile,
  targets: &Targets,
  log: &DailyLog,
  score: i64,
) -> HistoricalEntry {
  HistoricalEntry {
    date: date_key(date),
    weight: profile.weight_lbs,
    calories: log.logged_calories(),
    protein: targets.protein_g,
    carbs: targets.carb_g,
    fats: targets.fat_g,
    actual_protein: log.actual_protein,
    actual_carbs: log.actual_carbs,
    actual_fats: log.actual_fats,
    score,
  }
}

/// Insert or replace by date, then trim to the cap from the front
pub fn upsert(history: &mut Vec<HistoricalEntry>, entry: HistoricalEntry) {
  match history.iter_mut().find(|h| h.date == entry.date) {
    Some(existing) => *existing = entry,
    None => history.push(entry),
  }

  if history.len() > HISTORY_CAP {
    let excess = history.len() - HISTORY_CAP;
    history.drain(..excess);
  }
}

/// Commit today's log (local calendar)
pub async fn commit(
  store: &DocumentStore,
  profile: &AthleteProfile,
  targets: &Targets,
  log: &DailyLog,
  score: i64,
) -> Result<HistoricalEntry, StoreError> {
  commit_on(store, Local::now().date_naive(), profile, targets, log, score).await
}

/// Commit a log for a specific calendar day
pub async fn commit_on(
  store: &DocumentStore,
  date: NaiveDate,
  profile: &AthleteProfile,
  targets: &Targets,
  log: &DailyLog,
  score: i64,
) -> Result<HistoricalEntry, StoreError> {
  let entry = build_entry(date, profile, targets, log, score);

  let mut history = store.load_history().await?;
  upsert(&mut history, entry.clone());
  store.save_history(&history).await?;

  tracing::info!(date = %entry.date, score, entries = history.len(), "Daily log committed");

  Ok(entry)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
