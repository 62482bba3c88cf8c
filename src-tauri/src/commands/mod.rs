pub mod coach;
pub mod kitchen;
pub mod tracker;
pub mod training;

use crate::db::AppState;
use crate::models::{AthleteProfile, ProfileUpdate};
use crate::targets::Targets;
use std::sync::Arc;
use tauri::State;

#[tauri::command]
pub async fn get_profile(
  state: State<'_, Arc<AppState>>,
) -> Result<AthleteProfile, String> {
  state
    .store
    .load_profile()
    .await
    .map_err(|e| format!("Failed to load profile: {}", e))
}

/// Merge a partial edit into the stored profile
#[tauri::command]
pub async fn update_profile(
  state: State<'_, Arc<AppState>>,
  update: ProfileUpdate,
) -> Result<AthleteProfile, String> {
  state
    .store
    .update_profile(update)
    .await
    .map_err(|e| format!("Failed to update profile: {}", e))
}

#[tauri::command]
pub async fn save_profile(
  state: State<'_, Arc<AppState>>,
  profile: AthleteProfile,
) -> Result<AthleteProfile, String> {
  state
    .store
    .save_profile(&profile)
    .await
    .map_err(|e| format!("Failed to save profile: {}", e))?;
  Ok(profile)
}

/// Daily targets for the stored profile
#[tauri::command]
pub async fn get_targets(state: State<'_, Arc<AppState>>) -> Result<Targets, String> {
  let profile = state
    .store
    .load_profile()
    .await
    .map_err(|e| format!("Failed to load profile: {}", e))?;
  Ok(Targets::compute(&profile))
}
