use crate::db::AppState;
use crate::extract::{parse_training_plan, ExtractError, TrainingDay};
use crate::llm::{GeminiClient, LlmError};
use crate::models::AthleteProfile;
use serde::Serialize;
use std::sync::Arc;
use tauri::State;

const MAX_TRAINING_DAYS: u8 = 7;

/// Generated split, raw markdown plus the parsed days when the
/// DAY_START/DAY_END layout held
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingSplit {
  pub raw: String,
  pub days: Vec<TrainingDay>,
  pub parse_error: Option<ExtractError>,
}

impl TrainingSplit {
  fn from_raw(raw: String) -> Self {
    match parse_training_plan(&raw) {
      Ok(days) => Self {
        raw,
        days,
        parse_error: None,
      },
      Err(e) => {
        tracing::warn!(error = %e, "Training split did not follow day layout");
        Self {
          raw,
          days: Vec::new(),
          parse_error: Some(e),
        }
      }
    }
  }
}

pub(crate) async fn generate_with(
  client: &GeminiClient,
  profile: &AthleteProfile,
  days: u8,
  focus: &str,
) -> Result<TrainingSplit, LlmError> {
  let raw = client.generate_workout(profile, days, focus).await?;
  Ok(TrainingSplit::from_raw(raw))
}

#[tauri::command]
pub async fn generate_training_split(
  state: State<'_, Arc<AppState>>,
  days: u8,
  focus: String,
) -> Result<TrainingSplit, String> {
  if days == 0 || days > MAX_TRAINING_DAYS {
    return Err(format!("Days must be between 1 and {}", MAX_TRAINING_DAYS));
  }

  let profile = state
    .store
    .load_profile()
    .await
    .map_err(|e| format!("Failed to load profile: {}", e))?;

  let client = GeminiClient::from_env().map_err(|e| e.to_string())?;
  generate_with(&client, &profile, days, &focus)
    .await
    .map_err(|e| e.to_string())
}
