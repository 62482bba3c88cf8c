use crate::db::AppState;
use crate::extract::{parse_macros, ExtractError, MealMacros};
use crate::llm::{GeminiClient, LlmError};
use crate::models::SavedMeal;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tauri::State;

/// AI meal analysis with the macros pulled out of it when the
/// `### Macros` block could be read
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealAnalysis {
  pub text: String,
  pub macros: Option<MealMacros>,
  pub macros_error: Option<ExtractError>,
}

impl MealAnalysis {
  fn from_text(text: String) -> Self {
    match parse_macros(&text) {
      Ok(macros) => Self {
        text,
        macros: Some(macros),
        macros_error: None,
      },
      Err(e) => {
        tracing::warn!(error = %e, "Meal analysis without readable macros");
        Self {
          text,
          macros: None,
          macros_error: Some(e),
        }
      }
    }
  }
}

/// Accepts either raw base64 or a `data:image/...;base64,` URL
fn strip_data_url(image: &str) -> &str {
  match image.split_once(',') {
    Some((prefix, data)) if prefix.starts_with("data:") => data,
    _ => image,
  }
}

async fn load_goal(state: &AppState) -> Result<&'static str, String> {
  let profile = state
    .store
    .load_profile()
    .await
    .map_err(|e| format!("Failed to load profile: {}", e))?;
  Ok(profile.goal.as_str())
}

fn client() -> Result<GeminiClient, String> {
  GeminiClient::from_env().map_err(|e| e.to_string())
}

/// ---------------------------------------------------------------------------
/// Analysis
/// ---------------------------------------------------------------------------

pub(crate) async fn analyze_with(
  client: &GeminiClient,
  goal: &str,
  description: &str,
  image: Option<&str>,
) -> Result<MealAnalysis, LlmError> {
  let text = match image {
    Some(image) => {
      client
        .analyze_meal_image(strip_data_url(image), description, goal)
        .await?
    }
    None => client.analyze_meal_text(description, goal).await?,
  };
  Ok(MealAnalysis::from_text(text))
}

/// Analyze a meal from a description and/or photo
#[tauri::command]
pub async fn analyze_meal(
  state: State<'_, Arc<AppState>>,
  description: String,
  image: Option<String>,
) -> Result<MealAnalysis, String> {
  if description.trim().is_empty() && image.is_none() {
    return Err("Describe the meal or attach a photo".to_string());
  }

  let goal = load_goal(&state).await?;
  analyze_with(&client()?, goal, &description, image.as_deref())
    .await
    .map_err(|e| e.to_string())
}

/// Recalculate a previous analysis with the athlete's follow-up answer
#[tauri::command]
pub async fn refine_meal_analysis(
  state: State<'_, Arc<AppState>>,
  previous: String,
  follow_up: String,
) -> Result<MealAnalysis, String> {
  let goal = load_goal(&state).await?;
  let text = client()?
    .refine_analysis(&previous, &follow_up, goal)
    .await
    .map_err(|e| e.to_string())?;
  Ok(MealAnalysis::from_text(text))
}

#[tauri::command]
pub async fn build_recipe(
  state: State<'_, Arc<AppState>>,
  ingredients: String,
) -> Result<String, String> {
  let goal = load_goal(&state).await?;
  client()?
    .build_recipe(&ingredients, goal)
    .await
    .map_err(|e| e.to_string())
}

/// ---------------------------------------------------------------------------
/// Saved Meals
/// ---------------------------------------------------------------------------

/// Keep an analysis in the meal log, newest first
#[tauri::command]
pub async fn save_meal(
  state: State<'_, Arc<AppState>>,
  analysis: String,
  image_url: Option<String>,
) -> Result<Vec<SavedMeal>, String> {
  let now = Utc::now();
  let macros = parse_macros(&analysis).ok();

  let meal = SavedMeal {
    id: now.timestamp_millis().to_string(),
    date: now.to_rfc3339(),
    analysis,
    image_url,
    protein: macros.map(|m| m.protein),
    carbs: macros.map(|m| m.carbs),
    fats: macros.map(|m| m.fats),
    calories: macros.map(|m| m.calories),
  };

  state
    .store
    .add_meal(meal)
    .await
    .map_err(|e| format!("Failed to save meal: {}", e))
}

#[tauri::command]
pub async fn get_saved_meals(
  state: State<'_, Arc<AppState>>,
  limit: Option<usize>,
) -> Result<Vec<SavedMeal>, String> {
  let mut meals = state
    .store
    .load_meals()
    .await
    .map_err(|e| format!("Failed to load meals: {}", e))?;

  if let Some(limit) = limit {
    meals.truncate(limit);
  }
  Ok(meals)
}
