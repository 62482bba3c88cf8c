use crate::db::AppState;
use crate::llm::{GeminiClient, GroceryRequest, ResearchResult};
use crate::models::SavedGroceryPlan;
use chrono::Utc;
use std::sync::Arc;
use tauri::State;

fn client() -> Result<GeminiClient, String> {
  GeminiClient::from_env().map_err(|e| e.to_string())
}

fn non_empty(value: &str) -> Option<String> {
  let trimmed = value.trim();
  (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[tauri::command]
pub async fn ask_coach(question: String) -> Result<String, String> {
  if question.trim().is_empty() {
    return Err("Ask the coach a question".to_string());
  }
  client()?.ask_coach(&question).await.map_err(|e| e.to_string())
}

/// Web-grounded research with sources
#[tauri::command]
pub async fn research_topic(query: String) -> Result<ResearchResult, String> {
  if query.trim().is_empty() {
    return Err("Enter a topic to research".to_string());
  }
  client()?.research_topic(&query).await.map_err(|e| e.to_string())
}

/// ---------------------------------------------------------------------------
/// Grocery Plans
/// ---------------------------------------------------------------------------

#[tauri::command]
pub async fn generate_grocery_plan(
  state: State<'_, Arc<AppState>>,
  request: GroceryRequest,
) -> Result<ResearchResult, String> {
  if request.location.trim().is_empty() {
    return Err("Enter a location for store lookups".to_string());
  }

  let profile = state
    .store
    .load_profile()
    .await
    .map_err(|e| format!("Failed to load profile: {}", e))?;

  client()?
    .generate_grocery_plan(&profile, &request)
    .await
    .map_err(|e| e.to_string())
}

/// Keep a generated plan, newest first
#[tauri::command]
pub async fn save_grocery_plan(
  state: State<'_, Arc<AppState>>,
  request: GroceryRequest,
  text: String,
) -> Result<Vec<SavedGroceryPlan>, String> {
  let now = Utc::now();
  let plan = SavedGroceryPlan {
    id: now.timestamp_millis().to_string(),
    date: now.to_rfc3339(),
    budget: request.budget,
    location: request.location,
    text,
    favorite_foods: non_empty(&request.favorite_foods),
    preferences: non_empty(&request.preferences),
  };

  state
    .store
    .add_grocery_plan(plan)
    .await
    .map_err(|e| format!("Failed to save grocery plan: {}", e))
}

#[tauri::command]
pub async fn get_grocery_plans(
  state: State<'_, Arc<AppState>>,
) -> Result<Vec<SavedGroceryPlan>, String> {
  state
    .store
    .load_grocery_plans()
    .await
    .map_err(|e| format!("Failed to load grocery plans: {}", e))
}
