use serde::{Deserialize, Serialize};

/// A meal analysis the athlete chose to keep (`elite_fuel_meals`, newest first)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedMeal {
  pub id: String,

  /// RFC 3339 timestamp
  pub date: String,

  pub analysis: String,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image_url: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub protein: Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub carbs: Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub fats: Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub calories: Option<i64>,
}

/// A generated grocery plan (`elite_fuel_groceries`, newest first)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedGroceryPlan {
  pub id: String,
  pub date: String,
  pub budget: String,
  pub location: String,
  pub text: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub favorite_foods: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub preferences: Option<String>,
}
