use serde::{Deserialize, Serialize};

/// A day's check-in before it is committed to history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyLog {
  pub trained: bool,
  pub water: bool,

  /// 1 (none) .. 10 (max)
  pub stress: i32,

  /// 1 (none) .. 10 (max)
  pub soreness: i32,

  /// Hours slept last night
  #[serde(rename = "sleep")]
  pub sleep_hours: f64,

  pub actual_protein: f64,
  pub actual_carbs: f64,
  pub actual_fats: f64,
}

impl Default for DailyLog {
  fn default() -> Self {
    Self {
      trained: false,
      water: false,
      stress: 5,
      soreness: 5,
      sleep_hours: 7.5,
      actual_protein: 0.0,
      actual_carbs: 0.0,
      actual_fats: 0.0,
    }
  }
}

impl DailyLog {
  /// Calories implied by the logged macros (4/4/9 kcal per gram)
  pub fn logged_calories(&self) -> f64 {
    self.actual_protein * 4.0 + self.actual_carbs * 4.0 + self.actual_fats * 9.0
  }
}

/// One committed day in the rolling history (`athlete_history`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalEntry {
  /// Local calendar day, `MM/DD`
  pub date: String,

  /// Profile weight at time of entry (lbs)
  pub weight: f64,

  /// Logged intake in kcal
  pub calories: f64,

  /// Targets at time of entry (grams)
  pub protein: i64,
  pub carbs: i64,
  pub fats: i64,

  #[serde(default)]
  pub actual_protein: f64,
  #[serde(default)]
  pub actual_carbs: f64,
  #[serde(default)]
  pub actual_fats: f64,

  pub score: i64,
}
