//! Test utilities and helpers for unit and command testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Mock data factories
//! - Helper assertions

use crate::models::{AthleteProfile, DailyLog, HistoricalEntry, SavedMeal};
use chrono::Utc;
use sqlx::SqlitePool;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Mid-season lineman looking to add mass
pub fn mock_profile() -> AthleteProfile {
  AthleteProfile {
    weight_lbs: 240.0,
    height_ft: 6.0,
    height_in: 3.0,
    goal: crate::models::Goal::Gain,
    season: crate::models::Season::In,
    position: "Offensive Line".to_string(),
    likes: Some("rice bowls, eggs".to_string()),
    ..AthleteProfile::default()
  }
}

/// A decent but imperfect day against the default profile's targets
/// (180 P / 300 C / 72 F): protein and fats on target, carbs close
pub fn mock_daily_log() -> DailyLog {
  DailyLog {
    trained: false,
    water: true,
    stress: 4,
    soreness: 3,
    sleep_hours: 7.5,
    actual_protein: 175.0,
    actual_carbs: 270.0,
    actual_fats: 72.0,
  }
}

pub fn mock_history_entry(date: &str, score: i64) -> HistoricalEntry {
  HistoricalEntry {
    date: date.to_string(),
    weight: 180.0,
    calories: 2448.0,
    protein: 180,
    carbs: 300,
    fats: 72,
    actual_protein: 175.0,
    actual_carbs: 270.0,
    actual_fats: 72.0,
    score,
  }
}

pub fn mock_saved_meal(id: &str) -> SavedMeal {
  SavedMeal {
    id: id.to_string(),
    date: Utc::now().to_rfc3339(),
    analysis: "### Macros\n- Protein: 45g\n- Carbs: 80g\n- Fats: 15g\n- Calories: 635 kcal".to_string(),
    image_url: None,
    protein: Some(45),
    carbs: Some(80),
    fats: Some(15),
    calories: Some(635),
  }
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::readiness::ReadinessScore;
  use crate::targets::Targets;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> =
      sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name = 'documents'")
        .fetch_all(&pool)
        .await
        .expect("Failed to query tables");

    assert_eq!(tables.len(), 1);

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_daily_log_leaves_room_for_training() {
    let targets = Targets::compute(&AthleteProfile::default());
    let score = ReadinessScore::compute(&mock_daily_log(), &targets);
    assert_eq!(score.total, 69);

    let trained = DailyLog {
      trained: true,
      ..mock_daily_log()
    };
    assert_eq!(ReadinessScore::compute(&trained, &targets).total, 84);
  }

  #[test]
  fn test_mock_factories_create_valid_data() {
    let profile = mock_profile();
    assert_eq!(profile.sport, "Football");
    assert_eq!(profile.weight_lbs, 240.0);

    let meal = mock_saved_meal("abc");
    assert_eq!(meal.id, "abc");
    assert_eq!(meal.calories, Some(635));

    let entry = mock_history_entry("09/14", 88);
    assert_eq!(entry.date, "09/14");
    assert_eq!(entry.score, 88);
  }
}
