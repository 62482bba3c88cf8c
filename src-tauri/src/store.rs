//! Document store for profile, history and saved items
//!
//! Every persisted value is a versionless JSON document under a fixed key in
//! the `documents` table. Writers overwrite the whole document (last write
//! wins) and then broadcast a `StoreEvent` carrying the new value, so views
//! showing derived data stay current without re-reading.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tokio::sync::broadcast;

use crate::models::{AthleteProfile, HistoricalEntry, ProfileUpdate, SavedGroceryPlan, SavedMeal};

/// ---------------------------------------------------------------------------
/// Keys
/// ---------------------------------------------------------------------------

pub const PROFILE_KEY: &str = "athlete_profile";
pub const HISTORY_KEY: &str = "athlete_history";
pub const MEALS_KEY: &str = "elite_fuel_meals";
pub const GROCERY_PLANS_KEY: &str = "elite_fuel_groceries";

const EVENT_CAPACITY: usize = 32;

/// ---------------------------------------------------------------------------
/// Errors and Events
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Failed to serialize {key}: {source}")]
  Serialize {
    key: String,
    #[source]
    source: serde_json::Error,
  },
}

/// Emitted after every successful write, carrying the written value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum StoreEvent {
  ProfileSaved(AthleteProfile),
  HistoryChanged(Vec<HistoricalEntry>),
  MealsChanged(Vec<SavedMeal>),
  GroceryPlansChanged(Vec<SavedGroceryPlan>),
}

impl StoreEvent {
  pub fn key(&self) -> &'static str {
    match self {
      StoreEvent::ProfileSaved(_) => PROFILE_KEY,
      StoreEvent::HistoryChanged(_) => HISTORY_KEY,
      StoreEvent::MealsChanged(_) => MEALS_KEY,
      StoreEvent::GroceryPlansChanged(_) => GROCERY_PLANS_KEY,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Document Store
/// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct DocumentStore {
  pool: SqlitePool,
  events: broadcast::Sender<StoreEvent>,
}

impl DocumentStore {
  pub fn new(pool: SqlitePool) -> Self {
    let (events, _) = broadcast::channel(EVENT_CAPACITY);
    Self { pool, events }
  }

  /// Subscribe to change notifications
  pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
    self.events.subscribe()
  }

  fn notify(&self, event: StoreEvent) {
    // No subscribers is fine
    let _ = self.events.send(event);
  }

  async fn read_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
    let value: Option<String> = sqlx::query_scalar("SELECT value FROM documents WHERE key = ?1")
      .bind(key)
      .fetch_optional(&self.pool)
      .await?;
    Ok(value)
  }

  async fn write_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
    sqlx::query(
      r#"
      INSERT INTO documents (key, value, updated_at)
      VALUES (?1, ?2, ?3)
      ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at
      "#,
    )
    .bind(key)
    .bind(value)
    .bind(Utc::now())
    .execute(&self.pool)
    .await?;
    Ok(())
  }

  /// Read and parse a document. A corrupted document is logged and treated
  /// as absent so callers fall back to their defaults.
  pub async fn read_document<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
    let Some(raw) = self.read_raw(key).await? else {
      return Ok(None);
    };

    match serde_json::from_str(&raw) {
      Ok(value) => Ok(Some(value)),
      Err(e) => {
        tracing::warn!(key, error = %e, "Discarding unreadable document");
        Ok(None)
      }
    }
  }

  pub async fn write_document<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
      key: key.to_string(),
      source,
    })?;
    self.write_raw(key, &json).await
  }

  /// -------------------------------------------------------------------------
  /// Profile
  /// -------------------------------------------------------------------------

  /// Load the profile, or the first-run default if none is stored
  pub async fn load_profile(&self) -> Result<AthleteProfile, StoreError> {
    Ok(self.read_document(PROFILE_KEY).await?.unwrap_or_default())
  }

  /// Overwrite the stored profile
  pub async fn save_profile(&self, profile: &AthleteProfile) -> Result<(), StoreError> {
    self.write_document(PROFILE_KEY, profile).await?;
    tracing::info!(goal = profile.goal.as_str(), weight_lbs = profile.weight_lbs, "Profile saved");
    self.notify(StoreEvent::ProfileSaved(profile.clone()));
    Ok(())
  }

  /// Merge a partial update into the stored profile and save it
  pub async fn update_profile(&self, update: ProfileUpdate) -> Result<AthleteProfile, StoreError> {
    let mut profile = self.load_profile().await?;
    profile.merge(update);
    self.save_profile(&profile).await?;
    Ok(profile)
  }

  /// -------------------------------------------------------------------------
  /// History
  /// -------------------------------------------------------------------------

  pub async fn load_history(&self) -> Result<Vec<HistoricalEntry>, StoreError> {
    Ok(self.read_document(HISTORY_KEY).await?.unwrap_or_default())
  }

  /// Overwrite the history collection. Only the ledger calls this.
  pub(crate) async fn save_history(&self, history: &[HistoricalEntry]) -> Result<(), StoreError> {
    self.write_document(HISTORY_KEY, &history).await?;
    self.notify(StoreEvent::HistoryChanged(history.to_vec()));
    Ok(())
  }

  /// -------------------------------------------------------------------------
  /// Saved Meals
  /// -------------------------------------------------------------------------

  /// Newest first
  pub async fn load_meals(&self) -> Result<Vec<SavedMeal>, StoreError> {
    Ok(self.read_document(MEALS_KEY).await?.unwrap_or_default())
  }

  /// Prepend a meal and return the updated collection
  pub async fn add_meal(&self, meal: SavedMeal) -> Result<Vec<SavedMeal>, StoreError> {
    let mut meals = self.load_meals().await?;
    meals.insert(0, meal);
    self.write_document(MEALS_KEY, &meals).await?;
    self.notify(StoreEvent::MealsChanged(meals.clone()));
    Ok(meals)
  }

  /// -------------------------------------------------------------------------
  /// Saved Grocery Plans
  /// -------------------------------------------------------------------------

  pub async fn load_grocery_plans(&self) -> Result<Vec<SavedGroceryPlan>, StoreError> {
    Ok(self.read_document(GROCERY_PLANS_KEY).await?.unwrap_or_default())
  }

  pub async fn add_grocery_plan(
    &self,
    plan: SavedGroceryPlan,
  ) -> Result<Vec<SavedGroceryPlan>, StoreError> {
    let mut plans = self.load_grocery_plans().await?;
    plans.insert(0, plan);
    self.write_document(GROCERY_PLANS_KEY, &plans).await?;
    self.notify(StoreEvent::GroceryPlansChanged(plans.clone()));
    Ok(plans)
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
