use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::store::DocumentStore;

pub type DbPool = SqlitePool;

#[cfg(feature = "desktop")]
const DB_FILE: &str = "fuel-hub.db";

/// Application state shared by every command
pub struct AppState {
  pub store: DocumentStore,
}

impl AppState {
  pub fn new(pool: DbPool) -> Self {
    Self {
      store: DocumentStore::new(pool),
    }
  }
}

/// Open a pool and bring the schema up to date
pub async fn connect(db_url: &str, max_connections: u32) -> Result<DbPool, Box<dyn std::error::Error>> {
  let pool = SqlitePoolOptions::new()
    .max_connections(max_connections)
    .connect(db_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  Ok(pool)
}

/// Get the path to the database file inside the app data directory
#[cfg(feature = "desktop")]
fn get_db_path<R: tauri::Runtime>(
  app: &tauri::AppHandle<R>,
) -> Result<std::path::PathBuf, Box<dyn std::error::Error>> {
  use tauri::Manager;

  let data_dir = app
    .path()
    .app_data_dir()
    .map_err(|e| format!("Failed to get app data dir: {}", e))?;

  std::fs::create_dir_all(&data_dir)?;

  Ok(data_dir.join(DB_FILE))
}

/// Initialize the database connection pool and run migrations
#[cfg(feature = "desktop")]
pub async fn initialize_db<R: tauri::Runtime>(
  app: &tauri::AppHandle<R>,
) -> Result<DbPool, Box<dyn std::error::Error>> {
  let db_path = get_db_path(app)?;
  let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

  tracing::info!(path = %db_path.display(), "Initializing database");

  let pool = connect(&db_url, 5).await?;

  tracing::info!(db = DB_FILE, "Database initialized");

  Ok(pool)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_connect_runs_migrations() {
    let pool = connect("sqlite::memory:", 1).await.expect("Should connect");

    let state = AppState::new(pool.clone());
    let profile = state.store.load_profile().await.expect("Documents table should exist");
    assert_eq!(profile.sport, "Football");

    pool.close().await;
  }

  #[cfg(feature = "desktop")]
  #[test]
  fn test_db_file_lives_under_app_name() {
    assert_eq!(DB_FILE, "fuel-hub.db");
  }

  #[tokio::test]
  async fn test_connect_fails_for_missing_file() {
    assert!(connect("sqlite:///nonexistent-dir/fuel-hub.db", 1).await.is_err());
  }
}
