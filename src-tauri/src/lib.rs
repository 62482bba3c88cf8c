pub mod db;
pub mod extract;
pub mod ledger;
pub mod llm;
pub mod models;
pub mod readiness;
pub mod store;
pub mod targets;

#[cfg(feature = "desktop")]
mod commands;

#[cfg(test)]
mod test_utils;

#[cfg(feature = "desktop")]
use db::AppState;
#[cfg(feature = "desktop")]
use std::sync::Arc;
#[cfg(feature = "desktop")]
use tauri::{Emitter, Manager};

/// Webview event carrying every `StoreEvent`
#[cfg(feature = "desktop")]
const STORE_CHANGED_EVENT: &str = "store-changed";

#[cfg(feature = "desktop")]
fn init_tracing() {
  let filter = tracing_subscriber::EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
  tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();
  init_tracing();

  tauri::Builder::default()
    .plugin(tauri_plugin_opener::init())
    .setup(|app| {
      let app_handle = app.handle().clone();
      tauri::async_runtime::block_on(async move {
        match db::initialize_db(&app_handle).await {
          Ok(pool) => {
            let state = Arc::new(AppState::new(pool));
            let mut events = state.store.subscribe();
            app_handle.manage(state);

            // Forward store writes to the webview so open views re-render
            let emitter = app_handle.clone();
            tauri::async_runtime::spawn(async move {
              use tokio::sync::broadcast::error::RecvError;
              loop {
                match events.recv().await {
                  Ok(event) => {
                    if let Err(e) = emitter.emit(STORE_CHANGED_EVENT, &event) {
                      tracing::warn!(key = event.key(), error = %e, "Failed to emit store event");
                    }
                  }
                  Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Store event forwarder lagged");
                  }
                  Err(RecvError::Closed) => break,
                }
              }
            });

            tracing::info!("Database ready");
          }
          Err(e) => {
            tracing::error!(error = %e, "Failed to initialize database");
          }
        }
      });
      Ok(())
    })
    .invoke_handler(tauri::generate_handler![
      // Profile & targets
      commands::get_profile,
      commands::update_profile,
      commands::save_profile,
      commands::get_targets,
      // Readiness tracker
      commands::tracker::preview_readiness,
      commands::tracker::commit_daily_log,
      commands::tracker::get_history,
      // Kitchen
      commands::kitchen::analyze_meal,
      commands::kitchen::refine_meal_analysis,
      commands::kitchen::build_recipe,
      commands::kitchen::save_meal,
      commands::kitchen::get_saved_meals,
      // Training
      commands::training::generate_training_split,
      // Coach, research & groceries
      commands::coach::ask_coach,
      commands::coach::research_topic,
      commands::coach::generate_grocery_plan,
      commands::coach::save_grocery_plan,
      commands::coach::get_grocery_plans,
    ])
    .run(tauri::generate_context!())
    .expect("error while running tauri application");
}
