pub mod history;
pub mod profile;
pub mod saved;

pub use history::{DailyLog, HistoricalEntry};
pub use profile::{AthleteProfile, Gender, Goal, ProfileUpdate, Season};
pub use saved::{SavedGroceryPlan, SavedMeal};
