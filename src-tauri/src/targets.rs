//! Deterministic energy and macro targets
//!
//! Turns the athlete profile into daily calorie and macro targets. Pure
//! arithmetic: the readiness score and the AI prompts consume these numbers
//! rather than asking the model to do the math.

use serde::{Deserialize, Serialize};

use crate::models::{AthleteProfile, Gender, Goal};

/// ---------------------------------------------------------------------------
/// Constants
/// ---------------------------------------------------------------------------

const LBS_PER_KG: f64 = 2.20462;
const CM_PER_INCH: f64 = 2.54;

const LOSS_ENERGY_FACTOR: f64 = 0.85;
const GAIN_ENERGY_FACTOR: f64 = 1.15;

/// Protein grams per lb of bodyweight
const PROTEIN_PER_LB: f64 = 1.0;
const PROTEIN_PER_LB_LOSS: f64 = 1.1;

/// Fat grams per lb of bodyweight
const FAT_PER_LB: f64 = 0.4;

pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
pub const KCAL_PER_G_CARB: f64 = 4.0;
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Round half toward positive infinity (2.5 -> 3, -2.5 -> -2)
pub fn round_half_up(value: f64) -> f64 {
  (value + 0.5).floor()
}

/// ---------------------------------------------------------------------------
/// Body Measurements
/// ---------------------------------------------------------------------------

pub fn weight_kg(profile: &AthleteProfile) -> f64 {
  profile.weight_lbs / LBS_PER_KG
}

pub fn height_cm(profile: &AthleteProfile) -> f64 {
  (profile.height_ft * 12.0 + profile.height_in) * CM_PER_INCH
}

/// Basal metabolic rate, Mifflin-St Jeor
pub fn bmr(profile: &AthleteProfile) -> f64 {
  let base = 10.0 * weight_kg(profile) + 6.25 * height_cm(profile) - 5.0 * profile.age as f64;
  match profile.gender {
    Gender::Male => base + 5.0,
    Gender::Female => base - 161.0,
  }
}

/// ---------------------------------------------------------------------------
/// Targets
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Targets {
  /// Goal-adjusted daily energy target (kcal)
  pub tdee: i64,
  pub protein_g: i64,
  pub carb_g: i64,
  pub fat_g: i64,
}

impl Targets {
  /// Compute targets from the current profile
  pub fn compute(profile: &AthleteProfile) -> Self {
    let maintenance = round_half_up(bmr(profile) * profile.activity_factor());

    let tdee = match profile.goal {
      Goal::Loss => round_half_up(maintenance * LOSS_ENERGY_FACTOR),
      Goal::Gain => round_half_up(maintenance * GAIN_ENERGY_FACTOR),
      Goal::Maintain => maintenance,
    };

    let protein_per_lb = if profile.goal == Goal::Loss {
      PROTEIN_PER_LB_LOSS
    } else {
      PROTEIN_PER_LB
    };
    let protein_g = round_half_up(profile.weight_lbs * protein_per_lb);
    let fat_g = round_half_up(profile.weight_lbs * FAT_PER_LB);

    // Whatever energy is left after protein and fat goes to carbs
    let remaining = tdee - (protein_g * KCAL_PER_G_PROTEIN + fat_g * KCAL_PER_G_FAT);
    let carb_g = round_half_up(remaining / KCAL_PER_G_CARB).max(0.0);

    Self {
      tdee: tdee as i64,
      protein_g: protein_g as i64,
      carb_g: carb_g as i64,
      fat_g: fat_g as i64,
    }
  }

  /// Energy allotted to each macro (kcal), in protein/carb/fat order
  pub fn macro_calories(&self) -> (f64, f64, f64) {
    (
      self.protein_g as f64 * KCAL_PER_G_PROTEIN,
      self.carb_g as f64 * KCAL_PER_G_CARB,
      self.fat_g as f64 * KCAL_PER_G_FAT,
    )
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
