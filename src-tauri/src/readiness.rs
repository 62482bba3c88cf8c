//! Daily readiness score
//!
//! Blends three groups into a 0-100 score:
//! - performance markers (training done, hydration, sleep), max 30
//! - subjective recovery (inverted stress and soreness), max 20
//! - nutrition accuracy against the day's targets, max 50
//!
//! The total is clamped at 100. There is no floor: stress/soreness outside
//! 1..=10 can push the total negative and callers are expected to keep the
//! sliders in range.

use serde::{Deserialize, Serialize};

use crate::models::DailyLog;
use crate::targets::{round_half_up, Targets};

/// ---------------------------------------------------------------------------
/// Weights
/// ---------------------------------------------------------------------------

const TRAINED_POINTS: f64 = 15.0;
const WATER_POINTS: f64 = 5.0;
const FULL_SLEEP_POINTS: f64 = 10.0;
const PARTIAL_SLEEP_POINTS: f64 = 5.0;
const FULL_SLEEP_HOURS: f64 = 8.0;
const PARTIAL_SLEEP_HOURS: f64 = 6.0;

/// Subjective scales run 1..=10, so `11 - x` yields 10..=1
const SUBJECTIVE_CEILING: i32 = 11;

const PROTEIN_WEIGHT: f64 = 20.0;
const CARB_WEIGHT: f64 = 20.0;
const FAT_WEIGHT: f64 = 10.0;

pub const MAX_SCORE: i64 = 100;

const OPTIMIZED_ABOVE: i64 = 85;
const FUNCTIONAL_ABOVE: i64 = 60;

/// ---------------------------------------------------------------------------
/// Macro Accuracy
/// ---------------------------------------------------------------------------

/// Adherence band for a single macro
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacroAccuracy {
  /// Within 5% of target
  OnTarget,
  /// Within 15%
  Close,
  /// Within 25%
  Off,
  /// Further than 25%, or no target to hit
  Missed,
}

impl MacroAccuracy {
  pub fn classify(actual: f64, target: i64) -> Self {
    if target == 0 {
      return MacroAccuracy::Missed;
    }
    let target = target as f64;
    let deviation = (actual - target).abs() / target;
    match deviation {
      d if d <= 0.05 => MacroAccuracy::OnTarget,
      d if d <= 0.15 => MacroAccuracy::Close,
      d if d <= 0.25 => MacroAccuracy::Off,
      _ => MacroAccuracy::Missed,
    }
  }

  /// Fraction of the macro's weight awarded
  pub fn credit(&self) -> f64 {
    match self {
      MacroAccuracy::OnTarget => 1.0,
      MacroAccuracy::Close => 0.7,
      MacroAccuracy::Off => 0.3,
      MacroAccuracy::Missed => 0.0,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Status
/// ---------------------------------------------------------------------------

/// Headline band shown with the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessStatus {
  /// Above 85
  Optimized,
  /// Above 60
  Functional,
  RecoveryRequired,
}

impl ReadinessStatus {
  pub fn from_total(total: i64) -> Self {
    if total > OPTIMIZED_ABOVE {
      ReadinessStatus::Optimized
    } else if total > FUNCTIONAL_ABOVE {
      ReadinessStatus::Functional
    } else {
      ReadinessStatus::RecoveryRequired
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      ReadinessStatus::Optimized => "OPTIMIZED",
      ReadinessStatus::Functional => "FUNCTIONAL",
      ReadinessStatus::RecoveryRequired => "RECOVERY REQUIRED",
    }
  }
}

/// ---------------------------------------------------------------------------
/// Score
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessScore {
  /// Training, hydration and sleep points (0..=30)
  pub performance: f64,

  /// Inverted stress + soreness (2..=20 for in-range input)
  pub subjective: f64,

  /// Weighted macro accuracy (0..=50)
  pub nutrition: f64,

  pub protein_accuracy: MacroAccuracy,
  pub carb_accuracy: MacroAccuracy,
  pub fat_accuracy: MacroAccuracy,

  /// Rounded, capped at 100
  pub total: i64,

  pub status: ReadinessStatus,
}

impl ReadinessScore {
  pub fn compute(log: &DailyLog, targets: &Targets) -> Self {
    let performance = Self::performance_points(log);
    let subjective = Self::subjective_points(log);

    let protein_accuracy = MacroAccuracy::classify(log.actual_protein, targets.protein_g);
    let carb_accuracy = MacroAccuracy::classify(log.actual_carbs, targets.carb_g);
    let fat_accuracy = MacroAccuracy::classify(log.actual_fats, targets.fat_g);

    let nutrition = protein_accuracy.credit() * PROTEIN_WEIGHT
      + carb_accuracy.credit() * CARB_WEIGHT
      + fat_accuracy.credit() * FAT_WEIGHT;

    let raw = performance + subjective + nutrition;
    let total = (round_half_up(raw) as i64).min(MAX_SCORE);

    Self {
      performance,
      subjective,
      nutrition,
      protein_accuracy,
      carb_accuracy,
      fat_accuracy,
      total,
      status: ReadinessStatus::from_total(total),
    }
  }

  fn performance_points(log: &DailyLog) -> f64 {
    let mut points = 0.0;
    if log.trained {
      points += TRAINED_POINTS;
    }
    if log.water {
      points += WATER_POINTS;
    }
    if log.sleep_hours >= FULL_SLEEP_HOURS {
      points += FULL_SLEEP_POINTS;
    } else if log.sleep_hours >= PARTIAL_SLEEP_HOURS {
      points += PARTIAL_SLEEP_POINTS;
    }
    points
  }

  fn subjective_points(log: &DailyLog) -> f64 {
    ((SUBJECTIVE_CEILING - log.stress) + (SUBJECTIVE_CEILING - log.soreness)) as f64
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
