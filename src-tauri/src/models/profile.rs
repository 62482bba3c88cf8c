use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
  Male,
  Female,
}

/// Body-composition goal, scales the energy target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
  Maintain,
  Loss,
  Gain,
}

impl Goal {
  pub fn as_str(&self) -> &'static str {
    match self {
      Goal::Maintain => "maintain",
      Goal::Loss => "loss",
      Goal::Gain => "gain",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
  Pre,
  In,
  Post,
  Off,
}

impl Season {
  pub fn as_str(&self) -> &'static str {
    match self {
      Season::Pre => "pre",
      Season::In => "in",
      Season::Post => "post",
      Season::Off => "off",
    }
  }
}

/// ---------------------------------------------------------------------------
/// Athlete Profile
/// ---------------------------------------------------------------------------

/// The single biometric profile. Stored as one JSON document under
/// `athlete_profile`, field names match the browser-era documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AthleteProfile {
  pub gender: Gender,
  pub age: u32,
  pub weight_lbs: f64,
  pub height_ft: f64,
  pub height_in: f64,

  /// Lifestyle multiplier (1.2 sedentary .. 1.9 very active)
  pub daily_activity: f64,

  /// Added on top of `daily_activity` for training load
  pub training_freq: f64,

  pub goal: Goal,
  pub season: Season,
  pub sport: String,
  pub position: String,
  pub has_kitchen: bool,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub likes: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub dislikes: Option<String>,
}

impl Default for AthleteProfile {
  fn default() -> Self {
    Self {
      gender: Gender::Male,
      age: 20,
      weight_lbs: 180.0,
      height_ft: 5.0,
      height_in: 10.0,
      daily_activity: 1.2,
      training_freq: 0.2,
      goal: Goal::Maintain,
      season: Season::Pre,
      sport: "Football".to_string(),
      position: "Wide Receiver".to_string(),
      has_kitchen: true,
      likes: None,
      dislikes: None,
    }
  }
}

impl AthleteProfile {
  /// Merge a partial update into the existing fields
  pub fn merge(&mut self, update: ProfileUpdate) {
    let ProfileUpdate {
      gender,
      age,
      weight_lbs,
      height_ft,
      height_in,
      daily_activity,
      training_freq,
      goal,
      season,
      sport,
      position,
      has_kitchen,
      likes,
      dislikes,
    } = update;

    if let Some(v) = gender {
      self.gender = v;
    }
    if let Some(v) = age {
      self.age = v;
    }
    if let Some(v) = weight_lbs {
      self.weight_lbs = v;
    }
    if let Some(v) = height_ft {
      self.height_ft = v;
    }
    if let Some(v) = height_in {
      self.height_in = v;
    }
    if let Some(v) = daily_activity {
      self.daily_activity = v;
    }
    if let Some(v) = training_freq {
      self.training_freq = v;
    }
    if let Some(v) = goal {
      self.goal = v;
    }
    if let Some(v) = season {
      self.season = v;
    }
    if let Some(v) = sport {
      self.sport = v;
    }
    if let Some(v) = position {
      self.position = v;
    }
    if let Some(v) = has_kitchen {
      self.has_kitchen = v;
    }
    if let Some(v) = likes {
      self.likes = non_blank(v);
    }
    if let Some(v) = dislikes {
      self.dislikes = non_blank(v);
    }
  }

  /// Combined activity factor applied to BMR
  pub fn activity_factor(&self) -> f64 {
    self.daily_activity + self.training_freq
  }
}

fn non_blank(value: String) -> Option<String> {
  if value.trim().is_empty() {
    None
  } else {
    Some(value)
  }
}

/// Partial profile edit, every field optional. An empty `likes` or
/// `dislikes` string clears the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileUpdate {
  pub gender: Option<Gender>,
  pub age: Option<u32>,
  pub weight_lbs: Option<f64>,
  pub height_ft: Option<f64>,
  pub height_in: Option<f64>,
  pub daily_activity: Option<f64>,
  pub training_freq: Option<f64>,
  pub goal: Option<Goal>,
  pub season: Option<Season>,
  pub sport: Option<String>,
  pub position: Option<String>,
  pub has_kitchen: Option<bool>,
  pub likes: Option<String>,
  pub dislikes: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_profile_matches_first_run_values() {
    let profile = AthleteProfile::default();
    assert_eq!(profile.gender, Gender::Male);
    assert_eq!(profile.age, 20);
    assert_eq!(profile.weight_lbs, 180.0);
    assert_eq!(profile.goal, Goal::Maintain);
    assert!((profile.activity_factor() - 1.4).abs() < 1e-9);
  }

  #[test]
  fn test_merge_only_touches_provided_fields() {
    let mut profile = AthleteProfile::default();
    profile.merge(ProfileUpdate {
      weight_lbs: Some(195.0),
      goal: Some(Goal::Gain),
      likes: Some("rice bowls".to_string()),
      ..Default::default()
    });

    assert_eq!(profile.weight_lbs, 195.0);
    assert_eq!(profile.goal, Goal::Gain);
    assert_eq!(profile.likes.as_deref(), Some("rice bowls"));
    // Untouched
    assert_eq!(profile.age, 20);
    assert_eq!(profile.sport, "Football");
    assert_eq!(profile.dislikes, None);
  }

  #[test]
  fn test_merge_blank_preferences_clear_them() {
    let mut profile = AthleteProfile {
      likes: Some("rice bowls".to_string()),
      dislikes: Some("fish".to_string()),
      ..AthleteProfile::default()
    };

    let update: ProfileUpdate = serde_json::from_str(r#"{"likes": "", "dislikes": "  "}"#).unwrap();
    profile.merge(update);

    assert_eq!(profile.likes, None);
    assert_eq!(profile.dislikes, None);

    // Absent keys leave values alone
    profile.likes = Some("eggs".to_string());
    profile.merge(ProfileUpdate::default());
    assert_eq!(profile.likes.as_deref(), Some("eggs"));
  }

  #[test]
  fn test_profile_json_uses_browser_field_names() {
    let json = serde_json::to_value(AthleteProfile::default()).unwrap();
    assert_eq!(json["weightLbs"], 180.0);
    assert_eq!(json["heightFt"], 5.0);
    assert_eq!(json["hasKitchen"], true);
    assert_eq!(json["gender"], "male");
    assert_eq!(json["season"], "pre");
    assert!(json.get("likes").is_none());
  }

  #[test]
  fn test_profile_parses_browser_document() {
    let doc = r#"{
      "gender": "female", "age": 19, "weightLbs": 140, "heightFt": 5, "heightIn": 6,
      "dailyActivity": 1.375, "trainingFreq": 0.3, "goal": "loss", "season": "in",
      "sport": "Soccer", "position": "Midfield", "hasKitchen": false
    }"#;
    let profile: AthleteProfile = serde_json::from_str(doc).unwrap();
    assert_eq!(profile.gender, Gender::Female);
    assert_eq!(profile.goal, Goal::Loss);
    assert_eq!(profile.season, Season::In);
    assert!(!profile.has_kitchen);
  }

  #[test]
  fn test_partial_update_from_json() {
    let update: ProfileUpdate = serde_json::from_str(r#"{"age": 22}"#).unwrap();
    let mut profile = AthleteProfile::default();
    profile.merge(update);
    assert_eq!(profile.age, 22);
    assert_eq!(profile, AthleteProfile { age: 22, ..AthleteProfile::default() });
  }
}
