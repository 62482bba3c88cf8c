//! Structured data extraction from AI text
//!
//! The coach model answers in markdown. Two conventions carry data:
//! - meal analyses end with a `### Macros` block of `- Protein: 45g` lines
//! - workout splits wrap each day in `---DAY_START---` / `---DAY_END---`,
//!   with exercises written as
//!   `- **Name** | 4 x 6 | **Rest: 90s** | RPE: 8 [ALT_START] Alt: ... [ALT_END]`
//!
//! Both parsers fail loudly when the convention is broken so the caller can
//! show the raw text instead of a half-filled form.

use serde::{Deserialize, Serialize};

use crate::targets::round_half_up;

const MACROS_HEADER: &str = "### macros";
const DAY_START: &str = "---DAY_START---";
const DAY_END: &str = "---DAY_END---";
const ALT_START: &str = "[ALT_START]";
const ALT_END: &str = "[ALT_END]";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum ExtractError {
  #[error("No ### Macros section in response")]
  MissingMacrosSection,

  #[error("Macros section has no {0} value")]
  MissingMacro(String),

  #[error("No ---DAY_START--- / ---DAY_END--- blocks in response")]
  NoTrainingDays,

  #[error("Malformed exercise line: {0}")]
  MalformedExercise(String),
}

/// ---------------------------------------------------------------------------
/// Meal Macros
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealMacros {
  pub protein: i64,
  pub carbs: i64,
  pub fats: i64,
  pub calories: i64,
}

/// Extract the `### Macros` block from a meal analysis
pub fn parse_macros(text: &str) -> Result<MealMacros, ExtractError> {
  let lower = text.to_ascii_lowercase();
  let start = lower
    .rfind(MACROS_HEADER)
    .ok_or(ExtractError::MissingMacrosSection)?
    + MACROS_HEADER.len();

  // Section runs to the next header or the end of the text
  let end = lower[start..]
    .find("\n#")
    .map(|i| start + i)
    .unwrap_or(lower.len());
  let section = &lower[start..end];

  Ok(MealMacros {
    protein: macro_value(section, &["protein"])?,
    carbs: macro_value(section, &["carbs", "carbohydrates"])?,
    fats: macro_value(section, &["fats", "fat"])?,
    calories: macro_value(section, &["calories", "kcal"])?,
  })
}

fn macro_value(section: &str, labels: &[&str]) -> Result<i64, ExtractError> {
  labels
    .iter()
    .find_map(|label| {
      let needle = format!("{}:", label);
      let pos = section.find(&needle)?;
      leading_number(&section[pos + needle.len()..])
    })
    .ok_or_else(|| ExtractError::MissingMacro(labels[0].to_string()))
}

/// First number after optional whitespace and `*` markers, e.g. `** 45g`.
/// Accepts `1,200` grouping and rounds decimals half-up. Ranges such as
/// `40-50g` and malformed grouping yield `None`.
fn leading_number(s: &str) -> Option<i64> {
  let s = s.trim_start_matches(|c: char| c.is_whitespace() || c == '*' || c == '~');
  let len = s
    .find(|c: char| !(c.is_ascii_digit() || c == ',' || c == '.'))
    .unwrap_or(s.len());
  let token = s[..len].trim_end_matches(|c| c == ',' || c == '.');
  if token.is_empty() {
    return None;
  }

  let after = s[token.len()..].trim_start();
  if after.starts_with('-') || after.starts_with('\u{2013}') {
    return None;
  }

  let (whole, frac) = match token.split_once('.') {
    Some((w, f)) => (w, Some(f)),
    None => (token, None),
  };
  if frac.is_some_and(|f| f.is_empty() || !f.chars().all(|c| c.is_ascii_digit())) {
    return None;
  }

  let mut groups = whole.split(',');
  let first = groups.next()?;
  if first.is_empty() || (whole.contains(',') && first.len() > 3) {
    return None;
  }
  if !groups.all(|g| g.len() == 3) {
    return None;
  }

  let digits: String = whole.chars().filter(|c| c.is_ascii_digit()).collect();
  let value: f64 = match frac {
    Some(f) => format!("{}.{}", digits, f).parse().ok()?,
    None => digits.parse().ok()?,
  };
  Some(round_half_up(value) as i64)
}

/// ---------------------------------------------------------------------------
/// Training Split
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
  pub name: String,
  pub sets: String,
  pub reps: String,
  pub rest: Option<String>,
  pub rpe: Option<String>,
  pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DayBlock {
  Header { content: String },
  Exercise(Exercise),
  Text { content: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingDay {
  pub title: String,
  pub blocks: Vec<DayBlock>,
}

/// Split a generated program into days
pub fn parse_training_plan(raw: &str) -> Result<Vec<TrainingDay>, ExtractError> {
  let mut days = Vec::new();
  let mut rest = raw;

  while let Some(start) = rest.find(DAY_START) {
    let after_start = &rest[start + DAY_START.len()..];
    let Some(end) = after_start.find(DAY_END) else {
      break;
    };

    let body = after_start[..end].trim();
    days.push(parse_day(body, days.len())?);
    rest = &after_start[end + DAY_END.len()..];
  }

  if days.is_empty() {
    return Err(ExtractError::NoTrainingDays);
  }
  Ok(days)
}

fn parse_day(body: &str, index: usize) -> Result<TrainingDay, ExtractError> {
  let title = body
    .lines()
    .map(str::trim)
    .find(|l| l.starts_with("### Day"))
    .map(|l| l.trim_start_matches('#').trim().to_string())
    .unwrap_or_else(|| format!("Day {}", index + 1));

  let mut blocks = Vec::new();
  for line in body.lines().map(str::trim) {
    if line.is_empty() || line.starts_with("### Day") {
      continue;
    }

    if line.starts_with("###") {
      blocks.push(DayBlock::Header {
        content: line.trim_start_matches('#').trim().to_string(),
      });
    } else if is_exercise_line(line) {
      blocks.push(DayBlock::Exercise(parse_exercise(line)?));
    } else {
      blocks.push(DayBlock::Text {
        content: line.to_string(),
      });
    }
  }

  Ok(TrainingDay { title, blocks })
}

/// Exercises are bold bullets with pipe-separated fields. Other bold bullets
/// (stretches, cues) stay as text.
fn is_exercise_line(line: &str) -> bool {
  (line.starts_with("- **") || line.starts_with("-**")) && line.contains('|')
}

fn parse_exercise(line: &str) -> Result<Exercise, ExtractError> {
  let malformed = || ExtractError::MalformedExercise(line.to_string());

  let name_start = line.find("**").ok_or_else(malformed)? + 2;
  let name_len = line[name_start..].find("**").ok_or_else(malformed)?;
  let name = line[name_start..name_start + name_len].trim().to_string();
  if name.is_empty() {
    return Err(malformed());
  }

  // Alternative lives outside the pipe-separated fields
  let (fields, alt) = match line.find(ALT_START) {
    Some(i) => {
      let alt_text = &line[i + ALT_START.len()..];
      let alt_text = alt_text.split(ALT_END).next().unwrap_or("").trim();
      let alt_text = alt_text.strip_prefix("Alt:").unwrap_or(alt_text).trim();
      (&line[..i], non_empty(alt_text))
    }
    None => (line, None),
  };

  let parts: Vec<&str> = fields.split('|').map(str::trim).collect();

  let (sets, reps) = parts
    .get(1)
    .and_then(|p| p.split_once(|c: char| c == 'x' || c == 'X' || c == '×'))
    .map(|(s, r)| (s.trim().to_string(), r.trim().to_string()))
    .filter(|(s, r)| !s.is_empty() && !r.is_empty())
    .ok_or_else(malformed)?;

  let rest = parts
    .get(2)
    .map(|p| p.replace("**", "").replace("Rest:", ""))
    .and_then(|p| non_empty(p.trim()));

  let rpe = parts
    .get(3)
    .map(|p| p.replace("RPE:", ""))
    .and_then(|p| non_empty(p.trim()));

  Ok(Exercise {
    name,
    sets,
    reps,
    rest,
    rpe,
    alt,
  })
}

fn non_empty(s: &str) -> Option<String> {
  if s.is_empty() {
    None
  } else {
    Some(s.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  const MEAL_RESPONSE: &str = r#"### Meal Breakdown
Grilled chicken breast, white rice and broccoli.

### Macros
- Protein: 52g
- Carbs: 78g
- Fats: 14g
- Calories: 646 kcal"#;

  #[test]
  fn test_parse_macros() {
    let macros = parse_macros(MEAL_RESPONSE).unwrap();
    assert_eq!(
      macros,
      MealMacros {
        protein: 52,
        carbs: 78,
        fats: 14,
        calories: 646
      }
    );
  }

  #[test]
  fn test_parse_macros_tolerates_bold_and_case() {
    let text = "Looks solid.\n\n### MACROS\n- **Protein:** 40g\n- **Carbs:** 55g\n- **Fat:** 12g\n- **Calories:** 488 kcal\n\n### Notes\nProtein: 999g";
    let macros = parse_macros(text).unwrap();
    assert_eq!(macros.protein, 40);
    assert_eq!(macros.fats, 12);
    assert_eq!(macros.calories, 488);
  }

  #[test]
  fn test_parse_macros_uses_last_section() {
    // Refinements quote the previous analysis before the new numbers
    let text = "### Macros\n- Protein: 10g\n- Carbs: 10g\n- Fats: 10g\n- Calories: 170 kcal\n\nUpdated:\n\n### Macros\n- Protein: 30g\n- Carbs: 20g\n- Fats: 5g\n- Calories: 245 kcal";
    assert_eq!(parse_macros(text).unwrap().protein, 30);
  }

  #[test]
  fn test_parse_macros_missing_section() {
    let err = parse_macros("Was that chicken fried or grilled?").unwrap_err();
    assert_eq!(err, ExtractError::MissingMacrosSection);
  }

  #[test]
  fn test_parse_macros_missing_field() {
    let text = "### Macros\n- Protein: 30g\n- Carbs: about a cup\n- Fats: 5g\n- Calories: 245 kcal";
    let err = parse_macros(text).unwrap_err();
    assert_eq!(err, ExtractError::MissingMacro("carbs".to_string()));
  }

  #[test]
  fn test_parse_macros_thousands_separator() {
    let text = "### Macros\n- Protein: 60g\n- Carbs: 150g\n- Fats: 40g\n- Calories: 1,200 kcal";
    let macros = parse_macros(text).unwrap();
    assert_eq!(macros.calories, 1200);
    assert_eq!(macros.protein, 60);
  }

  #[test]
  fn test_parse_macros_rounds_decimals() {
    let text = "### Macros\n- Protein: 45.5g\n- Carbs: 80.2g\n- Fats: 15g\n- Calories: 637.4 kcal";
    let macros = parse_macros(text).unwrap();
    assert_eq!(macros.protein, 46);
    assert_eq!(macros.carbs, 80);
    assert_eq!(macros.calories, 637);
  }

  #[test]
  fn test_parse_macros_rejects_ranges_and_bad_grouping() {
    let range = "### Macros\n- Protein: 40g\n- Carbs: 40-50g\n- Fats: 10g\n- Calories: 500 kcal";
    assert_eq!(
      parse_macros(range).unwrap_err(),
      ExtractError::MissingMacro("carbs".to_string())
    );

    let grouping = "### Macros\n- Protein: 40g\n- Carbs: 50g\n- Fats: 10g\n- Calories: 12,00 kcal";
    assert_eq!(
      parse_macros(grouping).unwrap_err(),
      ExtractError::MissingMacro("calories".to_string())
    );
  }

  #[test]
  fn test_leading_number_stops_at_unit() {
    assert_eq!(leading_number(" 52g"), Some(52));
    assert_eq!(leading_number("** 2,450 kcal"), Some(2450));
    assert_eq!(leading_number("646."), Some(646));
    assert_eq!(leading_number("about 40g"), None);
  }

  const WORKOUT_RESPONSE: &str = r#"Here is your split.

---DAY_START---
### Day 1: Lower Body Power
### Movement Preparation & Warm-up
10 minutes of hip openers and skips.
### Explosive Power
- **Box Jump** | 4 x 5 | **Rest: 90s** | RPE: 7 [ALT_START] Alt: Broad Jump [ALT_END]
- **Back Squat** | 5 x 3 | **Rest: 3 min** | RPE: 8 [ALT_START] Alt: Safety Bar Squat [ALT_END]
### Recovery & Joint Health
Couch stretch, 2 x 60s per side.
---DAY_END---

---DAY_START---
### Day 2: Rest & Active Recovery
### Active Recovery Strategy
Easy 20 minute swim.
---DAY_END---
"#;

  #[test]
  fn test_parse_training_plan_days_and_titles() {
    let days = parse_training_plan(WORKOUT_RESPONSE).unwrap();
    assert_eq!(days.len(), 2);
    assert_eq!(days[0].title, "Day 1: Lower Body Power");
    assert_eq!(days[1].title, "Day 2: Rest & Active Recovery");
  }

  #[test]
  fn test_parse_training_plan_blocks() {
    let days = parse_training_plan(WORKOUT_RESPONSE).unwrap();
    let blocks = &days[0].blocks;

    assert_eq!(
      blocks[0],
      DayBlock::Header {
        content: "Movement Preparation & Warm-up".to_string()
      }
    );
    assert!(matches!(&blocks[1], DayBlock::Text { content } if content.starts_with("10 minutes")));

    let squat = blocks
      .iter()
      .find_map(|b| match b {
        DayBlock::Exercise(e) if e.name == "Back Squat" => Some(e),
        _ => None,
      })
      .expect("Back Squat should be parsed");
    assert_eq!(squat.sets, "5");
    assert_eq!(squat.reps, "3");
    assert_eq!(squat.rest.as_deref(), Some("3 min"));
    assert_eq!(squat.rpe.as_deref(), Some("8"));
    assert_eq!(squat.alt.as_deref(), Some("Safety Bar Squat"));
  }

  #[test]
  fn test_exercise_without_optional_fields() {
    let ex = parse_exercise("- **Nordic Curl** | 3 x 6-8").unwrap();
    assert_eq!(ex.name, "Nordic Curl");
    assert_eq!(ex.reps, "6-8");
    assert_eq!(ex.rest, None);
    assert_eq!(ex.rpe, None);
    assert_eq!(ex.alt, None);
  }

  #[test]
  fn test_exercise_without_sets_is_error() {
    let err = parse_exercise("- **Sled Push** | as many as possible").unwrap_err();
    assert!(matches!(err, ExtractError::MalformedExercise(_)));
  }

  #[test]
  fn test_bold_bullet_without_pipes_stays_text() {
    let raw = "---DAY_START---\n### Day 1: Lower Strength\n### Strength\n- **Back Squat** | 5 x 3 | **Rest: 3 min** | RPE: 8\n### Recovery & Joint Health\n- **Couch stretch:** 60s per side\n---DAY_END---";
    let days = parse_training_plan(raw).unwrap();
    let blocks = &days[0].blocks;

    assert_eq!(blocks.len(), 4);
    assert!(matches!(&blocks[1], DayBlock::Exercise(e) if e.name == "Back Squat"));
    assert_eq!(
      blocks[3],
      DayBlock::Text {
        content: "- **Couch stretch:** 60s per side".to_string()
      }
    );
  }

  #[test]
  fn test_pipe_line_without_sets_fails_plan() {
    let raw = "---DAY_START---\n### Day 1: Conditioning\n- **Sled Push** | as many as possible\n---DAY_END---";
    let err = parse_training_plan(raw).unwrap_err();
    assert!(matches!(err, ExtractError::MalformedExercise(_)));
  }

  #[test]
  fn test_untitled_day_gets_index_title() {
    let raw = "---DAY_START---\nJust move.\n---DAY_END---";
    let days = parse_training_plan(raw).unwrap();
    assert_eq!(days[0].title, "Day 1");
    assert_eq!(days[0].blocks.len(), 1);
  }

  #[test]
  fn test_no_day_markers_is_error() {
    let err = parse_training_plan("### Day 1: Upper\n- **Bench** | 3 x 5").unwrap_err();
    assert_eq!(err, ExtractError::NoTrainingDays);

    // Unterminated block is ignored
    let err = parse_training_plan("---DAY_START---\n### Day 1: Upper").unwrap_err();
    assert_eq!(err, ExtractError::NoTrainingDays);
  }
}
