//! Gemini integration for coaching, meal analysis and planning
//!
//! Every AI feature is a single `generateContent` call with the coach system
//! instruction. Deterministic numbers (targets, scores) are computed locally
//! and only passed in as context.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use url::Url;

use crate::models::AthleteProfile;

/// ---------------------------------------------------------------------------
/// Configuration
/// ---------------------------------------------------------------------------

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_WORKOUT_MODEL: &str = "gemini-3-pro-preview";
const TEMPERATURE: f32 = 0.7;

const SYSTEM_PROMPT: &str = include_str!("prompts/coach_system.txt");

#[derive(Debug, Clone)]
pub struct GeminiConfig {
  pub api_key: String,
  pub api_base: String,
  /// Used for everything except workout generation
  pub model: String,
  pub workout_model: String,
}

impl GeminiConfig {
  /// Reads `GEMINI_API_KEY` (or `API_KEY`), with optional `GEMINI_API_BASE`,
  /// `GEMINI_MODEL` and `GEMINI_WORKOUT_MODEL` overrides
  pub fn from_env() -> Result<Self, LlmError> {
    let api_key = env::var("GEMINI_API_KEY")
      .or_else(|_| env::var("API_KEY"))
      .ok()
      .filter(|k| !k.trim().is_empty())
      .ok_or(LlmError::MissingApiKey)?;

    Ok(Self {
      api_key,
      api_base: env::var("GEMINI_API_BASE").unwrap_or_else(|_| GEMINI_API_BASE.to_string()),
      model: env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
      workout_model: env::var("GEMINI_WORKOUT_MODEL")
        .unwrap_or_else(|_| DEFAULT_WORKOUT_MODEL.to_string()),
    })
  }
}

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

#[derive(Error, Debug, Serialize)]
pub enum LlmError {
  #[error("API key not configured")]
  MissingApiKey,

  #[error("Invalid endpoint: {0}")]
  InvalidEndpoint(String),

  #[error("Request failed: {0}")]
  Request(String),

  #[error("API error: {0}")]
  Api(String),

  #[error("Empty response from AI engine")]
  EmptyResponse,

  #[error("Parse error: {0}")]
  Parse(String),
}

/// ---------------------------------------------------------------------------
/// Gemini API Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
  system_instruction: Content,
  contents: Vec<Content>,
  generation_config: GenerationConfig,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  tools: Vec<Tool>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  role: Option<String>,
  #[serde(default)]
  parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  text: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  inline_data: Option<InlineData>,
}

impl Part {
  pub fn text(text: impl Into<String>) -> Self {
    Self {
      text: Some(text.into()),
      inline_data: None,
    }
  }

  /// Base64 JPEG payload, without the `data:` URL prefix
  pub fn jpeg(data: impl Into<String>) -> Self {
    Self {
      text: None,
      inline_data: Some(InlineData {
        mime_type: "image/jpeg".to_string(),
        data: data.into(),
      }),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
  mime_type: String,
  data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
  temperature: f32,
}

#[derive(Debug, Serialize)]
struct Tool {
  google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
  usage_metadata: Option<Usage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
  content: Option<Content>,
  grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
  #[serde(default)]
  grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
  web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
struct WebChunk {
  uri: Option<String>,
  title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
  #[serde(default)]
  pub prompt_token_count: u32,
  #[serde(default)]
  pub candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
  error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
  message: String,
}

/// ---------------------------------------------------------------------------
/// Results
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchSource {
  pub title: String,
  pub uri: String,
}

/// Grounded answer with its web citations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchResult {
  pub text: String,
  pub sources: Vec<ResearchSource>,
}

#[derive(Debug, Clone)]
pub struct Completion {
  pub text: String,
  pub sources: Vec<ResearchSource>,
  pub usage: Usage,
}

/// Inputs for a weekly grocery plan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroceryRequest {
  pub budget: String,
  pub location: String,
  pub favorite_foods: String,
  pub preferences: String,
}

/// ---------------------------------------------------------------------------
/// Gemini Client
/// ---------------------------------------------------------------------------

pub struct GeminiClient {
  client: Client,
  config: GeminiConfig,
}

impl GeminiClient {
  pub fn new(config: GeminiConfig) -> Self {
    Self {
      client: Client::new(),
      config,
    }
  }

  /// Create a client, loading the API key from environment
  pub fn from_env() -> Result<Self, LlmError> {
    Ok(Self::new(GeminiConfig::from_env()?))
  }

  fn endpoint(&self, model: &str) -> Result<Url, LlmError> {
    let base = format!("{}/", self.config.api_base.trim_end_matches('/'));
    Url::parse(&base)
      .and_then(|u| u.join(&format!("v1beta/models/{}:generateContent", model)))
      .map_err(|e| LlmError::InvalidEndpoint(e.to_string()))
  }

  /// Single generateContent call with the coach system instruction
  pub async fn generate(
    &self,
    model: &str,
    parts: Vec<Part>,
    grounded: bool,
  ) -> Result<Completion, LlmError> {
    let request = GenerateRequest {
      system_instruction: Content {
        role: None,
        parts: vec![Part::text(SYSTEM_PROMPT)],
      },
      contents: vec![Content {
        role: Some("user".to_string()),
        parts,
      }],
      generation_config: GenerationConfig {
        temperature: TEMPERATURE,
      },
      tools: if grounded {
        vec![Tool {
          google_search: GoogleSearch {},
        }]
      } else {
        Vec::new()
      },
    };

    tracing::debug!(model, grounded, "Calling Gemini");

    let response = self
      .client
      .post(self.endpoint(model)?)
      .header("x-goog-api-key", &self.config.api_key)
      .header("content-type", "application/json")
      .json(&request)
      .send()
      .await
      .map_err(|e| LlmError::Request(e.to_string()))?;

    let status = response.status();
    let body = response
      .text()
      .await
      .map_err(|e| LlmError::Request(e.to_string()))?;

    if !status.is_success() {
      tracing::warn!(model, %status, "Gemini request failed");
      if let Ok(error_resp) = serde_json::from_str::<GeminiErrorResponse>(&body) {
        return Err(LlmError::Api(error_resp.error.message));
      }
      return Err(LlmError::Api(format!("HTTP {}: {}", status, body)));
    }

    let gemini_response: GenerateResponse =
      serde_json::from_str(&body).map_err(|e| LlmError::Parse(e.to_string()))?;

    let candidate = gemini_response.candidates.into_iter().next();

    let text: String = candidate
      .as_ref()
      .and_then(|c| c.content.as_ref())
      .map(|c| c.parts.iter().filter_map(|p| p.text.as_deref()).collect())
      .unwrap_or_default();

    if text.trim().is_empty() {
      return Err(LlmError::EmptyResponse);
    }

    let sources = candidate
      .and_then(|c| c.grounding_metadata)
      .map(|g| {
        g.grounding_chunks
          .into_iter()
          .map(|chunk| {
            let web = chunk.web;
            ResearchSource {
              title: web
                .as_ref()
                .and_then(|w| w.title.clone())
                .unwrap_or_else(|| "Source".to_string()),
              uri: web
                .and_then(|w| w.uri)
                .unwrap_or_else(|| "#".to_string()),
            }
          })
          .collect()
      })
      .unwrap_or_default();

    let usage = gemini_response.usage_metadata.unwrap_or_default();
    tracing::debug!(
      model,
      prompt_tokens = usage.prompt_token_count,
      output_tokens = usage.candidates_token_count,
      "Gemini call complete"
    );

    Ok(Completion {
      text,
      sources,
      usage,
    })
  }

  async fn generate_text(&self, prompt: String) -> Result<String, LlmError> {
    let model = self.config.model.clone();
    Ok(self.generate(&model, vec![Part::text(prompt)], false).await?.text)
  }

  async fn generate_grounded(&self, prompt: String) -> Result<ResearchResult, LlmError> {
    let model = self.config.model.clone();
    let completion = self.generate(&model, vec![Part::text(prompt)], true).await?;
    Ok(ResearchResult {
      text: completion.text,
      sources: completion.sources,
    })
  }

  /// -------------------------------------------------------------------------
  /// Coaching
  /// -------------------------------------------------------------------------

  pub async fn ask_coach(&self, question: &str) -> Result<String, LlmError> {
    self.generate_text(question.to_string()).await
  }

  pub async fn research_topic(&self, query: &str) -> Result<ResearchResult, LlmError> {
    self
      .generate_grounded(format!("Research performance topic: {}.", query))
      .await
  }

  /// -------------------------------------------------------------------------
  /// Kitchen
  /// -------------------------------------------------------------------------

  pub async fn analyze_meal_text(&self, description: &str, goal: &str) -> Result<String, LlmError> {
    let prompt = format!(
      r#"Estimate the macros for this meal: "{}". Athlete goal: {}.
If preparation matters and is unclear (fried or grilled, sauce, portion), open with one short clarifying question, then give your best estimate anyway.

{}"#,
      description,
      goal,
      MACROS_FORMAT
    );
    self.generate_text(prompt).await
  }

  pub async fn analyze_meal_image(
    &self,
    image_base64: &str,
    description: &str,
    goal: &str,
  ) -> Result<String, LlmError> {
    let prompt = format!(
      r#"Analyze this meal photo for a college athlete (goal: {}).
Athlete description: "{}".
Identify each food and estimate portions and macros. If portion size or preparation is unclear, ask one clarifying question so the estimate can be refined.

{}"#,
      goal,
      description,
      MACROS_FORMAT
    );

    let model = self.config.model.clone();
    let completion = self
      .generate(&model, vec![Part::text(prompt), Part::jpeg(image_base64)], false)
      .await?;
    Ok(completion.text)
  }

  pub async fn refine_analysis(
    &self,
    previous: &str,
    follow_up: &str,
    goal: &str,
  ) -> Result<String, LlmError> {
    let prompt = format!(
      r#"Previous analysis: "{}".
Athlete follow-up: "{}".
Recalculate the macros for a {} goal using the new information.

{}"#,
      previous,
      follow_up,
      goal,
      MACROS_FORMAT
    );
    self.generate_text(prompt).await
  }

  pub async fn build_recipe(&self, ingredients: &str, goal: &str) -> Result<String, LlmError> {
    self
      .generate_text(format!(
        "I have: {}. Goal: {}. Give me one quick, high-performance recipe with clear steps.",
        ingredients, goal
      ))
      .await
  }

  /// -------------------------------------------------------------------------
  /// Planning
  /// -------------------------------------------------------------------------

  pub async fn generate_grocery_plan(
    &self,
    profile: &AthleteProfile,
    request: &GroceryRequest,
  ) -> Result<ResearchResult, LlmError> {
    let prompt = format!(
      r#"Weekly grocery plan for a {} athlete. Budget: ${}. Location: {}.
Athlete likes: {}. Dislikes: {}.
Favorite foods: {}. Preferences: {}.
Use real stores near the location and current prices. Use ### for headers."#,
      profile.sport,
      request.budget,
      request.location,
      profile.likes.as_deref().unwrap_or("none listed"),
      profile.dislikes.as_deref().unwrap_or("none listed"),
      request.favorite_foods,
      request.preferences
    );
    self.generate_grounded(prompt).await
  }

  /// Multi-day split following the DAY_START/DAY_END convention
  pub async fn generate_workout(
    &self,
    profile: &AthleteProfile,
    days: u8,
    focus: &str,
  ) -> Result<String, LlmError> {
    let prompt = format!(
      r####"Create a {days}-day athletic training split for a {sport} {position}.
Goal: {goal}. Season: {season}. Focus: {focus}.

FOR EACH TRAINING DAY:
1. Wrap the whole day between "---DAY_START---" and "---DAY_END---".
2. Title it "### Day [X]: [Focus Area]".
3. Start with "### Movement Preparation & Warm-up" (8-12 minutes).
4. Group the main work under "###" headers by movement category (e.g. "### Explosive Power").
5. Write every exercise on one line in exactly this form, pipes included:
   - **[Exercise Name]** | [Sets] x [Reps] | **Rest: [Time]** | RPE: [Number] [ALT_START] Alt: [Alternative] [ALT_END]
6. Finish with "### Recovery & Joint Health" (5-10 minutes).

FOR REST DAYS:
1. Title it "### Day [X]: Rest & Active Recovery" (still wrapped in the DAY markers).
2. Include "### Active Recovery Strategy" and "### Mental Recovery Strategy".

Every main exercise needs an [ALT_START]...[ALT_END] alternative. Use '###' for all sub-headers."####,
      days = days,
      sport = profile.sport,
      position = profile.position,
      goal = profile.goal.as_str(),
      season = profile.season.as_str(),
      focus = focus,
    );

    let model = self.config.workout_model.clone();
    Ok(self.generate(&model, vec![Part::text(prompt)], false).await?.text)
  }
}

const MACROS_FORMAT: &str = r####"You MUST finish with a "### Macros" section formatted exactly like this, single integers only, no ranges:
- Protein: [number]g
- Carbs: [number]g
- Fats: [number]g
- Calories: [number] kcal"####;

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
