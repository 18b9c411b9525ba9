//! # ResQ Gemini
//!
//! [`Assessor`] implementation backed by the Google Generative Language API
//! (`models/{model}:generateContent`).
//!
//! Triage requests ask for `application/json` output so the response can go straight to the
//! strict parser in `resq_core::assessment`. The client makes a single attempt per call; the
//! dispatch centre owns the timeout.

mod prompt;

pub use prompt::{reassessment_prompt, triage_prompt};

use async_trait::async_trait;
use resq_core::assessment::{parse_assessment, parse_reassessment};
use resq_core::{AssessmentError, AssessmentResult, Assessor, Vitals};
use serde::{Deserialize, Serialize};

/// Generative Language API base URL.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Configuration for the Gemini assessor.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
}

impl GeminiConfig {
    /// Config with the given API key and the default model and endpoint.
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

pub struct GeminiAssessor {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiAssessor {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, prompt: String, json_output: bool) -> Result<String, AssessmentError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".into(),
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.2,
                response_mime_type: json_output.then(|| "application/json".to_string()),
            },
            safety_settings: vec![SafetySetting {
                category: "HARM_CATEGORY_DANGEROUS_CONTENT".into(),
                threshold: "BLOCK_NONE".into(),
            }],
        };

        let response = self
            .client
            .post(self.config.generate_url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AssessmentError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, model = %self.config.model, "Gemini request failed");
            return Err(AssessmentError::Unavailable(format!(
                "HTTP {}: {}",
                status,
                truncate(&body, 200)
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AssessmentError::Unavailable(format!("undecodable response: {e}")))?;

        extract_text(body)
    }
}

#[async_trait]
impl Assessor for GeminiAssessor {
    async fn assess(
        &self,
        patient_context: &str,
        clinical_notes: &str,
    ) -> Result<AssessmentResult, AssessmentError> {
        let text = self
            .generate(triage_prompt(patient_context, clinical_notes), true)
            .await?;
        parse_assessment(&text)
    }

    async fn reassess(
        &self,
        prior_reason: &str,
        vitals: &Vitals,
    ) -> Result<String, AssessmentError> {
        let text = self
            .generate(reassessment_prompt(prior_reason, vitals), false)
            .await?;
        parse_reassessment(&text)
    }
}

// ── Wire types ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

#[derive(Serialize)]
struct SafetySetting {
    category: String,
    threshold: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Concatenated text of the first candidate.
fn extract_text(response: GenerateContentResponse) -> Result<String, AssessmentError> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(AssessmentError::Unavailable(format!(
            "prompt blocked: {reason}"
        )));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(AssessmentError::EmptyResponse)?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return match candidate.finish_reason.as_deref() {
            Some("SAFETY") | Some("RECITATION") | Some("BLOCKLIST") => Err(
                AssessmentError::Unavailable("response withheld by safety filter".into()),
            ),
            _ => Err(AssessmentError::EmptyResponse),
        };
    }

    Ok(text)
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
