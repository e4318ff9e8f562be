//! Thin client for the generative-text service behind the chat assistant
//! and impact stories. Requests are forwarded as-is; nothing is cached.
use std::time::Duration;

use serde_json::{json, Value as JsonValue};
use thiserror::Error;

use crate::config::AiConfig;

const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const ASSISTANT_INSTRUCTION: &str = "You are the assistant on the Haven Foundation website. \
Answer questions about the foundation's programs, events, volunteering, careers and donations \
briefly and warmly. If you do not know something, point visitors to the contact page.";

#[derive(Debug, Error)]
pub enum AiError {
    #[error("ai request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("ai service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("ai service returned no text")]
    EmptyResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "model" | "assistant" | "bot" => Role::Model,
            _ => Role::User,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

pub struct AiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl AiClient {
    /// `None` when no API key is configured.
    pub fn from_config(cfg: &AiConfig) -> Result<Option<Self>, AiError> {
        let Some(api_key) = cfg
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
        else {
            return Ok(None);
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Some(Self {
            client,
            api_key: api_key.to_string(),
            model: cfg.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            endpoint: cfg
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
                .trim_end_matches('/')
                .to_string(),
        }))
    }

    pub async fn generate(
        &self,
        instruction: Option<&str>,
        turns: &[(Role, String)],
    ) -> Result<String, AiError> {
        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);
        let body = request_body(instruction, turns);

        let resp = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: JsonValue = resp.json().await?;
        extract_text(&payload).ok_or(AiError::EmptyResponse)
    }
}

fn request_body(instruction: Option<&str>, turns: &[(Role, String)]) -> JsonValue {
    let contents: Vec<JsonValue> = turns
        .iter()
        .map(|(role, text)| json!({ "role": role.as_str(), "parts": [{ "text": text }] }))
        .collect();

    let mut body = json!({ "contents": contents });
    if let Some(instruction) = instruction {
        body["systemInstruction"] = json!({ "parts": [{ "text": instruction }] });
    }
    body
}

fn extract_text(payload: &JsonValue) -> Option<String> {
    let parts = payload
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(JsonValue::as_str))
        .collect();

    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

pub fn impact_story_prompt(name: Option<&str>, program: &str, amount: Option<f64>) -> String {
    let donor = name.map(str::trim).filter(|n| !n.is_empty()).unwrap_or("A donor");
    let gift = amount
        .filter(|a| *a > 0.0)
        .map(|a| format!("a gift of ₹{a:.0}"))
        .unwrap_or_else(|| "their gift".to_string());
    format!(
        "Write a short, hopeful impact story (under 120 words) describing how {donor}'s \
         {gift} to the \"{program}\" program changes one beneficiary's life. \
         Use a warm, concrete tone and no headings."
    )
}
