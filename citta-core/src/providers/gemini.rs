//! Gemini `generateContent` provider

#[cfg(feature = "http-client")]
use async_trait::async_trait;
#[cfg(feature = "http-client")]
use reqwest::Client;
use serde::{Deserialize, Serialize};
#[cfg(feature = "http-client")]
use tracing::debug;

use crate::error::{Error, Result};

#[cfg(feature = "http-client")]
use crate::config::ProxyConfig;

#[cfg(feature = "http-client")]
use super::GenerativeModel;

// ============ Request Types ============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<GeminiContent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeminiPart {
    pub text: String,
}

impl GenerateContentRequest {
    /// Single-turn conversation holding one user text part
    pub fn user_prompt(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: prompt.into(),
                }],
            }],
        }
    }
}

// ============ Response Types ============

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiCandidate {
    pub content: GeminiContent,
}

impl GenerateContentResponse {
    /// Decode a 2xx body
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(|e| Error::MalformedResponse(e.to_string()))
    }

    /// `candidates[0].content.parts[0].text`; anything else is an error
    pub fn into_first_text(self) -> Result<String> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| Error::MalformedResponse("no candidates returned".to_string()))?;

        candidate
            .content
            .parts
            .into_iter()
            .next()
            .map(|part| part.text)
            .ok_or_else(|| Error::MalformedResponse("candidate has no content parts".to_string()))
    }
}

// ============ Native Client ============

/// Gemini provider over reqwest
#[cfg(feature = "http-client")]
pub struct GeminiProvider {
    client: Client,
    api_key: Option<String>,
    url: String,
}

#[cfg(feature = "http-client")]
impl GeminiProvider {
    pub fn new(config: &ProxyConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Reuse an existing client (connection pool)
    pub fn with_client(client: Client, config: &ProxyConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            url: config.generate_content_url(),
        }
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| Error::ProviderNotConfigured(crate::MISSING_API_KEY.to_string()))
    }
}

#[cfg(feature = "http-client")]
#[async_trait]
impl GenerativeModel for GeminiProvider {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key()?;
        let request = GenerateContentRequest::user_prompt(prompt);

        debug!(url = %self.url, prompt_len = prompt.len(), "Sending generateContent request to Gemini");

        let url = format!("{}?key={}", self.url, api_key);
        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::upstream(status.as_u16(), &error_text));
        }

        let body = response.bytes().await?;
        GenerateContentResponse::from_slice(&body)?.into_first_text()
    }
}
