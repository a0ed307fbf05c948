//! The reformatting request handler
//!
//! One request, one outbound call, one outcome. Adapters translate their
//! framework's request into a [`ProxyRequest`] and write the returned
//! [`ProxyResponse`] back out.

use tracing::{debug, error, warn};

use crate::config::{ProxyConfig, UpstreamErrorPolicy};
use crate::error::{Error, Result};
use crate::providers::GenerativeModel;
use crate::template::PromptTemplate;
use crate::types::{ProcessTextRequest, ProxyRequest, ProxyResponse};

/// Message returned when no API key is configured
pub const MISSING_API_KEY: &str = "GEMINI_API_KEY is not set in environment variables.";

pub struct TextProxy<M> {
    model: M,
    template: PromptTemplate,
    upstream_error_policy: UpstreamErrorPolicy,
}

impl<M: GenerativeModel> TextProxy<M> {
    pub fn new(config: &ProxyConfig, model: M) -> Result<Self> {
        Ok(Self {
            model,
            template: config.template.template()?,
            upstream_error_policy: config.upstream_error_policy,
        })
    }

    #[cfg(test)]
    fn model(&self) -> &M {
        &self.model
    }

    /// Handle one request, mapping every failure to an error envelope
    pub async fn handle(&self, request: ProxyRequest) -> ProxyResponse {
        match self.process(&request).await {
            Ok(text) => ProxyResponse::formatted(text),
            Err(err) => {
                let status = err.status_code(self.upstream_error_policy);
                if err.is_client_error() {
                    warn!(status, method = %request.method, error = %err, "request_rejected");
                } else {
                    error!(status, error = %err, "request_failed");
                }
                ProxyResponse::error(status, err.to_string())
            }
        }
    }

    /// Validate, render, call the model and trim its reply
    pub async fn process(&self, request: &ProxyRequest) -> Result<String> {
        if request.method != "POST" {
            return Err(Error::MethodNotAllowed);
        }

        if !self.model.is_configured() {
            return Err(Error::ProviderNotConfigured(MISSING_API_KEY.to_string()));
        }

        let body = ProcessTextRequest::from_slice(&request.body)?;
        let original_text = body.original_text().ok_or(Error::MissingOriginalText)?;

        let prompt = self.template.render(original_text);
        debug!(
            provider = self.model.name(),
            text_len = original_text.len(),
            "rendered_prompt"
        );

        let reply = self.model.generate(&prompt).await?;
        Ok(reply.trim().to_string())
    }
}
