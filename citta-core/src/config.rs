//! Proxy configuration
//!
//! Built once by each adapter (from the process environment or worker
//! bindings) and handed to [`crate::TextProxy`].

use std::str::FromStr;

use crate::error::Error;
use crate::template::TemplateVersion;

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-preview-05-20";

/// How a non-2xx status from the model API is reported to the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpstreamErrorPolicy {
    /// Reply with the upstream status code
    #[default]
    Propagate,
    /// Reply with 500 regardless of the upstream status
    Collapse,
}

impl FromStr for UpstreamErrorPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "propagate" => Ok(Self::Propagate),
            "collapse" => Ok(Self::Collapse),
            other => Err(Error::Config(format!(
                "unknown upstream error policy: {other}"
            ))),
        }
    }
}

/// Everything the handler and the Gemini client need
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Gemini API key. `None` makes every request fail with 500.
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub template: TemplateVersion,
    pub upstream_error_policy: UpstreamErrorPolicy,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            template: TemplateVersion::default(),
            upstream_error_policy: UpstreamErrorPolicy::default(),
        }
    }
}

impl ProxyConfig {
    pub fn new(api_key: Option<String>) -> Self {
        Self::default().with_api_key(api_key)
    }

    /// Set the API key; blank keys count as unset
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_template(mut self, template: TemplateVersion) -> Self {
        self.template = template;
        self
    }

    pub fn with_upstream_error_policy(mut self, policy: UpstreamErrorPolicy) -> Self {
        self.upstream_error_policy = policy;
        self
    }

    /// `generateContent` URL without the key query parameter
    pub fn generate_content_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}
