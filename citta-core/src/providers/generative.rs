//! Generative model trait

use async_trait::async_trait;

use crate::error::Result;

/// A model that turns one prompt into one text reply
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &'static str;

    /// Check if the provider has the credentials it needs
    fn is_configured(&self) -> bool;

    /// Send a single-turn prompt and return the raw text of the first
    /// candidate's first part, untrimmed
    async fn generate(&self, prompt: &str) -> Result<String>;
}
