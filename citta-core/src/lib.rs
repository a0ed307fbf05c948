//! Citta Core - secure proxy for reformatting bilingual transcripts with Gemini
//!
//! Accepts raw transcript text, splices it into a fixed instruction template,
//! forwards the prompt to Gemini and relays the trimmed reply. The handler is
//! host independent; the server and worker crates are thin adapters over
//! [`TextProxy::handle`].

pub mod config;
pub mod error;
pub mod handler;
pub mod providers;
pub mod template;
pub mod types;

pub use config::{ProxyConfig, UpstreamErrorPolicy};
pub use error::{Error, Result};
pub use handler::{MISSING_API_KEY, TextProxy};
pub use providers::GenerativeModel;
#[cfg(feature = "http-client")]
pub use providers::GeminiProvider;
pub use template::{PromptTemplate, TemplateVersion};
pub use types::*;
