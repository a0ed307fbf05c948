//! Provider abstraction for the generative model behind the proxy
//!
//! The native reqwest client lives here; the Cloudflare Worker supplies its own
//! implementation of [`GenerativeModel`] on top of the runtime's fetch.
mod gemini;
mod generative;

#[cfg(feature = "http-client")]
pub use gemini::GeminiProvider;
pub use gemini::{
    GeminiCandidate, GeminiContent, GeminiPart, GenerateContentRequest, GenerateContentResponse,
};
pub use generative::GenerativeModel;
