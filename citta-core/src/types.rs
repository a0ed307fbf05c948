//! Wire types for the reformatting endpoint

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Body accepted by `POST /api/process-text`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessTextRequest {
    /// Kept loose so a missing, null or non-string field surfaces as 400
    /// instead of a parse error
    #[serde(default)]
    original_text: Option<Value>,
}

impl ProcessTextRequest {
    /// Parse a request body. Malformed JSON is an error; well-formed JSON
    /// that is not an object carries no `originalText`.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body)?;
        match value {
            fields @ Value::Object(_) => Ok(serde_json::from_value(fields)?),
            _ => Ok(Self {
                original_text: None,
            }),
        }
    }

    /// The raw text, if present and non-empty
    pub fn original_text(&self) -> Option<&str> {
        match &self.original_text {
            Some(Value::String(text)) if !text.is_empty() => Some(text.as_str()),
            _ => None,
        }
    }
}

/// Successful reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessTextResponse {
    pub formatted_text: String,
}

/// Error envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Framework-neutral inbound request
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    pub method: String,
    pub body: Vec<u8>,
}

impl ProxyRequest {
    pub fn new(method: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            method: method.into(),
            body: body.into(),
        }
    }

    pub fn post(body: impl Into<Vec<u8>>) -> Self {
        Self::new("POST", body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Formatted(ProcessTextResponse),
    Error(ErrorBody),
}

/// Framework-neutral outbound response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl ProxyResponse {
    pub fn formatted(text: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: ResponseBody::Formatted(ProcessTextResponse {
                formatted_text: text.into(),
            }),
        }
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ResponseBody::Error(ErrorBody {
                error: message.into(),
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn to_json(&self) -> String {
        // a struct holding only strings always serializes
        serde_json::to_string(&self.body).unwrap_or_default()
    }
}
