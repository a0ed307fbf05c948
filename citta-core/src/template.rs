//! Prompt templates for bilingual transcript reformatting
//!
//! A template is an instruction text with a single slot for the caller's raw
//! text. The slot sits between the `---VĂN BẢN GỐC---` and
//! `---HẾT VĂN BẢN GỐC---` sentinels; rendering splices the text in verbatim.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Placeholder marking where the raw text goes inside a template resource
pub const SLOT: &str = "{original_text}";

pub const OPENING_SENTINEL: &str = "---VĂN BẢN GỐC---";
pub const CLOSING_SENTINEL: &str = "---HẾT VĂN BẢN GỐC---";

const V1: &str = include_str!("../templates/v1.txt");
const V2: &str = include_str!("../templates/v2.txt");

/// Shipped template revisions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TemplateVersion {
    /// Two speakers, parenthetical replies attributed to the previous speaker
    V1,
    /// Three speakers, inline questions split into their own turn, separator
    /// and annotation lines removed
    #[default]
    V2,
}

impl TemplateVersion {
    pub fn source(&self) -> &'static str {
        match self {
            TemplateVersion::V1 => V1,
            TemplateVersion::V2 => V2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateVersion::V1 => "v1",
            TemplateVersion::V2 => "v2",
        }
    }

    /// Parse the bundled resource for this version
    pub fn template(&self) -> Result<PromptTemplate> {
        PromptTemplate::parse(self.source())
    }
}

impl fmt::Display for TemplateVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "v1" => Ok(TemplateVersion::V1),
            "v2" => Ok(TemplateVersion::V2),
            other => Err(Error::Config(format!("unknown prompt template: {other}"))),
        }
    }
}

/// A template split around its slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    head: String,
    tail: String,
}

impl PromptTemplate {
    /// Split a template resource at its slot.
    ///
    /// The resource must contain [`SLOT`] exactly once.
    pub fn parse(source: &str) -> Result<Self> {
        let (head, tail) = source
            .split_once(SLOT)
            .ok_or_else(|| Error::Config("prompt template has no slot".to_string()))?;

        if tail.contains(SLOT) {
            return Err(Error::Config(
                "prompt template has more than one slot".to_string(),
            ));
        }

        Ok(Self {
            head: head.to_string(),
            tail: tail.to_string(),
        })
    }

    /// Splice the raw text into the slot.
    ///
    /// The text is not escaped or scanned, so a slot marker inside the input
    /// is passed through as-is.
    pub fn render(&self, original_text: &str) -> String {
        let mut prompt =
            String::with_capacity(self.head.len() + original_text.len() + self.tail.len());
        prompt.push_str(&self.head);
        prompt.push_str(original_text);
        prompt.push_str(&self.tail);
        prompt
    }
}
