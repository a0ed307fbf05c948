use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use citta::config::{DEFAULT_GEMINI_API_BASE, DEFAULT_GEMINI_MODEL};
use citta::{ProxyConfig, TemplateVersion, UpstreamErrorPolicy};
use serde::{Deserialize, Deserializer};

fn default_port() -> u16 {
    3000
}

fn default_static_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_api_base() -> String {
    DEFAULT_GEMINI_API_BASE.to_string()
}

fn default_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn filter_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

fn parse_value<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let value = String::deserialize(deserializer)?;
    value.parse().map_err(serde::de::Error::custom)
}

#[derive(Debug, Deserialize)]
pub struct Env {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    #[serde(default, deserialize_with = "filter_empty")]
    pub gemini_api_key: Option<String>,
    #[serde(default = "default_api_base")]
    pub gemini_api_base: String,
    #[serde(default = "default_model")]
    pub gemini_model: String,

    #[serde(default, deserialize_with = "parse_value")]
    pub prompt_template: TemplateVersion,
    #[serde(default, deserialize_with = "parse_value")]
    pub upstream_error_policy: UpstreamErrorPolicy,
}

impl Env {
    /// Read the process environment, after loading `.env` if one exists
    pub fn load() -> envy::Result<Self> {
        let _ = dotenvy::dotenv();
        envy::from_env()
    }

    pub fn from_vars<I>(vars: I) -> envy::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }

    pub fn proxy_config(&self) -> ProxyConfig {
        ProxyConfig::new(self.gemini_api_key.clone())
            .with_api_base(&self.gemini_api_base)
            .with_model(&self.gemini_model)
            .with_template(self.prompt_template)
            .with_upstream_error_policy(self.upstream_error_policy)
    }
}
