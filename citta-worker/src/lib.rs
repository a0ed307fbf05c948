//! Cloudflare Worker entry point for the Citta reformatting proxy
//!
//! Runs the shared handler from `citta` and reaches Gemini through the
//! runtime's fetch. The API key is a Cloudflare secret: GEMINI_API_KEY.
//! Optional vars: GEMINI_MODEL, GEMINI_API_BASE, PROMPT_TEMPLATE,
//! UPSTREAM_ERROR_POLICY.

use async_trait::async_trait;
use citta::providers::{GenerateContentRequest, GenerateContentResponse};
use citta::{GenerativeModel, MISSING_API_KEY, ProxyConfig, ProxyRequest, TextProxy};
use worker::send::SendFuture;
use worker::{event, Env, Fetch, Headers, Method, Request, RequestInit, Response, Result};

// ============ Gemini over Fetch ============

struct WorkerGeminiProvider {
    api_key: Option<String>,
    url: String,
}

impl WorkerGeminiProvider {
    fn new(config: &ProxyConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            url: config.generate_content_url(),
        }
    }
}

/// Runtime errors may quote the request URL, which carries the key
fn fetch_error(e: worker::Error, api_key: &str) -> citta::Error {
    citta::Error::Fetch(redact(&e.to_string(), api_key))
}

fn redact(message: &str, api_key: &str) -> String {
    message.replace(api_key, "[redacted]")
}

async fn call_gemini(url: String, api_key: String, prompt: String) -> citta::Result<String> {
    let body = serde_json::to_vec(&GenerateContentRequest::user_prompt(prompt))?;

    let headers = Headers::new();
    headers
        .set("Content-Type", "application/json")
        .map_err(|e| fetch_error(e, &api_key))?;

    let mut init = RequestInit::new();
    init.with_method(Method::Post);
    init.with_body(Some(body.into()));
    init.with_headers(headers);

    let upstream = Request::new_with_init(&url, &init).map_err(|e| fetch_error(e, &api_key))?;
    let mut response = Fetch::Request(upstream)
        .send()
        .await
        .map_err(|e| fetch_error(e, &api_key))?;

    let status = response.status_code();
    if !(200..300).contains(&status) {
        let error_text = response.text().await.unwrap_or_default();
        worker::console_error!("API Error: {} {}", status, error_text);
        return Err(citta::Error::upstream(status, &error_text));
    }

    let bytes = response.bytes().await.map_err(|e| fetch_error(e, &api_key))?;
    GenerateContentResponse::from_slice(&bytes)?.into_first_text()
}

#[async_trait]
impl GenerativeModel for WorkerGeminiProvider {
    fn name(&self) -> &'static str {
        "Gemini (fetch)"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(&self, prompt: &str) -> citta::Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| citta::Error::ProviderNotConfigured(MISSING_API_KEY.to_string()))?;

        let url = format!("{}?key={}", self.url, api_key);
        // JS futures are !Send; a worker isolate is single-threaded
        SendFuture::new(call_gemini(url, api_key.to_string(), prompt.to_string())).await
    }
}

// ============ Configuration ============

fn var(env: &Env, name: &str) -> Option<String> {
    env.var(name)
        .map(|v| v.to_string())
        .ok()
        .filter(|v| !v.trim().is_empty())
}

fn proxy_config(env: &Env) -> citta::Result<ProxyConfig> {
    let api_key = env
        .secret("GEMINI_API_KEY")
        .map(|s| s.to_string())
        .ok()
        .or_else(|| var(env, "GEMINI_API_KEY"));

    let mut config = ProxyConfig::new(api_key);
    if let Some(base) = var(env, "GEMINI_API_BASE") {
        config = config.with_api_base(base);
    }
    if let Some(model) = var(env, "GEMINI_MODEL") {
        config = config.with_model(model);
    }
    if let Some(template) = var(env, "PROMPT_TEMPLATE") {
        config = config.with_template(template.parse()?);
    }
    if let Some(policy) = var(env, "UPSTREAM_ERROR_POLICY") {
        config = config.with_upstream_error_policy(policy.parse()?);
    }

    Ok(config)
}

// ============ Main Handler ============

fn json_response(status: u16, body: &impl serde::Serialize) -> Result<Response> {
    Ok(Response::from_json(body)?.with_status(status))
}

#[event(fetch)]
pub async fn main(mut req: Request, env: Env, _ctx: worker::Context) -> Result<Response> {
    let config = match proxy_config(&env) {
        Ok(config) => config,
        Err(e) => {
            worker::console_error!("Function Error: {}", e);
            return json_response(500, &citta::ErrorBody { error: e.to_string() });
        }
    };

    let proxy = match TextProxy::new(&config, WorkerGeminiProvider::new(&config)) {
        Ok(proxy) => proxy,
        Err(e) => return json_response(500, &citta::ErrorBody { error: e.to_string() }),
    };

    let method = req.method().to_string();
    let body = if req.method() == Method::Post {
        req.bytes().await?
    } else {
        Vec::new()
    };

    let response = proxy.handle(ProxyRequest::new(method, body)).await;
    if !response.is_success() {
        worker::console_log!("process-text -> {}", response.status);
    }

    json_response(response.status, &response.body)
}
