use crate::request::{Body, HttpRequest};
use anyhow::Context;
use serde_json::json;

#[derive(Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

pub fn build_generate_content_request(
    cfg: &GeminiConfig,
    prompt: &str,
) -> anyhow::Result<HttpRequest> {
    let url = generate_content_url(cfg)?;

    // Single-turn history: the chat box does not carry earlier exchanges.
    let payload = json!({
        "contents": [
            { "role": "user", "parts": [ { "text": prompt } ] }
        ]
    });

    Ok(HttpRequest {
        method: "POST".into(),
        url,
        headers: vec![("Content-Type".into(), "application/json".into())],
        body: Body::Json(payload.to_string()),
    })
}

fn generate_content_url(cfg: &GeminiConfig) -> anyhow::Result<String> {
    let base = cfg.base_url.trim_end_matches('/');
    let raw = format!("{}/models/{}:generateContent", base, cfg.model.trim());
    let mut url =
        url::Url::parse(&raw).with_context(|| format!("invalid endpoint url: {base}"))?;
    url.query_pairs_mut().append_pair("key", &cfg.api_key);
    Ok(url.to_string())
}
