use cosmic_core::config::EndpointSettings;
use cosmic_core::text::preview;
use cosmic_engine::traits::{Completion, CompletionTransport};
use cosmic_providers::gemini::{GeminiConfig, build_generate_content_request};
use cosmic_providers::parse::{GeneratedText, parse_generate_content};
use cosmic_providers::runtime::{HttpClient, HttpOptions};
use std::time::Duration;

const ERROR_BODY_PREVIEW: usize = 200;

#[derive(Clone)]
pub struct GeminiTransport {
    cfg: GeminiConfig,
    client: HttpClient,
}

impl std::fmt::Debug for GeminiTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiTransport")
            .field("cfg", &self.cfg)
            .finish_non_exhaustive()
    }
}

impl GeminiTransport {
    pub fn new(endpoint: &EndpointSettings, api_key: impl Into<String>) -> anyhow::Result<Self> {
        let opts = HttpOptions {
            request_timeout: endpoint.request_timeout_ms.map(Duration::from_millis),
            ..HttpOptions::default()
        };
        Ok(Self {
            cfg: GeminiConfig {
                base_url: endpoint.base_url.clone(),
                api_key: api_key.into(),
                model: endpoint.model.clone(),
            },
            client: HttpClient::new(opts)?,
        })
    }
}

#[async_trait::async_trait]
impl CompletionTransport for GeminiTransport {
    async fn complete(&self, prompt: &str) -> anyhow::Result<Completion> {
        let req = build_generate_content_request(&self.cfg, prompt)?;
        let resp = self.client.execute(&req).await?;

        if !resp.is_success() {
            return Err(anyhow::anyhow!(
                "generateContent failed: status={} body={}",
                resp.status,
                preview(&String::from_utf8_lossy(&resp.body), ERROR_BODY_PREVIEW)
            ));
        }

        Ok(match parse_generate_content(&resp.body) {
            GeneratedText::Text(text) => Completion::Text(text),
            GeneratedText::Empty => Completion::Empty,
        })
    }
}
