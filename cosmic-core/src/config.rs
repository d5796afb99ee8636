use crate::commands::CommandTable;
use crate::retry::{Jitter, RetryPolicy};
use crate::types::ResubmitPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("endpoint base_url is empty")]
    EmptyBaseUrl,
    #[error("endpoint base_url is not a valid URL: {0}")]
    InvalidBaseUrl(String),
    #[error("endpoint model is empty")]
    EmptyModel,
    #[error("voice command #{0} has an empty phrase")]
    EmptyCommandPhrase(usize),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub endpoint: EndpointSettings,
    pub dispatch: DispatchSettings,
    pub voice: VoiceSettings,
    pub subtitle: SubtitleSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointSettings {
    pub base_url: String,
    pub model: String,
    // Unset means no per-request timeout; only backoff is timed.
    pub request_timeout_ms: Option<u64>,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            model: "gemini-2.5-flash-preview-05-20".into(),
            request_timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchSettings {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub jitter: Jitter,
    pub char_interval_ms: u64,
    pub resubmit: ResubmitPolicy,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            jitter: Jitter::None,
            char_interval_ms: 30,
            resubmit: ResubmitPolicy::CancelPrevious,
        }
    }
}

impl DispatchSettings {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_millis(self.base_delay_ms),
            jitter: self.jitter,
        }
    }

    pub fn char_interval(&self) -> Duration {
        Duration::from_millis(self.char_interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceSettings {
    #[serde(flatten)]
    pub table: CommandTable,
    pub restart_delay_ms: u64,
    pub pitch: f32,
    pub rate: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            table: CommandTable::default(),
            restart_delay_ms: 250,
            pitch: 1.2,
            rate: 1.0,
        }
    }
}

impl VoiceSettings {
    pub fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.restart_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtitleSettings {
    pub text: String,
    pub step_ms: u64,
}

impl Default for SubtitleSettings {
    fn default() -> Self {
        Self {
            text: "Full Stack Developer".into(),
            step_ms: 100,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.endpoint.base_url.trim();
        if base.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        url::Url::parse(base).map_err(|e| ConfigError::InvalidBaseUrl(e.to_string()))?;

        if self.endpoint.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }

        if let Some(i) = self
            .voice
            .table
            .commands
            .iter()
            .position(|c| c.phrase.trim().is_empty())
        {
            return Err(ConfigError::EmptyCommandPhrase(i));
        }

        Ok(())
    }
}
