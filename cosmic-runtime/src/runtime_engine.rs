use std::sync::Arc;

use cosmic_core::config::AppConfig;
use cosmic_engine::assistant::VoiceAssistant;
use cosmic_engine::delay::TokioDelay;
use cosmic_engine::dispatcher::{Dispatcher, DispatcherConfig};
use cosmic_engine::listener::ListeningLoop;
use cosmic_engine::traits::{CompletionTransport, Delay, SpeechOutput, UrlOpener};

use crate::transport::GeminiTransport;

/// Build a ready dispatcher from config. Keeps the front ends thin.
pub fn build_dispatcher(cfg: &AppConfig, api_key: impl Into<String>) -> anyhow::Result<Dispatcher> {
    let transport: Arc<dyn CompletionTransport> =
        Arc::new(GeminiTransport::new(&cfg.endpoint, api_key)?);
    Ok(build_dispatcher_with(cfg, transport, Arc::new(TokioDelay)))
}

pub fn build_dispatcher_with(
    cfg: &AppConfig,
    transport: Arc<dyn CompletionTransport>,
    delay: Arc<dyn Delay>,
) -> Dispatcher {
    let dispatcher_cfg = DispatcherConfig {
        retry: cfg.dispatch.retry_policy(),
        char_interval: cfg.dispatch.char_interval(),
        resubmit: cfg.dispatch.resubmit,
    };
    Dispatcher::new(dispatcher_cfg, transport, delay)
}

pub fn build_assistant(
    cfg: &AppConfig,
    speech: Arc<dyn SpeechOutput>,
    opener: Arc<dyn UrlOpener>,
) -> VoiceAssistant {
    VoiceAssistant::new(cfg.voice.table.clone(), speech, opener)
}

pub fn build_listening_loop(cfg: &AppConfig, assistant: Arc<VoiceAssistant>) -> ListeningLoop {
    ListeningLoop::new(assistant, Arc::new(TokioDelay), cfg.voice.restart_delay())
}
