use crate::traits::{SpeechOutput, UrlOpener};
use cosmic_core::commands::{CommandAction, CommandTable};
use cosmic_core::messages;
use std::sync::Arc;

/// Turns recognized utterances into spoken replies and opened links.
pub struct VoiceAssistant {
    table: CommandTable,
    speech: Arc<dyn SpeechOutput>,
    opener: Arc<dyn UrlOpener>,
}

impl VoiceAssistant {
    pub fn new(
        table: CommandTable,
        speech: Arc<dyn SpeechOutput>,
        opener: Arc<dyn UrlOpener>,
    ) -> Self {
        Self {
            table,
            speech,
            opener,
        }
    }

    /// Reply for the microphone button.
    pub async fn greet(&self) {
        self.say(messages::GREETING).await;
    }

    pub async fn handle_transcript(&self, transcript: &str) -> anyhow::Result<Option<CommandAction>> {
        log::debug!("voice transcript: {transcript:?}");

        let Some(action) = self.table.interpret(transcript) else {
            return Ok(None);
        };

        match &action {
            CommandAction::Greet => {
                log::info!("wake phrase detected");
                self.say(messages::WAKE_REPLY).await;
            }
            CommandAction::Open { name, url } => {
                log::info!("voice command: opening {name}");
                self.say(&messages::opening(name)).await;
                self.opener.open(url)?;
            }
        }
        Ok(Some(action))
    }

    // Speech is feedback only; a failure here must not block the command.
    async fn say(&self, text: &str) {
        if let Err(e) = self.speech.speak(text).await {
            log::warn!("speech output failed: {e:#}");
        }
    }
}
