use async_trait::async_trait;
use cosmic_core::display::{DisplayState, DisplayUpdate};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Completion {
    Text(String),
    // The call succeeded but carried nothing usable.
    Empty,
}

/// One outbound generation call.
///
/// `Err` means the call itself failed (network, non-2xx) and may be retried.
/// A successful call with a useless body is `Ok(Completion::Empty)`.
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    async fn complete(&self, prompt: &str) -> anyhow::Result<Completion>;
}

/// Receives display changes from the dispatcher. Must be fast; it is called
/// once per revealed character.
pub trait DisplaySink: Send + Sync {
    fn apply(&self, update: DisplayUpdate);
}

// A plain in-memory display is a valid sink on its own.
impl DisplaySink for Mutex<DisplayState> {
    fn apply(&self, update: DisplayUpdate) {
        let mut guard = match self.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.apply(&update);
    }
}

#[async_trait]
pub trait Delay: Send + Sync {
    async fn wait(&self, duration: Duration);
}

#[async_trait]
pub trait SpeechOutput: Send + Sync {
    /// Speak `text`, cutting off anything still being spoken.
    async fn speak(&self, text: &str) -> anyhow::Result<()>;
}

pub trait UrlOpener: Send + Sync {
    fn open(&self, url: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    Transcript(String),
    // Engine-specific error code, e.g. "no-speech".
    Error(String),
    Ended,
}

#[async_trait]
pub trait Recognizer: Send {
    fn start(&mut self) -> anyhow::Result<()>;
    async fn next_event(&mut self) -> RecognitionEvent;
    fn stop(&mut self) {}
}
