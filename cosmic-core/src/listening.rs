use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListeningState {
    #[default]
    Idle,
    Listening,
    // Recognizer ended on its own; waiting out the restart delay.
    Restarting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListeningEvent {
    Start,
    Ended,
    RestartElapsed,
    RestartFailed,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid listening transition: {event:?} while {state:?}")]
pub struct TransitionError {
    pub state: ListeningState,
    pub event: ListeningEvent,
}

/// Continuous-recognition lifecycle. Restarts are explicit transitions, and
/// `Stop` is accepted from every state so a caller can always end the loop.
#[derive(Debug, Clone, Default)]
pub struct ListeningMachine {
    state: ListeningState,
    restarts: u64,
}

impl ListeningMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ListeningState {
        self.state
    }

    pub fn restarts(&self) -> u64 {
        self.restarts
    }

    pub fn handle(&mut self, event: ListeningEvent) -> Result<ListeningState, TransitionError> {
        use ListeningEvent as E;
        use ListeningState as S;

        let next = match (self.state, event) {
            (_, E::Stop) => S::Idle,
            (S::Idle, E::Start) => S::Listening,
            (S::Listening, E::Ended) => S::Restarting,
            (S::Restarting, E::RestartElapsed) => {
                self.restarts += 1;
                S::Listening
            }
            (S::Restarting, E::RestartFailed) => S::Idle,
            (state, event) => return Err(TransitionError { state, event }),
        };
        self.state = next;
        Ok(next)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionErrorKind {
    NoSpeech,
    Aborted,
    Other(String),
}

impl RecognitionErrorKind {
    pub fn classify(code: &str) -> Self {
        match code.trim() {
            "no-speech" => Self::NoSpeech,
            "aborted" => Self::Aborted,
            other => Self::Other(other.to_string()),
        }
    }

    /// Silence and deliberate aborts happen constantly in continuous mode.
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::NoSpeech | Self::Aborted)
    }
}
