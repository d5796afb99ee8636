use crate::assistant::VoiceAssistant;
use crate::traits::{Delay, RecognitionEvent, Recognizer};
use cosmic_core::listening::{
    ListeningEvent, ListeningMachine, ListeningState, RecognitionErrorKind, TransitionError,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;

pub const DEFAULT_RESTART_DELAY: Duration = Duration::from_millis(250);

#[derive(Debug, Error)]
pub enum ListenError {
    #[error("could not start recognition: {0:#}")]
    Start(anyhow::Error),
    #[error("could not restart recognition: {0:#}")]
    Restart(anyhow::Error),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }
}

#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once `stop()` was called. Never resolves if every handle is
    /// dropped without stopping.
    pub async fn stopped(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

pub fn stop_pair() -> (StopHandle, StopSignal) {
    let (tx, rx) = watch::channel(false);
    (StopHandle { tx: Arc::new(tx) }, StopSignal { rx })
}

/// Keeps a continuous recognizer running: each time it ends on its own, wait
/// `restart_delay` and start it again, until stopped or a restart fails.
pub struct ListeningLoop {
    assistant: Arc<VoiceAssistant>,
    delay: Arc<dyn Delay>,
    restart_delay: Duration,
    state_tx: watch::Sender<ListeningState>,
}

impl ListeningLoop {
    pub fn new(assistant: Arc<VoiceAssistant>, delay: Arc<dyn Delay>, restart_delay: Duration) -> Self {
        let (state_tx, _) = watch::channel(ListeningState::Idle);
        Self {
            assistant,
            delay,
            restart_delay,
            state_tx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ListeningState> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> ListeningState {
        *self.state_tx.borrow()
    }

    pub async fn run<R>(&self, recognizer: &mut R, mut stop: StopSignal) -> Result<(), ListenError>
    where
        R: Recognizer + ?Sized,
    {
        let mut machine = ListeningMachine::new();
        if stop.is_stopped() {
            return Ok(());
        }

        recognizer.start().map_err(ListenError::Start)?;
        self.advance(&mut machine, ListeningEvent::Start)?;
        log::info!("listening for voice commands");

        loop {
            match machine.state() {
                ListeningState::Listening => {
                    let event = tokio::select! {
                        _ = stop.stopped() => break,
                        ev = recognizer.next_event() => ev,
                    };
                    match event {
                        RecognitionEvent::Transcript(t) => {
                            if let Err(e) = self.assistant.handle_transcript(&t).await {
                                log::error!("voice command failed: {e:#}");
                            }
                        }
                        RecognitionEvent::Error(code) => {
                            if !RecognitionErrorKind::classify(&code).is_benign() {
                                log::error!("speech recognition error: {code}");
                            }
                        }
                        RecognitionEvent::Ended => {
                            self.advance(&mut machine, ListeningEvent::Ended)?;
                        }
                    }
                }
                ListeningState::Restarting => {
                    tokio::select! {
                        _ = stop.stopped() => break,
                        _ = self.delay.wait(self.restart_delay) => {}
                    }
                    if let Err(e) = recognizer.start() {
                        log::error!("could not restart recognition: {e:#}");
                        self.advance(&mut machine, ListeningEvent::RestartFailed)?;
                        return Err(ListenError::Restart(e));
                    }
                    self.advance(&mut machine, ListeningEvent::RestartElapsed)?;
                    log::debug!("recognition restarted ({} so far)", machine.restarts());
                }
                ListeningState::Idle => break,
            }
        }

        recognizer.stop();
        self.advance(&mut machine, ListeningEvent::Stop)?;
        log::info!("stopped listening after {} restarts", machine.restarts());
        Ok(())
    }

    fn advance(
        &self,
        machine: &mut ListeningMachine,
        event: ListeningEvent,
    ) -> Result<(), TransitionError> {
        let prev = machine.state();
        let next = machine.handle(event)?;
        if prev != next {
            log::debug!("listening: {prev:?} -> {next:?}");
        }
        self.state_tx.send_replace(next);
        Ok(())
    }
}
