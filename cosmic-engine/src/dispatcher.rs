use crate::ticket::{Ticket, TicketCounter};
use crate::traits::{Completion, CompletionTransport, Delay, DisplaySink};
use crate::typewriter::{RenderStatus, Typewriter};
use cosmic_core::display::DisplayUpdate;
use cosmic_core::messages;
use cosmic_core::outcome::{Outcome, Reply};
use cosmic_core::retry::RetryPolicy;
use cosmic_core::text::{PromptError, PromptText, preview};
use cosmic_core::types::{RequestId, ResubmitPolicy};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    // Nothing was sent; the prompt-request message is on screen.
    Rejected(PromptError),
    Dispatched(Outcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherConfig {
    pub retry: RetryPolicy,
    pub char_interval: Duration,
    pub resubmit: ResubmitPolicy,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            char_interval: crate::typewriter::DEFAULT_CHAR_INTERVAL,
            resubmit: ResubmitPolicy::default(),
        }
    }
}

/// Sends a prompt, retries transport failures with exponential backoff, and
/// types the reply into a [`DisplaySink`].
///
/// Shareable: wrap in an `Arc` and call `submit` from any task. Which request
/// owns the display is decided by [`ResubmitPolicy`].
pub struct Dispatcher {
    cfg: DispatcherConfig,
    transport: Arc<dyn CompletionTransport>,
    delay: Arc<dyn Delay>,
    typewriter: Typewriter,
    tickets: TicketCounter,
}

impl Dispatcher {
    pub fn new(
        cfg: DispatcherConfig,
        transport: Arc<dyn CompletionTransport>,
        delay: Arc<dyn Delay>,
    ) -> Self {
        let typewriter = Typewriter::new(cfg.char_interval, delay.clone());
        Self {
            cfg,
            transport,
            delay,
            typewriter,
            tickets: TicketCounter::new(),
        }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.cfg
    }

    /// Entry point for the submit action: validates raw input, then dispatches.
    pub async fn submit(&self, raw: &str, sink: &dyn DisplaySink) -> Submission {
        match PromptText::parse(raw) {
            Ok(prompt) => Submission::Dispatched(self.dispatch(&prompt, sink).await),
            Err(e) => {
                sink.apply(DisplayUpdate::SetText(messages::PROMPT_REQUIRED.into()));
                Submission::Rejected(e)
            }
        }
    }

    pub async fn dispatch(&self, prompt: &PromptText, sink: &dyn DisplaySink) -> Outcome {
        let ticket = self.tickets.issue(self.cfg.resubmit);
        let id = RequestId::new();
        let budget = self.cfg.retry.attempts();

        log::info!(
            "request {id}: dispatching prompt={:?} budget={budget}",
            preview(prompt.as_str(), 60)
        );

        ticket.emit(sink, DisplayUpdate::SetLoading(true));
        ticket.emit(sink, DisplayUpdate::Clear);
        ticket.emit(sink, DisplayUpdate::SetTyping(false));

        let mut attempt: u32 = 0;
        loop {
            if !ticket.is_current() {
                return self.superseded(id, attempt);
            }
            let made = attempt + 1;

            match self.transport.complete(prompt.as_str()).await {
                Ok(Completion::Text(text)) => {
                    log::info!("request {id}: reply received on attempt {made}/{budget}");
                    return self.finish_with_text(id, text, made, sink, &ticket).await;
                }
                Ok(Completion::Empty) => {
                    log::warn!("request {id}: reply had no usable text; not retrying");
                    if !ticket.emit(sink, DisplayUpdate::SetText(messages::NO_RESULT.into())) {
                        return self.superseded(id, made);
                    }
                    ticket.emit(sink, DisplayUpdate::SetLoading(false));
                    return Outcome::Success {
                        reply: Reply::Empty,
                        attempts: made,
                    };
                }
                Err(e) => {
                    log::error!("request {id}: attempt {made}/{budget} failed: {e:#}");
                    if self.cfg.retry.is_last(attempt) {
                        if !ticket.emit(
                            sink,
                            DisplayUpdate::SetText(messages::DISPATCH_FAILED.into()),
                        ) {
                            return self.superseded(id, made);
                        }
                        ticket.emit(sink, DisplayUpdate::SetLoading(false));
                        return Outcome::Failure {
                            reason: format!("{e:#}"),
                            attempts: made,
                        };
                    }

                    let wait = self.cfg.retry.delay_before_retry(attempt);
                    log::debug!("request {id}: retrying in {}ms", wait.as_millis());
                    self.delay.wait(wait).await;
                }
            }
            attempt += 1;
        }
    }

    async fn finish_with_text(
        &self,
        id: RequestId,
        text: String,
        attempts: u32,
        sink: &dyn DisplaySink,
        ticket: &Ticket,
    ) -> Outcome {
        if !ticket.emit(sink, DisplayUpdate::SetLoading(false)) {
            return self.superseded(id, attempts);
        }
        match self.typewriter.render(&text, sink, ticket).await {
            RenderStatus::Completed => Outcome::Success {
                reply: Reply::Text(text),
                attempts,
            },
            RenderStatus::Interrupted => self.superseded(id, attempts),
        }
    }

    fn superseded(&self, id: RequestId, attempts: u32) -> Outcome {
        log::info!("request {id}: superseded by a newer submission");
        Outcome::Superseded { attempts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cosmic_core::display::DisplayState;
    use cosmic_core::retry::Jitter;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::sync::Notify;

    #[derive(Default)]
    struct ScriptedTransport {
        script: Mutex<VecDeque<anyhow::Result<Completion>>>,
        calls: AtomicU32,
    }

    impl ScriptedTransport {
        fn new(script: Vec<anyhow::Result<Completion>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionTransport for ScriptedTransport {
        async fn complete(&self, _prompt: &str) -> anyhow::Result<Completion> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow::anyhow!("script exhausted")))
        }
    }

    #[derive(Default)]
    struct RecordingDelay {
        waits: Mutex<Vec<Duration>>,
    }

    #[async_trait]
    impl Delay for RecordingDelay {
        async fn wait(&self, duration: Duration) {
            self.waits.lock().unwrap().push(duration);
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        updates: Mutex<Vec<DisplayUpdate>>,
    }

    impl RecordingSink {
        fn state(&self) -> DisplayState {
            DisplayState::replay(self.updates.lock().unwrap().iter())
        }
    }

    impl DisplaySink for RecordingSink {
        fn apply(&self, update: DisplayUpdate) {
            self.updates.lock().unwrap().push(update);
        }
    }

    fn dispatcher(
        transport: Arc<dyn CompletionTransport>,
        delay: Arc<RecordingDelay>,
    ) -> Dispatcher {
        Dispatcher::new(DispatcherConfig::default(), transport, delay)
    }

    fn http_error(status: u16) -> anyhow::Result<Completion> {
        Err(anyhow::anyhow!("status={status}"))
    }

    #[tokio::test]
    async fn whitespace_prompt_never_reaches_transport() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let d = dispatcher(transport.clone(), Arc::default());

        for raw in ["", "   ", "\n\t "] {
            let sink = RecordingSink::default();
            let sub = d.submit(raw, &sink).await;
            assert_eq!(sub, Submission::Rejected(PromptError::Empty));
            assert_eq!(sink.state().text, messages::PROMPT_REQUIRED);
        }
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn first_attempt_success_is_typed_out() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(Completion::Text(
            "Mars is red.".into(),
        ))]));
        let delay = Arc::new(RecordingDelay::default());
        let d = dispatcher(transport.clone(), delay.clone());
        let sink = RecordingSink::default();

        let sub = d.submit("  why is mars red ", &sink).await;
        let Submission::Dispatched(outcome) = sub else {
            panic!("expected dispatch");
        };
        assert_eq!(outcome.attempts(), 1);
        assert_eq!(outcome.text(), Some("Mars is red."));
        assert_eq!(transport.calls(), 1);

        let state = sink.state();
        assert_eq!(state.text, "Mars is red.");
        assert!(!state.is_loading);
        assert!(!state.is_typing);

        // Only typewriter ticks, no backoff.
        let waits = delay.waits.lock().unwrap();
        assert_eq!(waits.len(), "Mars is red.".chars().count());
        assert!(waits.iter().all(|w| *w == Duration::from_millis(30)));
    }

    #[tokio::test]
    async fn retries_with_exact_doubling_then_succeeds() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            http_error(500),
            http_error(503),
            Ok(Completion::Text("third time".into())),
        ]));
        let delay = Arc::new(RecordingDelay::default());
        let d = dispatcher(transport.clone(), delay.clone());
        let sink = RecordingSink::default();

        let prompt = PromptText::parse("hello").unwrap();
        let outcome = d.dispatch(&prompt, &sink).await;

        assert_eq!(
            outcome,
            Outcome::Success {
                reply: Reply::Text("third time".into()),
                attempts: 3,
            }
        );
        assert_eq!(sink.state().text, "third time");

        let waits = delay.waits.lock().unwrap();
        assert_eq!(
            &waits[..2],
            &[Duration::from_millis(1000), Duration::from_millis(2000)]
        );
    }

    #[tokio::test]
    async fn exhausted_budget_shows_error_and_hides_loader() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            http_error(500),
            http_error(500),
            http_error(500),
            Ok(Completion::Text("never reached".into())),
        ]));
        let delay = Arc::new(RecordingDelay::default());
        let d = dispatcher(transport.clone(), delay.clone());
        let sink = RecordingSink::default();

        let outcome = d.dispatch(&PromptText::parse("x").unwrap(), &sink).await;
        assert!(matches!(outcome, Outcome::Failure { attempts: 3, .. }));
        assert_eq!(transport.calls(), 3);

        let state = sink.state();
        assert_eq!(state.text, messages::DISPATCH_FAILED);
        assert!(!state.is_loading);

        // No wait after the final failure.
        assert_eq!(
            *delay.waits.lock().unwrap(),
            vec![Duration::from_millis(1000), Duration::from_millis(2000)]
        );
    }

    #[tokio::test]
    async fn empty_reply_is_terminal() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Ok(Completion::Empty),
            Ok(Completion::Text("should not be fetched".into())),
        ]));
        let delay = Arc::new(RecordingDelay::default());
        let d = dispatcher(transport.clone(), delay.clone());
        let sink = RecordingSink::default();

        let outcome = d.dispatch(&PromptText::parse("x").unwrap(), &sink).await;
        assert_eq!(
            outcome,
            Outcome::Success {
                reply: Reply::Empty,
                attempts: 1,
            }
        );
        assert_eq!(transport.calls(), 1);
        assert_eq!(sink.state().text, messages::NO_RESULT);
        assert!(!sink.state().is_loading);
        assert!(delay.waits.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn full_jitter_waits_stay_within_backoff() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            http_error(500),
            http_error(500),
            http_error(500),
            http_error(500),
        ]));
        let delay = Arc::new(RecordingDelay::default());
        let retry = RetryPolicy {
            max_attempts: 4,
            jitter: Jitter::Full,
            ..RetryPolicy::default()
        };
        let cfg = DispatcherConfig {
            retry,
            ..DispatcherConfig::default()
        };
        let d = Dispatcher::new(cfg, transport.clone(), delay.clone());
        let sink = RecordingSink::default();

        let outcome = d.dispatch(&PromptText::parse("x").unwrap(), &sink).await;
        assert!(matches!(outcome, Outcome::Failure { attempts: 4, .. }));

        let waits = delay.waits.lock().unwrap();
        assert_eq!(waits.len(), 3);
        for (n, w) in waits.iter().enumerate() {
            assert!(*w <= retry.backoff(n as u32), "wait {n} was {w:?}");
        }
    }

    #[tokio::test]
    async fn loading_is_set_before_the_first_call() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(Completion::Empty)]));
        let d = dispatcher(transport, Arc::default());
        let sink = RecordingSink::default();
        sink.apply(DisplayUpdate::SetText("previous answer".into()));

        d.dispatch(&PromptText::parse("x").unwrap(), &sink).await;

        let updates = sink.updates.lock().unwrap();
        assert_eq!(updates[1], DisplayUpdate::SetLoading(true));
        assert_eq!(updates[2], DisplayUpdate::Clear);
    }

    #[tokio::test]
    async fn single_attempt_budget_does_not_wait() {
        let transport = Arc::new(ScriptedTransport::new(vec![http_error(502)]));
        let delay = Arc::new(RecordingDelay::default());
        let cfg = DispatcherConfig {
            retry: RetryPolicy {
                max_attempts: 1,
                ..RetryPolicy::default()
            },
            ..DispatcherConfig::default()
        };
        let d = Dispatcher::new(cfg, transport.clone(), delay.clone());
        let sink = RecordingSink::default();

        let outcome = d.dispatch(&PromptText::parse("x").unwrap(), &sink).await;
        assert!(matches!(outcome, Outcome::Failure { attempts: 1, .. }));
        assert!(delay.waits.lock().unwrap().is_empty());
    }

    // First call parks until released, so a second submission can overtake it.
    struct GatedTransport {
        entered: Notify,
        release: Notify,
        calls: AtomicU32,
    }

    #[async_trait]
    impl CompletionTransport for GatedTransport {
        async fn complete(&self, prompt: &str) -> anyhow::Result<Completion> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                self.entered.notify_one();
                self.release.notified().await;
            }
            Ok(Completion::Text(format!("answer to {prompt}")))
        }
    }

    async fn overlapping_submissions(policy: ResubmitPolicy) -> (Outcome, Outcome, String) {
        let transport = Arc::new(GatedTransport {
            entered: Notify::new(),
            release: Notify::new(),
            calls: AtomicU32::new(0),
        });
        let cfg = DispatcherConfig {
            resubmit: policy,
            char_interval: Duration::ZERO,
            ..DispatcherConfig::default()
        };
        let d = Arc::new(Dispatcher::new(
            cfg,
            transport.clone(),
            Arc::new(RecordingDelay::default()),
        ));
        let sink = Arc::new(RecordingSink::default());

        let first = {
            let d = d.clone();
            let sink = sink.clone();
            tokio::spawn(async move {
                let p = PromptText::parse("first").unwrap();
                d.dispatch(&p, &*sink).await
            })
        };
        transport.entered.notified().await;

        let second = d
            .dispatch(&PromptText::parse("second").unwrap(), &*sink)
            .await;
        transport.release.notify_one();
        let first = first.await.unwrap();

        let text = sink.state().text;
        (first, second, text)
    }

    #[tokio::test]
    async fn newer_submission_supersedes_older() {
        let (first, second, text) = overlapping_submissions(ResubmitPolicy::CancelPrevious).await;
        assert_eq!(first, Outcome::Superseded { attempts: 1 });
        assert_eq!(second.text(), Some("answer to second"));
        assert_eq!(text, "answer to second");
    }

    // Fails the first call, then parks inside the first backoff wait.
    struct GatedBackoff {
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl Delay for GatedBackoff {
        async fn wait(&self, duration: Duration) {
            if duration >= Duration::from_secs(1) {
                self.entered.notify_one();
                self.release.notified().await;
            }
        }
    }

    #[tokio::test]
    async fn superseded_during_backoff_sends_nothing_more() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            http_error(500),
            Ok(Completion::Text("second answer".into())),
            Ok(Completion::Text("never fetched".into())),
        ]));
        let delay = Arc::new(GatedBackoff {
            entered: Notify::new(),
            release: Notify::new(),
        });
        let cfg = DispatcherConfig {
            char_interval: Duration::ZERO,
            ..DispatcherConfig::default()
        };
        let d = Arc::new(Dispatcher::new(cfg, transport.clone(), delay.clone()));
        let sink = Arc::new(RecordingSink::default());

        let first = {
            let d = d.clone();
            let sink = sink.clone();
            tokio::spawn(async move {
                let p = PromptText::parse("first").unwrap();
                d.dispatch(&p, &*sink).await
            })
        };
        delay.entered.notified().await;

        let second = d
            .dispatch(&PromptText::parse("second").unwrap(), &*sink)
            .await;
        delay.release.notify_one();
        let first = first.await.unwrap();

        assert_eq!(first, Outcome::Superseded { attempts: 1 });
        assert_eq!(second.text(), Some("second answer"));
        assert_eq!(transport.calls(), 2);
        assert_eq!(sink.state().text, "second answer");
        assert!(!sink.state().is_loading);
    }

    #[tokio::test]
    async fn run_alongside_lets_the_late_reply_win() {
        let (first, second, text) = overlapping_submissions(ResubmitPolicy::RunAlongside).await;
        assert_eq!(first.text(), Some("answer to first"));
        assert_eq!(second.text(), Some("answer to second"));
        assert_eq!(text, "answer to first");
    }
}
