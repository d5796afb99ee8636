use crate::ticket::Ticket;
use crate::traits::{Delay, DisplaySink};
use cosmic_core::display::DisplayUpdate;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_CHAR_INTERVAL: Duration = Duration::from_millis(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    Completed,
    // A newer ticket took the display mid-render.
    Interrupted,
}

/// Reveals text one character per interval.
#[derive(Clone)]
pub struct Typewriter {
    interval: Duration,
    delay: Arc<dyn Delay>,
}

impl Typewriter {
    pub fn new(interval: Duration, delay: Arc<dyn Delay>) -> Self {
        Self { interval, delay }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub async fn render(&self, text: &str, sink: &dyn DisplaySink, ticket: &Ticket) -> RenderStatus {
        if !ticket.emit(sink, DisplayUpdate::Clear) {
            return RenderStatus::Interrupted;
        }
        ticket.emit(sink, DisplayUpdate::SetTyping(true));

        for ch in text.chars() {
            self.delay.wait(self.interval).await;
            if !ticket.emit(sink, DisplayUpdate::Append(ch)) {
                // The new owner resets the typing flag itself.
                return RenderStatus::Interrupted;
            }
        }

        ticket.emit(sink, DisplayUpdate::SetTyping(false));
        RenderStatus::Completed
    }
}
