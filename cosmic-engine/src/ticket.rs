use crate::traits::DisplaySink;
use cosmic_core::display::DisplayUpdate;
use cosmic_core::types::ResubmitPolicy;
use std::sync::{Arc, Mutex, MutexGuard};

/// Hands out increasing tickets; the newest ticket owns the display.
///
/// Issuing and emitting share one lock, so once a newer ticket exists no
/// update from an older one can reach the sink.
#[derive(Debug, Clone, Default)]
pub struct TicketCounter {
    latest: Arc<Mutex<u64>>,
}

impl TicketCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, policy: ResubmitPolicy) -> Ticket {
        let mut latest = lock(&self.latest);
        *latest += 1;
        Ticket {
            latest: self.latest.clone(),
            id: *latest,
            policy,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Ticket {
    latest: Arc<Mutex<u64>>,
    id: u64,
    policy: ResubmitPolicy,
}

impl Ticket {
    pub fn is_current(&self) -> bool {
        self.owns(*lock(&self.latest))
    }

    /// Forward `update` if this ticket still owns the display.
    pub fn emit(&self, sink: &dyn DisplaySink, update: DisplayUpdate) -> bool {
        let latest = lock(&self.latest);
        if !self.owns(*latest) {
            return false;
        }
        sink.apply(update);
        true
    }

    fn owns(&self, latest: u64) -> bool {
        match self.policy {
            ResubmitPolicy::RunAlongside => true,
            ResubmitPolicy::CancelPrevious => latest == self.id,
        }
    }
}

fn lock(latest: &Mutex<u64>) -> MutexGuard<'_, u64> {
    match latest.lock() {
        Ok(g) => g,
        Err(poisoned) => poisoned.into_inner(),
    }
}
