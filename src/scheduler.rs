use std::time::{Duration, Instant};

use tracing::debug;

use crate::session::AdvanceTicket;

pub const ADVANCE_DELAY_MS: u64 = 300;

#[derive(Debug, Clone, Copy)]
struct Pending {
    due: Instant,
    ticket: AdvanceTicket,
}

/// Holds a completed phrase on screen for a short delay before the session advances.
///
/// At most one advance is pending at a time. The owner polls it from its event
/// loop and cancels it whenever the session it was armed for goes away.
#[derive(Debug, Clone)]
pub struct CompletionScheduler {
    delay: Duration,
    pending: Option<Pending>,
}

impl Default for CompletionScheduler {
    fn default() -> Self {
        Self::new(Duration::from_millis(ADVANCE_DELAY_MS))
    }
}

impl CompletionScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm the timer, superseding anything still pending
    pub fn arm(&mut self, ticket: AdvanceTicket, now: Instant) {
        if self.pending.is_some() {
            debug!("superseding pending advance");
        }
        self.pending = Some(Pending {
            due: now + self.delay,
            ticket,
        });
    }

    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            debug!("pending advance cancelled");
        }
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns the ticket once, when the delay has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<AdvanceTicket> {
        match self.pending {
            Some(pending) if now >= pending.due => {
                self.pending = None;
                Some(pending.ticket)
            }
            _ => None,
        }
    }

    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.pending
            .map(|pending| pending.due.saturating_duration_since(now))
    }
}
