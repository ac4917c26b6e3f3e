//! Search debounce: a keystroke inside the window reschedules evaluation.

use std::time::Duration;

use web_time::Instant;

/// Coalesces rapid search input into one evaluation.
///
/// Every keystroke reschedules the pending query; it is released once the
/// input has been quiet for the full delay.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<(Instant, String)>,
}

impl Debouncer {
    /// Debouncer with a fixed quiet period.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Record input at `now`, replacing anything still pending.
    pub fn input(&mut self, query: &str, now: Instant) {
        self.pending = Some((now + self.delay, query.to_owned()));
    }

    /// The query to evaluate, if the quiet period has passed by `now`.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((deadline, _)) if now >= *deadline => {
                self.pending.take().map(|(_, query)| query)
            }
            _ => None,
        }
    }

    /// Whether a query is waiting.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(300))
    }
}
