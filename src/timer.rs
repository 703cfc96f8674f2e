//! Widget timers with explicit lifecycles
//!
//! Hosts feed elapsed milliseconds in; widgets decide what each firing means.
//! Timers are acquired with `start`/`arm` and released with `stop`/`cancel`,
//! so teardown never depends on a host framework's unmount hook.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_CATCH_UP;

/// Repeating timer (the `setInterval` of a widget)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interval {
    period_ms: f64,
    accumulator: f64,
    running: bool,
}

impl Interval {
    /// Create a stopped interval
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms: period_ms.max(1.0),
            accumulator: 0.0,
            running: false,
        }
    }

    /// Create an interval that is already running
    pub fn started(period_ms: f64) -> Self {
        let mut interval = Self::new(period_ms);
        interval.start();
        interval
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stop and discard any partially elapsed period
    pub fn stop(&mut self) {
        self.running = false;
        self.accumulator = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn period_ms(&self) -> f64 {
        self.period_ms
    }

    /// Advance by `dt_ms`, returning how many periods elapsed
    ///
    /// At most `MAX_CATCH_UP` firings are reported per call; any backlog
    /// beyond that is dropped (a backgrounded tab should not replay minutes
    /// of ticks at once).
    pub fn advance(&mut self, dt_ms: f64) -> u32 {
        if !self.running || dt_ms <= 0.0 {
            return 0;
        }
        self.accumulator += dt_ms;
        let mut fired = 0;
        while self.accumulator >= self.period_ms && fired < MAX_CATCH_UP {
            self.accumulator -= self.period_ms;
            fired += 1;
        }
        if self.accumulator >= self.period_ms {
            self.accumulator = 0.0;
        }
        fired
    }
}

/// One-shot timer (the `setTimeout` of a widget)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timeout {
    remaining_ms: Option<f64>,
}

impl Timeout {
    /// Arm (or re-arm) the timeout
    pub fn arm(&mut self, delay_ms: f64) {
        self.remaining_ms = Some(delay_ms.max(0.0));
    }

    pub fn armed(delay_ms: f64) -> Self {
        let mut timeout = Self::default();
        timeout.arm(delay_ms);
        timeout
    }

    pub fn cancel(&mut self) {
        self.remaining_ms = None;
    }

    pub fn is_pending(&self) -> bool {
        self.remaining_ms.is_some()
    }

    /// Advance by `dt_ms`; returns true exactly once, when the delay runs out
    pub fn advance(&mut self, dt_ms: f64) -> bool {
        let Some(remaining) = self.remaining_ms.as_mut() else {
            return false;
        };
        *remaining -= dt_ms;
        if *remaining <= 0.0 {
            self.remaining_ms = None;
            true
        } else {
            false
        }
    }
}
