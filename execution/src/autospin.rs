//! Auto-spin scheduler.
//!
//! A bounded run of slot spins driven by an external clock:
//!
//! ```text
//! Idle --start(n)--> Spinning { remaining: n, next_at_ms } --last spin / stop--> Idle
//! ```
//!
//! The scheduler never sleeps or reads the wall clock. The caller polls it with the current
//! time; each poll either asks for a spin, asks the caller to wait, or reports why the run
//! stopped. The cancellation token is checked before every spin, and a run whose next spin
//! cannot be afforded ends early without error.
//!
//! ```rust,ignore
//! let cancel = CancelToken::new();
//! let mut auto = AutoSpin::default();
//! auto.start(10, now_ms);
//! loop {
//!     match auto.poll(now_ms, &cancel, wallet.balance() >= bet.total()) {
//!         AutoSpinAction::Spin { .. } => { /* spin once */ }
//!         AutoSpinAction::Wait { until_ms } => { /* sleep until until_ms */ }
//!         AutoSpinAction::Stopped(_) | AutoSpinAction::Idle => break,
//!     }
//! }
//! ```

use dlspins_types::casino::AUTO_SPIN_DELAY_MS;
use serde::{Deserialize, Serialize};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Shared stop flag for an auto-spin run.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutoSpinState {
    Idle,
    Spinning { remaining: u32, next_at_ms: u64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    Cancelled,
    InsufficientBalance,
    /// Another round (a grid round) is still open.
    RoundInProgress,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutoSpinAction {
    /// No run active.
    Idle,
    /// Next spin is not due yet.
    Wait { until_ms: u64 },
    /// Spin now; `remaining` spins follow this one.
    Spin { remaining: u32 },
    /// Run ended before its count was exhausted.
    Stopped(StopReason),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutoSpin {
    state: AutoSpinState,
    delay_ms: u64,
}

impl Default for AutoSpin {
    fn default() -> Self {
        Self::new(AUTO_SPIN_DELAY_MS)
    }
}

impl AutoSpin {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            state: AutoSpinState::Idle,
            delay_ms,
        }
    }

    pub fn state(&self) -> AutoSpinState {
        self.state
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, AutoSpinState::Spinning { .. })
    }

    pub fn remaining(&self) -> u32 {
        match self.state {
            AutoSpinState::Idle => 0,
            AutoSpinState::Spinning { remaining, .. } => remaining,
        }
    }

    /// Begin a run of `count` spins, the first due at `now_ms`. Returns false if a run is
    /// already active or `count` is 0.
    pub fn start(&mut self, count: u32, now_ms: u64) -> bool {
        if count == 0 || self.is_running() {
            return false;
        }
        self.state = AutoSpinState::Spinning {
            remaining: count,
            next_at_ms: now_ms,
        };
        tracing::info!(count, delay_ms = self.delay_ms, "auto-spin started");
        true
    }

    /// Drop back to `Idle` without reporting a reason.
    pub fn stop(&mut self) {
        self.state = AutoSpinState::Idle;
    }

    /// End an active run for `reason`. Returns `Idle` when no run is active.
    pub fn halt(&mut self, reason: StopReason) -> AutoSpinAction {
        if !self.is_running() {
            return AutoSpinAction::Idle;
        }
        let remaining = self.remaining();
        self.state = AutoSpinState::Idle;
        tracing::warn!(remaining, ?reason, "auto-spin stopped");
        AutoSpinAction::Stopped(reason)
    }

    pub fn poll(&mut self, now_ms: u64, cancel: &CancelToken, can_afford: bool) -> AutoSpinAction {
        let AutoSpinState::Spinning {
            remaining,
            next_at_ms,
        } = self.state
        else {
            return AutoSpinAction::Idle;
        };

        if cancel.is_cancelled() {
            self.state = AutoSpinState::Idle;
            tracing::info!(remaining, "auto-spin cancelled");
            return AutoSpinAction::Stopped(StopReason::Cancelled);
        }
        if now_ms < next_at_ms {
            return AutoSpinAction::Wait {
                until_ms: next_at_ms,
            };
        }
        if !can_afford {
            self.state = AutoSpinState::Idle;
            tracing::warn!(remaining, "auto-spin stopped: insufficient balance");
            return AutoSpinAction::Stopped(StopReason::InsufficientBalance);
        }

        let remaining = remaining - 1;
        if remaining == 0 {
            self.state = AutoSpinState::Idle;
            tracing::info!("auto-spin finished");
        } else {
            self.state = AutoSpinState::Spinning {
                remaining,
                next_at_ms: now_ms.saturating_add(self.delay_ms),
            };
        }
        AutoSpinAction::Spin { remaining }
    }
}
