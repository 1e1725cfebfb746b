//! Bounded round history and derived session statistics.

use dlspins_types::casino::{GameKind, RoundOutcome, LEDGER_CAPACITY};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Append-only history of settled rounds; the oldest entry is evicted at capacity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "LedgerRecord")]
pub struct SessionLedger {
    capacity: usize,
    outcomes: VecDeque<RoundOutcome>,
}

/// Serialized ledger as read from storage, before the capacity bound is applied.
#[derive(Deserialize)]
struct LedgerRecord {
    capacity: usize,
    #[serde(default)]
    outcomes: VecDeque<RoundOutcome>,
}

impl From<LedgerRecord> for SessionLedger {
    fn from(record: LedgerRecord) -> Self {
        let mut ledger = Self::new(record.capacity);
        for outcome in record.outcomes {
            ledger.append(outcome);
        }
        ledger
    }
}

impl Default for SessionLedger {
    fn default() -> Self {
        Self::new(LEDGER_CAPACITY)
    }
}

impl SessionLedger {
    /// A zero capacity is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            outcomes: VecDeque::with_capacity(capacity),
        }
    }

    pub fn append(&mut self, outcome: RoundOutcome) {
        while self.outcomes.len() >= self.capacity {
            self.outcomes.pop_front();
        }
        self.outcomes.push_back(outcome);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &RoundOutcome> {
        self.outcomes.iter()
    }

    pub fn last(&self) -> Option<&RoundOutcome> {
        self.outcomes.back()
    }

    pub fn stats(&self) -> LedgerStats {
        LedgerStats::from_outcomes(self.outcomes.iter())
    }

    pub fn stats_for(&self, game: GameKind) -> LedgerStats {
        LedgerStats::from_outcomes(self.outcomes.iter().filter(|o| o.game == game))
    }
}

/// Statistics over the retained history, computed on demand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerStats {
    pub total_spins: u64,
    pub total_wagered: u64,
    pub total_won: u64,
    pub net_profit: i64,
    /// Percentage of rounds with a positive win.
    pub win_rate: f64,
    pub big_wins: u64,
    pub best_win: u64,
    /// `total_won / total_wagered`, 0 when nothing was wagered.
    pub rtp: f64,
}

impl LedgerStats {
    pub fn from_outcomes<'a>(outcomes: impl Iterator<Item = &'a RoundOutcome>) -> Self {
        let mut stats = Self::default();
        let mut wins = 0u64;
        for outcome in outcomes {
            stats.total_spins += 1;
            stats.total_wagered = stats.total_wagered.saturating_add(outcome.bet);
            stats.total_won = stats.total_won.saturating_add(outcome.win_amount);
            if outcome.is_win() {
                wins += 1;
            }
            if outcome.is_big_win() {
                stats.big_wins += 1;
            }
            stats.best_win = stats.best_win.max(outcome.win_amount);
        }
        stats.net_profit = (stats.total_won as i128 - stats.total_wagered as i128)
            .clamp(i64::MIN as i128, i64::MAX as i128) as i64;
        if stats.total_spins > 0 {
            stats.win_rate = wins as f64 / stats.total_spins as f64 * 100.0;
        }
        if stats.total_wagered > 0 {
            stats.rtp = stats.total_won as f64 / stats.total_wagered as f64;
        }
        stats
    }
}
