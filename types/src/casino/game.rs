use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error as ThisError;

use super::{BIG_WIN_MULTIPLIER, DICE_MAX_SUM, DICE_MIN_SUM, DIE_FACES};

/// Reasons a round is refused before any state changes.
#[derive(Debug, ThisError, Clone, PartialEq, Eq)]
pub enum BetError {
    #[error("bet amount {amount} below minimum {min}")]
    BelowMinimum { amount: u64, min: u64 },
    #[error("bet amount {amount} above maximum {max}")]
    AboveMaximum { amount: u64, max: u64 },
    #[error("bet amount {amount} exceeds balance {balance}")]
    InsufficientBalance { amount: u64, balance: u64 },
    #[error("hazard count {hazards} out of range ({min}..={max})")]
    InvalidHazardCount { hazards: usize, min: usize, max: usize },
    #[error("dice target {target} out of range ({min}..={max})")]
    InvalidDiceTarget { target: u8, min: u8, max: u8 },
    #[error("bet level {level} out of range ({min}..={max})")]
    InvalidBetLevel { level: u64, min: u64, max: u64 },
    #[error("another round is already in progress")]
    RoundInProgress,
}

/// Games offered by the casino.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Dice,
    Slots,
    Grid,
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameKind::Dice => write!(f, "dice"),
            GameKind::Slots => write!(f, "slots"),
            GameKind::Grid => write!(f, "grid"),
        }
    }
}

/// Dice bet against the sum of two dice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target", rename_all = "lowercase")]
pub enum DiceCondition {
    /// Sum strictly below the target.
    Under(u8),
    /// Sum strictly above the target.
    Over(u8),
    /// Sum equal to the target.
    Exact(u8),
}

impl DiceCondition {
    pub fn target(self) -> u8 {
        match self {
            DiceCondition::Under(t) | DiceCondition::Over(t) | DiceCondition::Exact(t) => t,
        }
    }

    pub fn is_exact(self) -> bool {
        matches!(self, DiceCondition::Exact(_))
    }

    /// Reject targets outside the reachable sums.
    pub fn validate(self) -> Result<(), BetError> {
        let target = self.target();
        if !(DICE_MIN_SUM..=DICE_MAX_SUM).contains(&target) {
            return Err(BetError::InvalidDiceTarget {
                target,
                min: DICE_MIN_SUM,
                max: DICE_MAX_SUM,
            });
        }
        Ok(())
    }

    /// Whether `sum` satisfies the condition.
    pub fn is_satisfied_by(self, sum: u8) -> bool {
        match self {
            DiceCondition::Under(t) => sum < t,
            DiceCondition::Over(t) => sum > t,
            DiceCondition::Exact(t) => sum == t,
        }
    }
}

impl fmt::Display for DiceCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiceCondition::Under(t) => write!(f, "under {t}"),
            DiceCondition::Over(t) => write!(f, "over {t}"),
            DiceCondition::Exact(t) => write!(f, "exactly {t}"),
        }
    }
}

/// Faces shown by the two dice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll(pub u8, pub u8);

impl DiceRoll {
    /// Returns `None` unless both faces are in `1..=6`.
    pub fn new(first: u8, second: u8) -> Option<Self> {
        let valid = |face: u8| (1..=DIE_FACES).contains(&face);
        (valid(first) && valid(second)).then_some(Self(first, second))
    }

    pub fn sum(self) -> u8 {
        self.0 + self.1
    }
}

/// Settled result of one round, as stored in the session ledger.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub game: GameKind,
    /// Total stake deducted at round start.
    pub bet: u64,
    /// Total credited at round end (0 on a loss).
    pub win_amount: u64,
    pub multiplier: f64,
    pub timestamp_ms: u64,
}

impl RoundOutcome {
    pub fn new(game: GameKind, bet: u64, win_amount: u64, multiplier: f64, timestamp_ms: u64) -> Self {
        Self {
            game,
            bet,
            win_amount,
            multiplier: multiplier.max(0.0),
            timestamp_ms,
        }
    }

    pub fn is_win(&self) -> bool {
        self.win_amount > 0
    }

    pub fn is_big_win(&self) -> bool {
        self.multiplier >= BIG_WIN_MULTIPLIER
    }

    /// Wallet change over the whole round.
    pub fn net(&self) -> i64 {
        self.win_amount as i64 - self.bet as i64
    }
}
