//! Slot machine implementation.
//!
//! A 3x3 window of symbols is drawn cell by cell from the weighted symbol table. Each active
//! payline picks one row per reel and pays on:
//!
//! - Full match (three equal symbols): `bet_per_line * payout * bet_level`, multiplier `payout`.
//! - Partial match (exactly two equal): `floor(bet_per_line * payout * bet_level * 0.3)`,
//!   multiplier `floor(payout * 0.3)`, counted only when the line win is positive.
//!
//! The spin's multiplier is the largest multiplier among paying lines (0 if none). The total
//! stake is `bet_per_line * lines * bet_level`, deducted by the caller before the spin.
//!
//! The grid is row-major: `grid[row][reel]`.

use super::registry::SlotsConfig;
use super::sampler::WeightedSampler;
use crate::rng::RandomSource;
use dlspins_types::casino::{
    BetError, Payline, PaylineCount, SlotGrid, Symbol, SymbolTable, BIG_WIN_MULTIPLIER,
    PARTIAL_MATCH_DENOMINATOR, PARTIAL_MATCH_NUMERATOR, SLOT_REELS, SLOT_ROWS,
};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Full,
    Partial,
}

/// A paying line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineWin {
    pub payline: Payline,
    pub symbol: Symbol,
    pub kind: MatchKind,
    pub win: u64,
    pub multiplier: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinEvaluation {
    pub total_win: u64,
    pub multiplier: u64,
    pub line_wins: Vec<LineWin>,
}

impl SpinEvaluation {
    /// Paylines that contributed, for highlighting.
    pub fn winning_lines(&self) -> Vec<Payline> {
        self.line_wins.iter().map(|line| line.payline).collect()
    }

    pub fn is_big_win(&self) -> bool {
        self.multiplier as f64 >= BIG_WIN_MULTIPLIER
    }
}

fn partial(value: u64) -> u64 {
    let scaled = value as u128 * PARTIAL_MATCH_NUMERATOR as u128 / PARTIAL_MATCH_DENOMINATOR as u128;
    u64::try_from(scaled).unwrap_or(u64::MAX)
}

/// Scores paylines against a symbol table.
#[derive(Clone, Copy, Debug)]
pub struct PaylineEvaluator<'a> {
    symbols: &'a SymbolTable,
}

impl<'a> PaylineEvaluator<'a> {
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Self { symbols }
    }

    pub fn evaluate_line(
        &self,
        grid: &SlotGrid,
        payline: Payline,
        bet_per_line: u64,
        bet_level: u64,
    ) -> Option<LineWin> {
        let [a, b, c] = payline.symbols(grid);
        let (symbol, kind) = if a == b && b == c {
            (a, MatchKind::Full)
        } else if a == b || a == c {
            (a, MatchKind::Partial)
        } else if b == c {
            (b, MatchKind::Partial)
        } else {
            return None;
        };

        let payout = self.symbols.payout(symbol);
        let full = bet_per_line.saturating_mul(payout).saturating_mul(bet_level);
        let (win, multiplier) = match kind {
            MatchKind::Full => (full, payout),
            MatchKind::Partial => (partial(full), partial(payout)),
        };
        if win == 0 {
            return None;
        }
        Some(LineWin {
            payline,
            symbol,
            kind,
            win,
            multiplier,
        })
    }

    pub fn evaluate(
        &self,
        grid: &SlotGrid,
        paylines: &[Payline],
        bet_per_line: u64,
        bet_level: u64,
    ) -> SpinEvaluation {
        let mut evaluation = SpinEvaluation::default();
        for payline in paylines {
            if let Some(line) = self.evaluate_line(grid, *payline, bet_per_line, bet_level) {
                evaluation.total_win = evaluation.total_win.saturating_add(line.win);
                evaluation.multiplier = evaluation.multiplier.max(line.multiplier);
                evaluation.line_wins.push(line);
            }
        }
        evaluation
    }
}

/// Slot wager: per-line stake, active payline count and bet level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotBet {
    pub bet_per_line: u64,
    pub lines: PaylineCount,
    pub bet_level: u64,
}

impl SlotBet {
    pub fn new(bet_per_line: u64, lines: PaylineCount, bet_level: u64) -> Self {
        Self {
            bet_per_line,
            lines,
            bet_level,
        }
    }

    /// Amount deducted at spin start.
    pub fn total(&self) -> u64 {
        self.bet_per_line
            .saturating_mul(self.lines.lines() as u64)
            .saturating_mul(self.bet_level)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinResult {
    pub bet: SlotBet,
    pub grid: SlotGrid,
    pub evaluation: SpinEvaluation,
}

impl SpinResult {
    pub fn total_win(&self) -> u64 {
        self.evaluation.total_win
    }

    pub fn is_big_win(&self) -> bool {
        self.evaluation.is_big_win()
    }
}

/// Reels plus paytable for one configuration.
#[derive(Clone, Debug)]
pub struct SlotMachine {
    config: SlotsConfig,
    sampler: WeightedSampler<Symbol>,
}

impl Default for SlotMachine {
    fn default() -> Self {
        Self::new(SlotsConfig::default())
    }
}

impl SlotMachine {
    pub fn new(config: SlotsConfig) -> Self {
        let sampler = WeightedSampler::from(&config.symbols);
        Self { config, sampler }
    }

    pub fn config(&self) -> &SlotsConfig {
        &self.config
    }

    pub fn paylines(&self, count: PaylineCount) -> &[Payline] {
        self.config.paylines.lines(count)
    }

    /// Largest per-line bet the balance covers at `lines` lines, capped at the table limit.
    pub fn max_bet_per_line(&self, balance: u64, lines: PaylineCount) -> u64 {
        (balance / lines.lines() as u64).min(self.config.max_bet_per_line)
    }

    pub fn validate_bet(&self, bet: &SlotBet, balance: u64) -> Result<(), BetError> {
        let config = &self.config;
        if bet.bet_per_line < config.min_bet_per_line {
            return Err(BetError::BelowMinimum {
                amount: bet.bet_per_line,
                min: config.min_bet_per_line,
            });
        }
        if bet.bet_per_line > config.max_bet_per_line {
            return Err(BetError::AboveMaximum {
                amount: bet.bet_per_line,
                max: config.max_bet_per_line,
            });
        }
        if !(config.min_bet_level..=config.max_bet_level).contains(&bet.bet_level) {
            return Err(BetError::InvalidBetLevel {
                level: bet.bet_level,
                min: config.min_bet_level,
                max: config.max_bet_level,
            });
        }
        let total = bet.total();
        if total > balance {
            return Err(BetError::InsufficientBalance {
                amount: total,
                balance,
            });
        }
        Ok(())
    }

    /// Draw every cell independently, row by row.
    pub fn fill_grid<R: RandomSource + ?Sized>(&self, rng: &mut R) -> SlotGrid {
        let mut grid = [[Symbol::Cherry; SLOT_REELS]; SLOT_ROWS];
        for row in grid.iter_mut() {
            for cell in row.iter_mut() {
                *cell = *self.sampler.sample(rng);
            }
        }
        grid
    }

    pub fn evaluate(&self, grid: &SlotGrid, bet: &SlotBet) -> SpinEvaluation {
        PaylineEvaluator::new(&self.config.symbols).evaluate(
            grid,
            self.paylines(bet.lines),
            bet.bet_per_line,
            bet.bet_level,
        )
    }

    /// Spin and score. The caller has already validated and deducted `bet.total()`.
    pub fn spin<R: RandomSource + ?Sized>(&self, bet: SlotBet, rng: &mut R) -> SpinResult {
        let grid = self.fill_grid(rng);
        let evaluation = self.evaluate(&grid, &bet);
        SpinResult {
            bet,
            grid,
            evaluation,
        }
    }
}
