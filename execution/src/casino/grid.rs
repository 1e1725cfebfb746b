//! Grid hazard game.
//!
//! `N` cells hide `H` hazards (`1 <= H <= N - 1`, placed at round start by a partial
//! Fisher-Yates shuffle). Each safe reveal raises the cash-out multiplier:
//!
//! ```text
//! multiplier(k) = 1 + (k / S) * 1.5      S = N - H safe cells, k safe reveals so far
//! ```
//!
//! Cash-out requires `k >= 1` and credits `floor(bet * multiplier(k))`, computed exactly as
//! `bet * (2S + 3k) / 2S`. Revealing the last safe cell wins at `multiplier(S)`; revealing a
//! hazard loses the stake. Reveal and cash-out outside `InProgress` are ignored.
//!
//! State machine: `NotStarted -> InProgress -> {Lost, Won}`.

use crate::rng::RandomSource;
use dlspins_types::casino::{
    BetError, GRID_CELL_FACTOR, GRID_PROGRESS_DENOMINATOR, GRID_PROGRESS_NUMERATOR,
};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundState {
    NotStarted,
    InProgress,
    Lost,
    Won,
}

impl RoundState {
    pub fn is_finished(self) -> bool {
        matches!(self, RoundState::Lost | RoundState::Won)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridCell {
    pub index: usize,
    pub is_hazard: bool,
    pub revealed: bool,
}

/// What a caller may see of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellView {
    Hidden,
    Safe,
    Hazard,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum RevealResult {
    /// Safe cell; the round continues.
    Safe {
        index: usize,
        safe_revealed: usize,
        multiplier: f64,
        /// Amount a cash-out would credit now.
        cash_out_value: u64,
    },
    /// Last safe cell; the round is won.
    Cleared {
        index: usize,
        payout: u64,
        multiplier: f64,
    },
    /// Hazard; the round is lost.
    Hazard { index: usize },
    /// Round not in progress, index out of range, or cell already revealed.
    Ignored,
}

#[derive(Clone, Debug)]
pub struct GridRound {
    size: usize,
    hazard_count: usize,
    bet: u64,
    cells: Vec<GridCell>,
    safe_revealed: usize,
    state: RoundState,
    payout: u64,
}

impl GridRound {
    pub fn new(size: usize, hazard_count: usize) -> Result<Self, BetError> {
        let max = size.saturating_sub(1);
        if hazard_count < 1 || hazard_count > max {
            return Err(BetError::InvalidHazardCount {
                hazards: hazard_count,
                min: 1,
                max,
            });
        }
        let cells = (0..size)
            .map(|index| GridCell {
                index,
                is_hazard: false,
                revealed: false,
            })
            .collect();
        Ok(Self {
            size,
            hazard_count,
            bet: 0,
            cells,
            safe_revealed: 0,
            state: RoundState::NotStarted,
            payout: 0,
        })
    }

    /// Place hazards uniformly at random and open the round.
    pub fn start<R: RandomSource + ?Sized>(&mut self, bet: u64, rng: &mut R) -> Result<(), BetError> {
        // A refused start must not consume draws.
        if self.state != RoundState::NotStarted {
            return Err(BetError::RoundInProgress);
        }
        let mut indices: Vec<usize> = (0..self.size).collect();
        for i in 0..self.hazard_count {
            let j = i + rng.below(self.size - i);
            indices.swap(i, j);
        }
        self.start_with_hazards(bet, &indices[..self.hazard_count])
    }

    /// Open the round with a known hazard layout (replays and tests).
    pub fn start_with_hazards(&mut self, bet: u64, positions: &[usize]) -> Result<(), BetError> {
        if self.state != RoundState::NotStarted {
            return Err(BetError::RoundInProgress);
        }
        let mut layout = vec![false; self.size];
        for &position in positions {
            if let Some(slot) = layout.get_mut(position) {
                *slot = true;
            }
        }
        let placed = layout.iter().filter(|hazard| **hazard).count();
        if placed != self.hazard_count || positions.len() != self.hazard_count {
            return Err(BetError::InvalidHazardCount {
                hazards: placed,
                min: self.hazard_count,
                max: self.hazard_count,
            });
        }
        for (cell, is_hazard) in self.cells.iter_mut().zip(layout) {
            cell.is_hazard = is_hazard;
        }
        self.bet = bet;
        self.state = RoundState::InProgress;
        Ok(())
    }

    pub fn reveal(&mut self, index: usize) -> RevealResult {
        if self.state != RoundState::InProgress {
            return RevealResult::Ignored;
        }
        let Some(cell) = self.cells.get_mut(index) else {
            return RevealResult::Ignored;
        };
        if cell.revealed {
            return RevealResult::Ignored;
        }
        cell.revealed = true;

        if cell.is_hazard {
            self.state = RoundState::Lost;
            return RevealResult::Hazard { index };
        }

        self.safe_revealed += 1;
        let multiplier = self.multiplier(self.safe_revealed);
        if self.safe_revealed == self.safe_cells() {
            self.state = RoundState::Won;
            self.payout = self.payout_for(self.safe_revealed);
            return RevealResult::Cleared {
                index,
                payout: self.payout,
                multiplier,
            };
        }
        RevealResult::Safe {
            index,
            safe_revealed: self.safe_revealed,
            multiplier,
            cash_out_value: self.payout_for(self.safe_revealed),
        }
    }

    /// End the round as a win. `None` unless in progress with at least one safe reveal.
    pub fn cash_out(&mut self) -> Option<u64> {
        if self.state != RoundState::InProgress || self.safe_revealed == 0 {
            return None;
        }
        self.state = RoundState::Won;
        self.payout = self.payout_for(self.safe_revealed);
        Some(self.payout)
    }

    /// `1 + (k / S) * 1.5`.
    pub fn multiplier(&self, safe_revealed: usize) -> f64 {
        let progress = GRID_PROGRESS_NUMERATOR as f64 / GRID_PROGRESS_DENOMINATOR as f64;
        1.0 + (safe_revealed as f64 / self.safe_cells() as f64) * progress
    }

    /// `floor(bet * multiplier(k))` in integer arithmetic.
    pub fn payout_for(&self, safe_revealed: usize) -> u64 {
        let base = GRID_PROGRESS_DENOMINATOR as u128 * self.safe_cells() as u128;
        let numerator = base + GRID_PROGRESS_NUMERATOR as u128 * safe_revealed as u128;
        let payout = self.bet as u128 * numerator / base;
        u64::try_from(payout).unwrap_or(u64::MAX)
    }

    /// Fixed per-cell figure `1 + (H / S) * 0.3`, shown as risk guidance only.
    pub fn static_cell_multiplier(&self) -> f64 {
        1.0 + (self.hazard_count as f64 / self.safe_cells() as f64) * GRID_CELL_FACTOR
    }

    pub fn current_multiplier(&self) -> f64 {
        self.multiplier(self.safe_revealed)
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn bet(&self) -> u64 {
        self.bet
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn hazard_count(&self) -> usize {
        self.hazard_count
    }

    pub fn safe_cells(&self) -> usize {
        self.size - self.hazard_count
    }

    pub fn safe_revealed(&self) -> usize {
        self.safe_revealed
    }

    /// Amount credited when the round was won (0 otherwise).
    pub fn payout(&self) -> u64 {
        self.payout
    }

    /// Hazard positions, disclosed only once the round is over.
    pub fn hazards(&self) -> Option<Vec<usize>> {
        if !self.is_finished() {
            return None;
        }
        Some(
            self.cells
                .iter()
                .filter(|cell| cell.is_hazard)
                .map(|cell| cell.index)
                .collect(),
        )
    }

    pub fn cell_view(&self, index: usize) -> Option<CellView> {
        let cell = self.cells.get(index)?;
        let view = match (cell.revealed || self.is_finished(), cell.is_hazard) {
            (true, true) => CellView::Hazard,
            _ if cell.revealed => CellView::Safe,
            _ => CellView::Hidden,
        };
        Some(view)
    }

    pub fn cell_views(&self) -> Vec<CellView> {
        (0..self.size).filter_map(|index| self.cell_view(index)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::GameRng;

    fn started(bet: u64, hazards: &[usize]) -> GridRound {
        let mut round = GridRound::new(25, hazards.len()).unwrap();
        round.start_with_hazards(bet, hazards).unwrap();
        round
    }

    #[test]
    fn test_multiplier_progression() {
        let round = started(100, &[0, 1, 2]);
        assert_eq!(round.safe_cells(), 22);
        assert!((round.multiplier(5) - 1.340_909).abs() < 1e-6);
        assert_eq!(round.payout_for(5), 134);
        assert_eq!(round.multiplier(22), 2.5);
        assert_eq!(round.payout_for(22), 250);
        assert!((round.static_cell_multiplier() - (1.0 + 3.0 / 22.0 * 0.3)).abs() < 1e-12);
    }

    #[test]
    fn test_payout_is_exact_floor() {
        // 44 * 59 / 44 = 59 exactly; float multiplication can land just below.
        let round = started(44, &[0, 1, 2]);
        assert_eq!(round.payout_for(5), 59);
        let round = started(7, &[0, 1, 2]);
        // 7 * 1.340909 = 9.386
        assert_eq!(round.payout_for(5), 9);
    }

    #[test]
    fn test_rejects_hazard_counts() {
        assert_eq!(
            GridRound::new(25, 0).unwrap_err(),
            BetError::InvalidHazardCount {
                hazards: 0,
                min: 1,
                max: 24
            }
        );
        assert!(GridRound::new(25, 25).is_err());
        assert!(GridRound::new(25, 24).is_ok());
    }

    #[test]
    fn test_rejects_bad_layout() {
        let mut round = GridRound::new(25, 3).unwrap();
        assert!(round.start_with_hazards(10, &[1, 1, 2]).is_err());
        assert!(round.start_with_hazards(10, &[1, 2, 25]).is_err());
        assert!(round.start_with_hazards(10, &[1, 2]).is_err());
        assert_eq!(round.state(), RoundState::NotStarted);
        round.start_with_hazards(10, &[1, 2, 3]).unwrap();
        assert_eq!(
            round.start_with_hazards(10, &[1, 2, 3]),
            Err(BetError::RoundInProgress)
        );
    }

    #[test]
    fn test_restart_consumes_no_draws() {
        let mut round = started(10, &[0, 1, 2]);
        let mut rng = crate::mocks::ScriptedRng::new(vec![0.5]);
        assert_eq!(round.start(10, &mut rng), Err(BetError::RoundInProgress));
        assert_eq!(rng.draws(), 0);
        assert_eq!(round.state(), RoundState::InProgress);
    }

    #[test]
    fn test_reveal_then_cash_out() {
        let mut round = started(100, &[0, 1, 2]);
        assert_eq!(round.state(), RoundState::InProgress);
        assert_eq!(round.cash_out(), None, "cash-out needs one safe reveal");

        for (n, index) in (3..8).enumerate() {
            match round.reveal(index) {
                RevealResult::Safe { safe_revealed, .. } => assert_eq!(safe_revealed, n + 1),
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!(round.cash_out(), Some(134));
        assert_eq!(round.state(), RoundState::Won);
        assert_eq!(round.payout(), 134);
        assert_eq!(round.cash_out(), None);
    }

    #[test]
    fn test_hazard_ends_round() {
        let mut round = started(100, &[0, 1, 2]);
        assert!(matches!(round.reveal(10), RevealResult::Safe { .. }));
        assert_eq!(round.reveal(1), RevealResult::Hazard { index: 1 });
        assert_eq!(round.state(), RoundState::Lost);
        assert_eq!(round.payout(), 0);
        assert_eq!(round.reveal(11), RevealResult::Ignored);
        assert_eq!(round.cash_out(), None);
        assert_eq!(round.safe_revealed(), 1);
    }

    #[test]
    fn test_clearing_board_wins() {
        let mut round = started(10, &[0, 1, 2]);
        let mut last = RevealResult::Ignored;
        for index in 3..25 {
            last = round.reveal(index);
        }
        assert_eq!(
            last,
            RevealResult::Cleared {
                index: 24,
                payout: 25,
                multiplier: 2.5
            }
        );
        assert_eq!(round.state(), RoundState::Won);
    }

    #[test]
    fn test_reveal_is_idempotent() {
        let mut round = started(100, &[0, 1, 2]);
        assert!(matches!(round.reveal(5), RevealResult::Safe { .. }));
        assert_eq!(round.reveal(5), RevealResult::Ignored);
        assert_eq!(round.reveal(99), RevealResult::Ignored);
        assert_eq!(round.safe_revealed(), 1);

        let mut fresh = GridRound::new(25, 3).unwrap();
        assert_eq!(fresh.reveal(0), RevealResult::Ignored);
        assert_eq!(fresh.cash_out(), None);
    }

    #[test]
    fn test_hazards_disclosed_after_round() {
        let mut round = started(100, &[4, 9, 16]);
        assert_eq!(round.hazards(), None);
        round.reveal(0);
        assert_eq!(round.cell_view(0), Some(CellView::Safe));
        assert_eq!(round.cell_view(4), Some(CellView::Hidden));
        assert_eq!(round.cell_view(25), None);

        round.cash_out();
        assert_eq!(round.hazards(), Some(vec![4, 9, 16]));
        assert_eq!(round.cell_view(9), Some(CellView::Hazard));
        assert_eq!(round.cell_view(1), Some(CellView::Hidden));
        let views = round.cell_views();
        assert_eq!(views.iter().filter(|v| **v == CellView::Hazard).count(), 3);
    }

    #[test]
    fn test_random_layout_is_distinct_and_uniform() {
        let mut rng = GameRng::from_seed(99);
        let rounds = 20_000;
        let mut hits = [0u32; 25];
        for _ in 0..rounds {
            let mut round = GridRound::new(25, 3).unwrap();
            round.start(1, &mut rng).unwrap();
            let hazards: Vec<usize> = round
                .cells
                .iter()
                .filter(|cell| cell.is_hazard)
                .map(|cell| cell.index)
                .collect();
            assert_eq!(hazards.len(), 3);
            for index in hazards {
                hits[index] += 1;
            }
        }
        for count in hits {
            let frequency = count as f64 / rounds as f64;
            assert!((frequency - 0.12).abs() < 0.01, "hazard frequency {frequency}");
        }
    }
}
