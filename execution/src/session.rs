//! Player session: wallet, ledger and the round currently in flight.
//!
//! Every round follows the same protocol:
//!
//! 1. Validate the bet against the table limits and the current balance. A rejected bet
//!    changes nothing.
//! 2. Debit the full stake.
//! 3. Resolve the round through the game engine.
//! 4. Credit the win (if any) and append exactly one [`RoundOutcome`] to the ledger.
//!
//! Dice and slot rounds resolve in a single call. A grid round spans several calls
//! ([`Session::start_grid`], [`Session::reveal`], [`Session::cash_out`]); while it is in
//! progress no other round may start.

use crate::autospin::{AutoSpin, AutoSpinAction, CancelToken, StopReason};
use crate::casino::{
    dice::{DiceOutcome, OddsEngine},
    grid::{GridRound, RevealResult, RoundState},
    registry::GameConfig,
    slots::{SlotBet, SlotMachine, SpinResult},
    validate_stake, GameError,
};
use crate::ledger::{LedgerStats, SessionLedger};
use crate::rng::RandomSource;
use crate::wallet::Wallet;
use dlspins_types::casino::{BetError, DiceCondition, GameKind, RoundOutcome};

/// Settled dice round.
#[derive(Clone, Debug, PartialEq)]
pub struct DiceRound {
    pub outcome: DiceOutcome,
    pub record: RoundOutcome,
    /// Balance after settlement.
    pub balance: u64,
}

/// Settled slot spin.
#[derive(Clone, Debug, PartialEq)]
pub struct SpinRound {
    pub result: SpinResult,
    pub record: RoundOutcome,
    pub balance: u64,
}

fn rejected(game: GameKind, err: impl Into<GameError>) -> GameError {
    let err = err.into();
    tracing::warn!(%game, ?err, "round rejected");
    err
}

pub struct Session<W: Wallet> {
    wallet: W,
    ledger: SessionLedger,
    config: GameConfig,
    odds: OddsEngine,
    slots: SlotMachine,
    grid: Option<GridRound>,
    auto_spin: AutoSpin,
    rounds_settled: u64,
}

impl<W: Wallet> Session<W> {
    /// `config` is assumed valid; call [`GameConfig::validate`] when it comes from outside.
    pub fn new(wallet: W, config: GameConfig) -> Self {
        Self {
            wallet,
            ledger: SessionLedger::new(config.ledger_capacity),
            odds: OddsEngine::from_config(&config.dice),
            slots: SlotMachine::new(config.slots.clone()),
            grid: None,
            auto_spin: AutoSpin::default(),
            rounds_settled: 0,
            config,
        }
    }

    pub fn balance(&self) -> u64 {
        self.wallet.balance()
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    pub fn wallet_mut(&mut self) -> &mut W {
        &mut self.wallet
    }

    pub fn ledger(&self) -> &SessionLedger {
        &self.ledger
    }

    pub fn stats(&self) -> LedgerStats {
        self.ledger.stats()
    }

    /// Rounds settled over the session's lifetime, including those evicted from the ledger.
    pub fn rounds_settled(&self) -> u64 {
        self.rounds_settled
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn odds(&self) -> &OddsEngine {
        &self.odds
    }

    pub fn slot_machine(&self) -> &SlotMachine {
        &self.slots
    }

    /// Current or most recently finished grid round.
    pub fn grid(&self) -> Option<&GridRound> {
        self.grid.as_ref()
    }

    pub fn round_in_progress(&self) -> bool {
        self.grid
            .as_ref()
            .is_some_and(|round| round.state() == RoundState::InProgress)
    }

    fn ensure_idle(&self) -> Result<(), BetError> {
        if self.round_in_progress() {
            return Err(BetError::RoundInProgress);
        }
        Ok(())
    }

    fn settle(&mut self, record: RoundOutcome) -> Result<u64, GameError> {
        if record.win_amount > 0 {
            self.wallet.credit(record.win_amount)?;
        }
        self.ledger.append(record);
        self.rounds_settled += 1;
        tracing::debug!(
            game = %record.game,
            bet = record.bet,
            win = record.win_amount,
            multiplier = record.multiplier,
            balance = self.wallet.balance(),
            "round settled"
        );
        Ok(self.wallet.balance())
    }

    pub fn play_dice<R: RandomSource + ?Sized>(
        &mut self,
        bet: u64,
        condition: DiceCondition,
        rng: &mut R,
        now_ms: u64,
    ) -> Result<DiceRound, GameError> {
        let limits = &self.config.dice;
        self.ensure_idle()
            .and_then(|_| condition.validate())
            .and_then(|_| validate_stake(bet, limits.min_bet, limits.max_bet, self.wallet.balance()))
            .map_err(|err| rejected(GameKind::Dice, err))?;
        self.wallet
            .debit(bet)
            .map_err(|err| rejected(GameKind::Dice, err))?;

        let outcome = self.odds.play(bet, condition, rng);
        let multiplier = if outcome.won { outcome.multiplier } else { 0.0 };
        let record = RoundOutcome::new(GameKind::Dice, bet, outcome.payout, multiplier, now_ms);
        let balance = self.settle(record)?;
        Ok(DiceRound {
            outcome,
            record,
            balance,
        })
    }

    pub fn spin<R: RandomSource + ?Sized>(
        &mut self,
        bet: SlotBet,
        rng: &mut R,
        now_ms: u64,
    ) -> Result<SpinRound, GameError> {
        self.ensure_idle()
            .and_then(|_| self.slots.validate_bet(&bet, self.wallet.balance()))
            .map_err(|err| rejected(GameKind::Slots, err))?;
        self.wallet
            .debit(bet.total())
            .map_err(|err| rejected(GameKind::Slots, err))?;

        let result = self.slots.spin(bet, rng);
        let record = RoundOutcome::new(
            GameKind::Slots,
            bet.total(),
            result.total_win(),
            result.evaluation.multiplier as f64,
            now_ms,
        );
        if result.is_big_win() {
            tracing::info!(win = result.total_win(), multiplier = result.evaluation.multiplier, "big win");
        }
        let balance = self.settle(record)?;
        Ok(SpinRound {
            result,
            record,
            balance,
        })
    }

    /// Whether `bet` could be spun right now.
    pub fn can_spin(&self, bet: &SlotBet) -> bool {
        !self.round_in_progress() && self.slots.validate_bet(bet, self.wallet.balance()).is_ok()
    }

    /// Largest affordable per-line bet for `bet.lines`.
    pub fn max_bet_per_line(&self, bet: &SlotBet) -> u64 {
        self.slots.max_bet_per_line(self.wallet.balance(), bet.lines)
    }

    pub fn auto_spin(&self) -> &AutoSpin {
        &self.auto_spin
    }

    pub fn start_auto_spin(&mut self, count: u32, now_ms: u64) -> bool {
        self.auto_spin.start(count, now_ms)
    }

    /// Advance the auto-spin run, spinning `bet` if one is due.
    pub fn poll_auto_spin<R: RandomSource + ?Sized>(
        &mut self,
        bet: SlotBet,
        now_ms: u64,
        cancel: &CancelToken,
        rng: &mut R,
    ) -> Result<(AutoSpinAction, Option<SpinRound>), GameError> {
        let action = if self.round_in_progress() && !cancel.is_cancelled() {
            self.auto_spin.halt(StopReason::RoundInProgress)
        } else {
            let can_afford = self.can_spin(&bet);
            self.auto_spin.poll(now_ms, cancel, can_afford)
        };
        let round = match action {
            AutoSpinAction::Spin { .. } => Some(self.spin(bet, rng, now_ms)?),
            _ => None,
        };
        Ok((action, round))
    }

    /// Validate, debit and open a grid round with `hazards` hazards.
    pub fn start_grid<R: RandomSource + ?Sized>(
        &mut self,
        bet: u64,
        hazards: usize,
        rng: &mut R,
    ) -> Result<&GridRound, GameError> {
        let round = self
            .open_grid(bet, hazards, rng)
            .map_err(|err| rejected(GameKind::Grid, err))?;
        self.wallet
            .debit(bet)
            .map_err(|err| rejected(GameKind::Grid, err))?;
        tracing::debug!(bet, hazards, "grid round started");
        Ok(self.grid.insert(round))
    }

    fn open_grid<R: RandomSource + ?Sized>(
        &self,
        bet: u64,
        hazards: usize,
        rng: &mut R,
    ) -> Result<GridRound, BetError> {
        self.ensure_idle()?;
        let limits = &self.config.grid;
        if !(limits.min_hazards..=limits.max_hazards).contains(&hazards) {
            return Err(BetError::InvalidHazardCount {
                hazards,
                min: limits.min_hazards,
                max: limits.max_hazards,
            });
        }
        validate_stake(bet, limits.min_bet, limits.max_bet, self.wallet.balance())?;
        let mut round = GridRound::new(limits.grid_size, hazards)?;
        round.start(bet, rng)?;
        Ok(round)
    }

    /// Reveal a cell of the active grid round. Ignored when no round is in progress.
    pub fn reveal(&mut self, index: usize, now_ms: u64) -> Result<RevealResult, GameError> {
        let Some(round) = self.grid.as_mut() else {
            return Ok(RevealResult::Ignored);
        };
        let result = round.reveal(index);
        let bet = round.bet();
        match result {
            RevealResult::Hazard { .. } => {
                self.settle(RoundOutcome::new(GameKind::Grid, bet, 0, 0.0, now_ms))?;
            }
            RevealResult::Cleared {
                payout, multiplier, ..
            } => {
                self.settle(RoundOutcome::new(GameKind::Grid, bet, payout, multiplier, now_ms))?;
            }
            RevealResult::Safe { .. } | RevealResult::Ignored => {}
        }
        Ok(result)
    }

    /// Cash out the active grid round. `None` when there is nothing to cash out.
    pub fn cash_out(&mut self, now_ms: u64) -> Result<Option<u64>, GameError> {
        let Some(round) = self.grid.as_mut() else {
            return Ok(None);
        };
        let Some(payout) = round.cash_out() else {
            return Ok(None);
        };
        let record = RoundOutcome::new(
            GameKind::Grid,
            round.bet(),
            payout,
            round.current_multiplier(),
            now_ms,
        );
        self.settle(record)?;
        Ok(Some(payout))
    }
}
