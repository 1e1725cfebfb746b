use crate::config::{GridStrategy, ValidatedConfig};
use crate::stats::{GameReport, Stats};
use dlspins_execution::{GameError, GameRng, RandomSource, RevealResult, Session, Wallet};
use dlspins_execution::{CellView, MemoryWallet};
use dlspins_types::casino::{GameKind, RoundOutcome};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("{game} round failed: {source}")]
    Game {
        game: GameKind,
        #[source]
        source: GameError,
    },
    #[error("{game} round did not settle")]
    Unsettled { game: GameKind },
    #[error("{game} accounting drift: balance moved {actual}, rounds explain {expected}")]
    AccountingDrift {
        game: GameKind,
        expected: i128,
        actual: i128,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub seed: u64,
    pub rounds: u64,
    pub games: Vec<GameReport>,
}

fn grid_error(source: GameError) -> SimulationError {
    SimulationError::Game {
        game: GameKind::Grid,
        source,
    }
}

/// Play one grid round with `strategy` and return its ledger entry.
pub fn play_grid_round<W: Wallet, R: RandomSource + ?Sized>(
    session: &mut Session<W>,
    strategy: &GridStrategy,
    rng: &mut R,
    now_ms: u64,
) -> Result<RoundOutcome, SimulationError> {
    let settled = session.rounds_settled();
    let size = session
        .start_grid(strategy.bet, strategy.hazards, rng)
        .map_err(grid_error)?
        .size();
    for _ in 0..strategy.reveals {
        let Some(round) = session.grid() else {
            break;
        };
        let hidden: Vec<usize> = (0..size)
            .filter(|&index| round.cell_view(index) == Some(CellView::Hidden))
            .collect();
        let Some(&index) = hidden.get(rng.below(hidden.len())) else {
            break;
        };
        match session.reveal(index, now_ms).map_err(grid_error)? {
            RevealResult::Hazard { .. } | RevealResult::Cleared { .. } => break,
            RevealResult::Safe { .. } | RevealResult::Ignored => {}
        }
    }
    session.cash_out(now_ms).map_err(grid_error)?;

    if session.rounds_settled() != settled + 1 || session.round_in_progress() {
        return Err(SimulationError::Unsettled {
            game: GameKind::Grid,
        });
    }
    session
        .ledger()
        .last()
        .copied()
        .ok_or(SimulationError::Unsettled {
            game: GameKind::Grid,
        })
}

pub struct Simulator {
    config: ValidatedConfig,
    seed: u64,
}

impl Simulator {
    pub fn new(config: ValidatedConfig) -> Self {
        let seed = config
            .seed
            .unwrap_or_else(|| GameRng::from_entropy().seed());
        Self { config, seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn run(&self) -> Result<Report, SimulationError> {
        let mut games = Vec::with_capacity(self.config.games.len());
        for (stream, game) in self.config.games.iter().enumerate() {
            games.push(self.run_game(*game, stream as u64)?);
        }
        Ok(Report {
            seed: self.seed,
            rounds: self.config.rounds,
            games,
        })
    }

    /// Run one game on its own session and random stream.
    pub fn run_game(&self, game: GameKind, stream: u64) -> Result<GameReport, SimulationError> {
        let config = &self.config;
        let mut session = Session::new(
            MemoryWallet::new(config.starting_balance),
            config.casino.clone(),
        );
        let mut rng = GameRng::for_round(self.seed, stream);
        let mut stats = Stats::default();
        let mut refilled = 0u64;
        let stake = config.stake(game);
        info!(%game, rounds = config.rounds, seed = self.seed, stream, "simulation started");

        for now in 0..config.rounds {
            if session.balance() < stake {
                let amount = config.starting_balance;
                session
                    .wallet_mut()
                    .credit(amount)
                    .map_err(|err| SimulationError::Game {
                        game,
                        source: err.into(),
                    })?;
                refilled += amount;
                debug!(%game, round = now, amount, "wallet refilled");
            }
            let outcome = match game {
                GameKind::Dice => session
                    .play_dice(config.dice.bet, config.dice.condition, &mut rng, now)
                    .map(|round| round.record)
                    .map_err(|source| SimulationError::Game { game, source })?,
                GameKind::Slots => session
                    .spin(config.slots.bet(), &mut rng, now)
                    .map(|round| round.record)
                    .map_err(|source| SimulationError::Game { game, source })?,
                GameKind::Grid => play_grid_round(&mut session, &config.grid, &mut rng, now)?,
            };
            stats.add(&outcome);
        }

        let actual = session.balance() as i128 - config.starting_balance as i128 - refilled as i128;
        if actual != stats.net() {
            return Err(SimulationError::AccountingDrift {
                game,
                expected: stats.net(),
                actual,
            });
        }
        let report = stats.report(game);
        info!(
            %game,
            rtp = report.rtp,
            house_edge = report.house_edge,
            stderr = report.stderr,
            "simulation finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use dlspins_execution::mocks::ScriptedRng;
    use dlspins_execution::GameConfig;

    fn validated(rounds: u64, seed: u64) -> ValidatedConfig {
        Config {
            rounds,
            seed: Some(seed),
            starting_balance: 1_000,
            ..Default::default()
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn test_grid_round_cash_out() {
        let mut session = Session::new(MemoryWallet::new(1_000), GameConfig::default());
        // Hazards land on 0, 1, 2; every reveal then picks the last hidden cell.
        let mut rng = ScriptedRng::new(vec![0.0, 0.0, 0.0, 0.99, 0.99, 0.99]);
        let strategy = GridStrategy {
            bet: 100,
            hazards: 3,
            reveals: 3,
        };
        let outcome = play_grid_round(&mut session, &strategy, &mut rng, 5).unwrap();
        // floor(100 * (1 + 3/22 * 1.5)) = 120
        assert_eq!(outcome.win_amount, 120);
        assert_eq!(session.balance(), 1_020);
        assert_eq!(session.ledger().len(), 1);
    }

    #[test]
    fn test_grid_round_hazard() {
        let mut session = Session::new(MemoryWallet::new(1_000), GameConfig::default());
        // Hazards on 0, 1, 2; the first reveal picks hidden cell 0.
        let mut rng = ScriptedRng::new(vec![0.0]);
        let strategy = GridStrategy::default();
        let outcome = play_grid_round(&mut session, &strategy, &mut rng, 5).unwrap();
        assert_eq!(outcome.win_amount, 0);
        assert_eq!(session.balance(), 990);
        assert_eq!(session.ledger().len(), 1);
    }

    #[test]
    fn test_grid_round_refused_while_open() {
        let mut session = Session::new(MemoryWallet::new(1_000), GameConfig::default());
        let mut rng = ScriptedRng::new(vec![0.0]);
        session.start_grid(10, 3, &mut rng).unwrap();
        let err =
            play_grid_round(&mut session, &GridStrategy::default(), &mut rng, 1).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::Game {
                game: GameKind::Grid,
                ..
            }
        ));
        assert_eq!(session.rounds_settled(), 0);
    }

    #[test]
    fn test_grid_rounds_settle_past_ledger_capacity() {
        let mut session = Session::new(MemoryWallet::new(100_000), GameConfig::default());
        let mut rng = GameRng::from_seed(11);
        for now in 0..120 {
            let outcome =
                play_grid_round(&mut session, &GridStrategy::default(), &mut rng, now).unwrap();
            assert_eq!(outcome.timestamp_ms, now);
        }
        assert_eq!(session.ledger().len(), 50);
        assert_eq!(session.rounds_settled(), 120);
    }

    #[test]
    fn test_run_is_reproducible() {
        let first = Simulator::new(validated(2_000, 9)).run().unwrap();
        let second = Simulator::new(validated(2_000, 9)).run().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.games.len(), 3);
        assert!(first.games.iter().all(|game| game.trials == 2_000));
    }

    #[test]
    fn test_dice_house_edge_estimate() {
        let config = Config {
            rounds: 100_000,
            seed: Some(1),
            games: vec![GameKind::Dice],
            ..Default::default()
        }
        .validate()
        .unwrap();
        let report = Simulator::new(config).run().unwrap();
        let dice = &report.games[0];
        assert!((dice.house_edge - 0.15).abs() < 4.0 * dice.stderr + 1e-3, "{dice:?}");
        assert!((dice.rtp + dice.house_edge - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_refills_keep_accounting() {
        // A tiny bankroll forces many refills; the drift check must still pass.
        let config = Config {
            rounds: 5_000,
            seed: Some(4),
            starting_balance: 20,
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert!(Simulator::new(config).run().is_ok());
    }
}
