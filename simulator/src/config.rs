use dlspins_execution::{GameConfig, SlotBet, SlotMachine};
use dlspins_types::casino::{BetError, DiceCondition, GameKind, PaylineCount};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tracing::Level;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid log level: {value}")]
    InvalidLogLevel { value: String },
    #[error("{field} must be > 0 (got {value})")]
    InvalidNonZero { field: &'static str, value: u64 },
    #[error("no games selected")]
    NoGames,
    #[error("invalid {game} bet: {source}")]
    InvalidBet {
        game: GameKind,
        #[source]
        source: BetError,
    },
    #[error("starting_balance {balance} cannot cover the {game} stake {stake}")]
    BalanceBelowStake {
        game: GameKind,
        stake: u64,
        balance: u64,
    },
    #[error("grid reveals must be in 1..={safe_cells} (got {reveals})")]
    InvalidReveals { reveals: usize, safe_cells: usize },
    #[error("invalid game config: {0}")]
    Game(#[from] dlspins_execution::ConfigError),
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_rounds() -> u64 {
    100_000
}

fn default_starting_balance() -> u64 {
    1_000_000
}

fn default_games() -> Vec<GameKind> {
    vec![GameKind::Dice, GameKind::Slots, GameKind::Grid]
}

/// Dice strategy: the same stake on the same condition every round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiceStrategy {
    pub bet: u64,
    pub condition: DiceCondition,
}

impl Default for DiceStrategy {
    fn default() -> Self {
        Self {
            bet: 10,
            condition: DiceCondition::Under(7),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotStrategy {
    pub bet_per_line: u64,
    pub lines: PaylineCount,
    pub bet_level: u64,
}

impl Default for SlotStrategy {
    fn default() -> Self {
        Self {
            bet_per_line: 1,
            lines: PaylineCount::Nine,
            bet_level: 1,
        }
    }
}

impl SlotStrategy {
    pub fn bet(&self) -> SlotBet {
        SlotBet::new(self.bet_per_line, self.lines, self.bet_level)
    }
}

/// Grid strategy: reveal `reveals` random hidden cells, then cash out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridStrategy {
    pub bet: u64,
    pub hazards: usize,
    pub reveals: usize,
}

impl Default for GridStrategy {
    fn default() -> Self {
        Self {
            bet: 10,
            hazards: 3,
            reveals: 3,
        }
    }
}

/// Simulator configuration, as loaded from YAML.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub json_logs: bool,
    /// Fixed seed for a reproducible run; drawn from OS entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_rounds")]
    pub rounds: u64,
    #[serde(default = "default_starting_balance")]
    pub starting_balance: u64,
    #[serde(default = "default_games")]
    pub games: Vec<GameKind>,
    #[serde(default)]
    pub dice: DiceStrategy,
    #[serde(default)]
    pub slots: SlotStrategy,
    #[serde(default)]
    pub grid: GridStrategy,
    #[serde(default)]
    pub casino: GameConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
            seed: None,
            rounds: default_rounds(),
            starting_balance: default_starting_balance(),
            games: default_games(),
            dice: DiceStrategy::default(),
            slots: SlotStrategy::default(),
            grid: GridStrategy::default(),
            casino: GameConfig::default(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ValidatedConfig {
    pub log_level: Level,
    pub json_logs: bool,
    pub seed: Option<u64>,
    pub rounds: u64,
    pub starting_balance: u64,
    pub games: Vec<GameKind>,
    pub dice: DiceStrategy,
    pub slots: SlotStrategy,
    pub grid: GridStrategy,
    pub casino: GameConfig,
}

fn stake_for(game: GameKind, dice: &DiceStrategy, slots: &SlotStrategy, grid: &GridStrategy) -> u64 {
    match game {
        GameKind::Dice => dice.bet,
        GameKind::Slots => slots.bet().total(),
        GameKind::Grid => grid.bet,
    }
}

impl ValidatedConfig {
    /// Amount debited at the start of each round of `game`.
    pub fn stake(&self, game: GameKind) -> u64 {
        stake_for(game, &self.dice, &self.slots, &self.grid)
    }
}

fn ensure_nonzero(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidNonZero { field, value });
    }
    Ok(())
}

fn invalid_bet(game: GameKind) -> impl Fn(BetError) -> ConfigError {
    move |source| ConfigError::InvalidBet { game, source }
}

impl Config {
    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        let log_level = Level::from_str(&self.log_level).map_err(|_| ConfigError::InvalidLogLevel {
            value: self.log_level.clone(),
        })?;
        ensure_nonzero("rounds", self.rounds)?;
        ensure_nonzero("starting_balance", self.starting_balance)?;
        if self.games.is_empty() {
            return Err(ConfigError::NoGames);
        }
        self.casino.validate()?;

        let dice = &self.casino.dice;
        self.dice
            .condition
            .validate()
            .map_err(invalid_bet(GameKind::Dice))?;
        dlspins_execution::casino::validate_stake(self.dice.bet, dice.min_bet, dice.max_bet, u64::MAX)
            .map_err(invalid_bet(GameKind::Dice))?;

        SlotMachine::new(self.casino.slots.clone())
            .validate_bet(&self.slots.bet(), u64::MAX)
            .map_err(invalid_bet(GameKind::Slots))?;

        let grid = &self.casino.grid;
        if !(grid.min_hazards..=grid.max_hazards).contains(&self.grid.hazards) {
            return Err(ConfigError::InvalidBet {
                game: GameKind::Grid,
                source: BetError::InvalidHazardCount {
                    hazards: self.grid.hazards,
                    min: grid.min_hazards,
                    max: grid.max_hazards,
                },
            });
        }
        dlspins_execution::casino::validate_stake(self.grid.bet, grid.min_bet, grid.max_bet, u64::MAX)
            .map_err(invalid_bet(GameKind::Grid))?;
        let safe_cells = grid.grid_size - self.grid.hazards;
        if self.grid.reveals == 0 || self.grid.reveals > safe_cells {
            return Err(ConfigError::InvalidReveals {
                reveals: self.grid.reveals,
                safe_cells,
            });
        }

        for &game in &self.games {
            let stake = stake_for(game, &self.dice, &self.slots, &self.grid);
            if self.starting_balance < stake {
                return Err(ConfigError::BalanceBelowStake {
                    game,
                    stake,
                    balance: self.starting_balance,
                });
            }
        }

        Ok(ValidatedConfig {
            log_level,
            json_logs: self.json_logs,
            seed: self.seed,
            rounds: self.rounds,
            starting_balance: self.starting_balance,
            games: self.games,
            dice: self.dice,
            slots: self.slots,
            grid: self.grid,
            casino: self.casino,
        })
    }
}
