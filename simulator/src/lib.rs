//! Offline Monte-Carlo simulator for the dlspins games.
//!
//! Plays a fixed strategy per game against fresh sessions and reports the observed return to
//! player, house edge and its standard error.

mod config;
mod runner;
mod stats;

pub use config::{Config, ConfigError, DiceStrategy, GridStrategy, SlotStrategy, ValidatedConfig};
pub use runner::{play_grid_round, Report, SimulationError, Simulator};
pub use stats::{GameReport, Stats};
