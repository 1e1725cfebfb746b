//! Game configuration.
//!
//! Every tunable the engines read lives here: house edge and payout floors for dice, the symbol
//! and payline tables for slots, and board size / hazard bounds for the grid game. All structs
//! default to the reference casino and deserialize from YAML or JSON, so a deployment can change
//! odds without a code change.
//!
//! # Example
//! ```rust,ignore
//! use dlspins_execution::casino::registry::GameConfig;
//!
//! let config: GameConfig = serde_yaml::from_str("dice:\n  house_edge: 0.05\n")?;
//! config.validate()?;
//! assert_eq!(config.grid.grid_size, 25);
//! ```

use dlspins_types::casino::{
    PaylineTable, SymbolTable, TableError, DEFAULT_HAZARDS, DICE_HOUSE_EDGE,
    DICE_MIN_MULTIPLIER_EXACT, DICE_MIN_MULTIPLIER_RANGE, GRID_SIZE, LEDGER_CAPACITY,
    MAX_BET_LEVEL, MAX_BET_PER_LINE, MIN_BET, MIN_BET_LEVEL,
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

#[derive(Debug, ThisError, Clone, PartialEq)]
pub enum ConfigError {
    #[error("house_edge must be in [0, 1) (got {0})")]
    InvalidHouseEdge(f64),
    #[error("{field} must be finite and >= 1 (got {value})")]
    InvalidMultiplierFloor { field: &'static str, value: f64 },
    #[error("{field} bounds invalid (min={min}, max={max})")]
    InvalidBounds {
        field: &'static str,
        min: u64,
        max: u64,
    },
    #[error("grid_size must be at least 2 (got {0})")]
    InvalidGridSize(usize),
    #[error("hazard bounds invalid for grid of {size} (min={min}, max={max}, default={default})")]
    InvalidHazardBounds {
        size: usize,
        min: usize,
        max: usize,
        default: usize,
    },
    #[error("{field} must be > 0")]
    InvalidNonZero { field: &'static str },
    #[error("invalid table: {0}")]
    Table(#[from] TableError),
}

fn ensure_bounds(field: &'static str, min: u64, max: u64) -> Result<(), ConfigError> {
    if min == 0 || min > max {
        return Err(ConfigError::InvalidBounds { field, min, max });
    }
    Ok(())
}

/// Dice configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiceConfig {
    /// Fraction of the fair multiplier withheld by the house.
    pub house_edge: f64,
    /// Payout floor for Under/Over bets.
    pub min_multiplier_range: f64,
    /// Payout floor for Exact bets.
    pub min_multiplier_exact: f64,
    pub min_bet: u64,
    /// Table limit (the balance is always a limit too).
    pub max_bet: u64,
}

impl Default for DiceConfig {
    fn default() -> Self {
        Self {
            house_edge: DICE_HOUSE_EDGE,
            min_multiplier_range: DICE_MIN_MULTIPLIER_RANGE,
            min_multiplier_exact: DICE_MIN_MULTIPLIER_EXACT,
            min_bet: MIN_BET,
            max_bet: u64::MAX,
        }
    }
}

impl DiceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.house_edge.is_finite() || !(0.0..1.0).contains(&self.house_edge) {
            return Err(ConfigError::InvalidHouseEdge(self.house_edge));
        }
        for (field, value) in [
            ("min_multiplier_range", self.min_multiplier_range),
            ("min_multiplier_exact", self.min_multiplier_exact),
        ] {
            if !value.is_finite() || value < 1.0 {
                return Err(ConfigError::InvalidMultiplierFloor { field, value });
            }
        }
        ensure_bounds("dice bet", self.min_bet, self.max_bet)
    }
}

/// Slot machine configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotsConfig {
    pub symbols: SymbolTable,
    pub paylines: PaylineTable,
    pub min_bet_per_line: u64,
    pub max_bet_per_line: u64,
    pub min_bet_level: u64,
    pub max_bet_level: u64,
}

impl Default for SlotsConfig {
    fn default() -> Self {
        Self {
            symbols: SymbolTable::default(),
            paylines: PaylineTable::default(),
            min_bet_per_line: MIN_BET,
            max_bet_per_line: MAX_BET_PER_LINE,
            min_bet_level: MIN_BET_LEVEL,
            max_bet_level: MAX_BET_LEVEL,
        }
    }
}

impl SlotsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_bounds("bet_per_line", self.min_bet_per_line, self.max_bet_per_line)?;
        ensure_bounds("bet_level", self.min_bet_level, self.max_bet_level)?;
        // Tables are checked on construction; re-check in case they were built in code.
        SymbolTable::new(self.symbols.entries().to_vec())?;
        PaylineTable::new(self.paylines.clone().into())?;
        Ok(())
    }
}

/// Grid game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub grid_size: usize,
    pub min_hazards: usize,
    pub max_hazards: usize,
    pub default_hazards: usize,
    pub min_bet: u64,
    pub max_bet: u64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            min_hazards: 1,
            max_hazards: GRID_SIZE - 1,
            default_hazards: DEFAULT_HAZARDS,
            min_bet: MIN_BET,
            max_bet: u64::MAX,
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < 2 {
            return Err(ConfigError::InvalidGridSize(self.grid_size));
        }
        let hazards_ok = self.min_hazards >= 1
            && self.min_hazards <= self.max_hazards
            && self.max_hazards < self.grid_size
            && (self.min_hazards..=self.max_hazards).contains(&self.default_hazards);
        if !hazards_ok {
            return Err(ConfigError::InvalidHazardBounds {
                size: self.grid_size,
                min: self.min_hazards,
                max: self.max_hazards,
                default: self.default_hazards,
            });
        }
        ensure_bounds("grid bet", self.min_bet, self.max_bet)
    }
}

/// Configuration for every game plus session-level settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub dice: DiceConfig,
    pub slots: SlotsConfig,
    pub grid: GridConfig,
    pub ledger_capacity: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            dice: DiceConfig::default(),
            slots: SlotsConfig::default(),
            grid: GridConfig::default(),
            ledger_capacity: LEDGER_CAPACITY,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.dice.validate()?;
        self.slots.validate()?;
        self.grid.validate()?;
        if self.ledger_capacity == 0 {
            return Err(ConfigError::InvalidNonZero {
                field: "ledger_capacity",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dlspins_types::casino::Symbol;

    #[test]
    fn test_defaults_validate() {
        let config = GameConfig::default();
        config.validate().expect("defaults are valid");
        assert_eq!(config.dice.house_edge, 0.15);
        assert_eq!(config.grid.max_hazards, 24);
        assert_eq!(config.ledger_capacity, 50);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "dice:\n  house_edge: 0.05\ngrid:\n  grid_size: 16\n  max_hazards: 15\n";
        let config: GameConfig = serde_yaml::from_str(yaml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.dice.house_edge, 0.05);
        assert_eq!(config.dice.min_multiplier_exact, 2.0);
        assert_eq!(config.grid.grid_size, 16);
        assert_eq!(config.slots.symbols.payout(Symbol::Diamond), 20);
    }

    #[test]
    fn test_yaml_symbol_table_override() {
        let yaml = "slots:\n  symbols:\n    - symbol: cherry\n      payout: 5\n      weight: 1\n";
        let config: GameConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.slots.symbols.entries().len(), 1);
        assert_eq!(config.slots.symbols.payout(Symbol::Cherry), 5);
    }

    #[test]
    fn test_rejects_bad_house_edge() {
        for edge in [-0.1, 1.0, f64::NAN] {
            let config = DiceConfig {
                house_edge: edge,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidHouseEdge(_))
            ));
        }
    }

    #[test]
    fn test_rejects_bad_multiplier_floor() {
        let config = DiceConfig {
            min_multiplier_exact: 0.5,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidMultiplierFloor {
                field: "min_multiplier_exact",
                value: 0.5
            })
        );
    }

    #[test]
    fn test_rejects_bad_hazard_bounds() {
        let config = GridConfig {
            max_hazards: 25,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidHazardBounds { .. })
        ));

        let config = GridConfig {
            default_hazards: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GridConfig {
            grid_size: 1,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidGridSize(1)));
    }

    #[test]
    fn test_rejects_bad_bet_bounds() {
        let config = SlotsConfig {
            min_bet_level: 5,
            max_bet_level: 2,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidBounds {
                field: "bet_level",
                min: 5,
                max: 2
            })
        );

        let config = GameConfig {
            ledger_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
