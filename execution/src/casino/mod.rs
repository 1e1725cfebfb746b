//! Casino game execution module.
//!
//! This module contains the payout/odds logic for all casino games:
//! - Dice (threshold bets on the sum of two dice)
//! - Slots (3x3 reels, weighted symbols, configurable paylines)
//! - Grid (reveal safe cells, avoid hazards, cash out)

pub mod dice;
pub mod grid;
pub mod registry;
pub mod sampler;
pub mod slots;

use crate::wallet::WalletError;
use dlspins_types::casino::BetError;
use thiserror::Error as ThisError;

/// Error during round execution.
///
/// All variants are local validation failures: the round was refused before any wallet
/// mutation, or a wallet delta could not be applied.
#[derive(Debug, ThisError, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid bet: {0}")]
    Bet(#[from] BetError),
    #[error("wallet rejected delta: {0}")]
    Wallet(#[from] WalletError),
}

/// Check a stake against the table limits and the current balance.
pub fn validate_stake(amount: u64, min: u64, max: u64, balance: u64) -> Result<(), BetError> {
    if amount < min {
        return Err(BetError::BelowMinimum { amount, min });
    }
    if amount > max {
        return Err(BetError::AboveMaximum { amount, max });
    }
    if amount > balance {
        return Err(BetError::InsufficientBalance { amount, balance });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_stake() {
        assert!(validate_stake(1, 1, 100, 1).is_ok());
        assert_eq!(
            validate_stake(0, 1, 100, 50),
            Err(BetError::BelowMinimum { amount: 0, min: 1 })
        );
        assert_eq!(
            validate_stake(101, 1, 100, 500),
            Err(BetError::AboveMaximum {
                amount: 101,
                max: 100
            })
        );
        assert_eq!(
            validate_stake(60, 1, 100, 50),
            Err(BetError::InsufficientBalance {
                amount: 60,
                balance: 50
            })
        );
    }
}
