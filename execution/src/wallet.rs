//! Coin balance owned by a session.
//!
//! Engines never touch the balance; the session applies signed deltas through [`Wallet`] so a
//! server-backed store can replace [`MemoryWallet`] without changing game code.

use crate::rng::RandomSource;
use dlspins_types::casino::{
    PaymentMethod, PaymentStatus, PaymentTransaction, COINS_PER_EUR, STARTING_COINS,
    TOP_UP_SUCCESS_RATE,
};
use thiserror::Error as ThisError;

#[derive(Debug, ThisError, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("delta {delta} would overdraw balance {balance}")]
    Overdraft { delta: i64, balance: u64 },
    #[error("delta {delta} would overflow balance {balance}")]
    Overflow { delta: i64, balance: u64 },
    #[error("amount {0} does not fit a signed delta")]
    AmountTooLarge(u64),
    #[error("top-up amount must be positive")]
    InvalidTopUp,
}

/// Single-writer balance store.
pub trait Wallet {
    fn balance(&self) -> u64;

    /// Apply a signed change and return the new balance. A failed delta leaves the balance
    /// unchanged.
    fn apply_delta(&mut self, delta: i64) -> Result<u64, WalletError>;

    fn debit(&mut self, amount: u64) -> Result<u64, WalletError> {
        let delta = i64::try_from(amount).map_err(|_| WalletError::AmountTooLarge(amount))?;
        self.apply_delta(-delta)
    }

    fn credit(&mut self, amount: u64) -> Result<u64, WalletError> {
        let delta = i64::try_from(amount).map_err(|_| WalletError::AmountTooLarge(amount))?;
        self.apply_delta(delta)
    }
}

/// In-process wallet with a mock card/bank top-up flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryWallet {
    balance: u64,
    payments: Vec<PaymentTransaction>,
}

impl Default for MemoryWallet {
    fn default() -> Self {
        Self::new(STARTING_COINS)
    }
}

impl MemoryWallet {
    pub fn new(balance: u64) -> Self {
        Self {
            balance,
            payments: Vec::new(),
        }
    }

    /// Buy coins at 1 EUR = 1 coin. The mock processor approves 90% of payments; a declined
    /// payment is still recorded and leaves the balance unchanged.
    pub fn top_up<R: RandomSource + ?Sized>(
        &mut self,
        amount_eur: u64,
        method: PaymentMethod,
        now_ms: u64,
        rng: &mut R,
    ) -> Result<PaymentTransaction, WalletError> {
        if amount_eur == 0 {
            return Err(WalletError::InvalidTopUp);
        }
        let coins = amount_eur.saturating_mul(COINS_PER_EUR);
        let approved = rng.uniform() < TOP_UP_SUCCESS_RATE;
        let (status, credited) = if approved {
            self.credit(coins)?;
            (PaymentStatus::Completed, coins)
        } else {
            (PaymentStatus::Failed, 0)
        };
        let transaction = PaymentTransaction {
            id: self.payments.len() as u64 + 1,
            amount: amount_eur,
            coins: credited,
            method,
            status,
            timestamp_ms: now_ms,
        };
        if approved {
            tracing::info!(
                id = transaction.id,
                amount = amount_eur,
                %method,
                balance = self.balance,
                "top-up completed"
            );
        } else {
            tracing::warn!(id = transaction.id, amount = amount_eur, %method, "top-up declined");
        }
        self.payments.push(transaction.clone());
        Ok(transaction)
    }

    /// Payment history, oldest first.
    pub fn payments(&self) -> &[PaymentTransaction] {
        &self.payments
    }
}

impl Wallet for MemoryWallet {
    fn balance(&self) -> u64 {
        self.balance
    }

    fn apply_delta(&mut self, delta: i64) -> Result<u64, WalletError> {
        let balance = self.balance;
        let next = if delta >= 0 {
            balance
                .checked_add(delta.unsigned_abs())
                .ok_or(WalletError::Overflow { delta, balance })?
        } else {
            balance
                .checked_sub(delta.unsigned_abs())
                .ok_or(WalletError::Overdraft { delta, balance })?
        };
        self.balance = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::ScriptedRng;
    use crate::rng::GameRng;

    #[test]
    fn test_starting_balance() {
        assert_eq!(MemoryWallet::default().balance(), 1_000);
    }

    #[test]
    fn test_apply_delta() {
        let mut wallet = MemoryWallet::new(100);
        assert_eq!(wallet.apply_delta(-40), Ok(60));
        assert_eq!(wallet.apply_delta(15), Ok(75));
        assert_eq!(
            wallet.apply_delta(-76),
            Err(WalletError::Overdraft {
                delta: -76,
                balance: 75
            })
        );
        assert_eq!(wallet.balance(), 75);
        assert_eq!(wallet.debit(75), Ok(0));
    }

    #[test]
    fn test_overflow_and_large_amounts() {
        let mut wallet = MemoryWallet::new(u64::MAX - 1);
        assert!(matches!(
            wallet.apply_delta(2),
            Err(WalletError::Overflow { .. })
        ));
        assert_eq!(
            wallet.credit(u64::MAX),
            Err(WalletError::AmountTooLarge(u64::MAX))
        );
        assert_eq!(wallet.balance(), u64::MAX - 1);
    }

    #[test]
    fn test_top_up_approved_and_declined() {
        let mut wallet = MemoryWallet::new(0);
        let mut rng = ScriptedRng::new(vec![0.1, 0.95]);

        let approved = wallet.top_up(25, PaymentMethod::Card, 10, &mut rng).unwrap();
        assert!(approved.is_completed());
        assert_eq!(approved.coins, 25);
        assert_eq!(wallet.balance(), 25);

        let declined = wallet.top_up(50, PaymentMethod::Bank, 20, &mut rng).unwrap();
        assert_eq!(declined.status, PaymentStatus::Failed);
        assert_eq!(declined.coins, 0);
        assert_eq!(wallet.balance(), 25);

        let ids: Vec<u64> = wallet.payments().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(
            wallet.top_up(0, PaymentMethod::Card, 30, &mut rng),
            Err(WalletError::InvalidTopUp)
        );
    }

    #[test]
    fn test_top_up_success_rate() {
        let mut wallet = MemoryWallet::new(0);
        let mut rng = GameRng::from_seed(5);
        for _ in 0..10_000 {
            wallet.top_up(1, PaymentMethod::Card, 0, &mut rng).unwrap();
        }
        let completed = wallet.payments().iter().filter(|p| p.is_completed()).count();
        let rate = completed as f64 / 10_000.0;
        assert!((rate - 0.9).abs() < 0.015, "approval rate {rate}");
        assert_eq!(wallet.balance(), completed as u64);
    }
}
