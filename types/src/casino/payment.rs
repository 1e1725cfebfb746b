use serde::{Deserialize, Serialize};
use std::fmt;

/// How a top-up was paid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Credit or debit card.
    Card,
    /// SEPA bank transfer.
    Bank,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::Bank => write!(f, "bank"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Completed,
    Failed,
}

/// Record of a coin purchase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTransaction {
    pub id: u64,
    /// Amount charged, in whole EUR.
    pub amount: u64,
    /// Coins credited (0 if the payment failed).
    pub coins: u64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub timestamp_ms: u64,
}

impl PaymentTransaction {
    pub fn is_completed(&self) -> bool {
        self.status == PaymentStatus::Completed
    }
}
