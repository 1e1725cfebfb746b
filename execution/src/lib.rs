//! dlspins execution layer.
//!
//! This crate contains the payout/odds engines for the three casino games (dice, slots and the
//! grid-reveal game), the session ledger, the wallet seam and the auto-spin scheduler.
//!
//! ## Determinism requirements
//! - Do not read wall-clock time inside an engine; callers pass `now_ms`.
//! - Only draw randomness through a [`RandomSource`]; seeding a [`GameRng`] must reproduce a
//!   session exactly.
//! - Engines never write the wallet. They return amounts and the [`Session`] applies them using
//!   the deduct-then-credit protocol.
//!
//! ## Minimal session (example)
//! ```rust,ignore
//! use dlspins_execution::{GameConfig, GameRng, MemoryWallet, Session};
//! use dlspins_types::casino::DiceCondition;
//!
//! let mut rng = GameRng::from_seed(7);
//! let mut session = Session::new(MemoryWallet::default(), GameConfig::default());
//! let round = session.play_dice(10, DiceCondition::Under(7), &mut rng, 0)?;
//! assert_eq!(session.ledger().len(), 1);
//! # Ok::<(), dlspins_execution::GameError>(())
//! ```

pub mod autospin;
pub mod casino;
pub mod ledger;
pub mod rng;
pub mod session;
pub mod wallet;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

pub use autospin::{AutoSpin, AutoSpinAction, AutoSpinState, CancelToken, StopReason};
pub use casino::dice::{DiceOutcome, OddsEngine};
pub use casino::grid::{CellView, GridRound, RevealResult, RoundState};
pub use casino::registry::{ConfigError, DiceConfig, GameConfig, GridConfig, SlotsConfig};
pub use casino::sampler::{SamplerError, WeightedSampler};
pub use casino::slots::{
    LineWin, MatchKind, PaylineEvaluator, SlotBet, SlotMachine, SpinEvaluation, SpinResult,
};
pub use casino::GameError;
pub use ledger::{LedgerStats, SessionLedger};
pub use rng::{GameRng, RandomSource};
pub use session::{DiceRound, Session, SpinRound};
pub use wallet::{MemoryWallet, Wallet, WalletError};
