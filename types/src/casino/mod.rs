//! Casino domain types.
//!
//! Defines symbol/payline tables, dice conditions, round outcomes, payment records and the
//! constants used by the execution layer and clients.

mod constants;
mod game;
mod payline;
mod payment;
mod symbol;

pub use constants::*;
pub use game::*;
pub use payline::*;
pub use payment::*;
pub use symbol::*;
