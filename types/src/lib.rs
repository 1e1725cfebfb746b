//! Domain types shared by the dlspins engines and tooling.
//!
//! Everything in this crate is plain data: symbol and payline tables, dice
//! conditions, round outcomes and payment records. Game logic lives in
//! `dlspins-execution`.

pub mod casino;
