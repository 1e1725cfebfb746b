//! Weighted sampling over a fixed table.
//!
//! Draw `r = uniform() * total` and walk the entries accumulating weights; the first entry whose
//! cumulative weight exceeds `r` wins. If rounding leaves `r` at or past the final cumulative
//! weight, the last entry is returned so a draw always yields a table entry.

use crate::rng::RandomSource;
use dlspins_types::casino::{Symbol, SymbolTable};
use thiserror::Error as ThisError;

#[derive(Debug, ThisError, Clone, PartialEq)]
pub enum SamplerError {
    #[error("sampler table is empty")]
    Empty,
    #[error("weight at index {index} must be positive and finite (got {weight})")]
    InvalidWeight { index: usize, weight: f64 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct WeightedSampler<T> {
    entries: Vec<(T, f64)>,
    total: f64,
}

impl<T> WeightedSampler<T> {
    pub fn new(entries: Vec<(T, f64)>) -> Result<Self, SamplerError> {
        if entries.is_empty() {
            return Err(SamplerError::Empty);
        }
        for (index, (_, weight)) in entries.iter().enumerate() {
            if !weight.is_finite() || *weight <= 0.0 {
                return Err(SamplerError::InvalidWeight {
                    index,
                    weight: *weight,
                });
            }
        }
        let total = entries.iter().map(|(_, weight)| weight).sum();
        Ok(Self { entries, total })
    }

    pub fn total_weight(&self) -> f64 {
        self.total
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn probability(&self, index: usize) -> f64 {
        self.entries
            .get(index)
            .map(|(_, weight)| weight / self.total)
            .unwrap_or(0.0)
    }

    /// Index of the entry selected by a uniform draw `u` in `[0, 1)`.
    pub fn index_for(&self, u: f64) -> usize {
        let r = u * self.total;
        let mut cumulative = 0.0;
        for (index, (_, weight)) in self.entries.iter().enumerate() {
            cumulative += weight;
            if r < cumulative {
                return index;
            }
        }
        self.entries.len() - 1
    }

    pub fn sample<R: RandomSource + ?Sized>(&self, rng: &mut R) -> &T {
        let index = self.index_for(rng.uniform());
        &self.entries[index].0
    }
}

impl From<&SymbolTable> for WeightedSampler<Symbol> {
    fn from(table: &SymbolTable) -> Self {
        // A SymbolTable is validated on construction, so the invariants already hold.
        let entries: Vec<(Symbol, f64)> = table
            .entries()
            .iter()
            .map(|entry| (entry.symbol, entry.weight))
            .collect();
        let total = entries.iter().map(|(_, weight)| weight).sum();
        Self { entries, total }
    }
}
