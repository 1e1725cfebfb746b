//! Random sources for game outcomes.
//!
//! Every engine draws through [`RandomSource`], so tests can swap in a scripted sequence and
//! simulations can replay a session from its seed.

use dlspins_types::casino::DIE_FACES;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Source of independent uniform draws.
pub trait RandomSource {
    /// Uniform value in `[0, 1)`.
    fn uniform(&mut self) -> f64;

    /// Uniform integer in `[0, n)`. Returns 0 when `n == 0`.
    fn below(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        // Clamp guards against a source that returns exactly 1.0.
        ((self.uniform() * n as f64) as usize).min(n - 1)
    }

    /// Roll a single die (1-6).
    fn roll_die(&mut self) -> u8 {
        self.below(DIE_FACES as usize) as u8 + 1
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn uniform(&mut self) -> f64 {
        (**self).uniform()
    }
}

/// ChaCha20-backed generator.
///
/// A round can be replayed from `(seed, stream)`: [`GameRng::for_round`] keys the stream by the
/// round number so rounds never share draws.
#[derive(Clone, Debug)]
pub struct GameRng {
    seed: u64,
    inner: ChaCha20Rng,
}

impl GameRng {
    /// Deterministic generator for simulations and tests.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            inner: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Generator seeded from OS entropy. The chosen seed is still exposed via [`GameRng::seed`].
    pub fn from_entropy() -> Self {
        Self::from_seed(rand::random())
    }

    /// Generator for a single round of a seeded session.
    pub fn for_round(seed: u64, round: u64) -> Self {
        let mut inner = ChaCha20Rng::seed_from_u64(seed);
        inner.set_stream(round);
        Self { seed, inner }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn stream(&self) -> u64 {
        self.inner.get_stream()
    }
}

impl RandomSource for GameRng {
    fn uniform(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }
}
