use crate::rng::RandomSource;
use dlspins_types::casino::DIE_FACES;

/// Replays a fixed sequence of uniforms, wrapping around at the end.
#[derive(Clone, Debug)]
pub struct ScriptedRng {
    values: Vec<f64>,
    index: usize,
}

impl ScriptedRng {
    /// Panics if `values` is empty or contains a value outside `[0, 1)`.
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "scripted rng needs at least one value");
        assert!(
            values.iter().all(|v| (0.0..1.0).contains(v)),
            "scripted values must lie in [0, 1)"
        );
        Self { values, index: 0 }
    }

    /// Sequence whose `below(n)` draws return `picks` in order.
    pub fn picks(n: usize, picks: &[usize]) -> Self {
        Self::new(picks.iter().map(|&p| uniform_for(p, n)).collect())
    }

    /// Sequence whose `roll_die` draws return `faces` in order.
    pub fn dice(faces: &[u8]) -> Self {
        Self::new(
            faces
                .iter()
                .map(|&f| uniform_for(f as usize - 1, DIE_FACES as usize))
                .collect(),
        )
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> usize {
        self.index
    }
}

impl RandomSource for ScriptedRng {
    fn uniform(&mut self) -> f64 {
        let value = self.values[self.index % self.values.len()];
        self.index += 1;
        value
    }
}

/// Midpoint of bucket `pick` when `[0, 1)` is split into `n` buckets.
pub fn uniform_for(pick: usize, n: usize) -> f64 {
    (pick as f64 + 0.5) / n as f64
}
