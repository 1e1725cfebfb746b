//! Dice game implementation.
//!
//! The player bets on the sum of two fair dice being under, over or exactly a target. Odds come
//! from the two-dice combinatorics table (ways out of 36):
//!
//! ```text
//! sum:   2  3  4  5  6  7  8  9 10 11 12
//! ways:  1  2  3  4  5  6  5  4  3  2  1
//! ```
//!
//! Payout multiplier = `max(floor, (1 - house_edge) / probability)`, where the floor is 1.01 for
//! Under/Over and 2.0 for Exact. A condition that can never win (`Under(2)`, `Over(12)`) has
//! probability 0 and multiplier 1.
//!
//! Multipliers are settled at basis-point precision: the payout on a win is
//! `bet * round(multiplier * 10000) / 10000`, floored to whole coins.

use super::registry::DiceConfig;
use crate::rng::RandomSource;
use dlspins_types::casino::{
    DiceCondition, DiceRoll, DICE_DEGENERATE_MULTIPLIER, DICE_HOUSE_EDGE, DICE_MAX_SUM,
    DICE_MIN_MULTIPLIER_EXACT, DICE_MIN_MULTIPLIER_RANGE, DICE_MIN_SUM, DICE_OUTCOMES,
};
use serde::{Deserialize, Serialize};

/// Multiplier scale used for settlement (1.0 = 10000).
pub const BASIS_POINTS: u64 = 10_000;

/// Ways to roll each sum with two dice, indexed by sum.
const SUM_WAYS: [u32; 13] = [0, 0, 1, 2, 3, 4, 5, 6, 5, 4, 3, 2, 1];

/// Ways (out of 36) to roll exactly `sum`.
pub fn ways_for_sum(sum: u8) -> u32 {
    SUM_WAYS.get(sum as usize).copied().unwrap_or(0)
}

/// Ways (out of 36) for `condition` to win.
pub fn ways_for(condition: DiceCondition) -> u32 {
    (DICE_MIN_SUM..=DICE_MAX_SUM)
        .filter(|&sum| condition.is_satisfied_by(sum))
        .map(ways_for_sum)
        .sum()
}

/// Win probability for `condition`.
pub fn probability(condition: DiceCondition) -> f64 {
    ways_for(condition) as f64 / DICE_OUTCOMES as f64
}

/// Multiplier under the reference payout floors.
pub fn multiplier(condition: DiceCondition, house_edge: f64) -> f64 {
    let floor = if condition.is_exact() {
        DICE_MIN_MULTIPLIER_EXACT
    } else {
        DICE_MIN_MULTIPLIER_RANGE
    };
    multiplier_with_floor(condition, house_edge, floor)
}

fn multiplier_with_floor(condition: DiceCondition, house_edge: f64, floor: f64) -> f64 {
    let p = probability(condition);
    if p == 0.0 {
        return DICE_DEGENERATE_MULTIPLIER;
    }
    floor.max((1.0 - house_edge) / p)
}

/// Whether `roll` wins `condition`.
pub fn evaluate(roll: DiceRoll, condition: DiceCondition) -> bool {
    condition.is_satisfied_by(roll.sum())
}

/// Convert a multiplier to basis points.
pub fn to_basis_points(multiplier: f64) -> u64 {
    (multiplier * BASIS_POINTS as f64).round() as u64
}

/// Result of one dice round.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiceOutcome {
    pub roll: DiceRoll,
    pub condition: DiceCondition,
    pub won: bool,
    /// Multiplier offered for the condition (paid only on a win).
    pub multiplier: f64,
    /// Coins to credit (0 on a loss).
    pub payout: u64,
}

/// Odds engine for threshold bets on two dice.
#[derive(Clone, Debug, PartialEq)]
pub struct OddsEngine {
    house_edge: f64,
    min_multiplier_range: f64,
    min_multiplier_exact: f64,
}

impl Default for OddsEngine {
    fn default() -> Self {
        Self::new(DICE_HOUSE_EDGE)
    }
}

impl OddsEngine {
    pub fn new(house_edge: f64) -> Self {
        Self {
            house_edge,
            min_multiplier_range: DICE_MIN_MULTIPLIER_RANGE,
            min_multiplier_exact: DICE_MIN_MULTIPLIER_EXACT,
        }
    }

    pub fn from_config(config: &DiceConfig) -> Self {
        Self {
            house_edge: config.house_edge,
            min_multiplier_range: config.min_multiplier_range,
            min_multiplier_exact: config.min_multiplier_exact,
        }
    }

    pub fn house_edge(&self) -> f64 {
        self.house_edge
    }

    pub fn min_multiplier(&self, condition: DiceCondition) -> f64 {
        if condition.is_exact() {
            self.min_multiplier_exact
        } else {
            self.min_multiplier_range
        }
    }

    pub fn multiplier(&self, condition: DiceCondition) -> f64 {
        multiplier_with_floor(condition, self.house_edge, self.min_multiplier(condition))
    }

    /// Coins paid for a winning `bet` on `condition`.
    pub fn payout(&self, bet: u64, condition: DiceCondition) -> u64 {
        let bps = to_basis_points(self.multiplier(condition)) as u128;
        let payout = (bet as u128 * bps) / BASIS_POINTS as u128;
        u64::try_from(payout).unwrap_or(u64::MAX)
    }

    /// Expected return per coin staked (1 - effective house edge).
    pub fn expected_return(&self, condition: DiceCondition) -> f64 {
        probability(condition) * self.multiplier(condition)
    }

    pub fn roll<R: RandomSource + ?Sized>(&self, rng: &mut R) -> DiceRoll {
        DiceRoll(rng.roll_die(), rng.roll_die())
    }

    /// Roll and settle a bet. The caller has already deducted `bet`.
    pub fn play<R: RandomSource + ?Sized>(
        &self,
        bet: u64,
        condition: DiceCondition,
        rng: &mut R,
    ) -> DiceOutcome {
        let roll = self.roll(rng);
        let won = evaluate(roll, condition);
        DiceOutcome {
            roll,
            condition,
            won,
            multiplier: self.multiplier(condition),
            payout: if won { self.payout(bet, condition) } else { 0 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::ScriptedRng;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_ways_table() {
        assert_eq!(ways_for(DiceCondition::Under(7)), 15);
        assert_eq!(ways_for(DiceCondition::Over(7)), 15);
        assert_eq!(ways_for(DiceCondition::Exact(7)), 6);
        assert_eq!(ways_for(DiceCondition::Under(12)), 35);
        assert_eq!(ways_for(DiceCondition::Over(2)), 35);
        assert_eq!(ways_for(DiceCondition::Exact(2)), 1);
        assert_eq!(ways_for(DiceCondition::Under(2)), 0);
        assert_eq!(ways_for(DiceCondition::Over(12)), 0);
    }

    #[test]
    fn test_ways_partition_for_every_target() {
        for t in 2..=12 {
            let total = ways_for(DiceCondition::Under(t))
                + ways_for(DiceCondition::Over(t))
                + ways_for(DiceCondition::Exact(t));
            assert_eq!(total, 36, "target {t}");
        }
        let exact: u32 = (2..=12).map(|t| ways_for(DiceCondition::Exact(t))).sum();
        assert_eq!(exact, 36);
    }

    #[test]
    fn test_multiplier_values() {
        // (1 - 0.15) / (15/36) = 2.04
        assert!((multiplier(DiceCondition::Under(7), 0.15) - 2.04).abs() < EPS);
        // (1 - 0.15) / (6/36) = 5.1
        assert!((multiplier(DiceCondition::Exact(7), 0.15) - 5.1).abs() < EPS);
        // (1 - 0.15) / (35/36) = 0.874..., floored to 1.01
        assert_eq!(multiplier(DiceCondition::Under(12), 0.15), 1.01);
        // Exact floor is 2.0; (0.85 / (1/36)) = 30.6 is above it.
        assert!((multiplier(DiceCondition::Exact(12), 0.15) - 30.6).abs() < EPS);
    }

    #[test]
    fn test_degenerate_conditions() {
        for condition in [DiceCondition::Under(2), DiceCondition::Over(12)] {
            assert_eq!(probability(condition), 0.0);
            assert_eq!(multiplier(condition, 0.15), 1.0);
        }
    }

    #[test]
    fn test_evaluate_by_kind() {
        let roll = DiceRoll(3, 4);
        assert!(!evaluate(roll, DiceCondition::Under(7)));
        assert!(!evaluate(roll, DiceCondition::Over(7)));
        assert!(evaluate(roll, DiceCondition::Exact(7)));
        assert!(evaluate(roll, DiceCondition::Under(8)));
        assert!(evaluate(roll, DiceCondition::Over(6)));
    }

    #[test]
    fn test_payout_uses_basis_points() {
        let engine = OddsEngine::default();
        assert_eq!(engine.payout(100, DiceCondition::Under(7)), 204);
        assert_eq!(engine.payout(10, DiceCondition::Exact(7)), 51);
        assert_eq!(engine.payout(1, DiceCondition::Under(12)), 1);
        assert_eq!(engine.payout(1_000, DiceCondition::Under(12)), 1_010);
    }

    #[test]
    fn test_play_win_and_loss() {
        let engine = OddsEngine::default();

        let mut rng = ScriptedRng::dice(&[1, 2]);
        let outcome = engine.play(100, DiceCondition::Under(7), &mut rng);
        assert_eq!(outcome.roll, DiceRoll(1, 2));
        assert!(outcome.won);
        assert_eq!(outcome.payout, 204);

        let mut rng = ScriptedRng::dice(&[6, 6]);
        let outcome = engine.play(100, DiceCondition::Under(7), &mut rng);
        assert!(!outcome.won);
        assert_eq!(outcome.payout, 0);
    }

    #[test]
    fn test_configured_floor() {
        let engine = OddsEngine::from_config(&DiceConfig {
            house_edge: 0.0,
            min_multiplier_range: 1.5,
            ..Default::default()
        });
        assert_eq!(engine.multiplier(DiceCondition::Over(2)), 1.5);
        assert!((engine.multiplier(DiceCondition::Over(7)) - 2.4).abs() < EPS);
    }

    #[test]
    fn test_expected_return_matches_edge_above_floor() {
        let engine = OddsEngine::default();
        for condition in [
            DiceCondition::Under(7),
            DiceCondition::Over(5),
            DiceCondition::Exact(9),
        ] {
            assert!((engine.expected_return(condition) - 0.85).abs() < EPS);
        }
    }

    proptest! {
        #[test]
        fn prop_multiplier_respects_floor(target in 0u8..=20, edge in 0.0f64..0.99, kind in 0u8..3) {
            let condition = match kind {
                0 => DiceCondition::Under(target),
                1 => DiceCondition::Over(target),
                _ => DiceCondition::Exact(target),
            };
            let engine = OddsEngine::new(edge);
            let m = engine.multiplier(condition);
            let p = probability(condition);
            if p == 0.0 {
                prop_assert_eq!(m, 1.0);
            } else {
                let floor = engine.min_multiplier(condition);
                prop_assert!(m >= floor);
                let fair = (1.0 - edge) / p;
                prop_assert_eq!(m == floor, fair <= floor);
            }
        }
    }
}
