use dlspins_types::casino::{GameKind, RoundOutcome};
use serde::Serialize;

/// Running per-round net/wager moments.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stats {
    trials: u64,
    wagered: u64,
    won: u64,
    big_wins: u64,
    total_net: f64,
    total_net_sq: f64,
}

impl Stats {
    pub fn add(&mut self, outcome: &RoundOutcome) {
        let net = outcome.net() as f64;
        self.trials += 1;
        self.wagered = self.wagered.saturating_add(outcome.bet);
        self.won = self.won.saturating_add(outcome.win_amount);
        if outcome.is_big_win() {
            self.big_wins += 1;
        }
        self.total_net += net;
        self.total_net_sq += net * net;
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    pub fn wagered(&self) -> u64 {
        self.wagered
    }

    pub fn won(&self) -> u64 {
        self.won
    }

    pub fn net(&self) -> i128 {
        self.won as i128 - self.wagered as i128
    }

    pub fn mean_net(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.total_net / self.trials as f64
        }
    }

    pub fn mean_wagered(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.wagered as f64 / self.trials as f64
        }
    }

    pub fn rtp(&self) -> f64 {
        if self.wagered == 0 {
            0.0
        } else {
            self.won as f64 / self.wagered as f64
        }
    }

    pub fn house_edge(&self) -> f64 {
        let mw = self.mean_wagered();
        if mw == 0.0 {
            0.0
        } else {
            -self.mean_net() / mw
        }
    }

    /// Standard error of the house edge estimate.
    pub fn stderr(&self) -> f64 {
        if self.trials <= 1 {
            return 0.0;
        }
        let mean = self.mean_net();
        let var = (self.total_net_sq / self.trials as f64) - mean * mean;
        let var = if var < 0.0 { 0.0 } else { var };
        let mw = self.mean_wagered();
        if mw == 0.0 {
            return 0.0;
        }
        (var / self.trials as f64).sqrt() / mw
    }

    pub fn report(&self, game: GameKind) -> GameReport {
        GameReport {
            game,
            trials: self.trials,
            wagered: self.wagered,
            won: self.won,
            big_wins: self.big_wins,
            rtp: self.rtp(),
            house_edge: self.house_edge(),
            stderr: self.stderr(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameReport {
    pub game: GameKind,
    pub trials: u64,
    pub wagered: u64,
    pub won: u64,
    pub big_wins: u64,
    pub rtp: f64,
    pub house_edge: f64,
    pub stderr: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(bet: u64, win: u64, multiplier: f64) -> RoundOutcome {
        RoundOutcome::new(GameKind::Dice, bet, win, multiplier, 0)
    }

    #[test]
    fn test_moments() {
        let mut stats = Stats::default();
        stats.add(&outcome(10, 0, 0.0));
        stats.add(&outcome(10, 20, 2.0));
        stats.add(&outcome(10, 0, 0.0));
        stats.add(&outcome(10, 15, 1.5));
        assert_eq!(stats.trials(), 4);
        assert_eq!(stats.net(), -5);
        assert_eq!(stats.mean_net(), -1.25);
        assert_eq!(stats.rtp(), 35.0 / 40.0);
        assert!((stats.house_edge() - 0.125).abs() < 1e-12);
        assert!(stats.stderr() > 0.0);
    }

    #[test]
    fn test_empty() {
        let stats = Stats::default();
        assert_eq!(stats.rtp(), 0.0);
        assert_eq!(stats.house_edge(), 0.0);
        assert_eq!(stats.stderr(), 0.0);
    }
}
