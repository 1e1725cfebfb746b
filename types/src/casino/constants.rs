/// Starting coins for a new wallet
pub const STARTING_COINS: u64 = 1_000;

/// Minimum stake for any round
pub const MIN_BET: u64 = 1;

/// Maximum rounds kept in a session ledger (oldest evicted first)
pub const LEDGER_CAPACITY: usize = 50;

/// A round whose multiplier reaches this value counts as a big win
pub const BIG_WIN_MULTIPLIER: f64 = 10.0;

// Dice

/// Faces on each die.
pub const DIE_FACES: u8 = 6;

/// Number of equally likely outcomes for two dice.
pub const DICE_OUTCOMES: u32 = 36;

/// Smallest and largest reachable sum of two dice.
pub const DICE_MIN_SUM: u8 = 2;
pub const DICE_MAX_SUM: u8 = 12;

/// Reference house edge for the dice game (15%).
pub const DICE_HOUSE_EDGE: f64 = 0.15;

/// Payout floor for Under/Over bets.
pub const DICE_MIN_MULTIPLIER_RANGE: f64 = 1.01;

/// Payout floor for Exact bets.
pub const DICE_MIN_MULTIPLIER_EXACT: f64 = 2.0;

/// Multiplier reported for a condition that can never win.
pub const DICE_DEGENERATE_MULTIPLIER: f64 = 1.0;

// Slots

/// Reels (columns) on the slot machine.
pub const SLOT_REELS: usize = 3;

/// Visible rows per reel.
pub const SLOT_ROWS: usize = 3;

/// Pairs pay 30% of a full line, computed as `x * 3 / 10`.
pub const PARTIAL_MATCH_NUMERATOR: u64 = 3;
pub const PARTIAL_MATCH_DENOMINATOR: u64 = 10;

/// Bet per line bounds.
pub const MAX_BET_PER_LINE: u64 = 100;

/// Bet level bounds.
pub const MIN_BET_LEVEL: u64 = 1;
pub const MAX_BET_LEVEL: u64 = 10;

/// Quick-select values offered to players.
pub const QUICK_BETS: [u64; 6] = [1, 5, 10, 25, 50, 100];
pub const AUTO_SPIN_COUNTS: [u32; 5] = [10, 25, 50, 100, 500];

/// Delay between auto-spin rounds in milliseconds.
pub const AUTO_SPIN_DELAY_MS: u64 = 1_500;

// Grid

/// Cells on the reference 5x5 board.
pub const GRID_SIZE: usize = 25;

/// Hazards placed when the player does not choose.
pub const DEFAULT_HAZARDS: usize = 3;

/// Cash-out multiplier grows by 3/2 over the full set of safe cells:
/// `1 + (k / S) * 1.5`, settled exactly as `bet * (2S + 3k) / 2S`.
pub const GRID_PROGRESS_NUMERATOR: u64 = 3;
pub const GRID_PROGRESS_DENOMINATOR: u64 = 2;

/// Factor for the informational per-cell multiplier `1 + (H / S) * 0.3`.
pub const GRID_CELL_FACTOR: f64 = 0.3;

// Payments

/// Coins credited per unit of currency (1 EUR = 1 coin).
pub const COINS_PER_EUR: u64 = 1;

/// Top-up presets in EUR.
pub const TOP_UP_PRESETS: [u64; 6] = [5, 10, 25, 50, 100, 250];

/// Probability that the mock payment processor accepts a top-up.
pub const TOP_UP_SUCCESS_RATE: f64 = 0.9;
