use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::{Symbol, TableError, SLOT_REELS, SLOT_ROWS};

/// Visible reel window, row-major: `grid[row][reel]`.
pub type SlotGrid = [[Symbol; SLOT_REELS]; SLOT_ROWS];

/// One row index per reel, selecting a single cell from each column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[u8; 3]", into = "[u8; 3]")]
pub struct Payline([u8; SLOT_REELS]);

impl Payline {
    pub fn new(rows: [u8; SLOT_REELS]) -> Result<Self, TableError> {
        for row in rows {
            if row as usize >= SLOT_ROWS {
                return Err(TableError::RowOutOfRange {
                    row,
                    rows: SLOT_ROWS,
                });
            }
        }
        Ok(Self(rows))
    }

    pub fn rows(&self) -> [u8; SLOT_REELS] {
        self.0
    }

    /// The symbols this line reads, left reel first.
    pub fn symbols(&self, grid: &SlotGrid) -> [Symbol; SLOT_REELS] {
        let mut out = [Symbol::Cherry; SLOT_REELS];
        for (reel, row) in self.0.iter().enumerate() {
            out[reel] = grid[*row as usize][reel];
        }
        out
    }
}

impl fmt::Display for Payline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{},{}]", self.0[0], self.0[1], self.0[2])
    }
}

impl TryFrom<[u8; SLOT_REELS]> for Payline {
    type Error = TableError;

    fn try_from(rows: [u8; SLOT_REELS]) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl From<Payline> for [u8; SLOT_REELS] {
    fn from(line: Payline) -> Self {
        line.0
    }
}

/// Every payline the machine knows, in the order larger sets include them.
pub const MASTER_PAYLINES: [Payline; 25] = [
    // Straight rows
    Payline([0, 0, 0]),
    Payline([1, 1, 1]),
    Payline([2, 2, 2]),
    // Diagonals
    Payline([0, 1, 2]),
    Payline([2, 1, 0]),
    // V shapes
    Payline([1, 0, 1]),
    Payline([1, 2, 1]),
    // Inverted V shapes
    Payline([0, 1, 0]),
    Payline([2, 1, 2]),
    // Mixed patterns
    Payline([0, 0, 1]),
    Payline([0, 0, 2]),
    Payline([1, 1, 0]),
    Payline([1, 1, 2]),
    Payline([2, 2, 0]),
    Payline([2, 2, 1]),
    Payline([0, 2, 0]),
    Payline([0, 2, 1]),
    Payline([1, 0, 0]),
    Payline([1, 0, 2]),
    Payline([1, 2, 0]),
    Payline([1, 2, 2]),
    Payline([0, 1, 1]),
    Payline([2, 1, 1]),
    Payline([0, 2, 2]),
    Payline([2, 0, 0]),
];

/// Supported payline configurations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PaylineCount {
    One,
    Three,
    Five,
    Nine,
    Fifteen,
    TwentyFive,
}

impl PaylineCount {
    pub const ALL: [PaylineCount; 6] = [
        PaylineCount::One,
        PaylineCount::Three,
        PaylineCount::Five,
        PaylineCount::Nine,
        PaylineCount::Fifteen,
        PaylineCount::TwentyFive,
    ];

    pub fn lines(self) -> u8 {
        match self {
            PaylineCount::One => 1,
            PaylineCount::Three => 3,
            PaylineCount::Five => 5,
            PaylineCount::Nine => 9,
            PaylineCount::Fifteen => 15,
            PaylineCount::TwentyFive => 25,
        }
    }

    /// Default line set drawn from [`MASTER_PAYLINES`].
    ///
    /// A single line pays the middle row; larger sets take a prefix of the master list.
    pub fn default_lines(self) -> Vec<Payline> {
        match self {
            PaylineCount::One => vec![MASTER_PAYLINES[1]],
            other => MASTER_PAYLINES[..other.lines() as usize].to_vec(),
        }
    }
}

impl fmt::Display for PaylineCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines())
    }
}

impl TryFrom<u8> for PaylineCount {
    type Error = TableError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PaylineCount::One),
            3 => Ok(PaylineCount::Three),
            5 => Ok(PaylineCount::Five),
            9 => Ok(PaylineCount::Nine),
            15 => Ok(PaylineCount::Fifteen),
            25 => Ok(PaylineCount::TwentyFive),
            other => Err(TableError::UnsupportedLineCount(other)),
        }
    }
}

impl From<PaylineCount> for u8 {
    fn from(count: PaylineCount) -> Self {
        count.lines()
    }
}

/// Payline definitions for every supported count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<PaylineCount, Vec<Payline>>",
    into = "BTreeMap<PaylineCount, Vec<Payline>>"
)]
pub struct PaylineTable {
    sets: BTreeMap<PaylineCount, Vec<Payline>>,
}

impl PaylineTable {
    pub fn new(sets: BTreeMap<PaylineCount, Vec<Payline>>) -> Result<Self, TableError> {
        for count in PaylineCount::ALL {
            let lines = sets.get(&count).ok_or(TableError::MissingLineSet {
                count: count.lines(),
            })?;
            if lines.len() != count.lines() as usize {
                return Err(TableError::LineCountMismatch {
                    count: count.lines(),
                    got: lines.len(),
                });
            }
        }
        Ok(Self { sets })
    }

    pub fn lines(&self, count: PaylineCount) -> &[Payline] {
        self.sets.get(&count).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for PaylineTable {
    fn default() -> Self {
        Self {
            sets: PaylineCount::ALL
                .into_iter()
                .map(|count| (count, count.default_lines()))
                .collect(),
        }
    }
}

impl TryFrom<BTreeMap<PaylineCount, Vec<Payline>>> for PaylineTable {
    type Error = TableError;

    fn try_from(sets: BTreeMap<PaylineCount, Vec<Payline>>) -> Result<Self, Self::Error> {
        Self::new(sets)
    }
}

impl From<PaylineTable> for BTreeMap<PaylineCount, Vec<Payline>> {
    fn from(table: PaylineTable) -> Self {
        table.sets
    }
}
