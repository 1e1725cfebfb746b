use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error as ThisError;

/// Validation failures for symbol and payline tables.
#[derive(Debug, ThisError, Clone, PartialEq)]
pub enum TableError {
    #[error("symbol table is empty")]
    EmptySymbols,
    #[error("weight for {symbol} must be finite and positive (got {weight})")]
    InvalidWeight { symbol: Symbol, weight: f64 },
    #[error("symbol {symbol} appears more than once")]
    DuplicateSymbol { symbol: Symbol },
    #[error("payline row {row} out of range (rows={rows})")]
    RowOutOfRange { row: u8, rows: usize },
    #[error("payline count {0} is not supported")]
    UnsupportedLineCount(u8),
    #[error("{count}-line set has {got} paylines")]
    LineCountMismatch { count: u8, got: usize },
    #[error("no payline set configured for {count} lines")]
    MissingLineSet { count: u8 },
}

/// Reel symbols, lowest paying first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbol {
    Cherry,
    Lemon,
    Orange,
    Grape,
    Bell,
    Star,
    Diamond,
    Jackpot,
}

impl Symbol {
    pub const ALL: [Symbol; 8] = [
        Symbol::Cherry,
        Symbol::Lemon,
        Symbol::Orange,
        Symbol::Grape,
        Symbol::Bell,
        Symbol::Star,
        Symbol::Diamond,
        Symbol::Jackpot,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Symbol::Cherry => "Cherry",
            Symbol::Lemon => "Lemon",
            Symbol::Orange => "Orange",
            Symbol::Grape => "Grape",
            Symbol::Bell => "Bell",
            Symbol::Star => "Star",
            Symbol::Diamond => "Diamond",
            Symbol::Jackpot => "Jackpot",
        }
    }

    /// Glyph shown on the reels.
    pub fn glyph(self) -> &'static str {
        match self {
            Symbol::Cherry => "🍒",
            Symbol::Lemon => "🍋",
            Symbol::Orange => "🍊",
            Symbol::Grape => "🍇",
            Symbol::Bell => "🔔",
            Symbol::Star => "⭐",
            Symbol::Diamond => "💎",
            Symbol::Jackpot => "🎰",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of the paytable.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SymbolEntry {
    pub symbol: Symbol,
    /// Line multiplier paid for three of a kind.
    pub payout: u64,
    /// Relative frequency on the reels.
    pub weight: f64,
}

impl SymbolEntry {
    pub const fn new(symbol: Symbol, payout: u64, weight: f64) -> Self {
        Self {
            symbol,
            payout,
            weight,
        }
    }
}

/// Validated, ordered symbol table.
///
/// Deserialization goes through [`SymbolTable::new`], so a table loaded from
/// configuration is always non-empty with positive weights.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SymbolEntry>", into = "Vec<SymbolEntry>")]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
}

impl SymbolTable {
    pub fn new(entries: Vec<SymbolEntry>) -> Result<Self, TableError> {
        if entries.is_empty() {
            return Err(TableError::EmptySymbols);
        }
        for (idx, entry) in entries.iter().enumerate() {
            if !entry.weight.is_finite() || entry.weight <= 0.0 {
                return Err(TableError::InvalidWeight {
                    symbol: entry.symbol,
                    weight: entry.weight,
                });
            }
            if entries[..idx].iter().any(|e| e.symbol == entry.symbol) {
                return Err(TableError::DuplicateSymbol {
                    symbol: entry.symbol,
                });
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }

    pub fn get(&self, symbol: Symbol) -> Option<&SymbolEntry> {
        self.entries.iter().find(|e| e.symbol == symbol)
    }

    /// Line multiplier for `symbol`, or 0 if it is not in the table.
    pub fn payout(&self, symbol: Symbol) -> u64 {
        self.get(symbol).map(|e| e.payout).unwrap_or(0)
    }

    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|e| e.weight).sum()
    }

    /// Probability of drawing `symbol` in a single cell.
    pub fn probability(&self, symbol: Symbol) -> f64 {
        match self.get(symbol) {
            Some(entry) => entry.weight / self.total_weight(),
            None => 0.0,
        }
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self {
            entries: vec![
                SymbolEntry::new(Symbol::Cherry, 2, 25.0),
                SymbolEntry::new(Symbol::Lemon, 3, 20.0),
                SymbolEntry::new(Symbol::Orange, 4, 18.0),
                SymbolEntry::new(Symbol::Grape, 5, 15.0),
                SymbolEntry::new(Symbol::Bell, 8, 10.0),
                SymbolEntry::new(Symbol::Star, 12, 7.0),
                SymbolEntry::new(Symbol::Diamond, 20, 4.0),
                SymbolEntry::new(Symbol::Jackpot, 100, 1.0),
            ],
        }
    }
}

impl TryFrom<Vec<SymbolEntry>> for SymbolTable {
    type Error = TableError;

    fn try_from(entries: Vec<SymbolEntry>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<SymbolTable> for Vec<SymbolEntry> {
    fn from(table: SymbolTable) -> Self {
        table.entries
    }
}
