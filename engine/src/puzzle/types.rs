use std::fmt;

pub const MIN_CELL_VALUE: u8 = 1;
pub const MAX_CELL_VALUE: u8 = 9;

/// One grid cell. Positive while in play, negated once matched; the
/// magnitude is kept so consumed cells can still be drawn.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Cell(i8);

impl Cell {
    pub fn new(value: u8) -> Self {
        debug_assert!((MIN_CELL_VALUE..=MAX_CELL_VALUE).contains(&value));
        Self(value as i8)
    }

    pub fn from_raw(raw: i8) -> Self {
        debug_assert!((MIN_CELL_VALUE..=MAX_CELL_VALUE).contains(&raw.unsigned_abs()));
        Self(raw)
    }

    pub fn raw(self) -> i8 {
        self.0
    }

    pub fn value(self) -> u8 {
        self.0.unsigned_abs()
    }

    pub fn is_active(self) -> bool {
        self.0 > 0
    }

    pub fn consume(&mut self) {
        if self.0 > 0 {
            self.0 = -self.0;
        }
    }
}

/// Column and row of a cell, both starting at 1.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct Position {
    pub col: usize,
    pub row: usize,
}

impl Position {
    pub fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum MatchKind {
    Equal,
    SumToTarget,
}

impl MatchKind {
    /// Equality wins over the sum, so a pair of fives is `Equal` even when
    /// the target is ten.
    pub fn of(first: u8, second: u8, target: u8) -> Option<Self> {
        if first == second {
            Some(Self::Equal)
        } else if first + second == target {
            Some(Self::SumToTarget)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Orientation {
    Row,
    Column,
}

/// A playable pair found by the scanner. `first` always precedes `second`
/// in reading order.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Match {
    pub first: Position,
    pub second: Position,
    pub kind: MatchKind,
    pub orientation: Orientation,
}

impl Match {
    pub fn connects(&self, a: Position, b: Position) -> bool {
        (self.first == a && self.second == b) || (self.first == b && self.second == a)
    }
}

/// Result of a successful `match` call.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MatchOutcome {
    pub kind: MatchKind,
    pub rows_removed: usize,
    pub points: u64,
}

/// Which recovery action the economy currently recommends.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ActionOffer {
    /// Matches are plentiful; neither build nor scramble is suggested.
    NoAction,
    BuildOffered,
    ScrambleOffered,
    /// Nothing to play and nothing offered, as on a cleared grid.
    BothDisabled,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PuzzleEvent {
    Generated {
        attempts: u32,
        row_count: usize,
    },
    PairMatched {
        first: Position,
        second: Position,
        kind: MatchKind,
        points: u64,
    },
    MatchRejected {
        first: Position,
        second: Position,
    },
    RowsCleared {
        count: usize,
    },
    Built {
        added: usize,
        row_count: usize,
    },
    Scrambled {
        attempts: u32,
        multiplier: u32,
    },
    OffersChanged {
        build: bool,
        scramble: bool,
    },
    Cleared,
}
