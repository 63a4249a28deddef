use crate::digit_set::DigitSet;
use crate::topology::{Cell, GRID};
use colored::Colorize;
use derive_more::{Display, Error};
use itertools::Itertools;
use std::fmt;

/// Plain snapshot of all 81 candidate sets.
pub type Grid = [DigitSet; GRID];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: Grid,
    pub state: BoardState,
    log: AssignmentLog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardState {
    Unknown,
    /// Consistent but undetermined; holds the most constrained cell for
    /// the next guess.
    Stalled(Cell),
    Contradiction,
    Solved,
}

#[derive(Debug, Display, Error, PartialEq, Eq)]
pub enum ParseError {
    #[display("grid must be exactly 81 characters, got {len}")]
    BadLength { len: usize },
    #[display("invalid character {ch:?} at position {index}")]
    BadChar { ch: char, index: usize },
}

/// Ordered snapshots of the grid, appended whenever a cell is first
/// narrowed down to a single digit. Travels with the board, so each
/// search branch owns the log of its own lineage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentLog {
    enabled: bool,
    snapshots: Vec<Grid>,
}

impl AssignmentLog {
    pub fn snapshots(&self) -> &[Grid] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl Board {
    /// Parses the canonical 81-character row-major form, `'.'` for an
    /// unfilled cell.
    pub fn parse(grid: &str) -> Result<Self, ParseError> {
        let chars = grid.chars().collect_vec();
        if chars.len() != GRID {
            return Err(ParseError::BadLength { len: chars.len() });
        }
        let mut cells = [DigitSet::ALL; GRID];
        for (index, &ch) in chars.iter().enumerate() {
            match ch {
                '.' => {}
                '1'..='9' => cells[index] = DigitSet::single(ch as u8 - b'0'),
                ch => return Err(ParseError::BadChar { ch, index }),
            }
        }
        Ok(Self {
            cells,
            state: BoardState::Unknown,
            log: AssignmentLog::default(),
        })
    }

    /// Turns on assignment recording for this board and its clones.
    pub fn record_assignments(mut self) -> Self {
        self.log.enabled = true;
        self
    }

    pub fn candidates(&self, cell: Cell) -> DigitSet {
        self.cells[cell]
    }

    /// The single write choke-point: every rule routes its updates through
    /// here so the log stays accurate. Writing an identical set is a
    /// no-op; narrowing a cell to a single digit for the first time
    /// appends a snapshot.
    pub fn assign(&mut self, cell: Cell, candidates: DigitSet) {
        if self.cells[cell] == candidates {
            return;
        }
        let was_single = self.cells[cell].len() == 1;
        self.cells[cell] = candidates;
        if self.log.enabled && candidates.len() == 1 && !was_single {
            self.log.snapshots.push(self.cells);
        }
    }

    pub fn solved_count(&self) -> usize {
        self.cells.iter().filter(|set| set.len() == 1).count()
    }

    pub fn is_solved(&self) -> bool {
        matches!(self.state, BoardState::Solved)
    }

    pub fn log(&self) -> &AssignmentLog {
        &self.log
    }

    /// The 81-digit solution string, if every cell is down to one digit.
    pub fn solution(&self) -> Option<String> {
        self.cells
            .iter()
            .map(|set| set.as_single())
            .map(|digit| digit.map(|d| char::from(b'0' + d)))
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widest = self.cells.iter().map(|set| set.len().max(1)).max();
        let width = 1 + widest.unwrap_or(1);
        let separator = (0..3).map(|_| "-".repeat(width * 3)).join("+");
        for row in 0..9 {
            let mut line = String::new();
            for col in 0..9 {
                let set = self.cells[row * 9 + col];
                let token = if set.is_empty() {
                    "!".to_string()
                } else {
                    set.to_string()
                };
                let padded = format!("{token:^width$}");
                let painted = if set.is_empty() {
                    padded.red().to_string()
                } else if set.len() > 1 {
                    padded.blue().to_string()
                } else {
                    padded
                };
                line.push_str(&painted);
                if col == 2 || col == 5 {
                    line.push('|');
                }
            }
            writeln!(f, "{line}")?;
            if row == 2 || row == 5 {
                writeln!(f, "{separator}")?;
            }
        }
        Ok(())
    }
}
