mod board;
mod digit_set;
mod graph;
mod rules;
mod solver;
mod topology;

pub use board::{AssignmentLog, Board, BoardState, Grid, ParseError};
pub use digit_set::DigitSet;
pub use solver::{solve, solve_parallel, NoSolution};
pub use topology::{cell_at, topology, Cell, Topology, Unit};
