use crate::{
    board::{Board, BoardState},
    digit_set::DigitSet,
    graph::{dfs, dfs_parallel, Graph, GraphControl},
    rules::reduce,
};
use derive_more::{Display, Error};

/// Exhausted search: no branch from the root leads to a solution.
#[derive(Debug, Display, Error, PartialEq, Eq)]
#[display("no solution exists ({iterations} nodes explored)")]
pub struct NoSolution {
    pub iterations: usize,
}

#[derive(Clone)]
struct DiagonalSudoku;

impl Graph for DiagonalSudoku {
    type Node = Board;

    fn neighbours(&self, node: &Self::Node) -> Vec<Self::Node> {
        match node.state {
            BoardState::Unknown | BoardState::Solved => unreachable!(),
            BoardState::Stalled(cell) => node
                .candidates(cell)
                .iter()
                .map(|digit| {
                    let mut branch = node.clone();
                    branch.assign(cell, DigitSet::single(digit));
                    branch
                })
                .collect(),
            BoardState::Contradiction => Vec::new(),
        }
    }

    fn check_goal(&self, node: &mut Self::Node) -> GraphControl {
        reduce(node);
        match node.state {
            BoardState::Contradiction => GraphControl::Prune,
            BoardState::Solved => GraphControl::Finish,
            _ => GraphControl::Continue,
        }
    }
}

/// Solves a board; returns the solution and the number of search nodes
/// expanded.
pub fn solve(board: Board) -> Result<(Board, usize), NoSolution> {
    dfs(DiagonalSudoku, board).map_err(|iterations| NoSolution { iterations })
}

pub fn solve_parallel(board: Board) -> Result<(Board, usize), NoSolution> {
    dfs_parallel(DiagonalSudoku, board).map_err(|iterations| NoSolution { iterations })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::topology;
    use itertools::Itertools;

    const KNOWN_GRID: &str =
        "2.............62....1....7...6..8...3...9...7...6..4...4....8....52.............3";
    const KNOWN_SOLUTION: &str =
        "267945381853716249491823576576438192384192657129657438642379815935281764718564923";
    const EMPTY_GRID_SOLUTION: &str =
        "123456789456789123789123456935241867617538294842697531298314675371865942564972318";

    fn assert_valid(board: &Board) {
        for unit in topology().units() {
            let digits = unit
                .iter()
                .filter_map(|&cell| board.candidates(cell).as_single())
                .unique()
                .count();
            assert_eq!(digits, 9, "unit {unit:?} breaks the validity invariant");
        }
    }

    #[test]
    fn solve_works_on_the_known_grid() {
        let board = Board::parse(KNOWN_GRID).unwrap();
        let (solution, iterations) = solve(board).unwrap();
        println!("({iterations} iterations)\n{solution}");
        assert!(solution.is_solved());
        assert_eq!(solution.solution().as_deref(), Some(KNOWN_SOLUTION));
        assert_valid(&solution);
    }

    #[test]
    fn solve_fills_the_empty_grid_deterministically() {
        let empty = ".".repeat(81);
        let (first, _) = solve(Board::parse(&empty).unwrap()).unwrap();
        let (second, _) = solve(Board::parse(&empty).unwrap()).unwrap();
        assert_eq!(first.solution(), second.solution());
        assert_eq!(first.solution().as_deref(), Some(EMPTY_GRID_SOLUTION));
        assert_valid(&first);
    }

    #[test]
    fn solve_reports_a_conflict_as_no_solution() {
        // two 5s in the same row
        let grid = format!("55{}", ".".repeat(79));
        let err = solve(Board::parse(&grid).unwrap()).unwrap_err();
        assert_eq!(err.iterations, 1);
    }

    #[test]
    fn solve_parallel_agrees_on_the_known_grid() {
        let board = Board::parse(KNOWN_GRID).unwrap();
        let (sequential, iterations_sequential) = solve(board.clone()).unwrap();
        let (parallel, iterations_parallel) = solve_parallel(board).unwrap();
        println!("Sequential iterations: {iterations_sequential}");
        println!("Parallel iterations  : {iterations_parallel}");
        assert_eq!(sequential.solution(), parallel.solution());
        assert_eq!(parallel.solution().as_deref(), Some(KNOWN_SOLUTION));
    }

    #[test]
    fn solve_parallel_never_declares_exhaustion_on_a_solvable_grid() {
        // the exhaustion check must not fire while a worker still holds
        // an unprocessed board, so repeated runs may never yield NoSolution
        let empty = ".".repeat(81);
        for _ in 0..100 {
            let (solution, _) = solve_parallel(Board::parse(&empty).unwrap()).unwrap();
            assert_valid(&solution);
        }
    }

    #[test]
    fn solve_parallel_reports_a_conflict_as_no_solution() {
        let grid = format!("5.5{}", ".".repeat(78));
        assert!(solve_parallel(Board::parse(&grid).unwrap()).is_err());
    }

    #[test]
    fn the_log_replays_the_winning_lineage() {
        let board = Board::parse(KNOWN_GRID).unwrap().record_assignments();
        let (solution, _) = solve(board).unwrap();
        let log = solution.log();
        assert!(!log.is_empty());

        // every snapshot narrows one more cell; counts never regress
        let solved_counts = log
            .snapshots()
            .iter()
            .map(|grid| grid.iter().filter(|set| set.len() == 1).count())
            .collect_vec();
        for (before, after) in solved_counts.iter().tuple_windows() {
            assert!(before <= after);
        }

        let last = log.snapshots().last().unwrap();
        assert!(last.iter().all(|set| set.len() == 1));
    }
}
