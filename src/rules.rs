use crate::board::{Board, BoardState};
use crate::digit_set::DigitSet;
use crate::topology::{topology, Cell, GRID};
use itertools::Itertools;
use log::debug;

/// Removes each solved cell's digit from all of its peers. The set of
/// solved cells is snapshotted up front, so cells solved by this same
/// pass only eliminate on the next one.
pub fn eliminate(board: &mut Board) {
    let top = topology();
    let solved = (0..GRID)
        .filter_map(|cell| board.candidates(cell).as_single().map(|digit| (cell, digit)))
        .collect_vec();
    for (cell, digit) in solved {
        for &peer in top.peers_of(cell) {
            let set = board.candidates(peer);
            if set.contains(digit) {
                board.assign(peer, set.removed(digit));
            }
        }
    }
}

/// For every unit and digit: if only one cell of the unit still admits
/// the digit, that cell takes it exclusively.
pub fn only_choice(board: &mut Board) {
    let top = topology();
    for unit in top.units() {
        for digit in 1..=9 {
            let holders = unit
                .iter()
                .filter(|&&cell| board.candidates(cell).contains(digit))
                .collect_vec();
            if let [&cell] = holders[..] {
                board.assign(cell, DigitSet::single(digit));
            }
        }
    }
}

/// Two cells of a unit sharing the same two-digit candidate set lock
/// those digits between them; every other cell of the unit drops both.
pub fn naked_twins(board: &mut Board) {
    let top = topology();
    for unit in top.units() {
        // pair values held by at least two cells, in first-occurrence order
        let mut pairs: Vec<(DigitSet, usize)> = Vec::new();
        for &cell in unit {
            let set = board.candidates(cell);
            if set.len() != 2 {
                continue;
            }
            match pairs.iter_mut().find(|(pair, _)| *pair == set) {
                Some((_, count)) => *count += 1,
                None => pairs.push((set, 1)),
            }
        }
        for (pair, _) in pairs.into_iter().filter(|&(_, count)| count > 1) {
            for &cell in unit {
                // the twins themselves keep their pair
                if board.candidates(cell) == pair {
                    continue;
                }
                for digit in pair.iter() {
                    let set = board.candidates(cell);
                    if set.contains(digit) {
                        board.assign(cell, set.removed(digit));
                    }
                }
            }
        }
    }
}

/// Runs naked-twins, eliminate and only-choice until a full pass leaves
/// the solved-cell count unchanged, then classifies the board: any empty
/// candidate set is a contradiction, all-singles is a solution, anything
/// else stalls on the most constrained undetermined cell.
pub fn reduce(board: &mut Board) {
    loop {
        let before = board.solved_count();
        naked_twins(board);
        eliminate(board);
        only_choice(board);
        if (0..GRID).any(|cell| board.candidates(cell).is_empty()) {
            board.state = BoardState::Contradiction;
            return;
        }
        let after = board.solved_count();
        debug!("propagation pass: {before} -> {after} solved");
        if after == before {
            break;
        }
    }
    board.state = match most_constrained(board) {
        Some(cell) => BoardState::Stalled(cell),
        None => BoardState::Solved,
    };
}

/// Minimum-remaining-values choice: the unsolved cell with the fewest
/// candidates, ties broken by row-major order.
fn most_constrained(board: &Board) -> Option<Cell> {
    let mut best: Option<(usize, Cell)> = None;
    for cell in 0..GRID {
        let count = board.candidates(cell).len();
        if count > 1 && best.map_or(true, |(fewest, _)| count < fewest) {
            best = Some((count, cell));
        }
    }
    best.map(|(_, cell)| cell)
}
