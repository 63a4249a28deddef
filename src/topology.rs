use itertools::Itertools;
use once_cell::sync::Lazy;

const N: usize = 9;
/// Number of cells in the grid.
pub const GRID: usize = N * N;

/// Row-major cell index, `0..81`.
pub type Cell = usize;

/// One constraint group of 9 cells.
pub type Unit = [Cell; N];

/// The 29 units (9 rows, 9 columns, 9 boxes, 2 diagonals) plus the
/// per-cell membership and peer tables derived from them. Built once,
/// shared read-only across all boards and search branches.
#[derive(Debug)]
pub struct Topology {
    units: Vec<Unit>,
    units_of: Vec<Vec<usize>>,
    peers: Vec<Vec<Cell>>,
}

static TOPOLOGY: Lazy<Topology> = Lazy::new(Topology::build);

pub fn topology() -> &'static Topology {
    &TOPOLOGY
}

pub fn cell_at(row: usize, col: usize) -> Cell {
    row * N + col
}

impl Topology {
    fn build() -> Self {
        let mut units = Vec::with_capacity(29);
        for row in 0..N {
            units.push(core::array::from_fn(|col| cell_at(row, col)));
        }
        for col in 0..N {
            units.push(core::array::from_fn(|row| cell_at(row, col)));
        }
        for (band, stack) in (0..3).cartesian_product(0..3) {
            units.push(core::array::from_fn(|i| {
                cell_at(band * 3 + i / 3, stack * 3 + i % 3)
            }));
        }
        units.push(core::array::from_fn(|i| cell_at(i, i)));
        units.push(core::array::from_fn(|i| cell_at(i, N - 1 - i)));

        let mut units_of = vec![Vec::new(); GRID];
        for (index, unit) in units.iter().enumerate() {
            for &cell in unit {
                units_of[cell].push(index);
            }
        }

        let peers = (0..GRID)
            .map(|cell| {
                units_of[cell]
                    .iter()
                    .flat_map(|&index| units[index])
                    .filter(|&peer| peer != cell)
                    .sorted()
                    .dedup()
                    .collect_vec()
            })
            .collect_vec();

        Self {
            units,
            units_of,
            peers,
        }
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Units containing `cell`.
    pub fn units_of(&self, cell: Cell) -> impl Iterator<Item = &Unit> {
        self.units_of[cell].iter().map(|&index| &self.units[index])
    }

    /// All other cells sharing at least one unit with `cell`, sorted.
    pub fn peers_of(&self, cell: Cell) -> &[Cell] {
        &self.peers[cell]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn there_are_29_units() {
        assert_eq!(topology().units().len(), 29);
    }

    #[test]
    fn every_unit_covers_9_distinct_cells() {
        for unit in topology().units() {
            let distinct = unit.iter().unique().count();
            assert_eq!(distinct, 9);
        }
    }

    #[test]
    fn unit_membership_counts() {
        let top = topology();
        for row in 0..9 {
            for col in 0..9 {
                let count = top.units_of(cell_at(row, col)).count();
                let expected = match (row == col, row + col == 8) {
                    (true, true) => 5, // centre cell sits on both diagonals
                    (true, false) | (false, true) => 4,
                    (false, false) => 3,
                };
                assert_eq!(count, expected, "cell ({row},{col})");
            }
        }
    }

    #[test]
    fn peer_counts() {
        let top = topology();
        // off-diagonal cell: row + column + box
        assert_eq!(top.peers_of(cell_at(0, 1)).len(), 20);
        // corner cell: 6 extra peers from the main diagonal
        assert_eq!(top.peers_of(cell_at(0, 0)).len(), 26);
        // centre cell: 6 extra from each diagonal
        assert_eq!(top.peers_of(cell_at(4, 4)).len(), 32);
    }

    #[test]
    fn peers_are_symmetric() {
        let top = topology();
        for cell in 0..GRID {
            for &peer in top.peers_of(cell) {
                assert!(
                    top.peers_of(peer).contains(&cell),
                    "{cell} -> {peer} not symmetric"
                );
            }
        }
    }
}
