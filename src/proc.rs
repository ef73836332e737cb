use tracing::debug;

use crate::{
    error::{Error, Result},
    torus,
};

/// Offsets of the eight cells around `(0, 0)`.
const NEIGHBORHOOD: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),

    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
];

/// A fixed-size toroidal grid of cells in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct World {
    num_rows: usize,
    num_cols: usize,
    cells: Vec<bool>,
}

impl World {

    /// Allocates a `rows` x `cols` world with every cell dead.
    pub fn dead(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::EmptyGrid { rows, cols });
        }

        let mut cells = Vec::new();
        cells.try_reserve_exact(rows.saturating_mul(cols))?;
        cells.resize(rows * cols, false);

        Ok(World {
            num_rows: rows,
            num_cols: cols,
            cells,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.num_rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.num_cols
    }

    #[inline]
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// The grid as 0/1 values.
    pub fn cell_values(&self) -> Vec<u8> {
        self.cells.iter().map(|&c| u8::from(c)).collect()
    }

    #[inline]
    pub fn is_alive_at(&self, index: usize) -> bool {
        self.cells[index]
    }

    /// Cell state at `(row, col)`, wrapped one step around the torus.
    #[inline]
    pub fn get(&self, row: i64, col: i64) -> bool {
        self.cells[torus::translate(row, col, self.num_rows, self.num_cols)]
    }

    #[inline]
    pub fn set(&mut self, row: i64, col: i64, alive: bool) {
        let i = torus::translate(row, col, self.num_rows, self.num_cols);
        self.cells[i] = alive;
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Live cells among the eight torus neighbours of `(row, col)` in `snapshot`.
    pub fn neighbors(&self, snapshot: &[bool], row: i64, col: i64) -> u8 {
        NEIGHBORHOOD
            .iter()
            .map(|&(dr, dc)| {
                let i = torus::translate(row + dr, col + dc, self.num_rows, self.num_cols);
                u8::from(snapshot[i])
            })
            .sum()
    }

    /// Advances the world by one generation.
    ///
    /// Every cell is computed from a private copy of the current generation,
    /// so no update observes a neighbour that already changed.
    pub fn step(&mut self) -> Result<()> {
        let mut snapshot = Vec::new();
        snapshot.try_reserve_exact(self.cells.len())?;
        snapshot.extend_from_slice(&self.cells);

        for i in 0..self.num_rows {
            for j in 0..self.num_cols {
                let (r, c) = (i as i64, j as i64);
                let n = self.neighbors(&snapshot, r, c);
                let idx = torus::translate(r, c, self.num_rows, self.num_cols);
                self.cells[idx] = next_state(snapshot[idx], n);
            }
        }

        debug!(population = self.population(), "stepped");
        Ok(())
    }
}

/// Conway's rule: survive on 2 or 3 neighbours, birth on exactly 3.
#[inline]
pub fn next_state(alive: bool, neighbors: u8) -> bool {
    match (alive, neighbors) {
        (true, 0 | 1) => false,
        (true, 2 | 3) => true,
        (true, _) => false,
        (false, 3) => true,
        (false, _) => false,
    }
}
