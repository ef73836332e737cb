//! Coordinate mapping onto the torus.

/// Maps `(row, col)` to the row-major index of the torus cell it names.
///
/// Only one wrap step is corrected: anything below zero lands on the last
/// row/column and anything past the end lands on the first. Callers must
/// stay within one step of the grid; use [`wrap`] first otherwise.
#[inline]
pub fn translate(row: i64, col: i64, num_rows: usize, num_cols: usize) -> usize {
    let col = if col < 0 {
        num_cols - 1
    } else if col >= num_cols as i64 {
        0
    } else {
        col as usize
    };
    let row = if row < 0 {
        num_rows - 1
    } else if row >= num_rows as i64 {
        0
    } else {
        row as usize
    };
    row * num_cols + col
}

/// Euclidean wrap of an arbitrary coordinate into `0..extent`.
#[inline]
pub fn wrap(value: i64, extent: usize) -> i64 {
    value.rem_euclid(extent as i64)
}
