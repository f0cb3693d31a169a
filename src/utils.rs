//! Helpers shared by the evaluation drivers.
use crate::error::{Error, Result};
use crate::grid::DataGrid;
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::{Duration, Instant};

/// Shuffle the rows and cut them into disjoint train and test grids.
/// `round(rows * train_fraction)` rows go to the training side.
pub fn train_test_split<R: Rng>(
    grid: &DataGrid,
    train_fraction: f64,
    rng: &mut R,
) -> Result<(DataGrid, DataGrid)> {
    if !(0.0..=1.0).contains(&train_fraction) {
        return Err(Error::Config { field: "train_fraction" });
    }
    let mut indices: Vec<usize> = (0..grid.len()).collect();
    indices.shuffle(rng);
    let n_train = (grid.len() as f64 * train_fraction).round() as usize;
    let (train, test) = indices.split_at(n_train.min(grid.len()));
    Ok((grid.select(train), grid.select(test)))
}

/// Run `f`, returning its result and how long it took.
pub fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let out = f();
    (out, start.elapsed())
}

/// Print `name = rows x cols`
pub fn print_grid_size(name: &str, grid: &DataGrid) {
    let (cols, rows) = grid.size();
    println!("{} = {} x {}", name, rows, cols);
}
