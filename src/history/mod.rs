//! Historical annual-return record and its text-file loader

pub mod loader;

pub use loader::{load_returns, load_returns_from_reader};

/// Annual return history keyed by calendar year.
///
/// Inserting a year that is already present overwrites its return but
/// keeps the year's original position, so iteration follows
/// first-insertion order rather than chronological order. Downstream
/// resampling permutes the record anyway, but the order handed out here
/// is part of the loader's observable contract and is kept as-is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReturnSeries {
    entries: Vec<(i32, f64)>,
}

impl ReturnSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the return fraction recorded for `year`.
    pub fn insert(&mut self, year: i32, annual_return: f64) {
        if let Some(entry) = self.entries.iter_mut().find(|(y, _)| *y == year) {
            entry.1 = annual_return;
        } else {
            self.entries.push((year, annual_return));
        }
    }

    /// Return fractions in first-insertion order.
    pub fn returns(&self) -> Vec<f64> {
        self.entries.iter().map(|&(_, r)| r).collect()
    }

    /// Iterate `(year, fraction)` pairs in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &(i32, f64)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
