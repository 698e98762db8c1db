//! Aligned indicator series with explicit warm-up markers.
//!
//! Every indicator returns a `Series` whose length equals its source
//! candle series. Positions before the warm-up period hold `None`, never
//! omitted and never re-indexed, so downstream code can line indicator
//! values up with candles by index alone.

/// A numeric series aligned 1:1 with its source, with `None` marking
/// positions that are not yet computable.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Series(Vec<Option<f64>>);

impl Series {
    pub fn new(values: Vec<Option<f64>>) -> Self {
        Series(values)
    }

    /// A series of `len` markers, for inputs shorter than the warm-up.
    pub fn empty(len: usize) -> Self {
        Series(vec![None; len])
    }

    pub fn from_values(values: Vec<f64>) -> Self {
        Series(values.into_iter().map(Some).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<f64> {
        self.0.get(idx).copied().flatten()
    }

    pub fn push(&mut self, value: Option<f64>) {
        self.0.push(value);
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.0
    }

    /// Most recent computable value, scanning back past trailing markers.
    pub fn last_value(&self) -> Option<f64> {
        self.0.iter().rev().find_map(|v| *v)
    }

    /// The two most recent computable values as `(prev, last)`.
    pub fn last_two(&self) -> (Option<f64>, Option<f64>) {
        let mut it = self.0.iter().rev().filter_map(|v| *v);
        let last = it.next();
        let prev = it.next();
        (prev, last)
    }

    /// Up to `n` most recent computable values, oldest first.
    pub fn last_n(&self, n: usize) -> Vec<f64> {
        let mut out: Vec<f64> = self
            .0
            .iter()
            .rev()
            .filter_map(|v| *v)
            .take(n)
            .collect();
        out.reverse();
        out
    }

    /// True if no position is computable.
    pub fn all_none(&self) -> bool {
        self.0.iter().all(|v| v.is_none())
    }

    /// Apply a dense transform to the valid subsequence only, then scatter
    /// the results back to their original indices.
    ///
    /// Smoothing a null-padded series directly would fold the warm-up
    /// markers into the window arithmetic and silently shrink (or corrupt)
    /// the valid output range; MACD's signal line and the Stochastic
    /// double smoothing both require this compact/re-expand discipline.
    pub fn map_compact<F>(&self, f: F) -> Series
    where
        F: FnOnce(&[f64]) -> Series,
    {
        let mut vals = Vec::new();
        let mut idxs = Vec::new();
        for (i, v) in self.0.iter().enumerate() {
            if let Some(x) = v {
                vals.push(*x);
                idxs.push(i);
            }
        }
        let transformed = f(&vals);
        let mut out = vec![None; self.0.len()];
        for (j, idx) in idxs.iter().enumerate() {
            out[*idx] = transformed.get(j);
        }
        Series(out)
    }

    /// Combine two aligned series pointwise; `None` wherever either side
    /// is not computable.
    pub fn zip_with<F>(&self, other: &Series, f: F) -> Series
    where
        F: Fn(f64, f64) -> f64,
    {
        let out = self
            .0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| match (a, b) {
                (Some(x), Some(y)) => Some(f(*x, *y)),
                _ => None,
            })
            .collect();
        Series(out)
    }
}

impl From<Vec<Option<f64>>> for Series {
    fn from(values: Vec<Option<f64>>) -> Self {
        Series(values)
    }
}
