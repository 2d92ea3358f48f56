//! Per-bar value series with explicit undefined elements.
//!
//! Every indicator is a `Series` aligned 1:1 with the bar sequence. An element
//! is `None` while a windowed computation lacks history (or a divisor window is
//! degenerate). Undefined elements never satisfy a comparison; display
//! substitution happens only at the reporting boundary.

/// A dense mapping from bar index to an optional numeric value.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    values: Vec<Option<f64>>,
}

impl Series {
    pub fn new(values: Vec<Option<f64>>) -> Self {
        Self { values }
    }

    /// A series of `len` undefined elements.
    pub fn undefined(len: usize) -> Self {
        Self {
            values: vec![None; len],
        }
    }

    /// A fully-defined series from raw values.
    pub fn from_values(values: &[f64]) -> Self {
        Self {
            values: values.iter().map(|&v| Some(v)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `index`, `None` when undefined or out of range.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.values.iter().copied()
    }

    /// Element-wise combination; undefined wherever either input is undefined.
    pub fn zip_with(&self, other: &Series, f: impl Fn(f64, f64) -> f64) -> Series {
        let values = self
            .values
            .iter()
            .zip(&other.values)
            .map(|(a, b)| match (a, b) {
                (Some(a), Some(b)) => Some(f(*a, *b)),
                _ => None,
            })
            .collect();
        Series { values }
    }
}
