//! Numa - Numeric arrays
//!
//! Arrays of floating-point numbers. In this workspace they carry
//! intensity histograms: bin `i` holds the (possibly subsampled) count of
//! pixels with value `i`.

mod histogram;

pub use histogram::{HistogramStats, SplitDistribution};

use crate::error::{Error, Result};

/// Array of floating-point numbers
///
/// `Numa` manages a dynamic array of `f32` values. Callers that treat
/// it as a histogram pass the x-domain (`startx`, `deltax`) to the
/// statistics functions explicitly. Counts are stored as floats so histogram code stays independent of the
/// image depth that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct Numa {
    data: Vec<f32>,
}

impl Default for Numa {
    fn default() -> Self {
        Self::new()
    }
}

impl Numa {
    /// Create a new empty Numa
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Create a Numa with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_vec(Vec::with_capacity(capacity))
    }

    /// Create a Numa from a vector of values
    pub fn from_vec(data: Vec<f32>) -> Self {
        Self { data }
    }

    /// Create a Numa from a slice of f32 values
    pub fn from_slice(data: &[f32]) -> Self {
        Self::from_vec(data.to_vec())
    }

    /// Number of values
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get a value by index
    #[inline]
    pub fn get(&self, index: usize) -> Option<f32> {
        self.data.get(index).copied()
    }

    /// Append a value
    pub fn push(&mut self, val: f32) {
        self.data.push(val);
    }

    /// Set the value at an index
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if `index >= len`.
    pub fn set(&mut self, index: usize, val: f32) -> Result<()> {
        let len = self.data.len();
        let slot = self
            .data
            .get_mut(index)
            .ok_or(Error::IndexOutOfBounds { index, len })?;
        *slot = val;
        Ok(())
    }

    /// All values as a slice
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Get the maximum value and its (first) index
    pub fn max(&self) -> Option<(f32, usize)> {
        let mut best: Option<(f32, usize)> = None;
        for (i, &v) in self.data.iter().enumerate() {
            match best {
                Some((bv, _)) if v <= bv => {}
                _ => best = Some((v, i)),
            }
        }
        best
    }

    /// Get the sum of all values
    pub fn sum(&self) -> Option<f32> {
        if self.data.is_empty() {
            return None;
        }
        Some(self.data.iter().map(|&v| v as f64).sum::<f64>() as f32)
    }

    /// Get the sum of values in a range `[first, last]`
    ///
    /// `last` is clamped to the final index. Returns `None` if `first` is
    /// past the end or `first > last`.
    pub fn sum_on_interval(&self, first: usize, last: usize) -> Option<f32> {
        let n = self.data.len();
        if first >= n || first > last {
            return None;
        }
        let last = last.min(n - 1);
        Some(
            self.data[first..=last]
                .iter()
                .map(|&v| v as f64)
                .sum::<f64>() as f32,
        )
    }

    /// Iterate over values
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.data.iter().copied()
    }
}

impl FromIterator<f32> for Numa {
    fn from_iter<T: IntoIterator<Item = f32>>(iter: T) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl std::ops::Index<usize> for Numa {
    type Output = f32;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numa_basic() {
        let mut na = Numa::new();
        assert!(na.is_empty());
        na.push(1.0);
        na.push(3.0);
        na.push(2.0);
        assert_eq!(na.len(), 3);
        assert_eq!(na.get(1), Some(3.0));
        assert_eq!(na.max(), Some((3.0, 1)));
        assert_eq!(na.sum(), Some(6.0));
    }

    #[test]
    fn test_numa_set_out_of_bounds() {
        let mut na = Numa::from_slice(&[0.0, 0.0]);
        assert!(na.set(1, 4.0).is_ok());
        assert_eq!(na[1], 4.0);
        assert!(matches!(
            na.set(2, 1.0),
            Err(Error::IndexOutOfBounds { index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_numa_max_first_index_on_tie() {
        let na = Numa::from_slice(&[1.0, 5.0, 5.0]);
        assert_eq!(na.max(), Some((5.0, 1)));
    }

    #[test]
    fn test_sum_on_interval() {
        let na: Numa = (0..10).map(|v| v as f32).collect();
        assert_eq!(na.sum_on_interval(0, 3), Some(6.0));
        assert_eq!(na.sum_on_interval(8, 100), Some(17.0));
        assert_eq!(na.sum_on_interval(10, 12), None);
        assert_eq!(na.sum_on_interval(5, 4), None);
    }
}
