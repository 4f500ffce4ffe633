//! Trait-based API shared by the sortable sequence implementations.

use std::ops::Range;

use crate::error::Result;
use crate::policy::Monoid;

/// A sequence of `(key, value)` slots supporting point assignment, range
/// folds and range sorts by key.
///
/// - Keys live in `[0, key_max)` and are pairwise distinct.
/// - Ranges are half-open: `[l, r)`.
/// - Folds run left to right in position order.
pub trait RangeSortFold: Sized {
    type Policy: Monoid;

    fn new(
        key_max: usize,
        keys: &[usize],
        values: Vec<<Self::Policy as Monoid>::Value>,
    ) -> Result<Self>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, index: usize) -> Result<(usize, <Self::Policy as Monoid>::Value)>;

    fn set(
        &mut self,
        index: usize,
        key: usize,
        value: <Self::Policy as Monoid>::Value,
    ) -> Result<()>;

    fn prod(&mut self, range: Range<usize>) -> Result<<Self::Policy as Monoid>::Value>;

    fn prod_all(&self) -> <Self::Policy as Monoid>::Value;

    /// Sorts the range by ascending key; values travel with their keys.
    fn sort_inc(&mut self, range: Range<usize>) -> Result<()>;

    /// Sorts the range by descending key; values travel with their keys.
    fn sort_dec(&mut self, range: Range<usize>) -> Result<()>;

    fn eval(
        value: &<Self::Policy as Monoid>::Value,
        x: <Self::Policy as Monoid>::Scalar,
    ) -> <Self::Policy as Monoid>::Scalar {
        <Self::Policy as Monoid>::eval(value, x)
    }
}
