use std::collections::HashSet;
use std::ops::Range;

use crate::error::{Result, SortableError, check_index, check_key, check_range};
use crate::policy::Monoid;
use crate::traits::RangeSortFold;

/// `Vec`-backed reference implementation: `O(r - l)` folds and
/// `O((r - l) log (r - l))` sorts.
pub struct NaiveSequence<M: Monoid> {
    key_max: usize,
    items: Vec<(usize, M::Value)>,
    live_keys: HashSet<usize>,
}

impl<M: Monoid> NaiveSequence<M> {
    pub fn to_vec(&self) -> Vec<(usize, M::Value)> {
        self.items.clone()
    }
}

impl<M: Monoid> RangeSortFold for NaiveSequence<M> {
    type Policy = M;

    fn new(key_max: usize, keys: &[usize], values: Vec<M::Value>) -> Result<Self> {
        if keys.len() != values.len() {
            return Err(SortableError::LengthMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }
        let mut live_keys = HashSet::with_capacity(keys.len());
        for &key in keys {
            check_key(key, key_max)?;
            if !live_keys.insert(key) {
                return Err(SortableError::DuplicateKey { key });
            }
        }
        Ok(Self {
            key_max,
            items: keys.iter().copied().zip(values).collect(),
            live_keys,
        })
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn get(&self, index: usize) -> Result<(usize, M::Value)> {
        check_index(index, self.items.len())?;
        Ok(self.items[index].clone())
    }

    fn set(&mut self, index: usize, key: usize, value: M::Value) -> Result<()> {
        check_index(index, self.items.len())?;
        check_key(key, self.key_max)?;
        let old_key = self.items[index].0;
        if key != old_key && self.live_keys.contains(&key) {
            return Err(SortableError::DuplicateKey { key });
        }
        self.live_keys.remove(&old_key);
        self.live_keys.insert(key);
        self.items[index] = (key, value);
        Ok(())
    }

    fn prod(&mut self, range: Range<usize>) -> Result<M::Value> {
        check_range(&range, self.items.len())?;
        Ok(self.items[range]
            .iter()
            .fold(M::unit(), |acc, (_, value)| M::op(&acc, value)))
    }

    fn prod_all(&self) -> M::Value {
        self.items
            .iter()
            .fold(M::unit(), |acc, (_, value)| M::op(&acc, value))
    }

    fn sort_inc(&mut self, range: Range<usize>) -> Result<()> {
        check_range(&range, self.items.len())?;
        self.items[range].sort_unstable_by_key(|&(key, _)| key);
        Ok(())
    }

    fn sort_dec(&mut self, range: Range<usize>) -> Result<()> {
        check_range(&range, self.items.len())?;
        self.items[range].sort_unstable_by_key(|&(key, _)| std::cmp::Reverse(key));
        Ok(())
    }
}
