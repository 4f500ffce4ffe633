use std::collections::HashSet;
use std::fmt;
use std::ops::Range;

use crate::domain_tree::{Id, NodePool, path_len};
use crate::error::{Result, SortableError, check_index, check_key, check_range};
use crate::fast_set::FastSet;
use crate::policy::Monoid;
use crate::segment_tree::SegmentTree;
use crate::traits::RangeSortFold;

/// The pool is rebuilt once more than `9/10` of its capacity is in use.
const REBUILD_NUMERATOR: usize = 9;
const REBUILD_DENOMINATOR: usize = 10;

/// Root-to-leaf paths a single operation may allocate: two splits plus one
/// fresh singleton.
const PATHS_PER_OPERATION: usize = 3;

/// Default pool size as a multiple of the nodes a full rebuild needs.
const DEFAULT_CAPACITY_FACTOR: usize = 2;

/// Sequence of `(key, value)` slots with point set, range fold and range sort.
///
/// The sequence is partitioned into runs. Each run owns one trie over the key
/// domain holding the keys of its positions, plus an orientation flag; a
/// reversed run lists its trie in descending key order. Run heads are kept in
/// a [`FastSet`], and a segment tree over positions stores each run's
/// aggregate (in run orientation) at its head and the unit everywhere else.
///
/// - `sort_inc` / `sort_dec` merge the tries of the runs inside the range.
/// - `set` / `prod` first split runs so that the range endpoints are heads.
/// - Trie nodes come from a bump pool; when it nears capacity the whole
///   structure is rebuilt from its current contents.
pub struct SortableSegmentTree<M: Monoid> {
    n: usize,
    key_max: usize,
    pool: NodePool<M>,
    heads: FastSet,
    seg: SegmentTree<M>,
    rev: Vec<bool>,
    root: Vec<Id>,
    live_keys: HashSet<usize>,
    rebuilds: usize,
}

/// Smallest pool size that lets every operation complete without running
/// out of nodes, with a rebuild never immediately retriggered.
pub fn required_capacity(len: usize, key_max: usize) -> usize {
    let path = path_len(key_max);
    let base = len * path;
    let budget = PATHS_PER_OPERATION * path;
    let keeps_slack = (base + budget) * REBUILD_DENOMINATOR / REBUILD_NUMERATOR + 1;
    keeps_slack.max(REBUILD_DENOMINATOR * budget)
}

fn default_capacity(len: usize, key_max: usize) -> usize {
    let required = required_capacity(len, key_max);
    let preferred = DEFAULT_CAPACITY_FACTOR * len * path_len(key_max);
    if required >= Id::MAX_CAPACITY {
        required
    } else {
        preferred.clamp(required, Id::MAX_CAPACITY)
    }
}

impl<M: Monoid> SortableSegmentTree<M> {
    /// Builds the structure with an explicit node budget.
    ///
    /// `capacity` must be at least [`required_capacity`]`(keys.len(), key_max)`.
    pub fn with_capacity(
        key_max: usize,
        keys: &[usize],
        values: Vec<M::Value>,
        capacity: usize,
    ) -> Result<Self> {
        if keys.len() != values.len() {
            return Err(SortableError::LengthMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }
        let n = keys.len();

        let mut live_keys = HashSet::with_capacity(n);
        for &key in keys {
            check_key(key, key_max)?;
            if !live_keys.insert(key) {
                return Err(SortableError::DuplicateKey { key });
            }
        }

        let required = required_capacity(n, key_max);
        if capacity < required {
            return Err(SortableError::CapacityTooSmall { capacity, required });
        }
        if capacity > Id::MAX_CAPACITY {
            return Err(SortableError::CapacityOverflow {
                capacity,
                max: Id::MAX_CAPACITY,
            });
        }

        let mut this = Self {
            n,
            key_max,
            pool: NodePool::new(capacity),
            heads: FastSet::new(n),
            seg: SegmentTree::new((0..n).map(|_| M::unit()).collect()),
            rev: Vec::new(),
            root: Vec::new(),
            live_keys,
            rebuilds: 0,
        };
        this.init(keys.iter().copied().zip(values).collect());
        Ok(this)
    }

    pub fn key_max(&self) -> usize {
        self.key_max
    }

    pub fn node_capacity(&self) -> usize {
        self.pool.capacity()
    }

    pub fn nodes_in_use(&self) -> usize {
        self.pool.len()
    }

    /// Number of rebuilds performed since construction.
    pub fn rebuild_count(&self) -> usize {
        self.rebuilds
    }

    /// Current `(key, value)` of every position, in position order.
    pub fn to_vec(&self) -> Vec<(usize, M::Value)> {
        let mut out = Vec::with_capacity(self.n);
        let mut i = self.heads.next(0);
        while i < self.n {
            self.pool
                .collect(self.root[i], self.key_max, self.rev[i], &mut out);
            i = self.heads.next(i + 1);
        }
        debug_assert_eq!(out.len(), self.n);
        out
    }

    /// Reconstructs every position as its own run and releases all pool
    /// nodes that are no longer reachable.
    pub fn rebuild(&mut self) {
        let items = self.to_vec();
        self.pool.clear();
        self.rebuilds += 1;
        self.init(items);
    }

    fn init(&mut self, items: Vec<(usize, M::Value)>) {
        debug_assert_eq!(items.len(), self.n);
        self.heads.fill();
        self.rev.clear();
        self.rev.resize(self.n, false);
        self.root.clear();
        let mut values = Vec::with_capacity(self.n);
        for (key, value) in items {
            let root = self.pool.singleton(self.key_max, key, value.clone());
            self.root.push(root);
            values.push(value);
        }
        self.seg.set_all(values);
    }

    fn ensure_room(&mut self) {
        let threshold = self.pool.capacity() * REBUILD_NUMERATOR / REBUILD_DENOMINATOR;
        if self.pool.len() > threshold {
            self.rebuild();
        }
    }

    fn head_value(&self, head: usize) -> M::Value {
        if self.rev[head] {
            self.pool.reverse(self.root[head])
        } else {
            self.pool.forward(self.root[head])
        }
    }

    fn refresh(&mut self, head: usize) {
        let value = self.head_value(head);
        self.seg.set(head, value);
    }

    /// Makes `x` a run head, splitting the run that contains it.
    fn split_at(&mut self, x: usize) {
        if x == self.n || self.heads.contains(x) {
            return;
        }
        let a = self
            .heads
            .prev(x)
            .expect("position 0 is always a run head");
        let b = self.heads.next(a + 1);
        self.heads.insert(x);

        if self.rev[a] {
            // Descending: the b - x smallest keys sit at [x, b).
            let (small, large) = self.pool.split(self.root[a], b - x);
            self.root[a] = large;
            self.root[x] = small;
            self.rev[x] = true;
        } else {
            let (small, large) = self.pool.split(self.root[a], x - a);
            self.root[a] = small;
            self.root[x] = large;
            self.rev[x] = false;
        }
        self.refresh(a);
        self.refresh(x);
    }

    /// Merges every run inside `[l, r)` into the run at `l`.
    /// Both `l` and `r` must already be heads (or `r == n`).
    fn merge_runs(&mut self, l: usize, r: usize) {
        loop {
            let i = self.heads.next(l + 1);
            if i >= r {
                break;
            }
            self.root[l] = self.pool.merge(self.root[l], self.root[i]);
            self.root[i] = Id::NIL;
            self.heads.erase(i);
            self.seg.set(i, M::unit());
        }
    }

    fn sort(&mut self, range: Range<usize>, descending: bool) -> Result<()> {
        check_range(&range, self.n)?;
        let Range { start: l, end: r } = range;
        if r - l <= 1 {
            return Ok(());
        }
        self.ensure_room();
        self.split_at(l);
        self.split_at(r);
        self.merge_runs(l, r);
        self.rev[l] = descending;
        self.refresh(l);
        Ok(())
    }

    /// `(key, value)` at `index` without restructuring any run.
    fn locate(&self, index: usize) -> (usize, &M::Value) {
        let a = self
            .heads
            .prev(index)
            .expect("position 0 is always a run head");
        let b = self.heads.next(a + 1);
        let rank = if self.rev[a] { b - 1 - index } else { index - a };
        self.pool.select(self.root[a], self.key_max, rank)
    }
}

impl<M: Monoid> RangeSortFold for SortableSegmentTree<M> {
    type Policy = M;

    /// Builds the structure with a pool sized for the sequence.
    fn new(key_max: usize, keys: &[usize], values: Vec<M::Value>) -> Result<Self> {
        let capacity = default_capacity(keys.len(), key_max);
        Self::with_capacity(key_max, keys, values, capacity)
    }

    fn len(&self) -> usize {
        self.n
    }

    fn get(&self, index: usize) -> Result<(usize, M::Value)> {
        check_index(index, self.n)?;
        let (key, value) = self.locate(index);
        Ok((key, value.clone()))
    }

    fn set(&mut self, index: usize, key: usize, value: M::Value) -> Result<()> {
        check_index(index, self.n)?;
        check_key(key, self.key_max)?;
        let (old_key, _) = self.locate(index);
        if key != old_key && self.live_keys.contains(&key) {
            return Err(SortableError::DuplicateKey { key });
        }
        self.live_keys.remove(&old_key);
        self.live_keys.insert(key);

        self.ensure_room();
        self.split_at(index);
        self.split_at(index + 1);
        self.root[index] = self.pool.singleton(self.key_max, key, value);
        self.rev[index] = false;
        self.refresh(index);
        Ok(())
    }

    fn prod(&mut self, range: Range<usize>) -> Result<M::Value> {
        check_range(&range, self.n)?;
        self.ensure_room();
        self.split_at(range.start);
        self.split_at(range.end);
        Ok(self.seg.prod(range))
    }

    fn prod_all(&self) -> M::Value {
        self.seg.prod_all()
    }

    fn sort_inc(&mut self, range: Range<usize>) -> Result<()> {
        self.sort(range, false)
    }

    fn sort_dec(&mut self, range: Range<usize>) -> Result<()> {
        self.sort(range, true)
    }
}

impl<M: Monoid> fmt::Debug for SortableSegmentTree<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortableSegmentTree")
            .field("len", &self.n)
            .field("key_max", &self.key_max)
            .field("nodes_in_use", &self.pool.len())
            .field("node_capacity", &self.pool.capacity())
            .field("rebuilds", &self.rebuilds)
            .finish_non_exhaustive()
    }
}
