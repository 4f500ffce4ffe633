use std::ops::Range;

use crate::policy::Monoid;

/// Bottom-up segment tree over a monoid.
///
/// Products are taken strictly left to right; `op` is never assumed to be
/// commutative.
pub struct SegmentTree<M: Monoid> {
    n: usize,
    size: usize,
    tree: Vec<M::Value>,
}

impl<M: Monoid> SegmentTree<M> {
    pub fn new(values: Vec<M::Value>) -> Self {
        let n = values.len();
        let size = n.next_power_of_two();
        let mut seg = Self {
            n,
            size,
            tree: Vec::new(),
        };
        seg.set_all(values);
        seg
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Replaces every leaf and rebuilds the internal nodes in `O(n)`.
    pub fn set_all(&mut self, values: Vec<M::Value>) {
        debug_assert_eq!(values.len(), self.n);
        let size = self.size;
        self.tree.clear();
        self.tree.resize_with(size, M::unit);
        self.tree.extend(values);
        self.tree.resize_with(2 * size, M::unit);
        for i in (1..size).rev() {
            self.pull(i);
        }
    }

    #[inline(always)]
    fn pull(&mut self, i: usize) {
        self.tree[i] = M::op(&self.tree[2 * i], &self.tree[2 * i + 1]);
    }

    pub fn get(&self, i: usize) -> &M::Value {
        debug_assert!(i < self.n);
        &self.tree[self.size + i]
    }

    pub fn set(&mut self, i: usize, value: M::Value) {
        debug_assert!(i < self.n);
        let mut i = i + self.size;
        self.tree[i] = value;
        while i > 1 {
            i >>= 1;
            self.pull(i);
        }
    }

    pub fn prod(&self, range: Range<usize>) -> M::Value {
        debug_assert!(range.start <= range.end && range.end <= self.n);

        let mut l = range.start + self.size;
        let mut r = range.end + self.size;
        let mut left = M::unit();
        let mut right = M::unit();

        let tree = &self.tree;

        while l < r {
            if (l & 1) == 1 {
                left = M::op(&left, &tree[l]);
                l += 1;
            }
            if (r & 1) == 1 {
                r -= 1;
                right = M::op(&tree[r], &right);
            }
            l >>= 1;
            r >>= 1;
        }

        M::op(&left, &right)
    }

    /// With a single leaf, index 1 is both the leaf and the root.
    pub fn prod_all(&self) -> M::Value {
        self.tree[1].clone()
    }
}
