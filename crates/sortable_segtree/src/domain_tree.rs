//! Binary tries over a fixed key domain `[0, key_max)`, allocated from a
//! shared bump pool.
//!
//! Every trie bisects its domain the same way (`mid = (lo + hi) / 2`, keys
//! below `mid` go left), so two tries over the same domain can be merged
//! child by child and the depth never exceeds `ceil(log2(key_max))`.
//! A node without children is a leaf holding exactly one key; every internal
//! node has at least one child.

use crate::policy::Monoid;

#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Id(u32);

impl Id {
    pub(crate) const NIL: Self = Self(u32::MAX);

    /// Largest pool size addressable by an `Id`.
    pub(crate) const MAX_CAPACITY: usize = u32::MAX as usize;

    #[inline(always)]
    pub(crate) fn is_nil(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline(always)]
    fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Nodes on one root-to-leaf path of a trie over `[0, key_max)`.
pub(crate) fn path_len(key_max: usize) -> usize {
    if key_max <= 1 {
        1
    } else {
        key_max.next_power_of_two().trailing_zeros() as usize + 1
    }
}

#[derive(Clone, Debug)]
struct Node<V> {
    ch: [Id; 2],
    fwd: V,
    rev: V,
    size: u32,
}

/// Bump allocator for trie nodes. Nodes are never freed individually; the
/// owner calls [`NodePool::clear`] once no root refers into the pool.
pub(crate) struct NodePool<M: Monoid> {
    nodes: Vec<Node<M::Value>>,
    capacity: usize,
}

impl<M: Monoid> NodePool<M> {
    pub(crate) fn new(capacity: usize) -> Self {
        debug_assert!(capacity <= Id::MAX_CAPACITY);
        Self {
            nodes: Vec::new(),
            capacity,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
    }

    #[inline(always)]
    fn node(&self, x: Id) -> &Node<M::Value> {
        debug_assert!(!x.is_nil());
        &self.nodes[x.idx()]
    }

    #[inline(always)]
    fn node_mut(&mut self, x: Id) -> &mut Node<M::Value> {
        debug_assert!(!x.is_nil());
        &mut self.nodes[x.idx()]
    }

    fn alloc(&mut self, value: M::Value) -> Id {
        debug_assert!(self.nodes.len() < self.capacity, "node pool exhausted");
        let id = Id(self.nodes.len() as u32);
        self.nodes.push(Node {
            ch: [Id::NIL, Id::NIL],
            fwd: value.clone(),
            rev: value,
            size: 1,
        });
        id
    }

    #[inline(always)]
    pub(crate) fn size(&self, x: Id) -> usize {
        if x.is_nil() {
            0
        } else {
            self.node(x).size as usize
        }
    }

    /// Fold of the trie's values in ascending key order.
    pub(crate) fn forward(&self, x: Id) -> M::Value {
        if x.is_nil() {
            M::unit()
        } else {
            self.node(x).fwd.clone()
        }
    }

    /// Fold of the trie's values in descending key order.
    pub(crate) fn reverse(&self, x: Id) -> M::Value {
        if x.is_nil() {
            M::unit()
        } else {
            self.node(x).rev.clone()
        }
    }

    fn pull(&mut self, x: Id) {
        let [l, r] = self.node(x).ch;
        let (fwd, rev, size) = match (l.is_nil(), r.is_nil()) {
            (true, true) => return,
            (false, true) => {
                let nl = self.node(l);
                (nl.fwd.clone(), nl.rev.clone(), nl.size)
            }
            (true, false) => {
                let nr = self.node(r);
                (nr.fwd.clone(), nr.rev.clone(), nr.size)
            }
            (false, false) => {
                let nl = self.node(l);
                let nr = self.node(r);
                let fwd = M::op(&nl.fwd, &nr.fwd);
                let rev = if M::COMMUTE {
                    fwd.clone()
                } else {
                    M::op(&nr.rev, &nl.rev)
                };
                (fwd, rev, nl.size + nr.size)
            }
        };
        let node = self.node_mut(x);
        node.fwd = fwd;
        node.rev = rev;
        node.size = size;
    }

    /// A fresh trie holding only `key`.
    pub(crate) fn singleton(&mut self, key_max: usize, key: usize, value: M::Value) -> Id {
        debug_assert!(key < key_max);
        self.build_path(0, key_max, key, value)
    }

    fn build_path(&mut self, lo: usize, hi: usize, key: usize, value: M::Value) -> Id {
        if hi - lo == 1 {
            return self.alloc(value);
        }
        let mid = (lo + hi) / 2;
        let (child, side) = if key < mid {
            (self.build_path(lo, mid, key, value), 0)
        } else {
            (self.build_path(mid, hi, key, value), 1)
        };
        let x = self.alloc(M::unit());
        self.node_mut(x).ch[side] = child;
        self.pull(x);
        x
    }

    /// Splits off the `k` smallest keys. Returns `(smallest k, rest)`.
    ///
    /// `x` is reused for the left part; at most one node per level is
    /// allocated for the right part.
    pub(crate) fn split(&mut self, x: Id, k: usize) -> (Id, Id) {
        if k == 0 {
            return (Id::NIL, x);
        }
        let size = self.size(x);
        if k >= size {
            debug_assert_eq!(k, size);
            return (x, Id::NIL);
        }

        let [l, r] = self.node(x).ch;
        let s = self.size(l);
        let y = self.alloc(M::unit());
        if k <= s {
            let (ll, lr) = self.split(l, k);
            self.node_mut(y).ch = [lr, r];
            self.node_mut(x).ch = [ll, Id::NIL];
        } else {
            let (rl, rr) = self.split(r, k - s);
            self.node_mut(x).ch[1] = rl;
            self.node_mut(y).ch = [Id::NIL, rr];
        }
        self.pull(x);
        self.pull(y);
        (x, y)
    }

    /// Union of two tries with disjoint key sets. Allocates nothing; nodes of
    /// `b` that overlap `a` become unreachable.
    pub(crate) fn merge(&mut self, a: Id, b: Id) -> Id {
        if a.is_nil() {
            return b;
        }
        if b.is_nil() {
            return a;
        }

        let [al, ar] = self.node(a).ch;
        let [bl, br] = self.node(b).ch;
        debug_assert!(
            !(al.is_nil() && ar.is_nil()),
            "merging tries that share a key"
        );
        let l = self.merge(al, bl);
        let r = self.merge(ar, br);
        self.node_mut(a).ch = [l, r];
        self.pull(a);
        a
    }

    /// The `k`-th smallest `(key, value)` of the trie, 0-indexed.
    pub(crate) fn select(
        &self,
        mut x: Id,
        key_max: usize,
        mut k: usize,
    ) -> (usize, &M::Value) {
        debug_assert!(k < self.size(x));
        let (mut lo, mut hi) = (0, key_max);
        while hi - lo > 1 {
            let [l, r] = self.node(x).ch;
            let mid = (lo + hi) / 2;
            let s = self.size(l);
            if k < s {
                x = l;
                hi = mid;
            } else {
                k -= s;
                x = r;
                lo = mid;
            }
        }
        (lo, &self.node(x).fwd)
    }

    /// Appends the trie's `(key, value)` pairs in ascending key order, or
    /// descending when `reversed`.
    pub(crate) fn collect(
        &self,
        x: Id,
        key_max: usize,
        reversed: bool,
        out: &mut Vec<(usize, M::Value)>,
    ) {
        self.collect_rec(x, 0, key_max, reversed, out);
    }

    fn collect_rec(
        &self,
        x: Id,
        lo: usize,
        hi: usize,
        reversed: bool,
        out: &mut Vec<(usize, M::Value)>,
    ) {
        if x.is_nil() {
            return;
        }
        if hi - lo == 1 {
            out.push((lo, self.node(x).fwd.clone()));
            return;
        }
        let mid = (lo + hi) / 2;
        let [l, r] = self.node(x).ch;
        if reversed {
            self.collect_rec(r, mid, hi, reversed, out);
            self.collect_rec(l, lo, mid, reversed, out);
        } else {
            self.collect_rec(l, lo, mid, reversed, out);
            self.collect_rec(r, mid, hi, reversed, out);
        }
    }
}
