const W: usize = u64::BITS as usize;

/// Ordered set over `[0, n)` backed by a 64-ary layered bitset.
///
/// Level 0 holds one bit per element; every higher level holds one bit per
/// word of the level below, set iff that word is non-zero. All operations are
/// `O(log_64 n)`.
#[derive(Clone, Debug)]
pub struct FastSet {
    n: usize,
    levels: Vec<Vec<u64>>,
}

impl FastSet {
    pub fn new(n: usize) -> Self {
        let mut levels = Vec::new();
        let mut m = n;
        loop {
            let words = m.div_ceil(W);
            levels.push(vec![0_u64; words]);
            m = words;
            if m <= 1 {
                break;
            }
        }
        Self { n, levels }
    }

    /// Size of the universe.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn contains(&self, i: usize) -> bool {
        debug_assert!(i < self.n);
        (self.levels[0][i / W] >> (i % W)) & 1 == 1
    }

    pub fn insert(&mut self, mut i: usize) {
        debug_assert!(i < self.n);
        for level in &mut self.levels {
            level[i / W] |= 1_u64 << (i % W);
            i /= W;
        }
    }

    pub fn erase(&mut self, mut i: usize) {
        debug_assert!(i < self.n);
        for level in &mut self.levels {
            level[i / W] &= !(1_u64 << (i % W));
            if level[i / W] != 0 {
                break;
            }
            i /= W;
        }
    }

    /// Inserts every element of the universe.
    pub fn fill(&mut self) {
        let mut m = self.n;
        for level in &mut self.levels {
            level.fill(u64::MAX);
            if let Some(last) = level.last_mut()
                && m % W != 0
            {
                *last = (1_u64 << (m % W)) - 1;
            }
            m = m.div_ceil(W);
        }
    }

    /// Smallest member `>= i`, or `len()` if there is none.
    pub fn next(&self, mut i: usize) -> usize {
        for h in 0..self.levels.len() {
            let level = &self.levels[h];
            if i / W >= level.len() {
                break;
            }
            let d = level[i / W] >> (i % W);
            if d == 0 {
                i = i / W + 1;
                continue;
            }
            i += d.trailing_zeros() as usize;
            for g in (0..h).rev() {
                i = i * W + self.levels[g][i].trailing_zeros() as usize;
            }
            return i;
        }
        self.n
    }

    /// Largest member `<= i`, or `None` if there is none.
    pub fn prev(&self, i: usize) -> Option<usize> {
        if self.n == 0 {
            return None;
        }
        let mut i = i.min(self.n - 1);
        for h in 0..self.levels.len() {
            let d = self.levels[h][i / W] << (W - 1 - i % W);
            if d == 0 {
                if i / W == 0 {
                    return None;
                }
                i = i / W - 1;
                continue;
            }
            i -= d.leading_zeros() as usize;
            for g in (0..h).rev() {
                i = i * W + (W - 1 - self.levels[g][i].leading_zeros() as usize);
            }
            return Some(i);
        }
        None
    }
}
