/// Maps arbitrary integer keys onto the dense domain `[0, distinct)`,
/// preserving order.
#[derive(Clone, Debug, Default)]
pub struct KeyCompressor {
    sorted: Vec<i64>,
}

impl KeyCompressor {
    pub fn new<I: IntoIterator<Item = i64>>(keys: I) -> Self {
        let mut sorted: Vec<i64> = keys.into_iter().collect();
        sorted.sort_unstable();
        sorted.dedup();
        Self { sorted }
    }

    /// Size of the compressed domain.
    pub fn key_max(&self) -> usize {
        self.sorted.len()
    }

    pub fn index(&self, raw: i64) -> Option<usize> {
        self.sorted.binary_search(&raw).ok()
    }

    pub fn raw(&self, index: usize) -> Option<i64> {
        self.sorted.get(index).copied()
    }
}
