/// 定长位集. 小容量时完全存储在栈上, 大容量时退化为堆分配.
///
/// The logical length is fixed at construction; bits past it are ignored by
/// every mutating operation and read back as `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixBitSet<const FIXN: usize = 2> {
    /// 小容量的 BitSet，完全在栈上存储
    Small([u64; FIXN], usize),
    /// 大容量的 BitSet，使用堆分配. usize 表示实际使用的位数
    Large(Box<[u64]>, usize),
}

impl<const N: usize> FixBitSet<N> {
    pub fn with_len(len: usize) -> Self {
        if len <= N * 64 {
            Self::Small([0; N], len)
        } else {
            let size = len.div_ceil(64);
            Self::Large(vec![0; size].into_boxed_slice(), len)
        }
    }

    fn words_mut(&mut self) -> &mut [u64] {
        match self {
            Self::Small(arr, _) => arr,
            Self::Large(boxed, _) => boxed,
        }
    }
    fn words(&self) -> &[u64] {
        match self {
            Self::Small(arr, _) => arr,
            Self::Large(boxed, _) => boxed,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Small(_, len) | Self::Large(_, len) => *len,
        }
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sets `bit` and returns whether it was previously unset.
    /// Out-of-range bits are ignored and report `false`.
    pub fn insert(&mut self, bit: usize) -> bool {
        if bit >= self.len() {
            return false;
        }
        let (idx, mask) = (bit / 64, 1u64 << (bit % 64));
        let word = &mut self.words_mut()[idx];
        let fresh = *word & mask == 0;
        *word |= mask;
        fresh
    }
    pub fn remove(&mut self, bit: usize) {
        if bit >= self.len() {
            return;
        }
        self.words_mut()[bit / 64] &= !(1u64 << (bit % 64));
    }

    pub fn try_get(&self, bit: usize) -> Option<bool> {
        if bit >= self.len() {
            return None;
        }
        Some(self.words()[bit / 64] & (1u64 << (bit % 64)) != 0)
    }
    pub fn get(&self, bit: usize) -> bool {
        self.try_get(bit).unwrap_or(false)
    }

    pub fn clear(&mut self) {
        self.words_mut().fill(0);
    }

    pub fn count_ones(&self) -> usize {
        // bits past `len` are never set, so whole words can be counted.
        self.words().iter().map(|w| w.count_ones() as usize).sum()
    }

    /// `self |= other`, truncated to `self.len()`.
    pub fn union_with(&mut self, other: &Self) {
        let len = self.len();
        for bit in other.iter() {
            if bit >= len {
                break;
            }
            self.insert(bit);
        }
    }

    /// Whether every bit set in `other` is also set in `self`.
    pub fn is_superset(&self, other: &Self) -> bool {
        other.iter().all(|bit| self.get(bit))
    }

    pub fn iter(&self) -> FixBitSetIter<'_> {
        FixBitSetIter::new(self)
    }
}

/// Iterates over the indices of set bits in ascending order.
pub struct FixBitSetIter<'a> {
    words: &'a [u64],
    len: usize,
    word_idx: usize,
    current: u64,
}

impl<'a> FixBitSetIter<'a> {
    pub fn new<const N: usize>(bitset: &'a FixBitSet<N>) -> Self {
        let words = bitset.words();
        Self {
            words,
            len: bitset.len(),
            word_idx: 0,
            current: words.first().copied().unwrap_or(0),
        }
    }
}

impl Iterator for FixBitSetIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if self.current != 0 {
                let offset = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1;
                let bit = self.word_idx * 64 + offset;
                return if bit < self.len { Some(bit) } else { None };
            }
            self.word_idx += 1;
            if self.word_idx >= self.words.len() || self.word_idx * 64 >= self.len {
                return None;
            }
            self.current = self.words[self.word_idx];
        }
    }
}

impl<'a, const N: usize> IntoIterator for &'a FixBitSet<N> {
    type Item = usize;
    type IntoIter = FixBitSetIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        FixBitSetIter::new(self)
    }
}
