/// A contiguous run of pending edits starting at `base`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditRange {
    pub base: i64,
    pub bytes: Vec<u8>,
}

impl EditRange {
    #[inline]
    #[must_use]
    pub fn new(base: i64, bytes: Vec<u8>) -> Self {
        Self { base, bytes }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// One past the last edited offset.
    #[inline]
    #[must_use]
    pub fn end(&self) -> i64 {
        self.base + super::span(self.bytes.len())
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, pos: i64) -> bool {
        self.base <= pos && pos < self.end()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, pos: i64) -> Option<u8> {
        if !self.contains(pos) {
            return None;
        }

        self.bytes.get(super::distance(self.base, pos)).copied()
    }
}
