use crate::overlay::range::EditRange;
use crate::overlay::{distance, span};

#[derive(Debug, Default)]
pub struct EditOverlay {
    /// Sorted by `base`, pairwise disjoint and never adjacent.
    ranges: Vec<EditRange>,
    /// Max of `base + len` over all ranges, 0 when empty.
    last_edited_loc: i64,
}

/*

====================================
========= INLINE METHODS  ==========
====================================

*/

impl EditOverlay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn has_edits(&self) -> bool {
        !self.ranges.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn last_edited_loc(&self) -> i64 {
        self.last_edited_loc
    }

    #[inline]
    #[must_use]
    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }

    /// Ranges in ascending order.
    #[inline]
    pub fn ranges(&self) -> impl Iterator<Item = &EditRange> + '_ {
        self.ranges.iter()
    }

    #[inline]
    pub fn for_each_range(&self, visitor: impl FnMut(&EditRange)) {
        self.ranges.iter().for_each(visitor);
    }

    /// The pending byte at `pos`, or `None` when the file value stands.
    #[must_use]
    pub fn get_value(&self, pos: i64) -> Option<u8> {
        let idx = self.ranges.partition_point(|range| range.end() <= pos);

        self.ranges.get(idx).and_then(|range| range.get(pos))
    }

    fn refresh_last_edited_loc(&mut self) {
        self.last_edited_loc = self.ranges.iter().map(EditRange::end).max().unwrap_or(0);
    }
}

/*

=====================================
============ ADD / REMOVE ===========
=====================================

*/

impl EditOverlay {
    /// Records `bytes` as the content of `[base, base + len)`.
    ///
    /// Every range intersecting or touching the new span is folded into a
    /// single range. Inside the span the new bytes win; outside it the old
    /// edits are kept.
    pub fn add(&mut self, base: i64, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }

        let end = base + span(bytes.len());
        // [first, last) are exactly the ranges with `range.end() >= base`
        // and `range.base <= end`.
        let first = self.ranges.partition_point(|range| range.end() < base);
        let last = self.ranges.partition_point(|range| range.base <= end);

        if first == last {
            self.ranges.insert(first, EditRange::new(base, bytes.to_vec()));
        } else {
            let merged_base = self.ranges[first].base.min(base);
            let merged_end = self.ranges[last - 1].end().max(end);
            let mut merged = vec![0u8; distance(merged_base, merged_end)];

            for range in &self.ranges[first..last] {
                let offset = distance(merged_base, range.base);

                merged[offset..offset + range.len()].copy_from_slice(&range.bytes);
            }

            let offset = distance(merged_base, base);

            merged[offset..offset + bytes.len()].copy_from_slice(bytes);
            self.ranges.splice(
                first..last,
                std::iter::once(EditRange::new(merged_base, merged)),
            );
        }

        self.refresh_last_edited_loc();

        tracing::trace!(base, len = bytes.len(), ranges = self.ranges.len(), "overlay add");
    }

    /// Drops pending edits in `[base, base + size)`; the file value shows
    /// through again there.
    pub fn remove(&mut self, base: i64, size: usize) {
        if size == 0 {
            return;
        }

        let end = base + span(size);
        let first = self.ranges.partition_point(|range| range.end() <= base);
        let last = self.ranges.partition_point(|range| range.base < end);

        if first >= last {
            return;
        }

        let mut kept = Vec::with_capacity(2);

        for mut range in self.ranges.drain(first..last) {
            match (range.base >= base, range.end() <= end) {
                // Wholly inside the removal window.
                (true, true) => {}
                // Removal clips the head.
                (true, false) => {
                    range.bytes.drain(..distance(range.base, end));
                    range.base = end;
                    kept.push(range);
                }
                // Removal clips the tail.
                (false, true) => {
                    range.bytes.truncate(distance(range.base, base));
                    kept.push(range);
                }
                // Removal falls strictly inside: split in two.
                (false, false) => {
                    let right = range.bytes.split_off(distance(range.base, end));

                    range.bytes.truncate(distance(range.base, base));
                    kept.push(range);
                    kept.push(EditRange::new(end, right));
                }
            }
        }

        self.ranges.splice(first..first, kept);
        self.refresh_last_edited_loc();

        tracing::trace!(base, size, ranges = self.ranges.len(), "overlay remove");
    }

    pub fn discard_all(&mut self) {
        self.ranges = Vec::new();
        self.last_edited_loc = 0;
    }
}

/*

====================================
=============== SAVE ===============
====================================

*/

impl EditOverlay {
    /// Writes every range to `store` in ascending order, then empties the
    /// overlay.
    ///
    /// A failed write does not stop the remaining ones. The first failure is
    /// returned; when it is `Some`, the edits of the failed ranges are lost.
    pub fn save(&mut self, store: &mut io::store::FileStore) -> Option<io::errors::StoreError> {
        let prior_size = store.size();
        let mut first_error = None;

        for range in &self.ranges {
            if let Err(err) = store.write_at(range.base, &range.bytes) {
                tracing::warn!(
                    base = range.base,
                    len = range.len(),
                    error = %err,
                    "failed to write edit range"
                );

                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }

        if first_error.is_none() && self.last_edited_loc > prior_size {
            store.raise_high_water_mark(self.last_edited_loc);
        }

        tracing::debug!(
            ranges = self.ranges.len(),
            failed = first_error.is_some(),
            "flushed overlay"
        );

        self.discard_all();

        first_error
    }
}
