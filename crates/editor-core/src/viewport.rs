use crate::enums::ByteAttributes;
use crate::overlay::{distance, span};

/// The bytes currently on screen: file content at `base` merged with the
/// pending edits, plus per-slot display attributes.
///
/// Slots past `valid` hold no data. The window never owns its base; callers
/// pass it on every call so the viewport stays a plain buffer.
#[derive(Debug)]
pub struct Viewport {
    buffer: Vec<u8>,
    attributes: Vec<ByteAttributes>,
    valid: usize,
}

/*

====================================
========= CREATION METHODS =========
====================================

*/

impl Viewport {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0; capacity],
            attributes: vec![ByteAttributes::empty(); capacity],
            valid: 0,
        }
    }

    /// Reallocates for a new window size. The content is gone until the
    /// next [`Viewport::read`].
    pub fn resize(&mut self, capacity: usize) {
        *self = Self::new(capacity);
    }
}

/*

====================================
============ ACCESSORS =============
====================================

*/

impl Viewport {
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    #[must_use]
    pub fn valid_count(&self) -> usize {
        self.valid
    }

    /// The slots holding data.
    #[inline]
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.buffer[..self.valid]
    }

    #[inline]
    #[must_use]
    pub fn attributes(&self) -> &[ByteAttributes] {
        &self.attributes[..self.valid]
    }

    #[inline]
    #[must_use]
    pub fn byte(&self, index: usize) -> Option<u8> {
        self.bytes().get(index).copied()
    }

    #[inline]
    #[must_use]
    pub fn attribute(&self, index: usize) -> ByteAttributes {
        self.attributes
            .get(index)
            .copied()
            .unwrap_or_else(ByteAttributes::empty)
    }
}

/*

====================================
=========== LOADING ================
====================================

*/

impl Viewport {
    /// Rebuilds the window at `base`.
    ///
    /// Pending edits past the end of the file extend the data, so the user
    /// sees bytes that only exist in the overlay.
    pub fn read(
        &mut self,
        store: &mut io::store::FileStore,
        base: i64,
        overlay: &crate::overlay::table::EditOverlay,
        selection: &crate::selection::Selection,
    ) {
        self.buffer.fill(0);
        self.attributes.fill(ByteAttributes::empty());
        self.valid = store.read_at(base, &mut self.buffer);

        let window_end = base + span(self.capacity());

        for range in overlay.ranges() {
            if range.end() <= base {
                continue;
            }

            if range.base >= window_end {
                break;
            }

            let start = range.base.max(base);
            let stop = range.end().min(window_end);

            for pos in start..stop {
                let slot = distance(base, pos);
                let value = range.bytes[distance(range.base, pos)];

                if slot >= self.valid || self.buffer[slot] != value {
                    self.buffer[slot] = value;
                    self.attributes[slot].insert(ByteAttributes::MODIFIED);
                }
            }

            self.valid = self.valid.max(distance(base, stop));
        }

        if selection.is_set() {
            self.mark_region(base, selection.min(), selection.max());
        }

        tracing::trace!(base, valid = self.valid, "viewport reloaded");
    }

    /// Patches one slot after typing, without a full reload. Typing in the
    /// slot right after the data extends it.
    ///
    /// Returns `false` if `index` is out of reach.
    pub fn set_byte(&mut self, index: usize, value: u8) -> bool {
        if index > self.valid || index >= self.capacity() {
            return false;
        }

        self.buffer[index] = value;
        self.attributes[index].insert(ByteAttributes::MODIFIED);

        if index == self.valid {
            self.valid += 1;
        }

        true
    }
}

/*

====================================
============= MARKING ==============
====================================

*/

impl Viewport {
    /// Slot range covered by the absolute inclusive span `[min, max]`.
    fn slots(&self, base: i64, min: i64, max: i64) -> Option<std::ops::Range<usize>> {
        let last = base + span(self.capacity()) - 1;
        let from = min.max(base);
        let to = max.min(last);

        (from <= to).then(|| distance(base, from)..distance(base, to) + 1)
    }

    pub fn mark_region(&mut self, base: i64, min: i64, max: i64) {
        if let Some(slots) = self.slots(base, min, max) {
            for attr in &mut self.attributes[slots] {
                attr.insert(ByteAttributes::MARKED);
            }
        }
    }

    pub fn unmark_region(&mut self, base: i64, min: i64, max: i64) {
        if let Some(slots) = self.slots(base, min, max) {
            for attr in &mut self.attributes[slots] {
                attr.remove(ByteAttributes::MARKED);
            }
        }
    }

    pub fn unmark_all(&mut self) {
        for attr in &mut self.attributes {
            attr.remove(ByteAttributes::MARKED);
        }
    }

    #[inline]
    pub fn mark_at(&mut self, index: usize) {
        if let Some(attr) = self.attributes.get_mut(index) {
            attr.insert(ByteAttributes::MARKED);
        }
    }

    pub fn clear_modified(&mut self) {
        for attr in &mut self.attributes {
            attr.remove(ByteAttributes::MODIFIED);
        }
    }
}
