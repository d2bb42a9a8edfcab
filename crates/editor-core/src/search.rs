use crate::overlay::{distance, span};

/// Block size used when none is configured.
pub const BLOCK_SEARCH_SIZE: usize = 4096;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Absolute offset of the first byte of the match.
    Found(i64),
    NotFound,
    /// The control asked to stop before the scan finished.
    Cancelled,
}

/// Hooks a running search calls once per block.
pub trait SearchControl {
    /// Polled after every block read. Must not block.
    fn should_cancel(&mut self) -> bool;

    /// Absolute offset of the block about to be scanned.
    fn report_progress(&mut self, _offset: i64) {}
}

/// Never cancels, never reports.
#[derive(Clone, Copy, Debug, Default)]
pub struct Uninterrupted;

impl SearchControl for Uninterrupted {
    #[inline]
    fn should_cancel(&mut self) -> bool {
        false
    }
}

/// Adapts a cancellation closure into a [`SearchControl`].
pub struct PollFn<F>(pub F);

impl<F: FnMut() -> bool> SearchControl for PollFn<F> {
    #[inline]
    fn should_cancel(&mut self) -> bool {
        (self.0)()
    }
}

/// Block-wise pattern scan over the file content.
///
/// Consecutive blocks overlap by `pattern.len() - 1` bytes so a match
/// straddling a block boundary is still seen. Only the file is scanned;
/// pending edits are not.
#[derive(Clone, Copy, Debug)]
pub struct Searcher {
    block_size: usize,
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new(BLOCK_SEARCH_SIZE)
    }
}

impl Searcher {
    #[must_use]
    pub fn new(block_size: usize) -> Self {
        Self {
            block_size: block_size.max(1),
        }
    }

    #[inline]
    #[must_use]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// A pattern longer than the configured block gets a block of its own
    /// length.
    #[inline]
    fn block_for(&self, pattern: &[u8]) -> usize {
        self.block_size.max(pattern.len())
    }

    /// Lowest offset `>= from` where `pattern` starts.
    pub fn forward(
        &self,
        store: &mut io::store::FileStore,
        pattern: &[u8],
        from: i64,
        control: &mut impl SearchControl,
    ) -> SearchOutcome {
        if pattern.is_empty() {
            return SearchOutcome::NotFound;
        }

        let block = self.block_for(pattern);
        let step = span(block - pattern.len() + 1);
        let mut buf = vec![0u8; block];
        let mut block_start = from.max(0);

        let outcome = loop {
            let read = store.read_at(block_start, &mut buf);

            if read < pattern.len() {
                break SearchOutcome::NotFound;
            }

            if control.should_cancel() {
                break SearchOutcome::Cancelled;
            }

            control.report_progress(block_start);

            if let Some(idx) = memchr::memmem::find(&buf[..read], pattern) {
                break SearchOutcome::Found(block_start + span(idx));
            }

            block_start += step;
        };

        tracing::debug!(from, len = pattern.len(), ?outcome, "forward search");

        outcome
    }

    /// Highest offset `<= from` where `pattern` starts.
    pub fn backward(
        &self,
        store: &mut io::store::FileStore,
        pattern: &[u8],
        from: i64,
        control: &mut impl SearchControl,
    ) -> SearchOutcome {
        if pattern.is_empty() {
            return SearchOutcome::NotFound;
        }

        let block = self.block_for(pattern);
        let plen = span(pattern.len());
        let mut buf = vec![0u8; block];
        // Highest start still under consideration.
        let mut last_start = from.min(store.high_water_mark() - plen);

        let outcome = loop {
            if last_start < 0 {
                break SearchOutcome::NotFound;
            }

            let block_start = (last_start - span(block) + plen).max(0);
            let wanted = distance(block_start, last_start) + pattern.len();
            let read = store.read_at(block_start, &mut buf[..wanted]);

            if read < pattern.len() {
                break SearchOutcome::NotFound;
            }

            if control.should_cancel() {
                break SearchOutcome::Cancelled;
            }

            control.report_progress(block_start);

            if let Some(idx) = memchr::memmem::rfind(&buf[..read], pattern) {
                break SearchOutcome::Found(block_start + span(idx));
            }

            last_start = block_start - 1;
        };

        tracing::debug!(from, len = pattern.len(), ?outcome, "backward search");

        outcome
    }
}
