/// The marked region, inclusive on both ends.
///
/// While the cursor moves with a mark set, the end the cursor sits on
/// follows it and the other end stays anchored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    is_set: bool,
    min: i64,
    max: i64,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.is_set
    }

    #[inline]
    #[must_use]
    pub fn min(&self) -> i64 {
        self.min
    }

    #[inline]
    #[must_use]
    pub fn max(&self) -> i64 {
        self.max
    }

    /// Number of selected bytes, 0 when unset.
    #[inline]
    #[must_use]
    pub fn len(&self) -> i64 {
        if self.is_set { self.max - self.min + 1 } else { 0 }
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, pos: i64) -> bool {
        self.is_set && self.min <= pos && pos <= self.max
    }

    /// Starts a single-byte selection at `pos`, or drops the current one.
    pub fn toggle(&mut self, pos: i64) {
        if self.is_set {
            self.is_set = false;
        } else {
            *self = Self {
                is_set: true,
                min: pos,
                max: pos,
            };
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Selects `[a, b]` in whichever order the ends are given.
    pub fn select_between(&mut self, a: i64, b: i64) {
        *self = Self {
            is_set: true,
            min: a.min(b),
            max: a.max(b),
        };
    }

    /// Pulls the region back inside a file of `file_size` bytes. Drops the
    /// selection when nothing of it is left.
    pub fn clamp_to(&mut self, file_size: i64) {
        if !self.is_set {
            return;
        }

        if self.min >= file_size {
            self.clear();
        } else if self.max >= file_size {
            self.max = file_size - 1;
        }
    }

    /// Follows a cursor move from `old` to `new` and re-marks `viewport`
    /// (whose first slot is at `base`) so it shows exactly the new region.
    pub fn update(
        &mut self,
        old: i64,
        new: i64,
        file_size: i64,
        viewport: &mut crate::viewport::Viewport,
        base: i64,
    ) {
        if !self.is_set {
            return;
        }

        let (prev_min, prev_max) = (self.min, self.max);

        if new > old {
            if self.min == self.max {
                self.max = new;
            } else if old == self.min {
                if new <= self.max {
                    self.min = new;
                } else {
                    self.min = self.max;
                    self.max = new;
                }
            } else if old == self.max {
                self.max = new;
            } else {
                self.track_nearer(old, new);
            }
        } else if new < old {
            if self.min == self.max {
                self.min = new;
            } else if old == self.max {
                if new >= self.min {
                    self.max = new;
                } else {
                    self.max = self.min;
                    self.min = new;
                }
            } else if old == self.min {
                self.min = new;
            } else {
                self.track_nearer(old, new);
            }
        }

        let last = (file_size - 1).max(0);

        self.max = self.max.min(last);
        self.min = self.min.clamp(0, last);

        if self.min > self.max {
            std::mem::swap(&mut self.min, &mut self.max);
        }

        viewport.unmark_region(base, prev_min, prev_max);
        viewport.mark_region(base, self.min, self.max);
    }

    /// `old` was inside the region but on neither end, as after a jump.
    fn track_nearer(&mut self, old: i64, new: i64) {
        if old - self.min <= self.max - old {
            self.min = new;
        } else {
            self.max = new;
        }
    }
}
