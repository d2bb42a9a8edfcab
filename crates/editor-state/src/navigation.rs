use editor_core::enums::{DisplayMode, Nibble};
use editor_core::hex::floor_to;
use editor_core::overlay::{distance, span};

/*

====================================
======= ABSOLUTE POSITIONING =======
====================================

*/

impl crate::EditorState {
    /// Whether the cursor may go to `loc`. May probe the file.
    pub(crate) fn is_reachable(&mut self, loc: i64) -> bool {
        self.store
            .is_reachable(loc, self.overlay.last_edited_loc())
    }

    /// Moves the cursor to the absolute position `loc`, scrolling the window
    /// along the line grid when `loc` is off screen. A set selection follows
    /// the cursor.
    ///
    /// Returns `false` and changes nothing if `loc` is out of reach.
    pub fn set_cursor(&mut self, loc: i64) -> bool {
        let old = self.position();

        if !self.relocate(loc) {
            return false;
        }

        self.follow_selection(old);

        true
    }

    /// [`Self::set_cursor`] without the selection update.
    pub(crate) fn relocate(&mut self, loc: i64) -> bool {
        let line = span(self.layout.line_length());
        let page = span(self.layout.page());
        let base_mod = self.base.rem_euclid(line);
        // Off-grid windows may still scroll back to the very start.
        let loc = if loc < 0 && base_mod != 0 { 0 } else { loc };

        if !self.is_reachable(loc) {
            return false;
        }

        if loc < self.base {
            let moved = if loc - base_mod < 0 {
                self.set_base(0)
            } else {
                let new_base = floor_to(loc - base_mod, line) + base_mod;

                self.move_base(new_base - self.base)
            };

            if !moved {
                return false;
            }
        } else if loc >= self.base + page {
            let new_base = floor_to(loc - base_mod, line) + base_mod - page + line;

            if !self.move_base(new_base - self.base) {
                return false;
            }
        } else if loc > self.base + span(self.viewport.valid_count()) {
            return false;
        }

        self.cursor = distance(self.base, loc);

        true
    }

    /// Moves the window so it starts at `loc`, keeping the in-window cursor
    /// offset where possible.
    ///
    /// Outside sector mode a window that would be mostly past the end of
    /// the data is pulled back by whole lines.
    pub fn set_base(&mut self, loc: i64) -> bool {
        let loc = loc.max(0);

        if !self.is_reachable(loc) {
            return false;
        }

        self.base = loc;
        self.reload();

        let line = self.layout.line_length();
        let page = self.layout.page();
        let valid = self.viewport.valid_count();

        if self.config.mode != DisplayMode::BySector && valid + line < page && self.base != 0 {
            let pull_back = floor_to(span(page - valid - line), span(line));

            if pull_back > 0 {
                self.base = (self.base - pull_back).max(0);
                self.reload();
            }
        }

        self.cursor = self.cursor.min(self.viewport.valid_count());

        tracing::debug!(base = self.base, valid = self.viewport.valid_count(), "window moved");

        true
    }

    #[inline]
    pub fn move_cursor(&mut self, delta: i64) -> bool {
        self.set_cursor(self.position() + delta)
    }

    /// Sector mode only ever moves the window by whole pages.
    pub fn move_base(&mut self, delta: i64) -> bool {
        let page = span(self.layout.page());
        let delta = match self.config.mode {
            DisplayMode::BySector if delta > 0 && delta < page => page,
            DisplayMode::BySector if delta < 0 && delta > -page => -page,
            _ => delta,
        };

        self.set_base(self.base + delta)
    }

    fn follow_selection(&mut self, old: i64) {
        if self.selection.is_set() {
            let file_size = self.file_size();
            let new = self.position();

            self.selection
                .update(old, new, file_size, &mut self.viewport, self.base);
        }
    }
}

/*

====================================
============= MOTIONS ==============
====================================

*/

impl crate::EditorState {
    /// One nibble right in the hex pane, one byte in the ASCII pane.
    pub fn forward_char(&mut self) {
        if !self.pane.is_hex() || self.nibble == Nibble::Low {
            self.move_cursor(1);
        }

        if self.pane.is_hex() {
            self.nibble = self.nibble.toggled();
        }
    }

    pub fn backward_char(&mut self) {
        if !self.pane.is_hex() || self.nibble == Nibble::High {
            self.move_cursor(-1);
        }

        if self.pane.is_hex() {
            self.nibble = self.nibble.toggled();
        }
    }

    pub fn next_line(&mut self) {
        self.move_cursor(span(self.layout.line_length()));
    }

    pub fn previous_line(&mut self) {
        self.move_cursor(-span(self.layout.line_length()));
    }

    pub fn forward_block(&mut self) {
        self.move_cursor(span(self.layout.bloc_size()));
    }

    pub fn backward_block(&mut self) {
        self.move_cursor(-span(self.layout.bloc_size()));
    }

    /// `bloc_size` lines down.
    pub fn next_lines(&mut self) {
        self.move_cursor(span(self.layout.line_length() * self.layout.bloc_size()));
    }

    pub fn previous_lines(&mut self) {
        self.move_cursor(-span(self.layout.line_length() * self.layout.bloc_size()));
    }

    pub fn beginning_of_line(&mut self) {
        self.nibble = Nibble::High;
        self.move_cursor(-span(self.cursor % self.layout.line_length()));
    }

    /// Falls back to the last byte when the line is cut short by EOF.
    pub fn end_of_line(&mut self) {
        let line = self.layout.line_length();

        self.nibble = Nibble::High;

        if !self.move_cursor(span(line - 1 - self.cursor % line)) {
            let to_end = span(self.viewport.valid_count()) - span(self.cursor);

            self.move_cursor(to_end);
        }
    }

    pub fn page_forward(&mut self) {
        self.scroll_by(span(self.layout.page()));
    }

    pub fn page_backward(&mut self) {
        self.scroll_by(-span(self.layout.page()));
    }

    fn scroll_by(&mut self, delta: i64) {
        let old = self.position();

        self.move_base(delta);
        self.follow_selection(old);
    }

    pub fn beginning_of_buffer(&mut self) {
        self.nibble = Nibble::High;
        self.set_cursor(0);
    }

    /// Puts the cursor one past the last byte.
    pub fn end_of_buffer(&mut self) {
        let size = self.file_size();

        self.nibble = Nibble::High;

        if self.config.mode == DisplayMode::BySector {
            self.set_base(floor_to(size, span(self.layout.page())));
        }

        self.set_cursor(size);
    }

    /// Scrolls so the cursor byte starts the window. The window leaves the
    /// line grid until the next jump realigns it.
    pub fn recenter(&mut self) {
        if self.cursor != 0 {
            self.base += span(self.cursor);
            self.cursor = 0;
            self.reload();
        }
    }
}
