use editor_core::enums::{EditPane, Nibble};
use editor_core::errors::{EditorError, EditorResult};
use editor_core::overlay::{distance, span};
use editor_core::search::{SearchControl, SearchOutcome};
use io::errors::StoreError;

/// Parses a position typed by the user: `0x`-prefixed hex or decimal.
#[must_use]
pub fn parse_position(input: &str) -> Option<i64> {
    let trimmed = input.trim();
    let value = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(digits) => u64::from_str_radix(digits, 16).ok()?,
        None => trimmed.parse::<u64>().ok()?,
    };

    i64::try_from(value).ok()
}

/*

====================================
============= TYPING ===============
====================================

*/

impl crate::EditorState {
    fn ensure_writable(&self) -> EditorResult<()> {
        if self.store.is_read_only() {
            return Err(StoreError::ReadOnly.into());
        }

        Ok(())
    }

    /// Types `c` at the cursor: a hex digit into the current nibble in the
    /// hex pane, the raw byte in the ASCII pane. Advances like
    /// [`Self::forward_char`].
    ///
    /// Returns `Ok(false)` when `c` is not something the pane accepts.
    ///
    /// # Errors
    ///
    /// `StoreError::ReadOnly` on a read-only file.
    pub fn insert_char(&mut self, c: u8) -> EditorResult<bool> {
        if self.cursor > self.viewport.valid_count() {
            return Ok(false);
        }

        let value = if self.pane.is_hex() {
            let Some(digit) = editor_core::hex::hex_value(c) else {
                return Ok(false);
            };
            let current = self.viewport.byte(self.cursor).unwrap_or(0);

            match self.nibble {
                Nibble::High => editor_core::hex::set_high_nibble(current, digit),
                Nibble::Low => editor_core::hex::set_low_nibble(current, digit),
            }
        } else {
            c
        };

        self.ensure_writable()?;
        self.set_to_byte(self.cursor, value);
        self.forward_char();

        Ok(true)
    }

    /// Records `value` at in-window slot `index` and patches the viewport.
    fn set_to_byte(&mut self, index: usize, value: u8) {
        let unchanged = self.viewport.byte(index) == Some(value);

        if !unchanged && self.viewport.set_byte(index, value) {
            self.overlay.add(self.base + span(index), &[value]);
        }
    }

    /// Steps back one character and forgets the pending edit there.
    pub fn delete_backward_char(&mut self) {
        self.backward_char();
        self.forget_edits_at_cursor(1);
    }

    /// Steps back one block and forgets the pending edits it covers.
    pub fn delete_backward_block(&mut self) {
        self.backward_block();
        self.forget_edits_at_cursor(self.layout.bloc_size());
    }

    fn forget_edits_at_cursor(&mut self, size: usize) {
        self.overlay.remove(self.position(), size);
        self.reload();
        self.nibble = Nibble::High;

        if !self.is_reachable(self.position()) {
            self.end_of_buffer();
        }
    }

    pub fn toggle_pane(&mut self) {
        self.pane = self.pane.toggled();
        self.nibble = Nibble::High;
    }
}

/*

====================================
========= MARK AND CLIPBOARD =======
====================================

*/

impl crate::EditorState {
    /// Starts a selection at the cursor, or drops the current one.
    pub fn set_mark(&mut self) {
        self.viewport.unmark_all();
        self.selection.toggle(self.position());

        if self.selection.is_set() {
            self.viewport.mark_at(self.cursor);
        }
    }

    /// The selected bytes as they would read after a save.
    #[must_use]
    pub fn selected_data(&mut self) -> Vec<u8> {
        if !self.selection.is_set() {
            return Vec::new();
        }

        let min = self.selection.min();
        let end = self.selection.max() + 1;
        let mut data = vec![0u8; distance(min, end)];
        let mut filled = self.store.read_at(min, &mut data);

        for range in self.overlay.ranges() {
            if range.end() <= min {
                continue;
            }

            if range.base >= end {
                break;
            }

            let from = range.base.max(min);
            let to = range.end().min(end);
            let src = distance(range.base, from)..distance(range.base, to);

            data[distance(min, from)..distance(min, to)].copy_from_slice(&range.bytes[src]);
            filled = filled.max(distance(min, to));
        }

        data.truncate(filled);
        data
    }

    /// The selection as text for the system clipboard: spaced lowercase hex
    /// (`"48 65 6c"`) in the hex pane, the bytes as UTF-8 in the ASCII pane.
    /// The selection is kept.
    ///
    /// # Errors
    ///
    /// `EditorError::NothingSelected` without a selection.
    pub fn selected_text(&mut self) -> EditorResult<String> {
        if !self.selection.is_set() {
            return Err(EditorError::NothingSelected);
        }

        let data = self.selected_data();

        Ok(match self.pane {
            EditPane::Hex => data
                .iter()
                .map(|byte| format!("{byte:02x}"))
                .collect::<Vec<_>>()
                .join(" "),
            EditPane::Ascii => String::from_utf8_lossy(&data).into_owned(),
        })
    }

    /// Copies the selection to the clipboard and drops the selection.
    ///
    /// # Errors
    ///
    /// - `EditorError::NothingSelected` without a selection.
    /// - `EditorError::CopyTooLarge` above the copy limit unless
    ///   `confirm_large` is set.
    pub fn copy_region(&mut self, confirm_large: bool) -> EditorResult<()> {
        if !self.selection.is_set() {
            return Err(EditorError::NothingSelected);
        }

        let size = usize::try_from(self.selection.len()).unwrap_or(usize::MAX);

        if size > self.config.copy_limit && !confirm_large {
            return Err(EditorError::CopyTooLarge(size));
        }

        let data = self.selected_data();

        tracing::debug!(min = self.selection.min(), len = data.len(), "copied region");

        self.clipboard = Some(data);
        self.viewport.unmark_all();
        self.selection.clear();

        Ok(())
    }

    fn clipboard_data(&self) -> EditorResult<&[u8]> {
        self.clipboard
            .as_deref()
            .filter(|data| !data.is_empty())
            .ok_or(EditorError::ClipboardEmpty)
    }

    /// Pastes the clipboard over the bytes at the cursor.
    ///
    /// # Errors
    ///
    /// - `EditorError::ClipboardEmpty` if nothing was copied.
    /// - `StoreError::ReadOnly` on a read-only file.
    pub fn yank(&mut self) -> EditorResult<()> {
        let pos = self.position();
        let Some(data) = self.clipboard.as_deref().filter(|data| !data.is_empty()) else {
            return Err(EditorError::ClipboardEmpty);
        };

        if self.store.is_read_only() {
            return Err(StoreError::ReadOnly.into());
        }

        self.overlay.add(pos, data);
        self.reload();

        Ok(())
    }

    /// Writes the clipboard to a separate file.
    ///
    /// # Errors
    ///
    /// - `EditorError::ClipboardEmpty` if nothing was copied.
    /// - `EditorError::FileExists` if `path` exists and `overwrite` is off.
    /// - `EditorError::Export` if the write fails.
    pub fn yank_to_file(
        &self,
        path: impl AsRef<std::path::Path>,
        overwrite: bool,
    ) -> EditorResult<()> {
        let data = self.clipboard_data()?;
        let path = path.as_ref();

        if path.exists() && !overwrite {
            return Err(EditorError::FileExists(path.to_path_buf()));
        }

        std::fs::write(path, data).map_err(|source| EditorError::Export {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!(file = %path.display(), len = data.len(), "clipboard exported");

        Ok(())
    }

    /// Repeats `pattern` over the selection. An empty pattern does nothing.
    ///
    /// # Errors
    ///
    /// - `EditorError::NothingSelected` without a selection.
    /// - `StoreError::ReadOnly` on a read-only file.
    pub fn fill_selection(&mut self, pattern: &[u8]) -> EditorResult<()> {
        if !self.selection.is_set() {
            return Err(EditorError::NothingSelected);
        }

        self.ensure_writable()?;

        if pattern.is_empty() {
            return Ok(());
        }

        let len = usize::try_from(self.selection.len()).unwrap_or_default();
        let fill = pattern.iter().copied().cycle().take(len).collect::<Vec<u8>>();

        self.overlay.add(self.selection.min(), &fill);
        self.reload();

        Ok(())
    }

    /// Turns prompt input into bytes the way the active pane reads it: hex
    /// digits in the hex pane, raw text in the ASCII pane.
    ///
    /// # Errors
    ///
    /// `EditorError::InvalidHex` for malformed hex input.
    pub fn pattern_from_input(&self, input: &str) -> EditorResult<Vec<u8>> {
        match self.pane {
            EditPane::Hex => Ok(editor_core::hex::parse_hex_string(input)?),
            EditPane::Ascii => Ok(input.as_bytes().to_vec()),
        }
    }

    /// Like [`Self::pattern_from_input`], but a single hex digit is a
    /// whole byte.
    ///
    /// # Errors
    ///
    /// `EditorError::InvalidHex` for malformed hex input.
    pub fn fill_pattern_from_input(&self, input: &str) -> EditorResult<Vec<u8>> {
        match self.pane {
            EditPane::Hex => Ok(editor_core::hex::parse_fill_pattern(input)?),
            EditPane::Ascii => Ok(input.as_bytes().to_vec()),
        }
    }
}

/*

====================================
========== FILE COMMANDS ===========
====================================

*/

impl crate::EditorState {
    /// Cuts the file at the cursor. Pending edits past it are dropped, as is
    /// a selection reaching past it.
    ///
    /// # Errors
    ///
    /// Any `StoreError` from the truncation; nothing changes then.
    pub fn truncate_here(&mut self) -> EditorResult<()> {
        let pos = self.position();

        if self.store.high_water_mark() > pos {
            self.store.truncate(pos)?;
        }

        let last_edited = self.overlay.last_edited_loc();

        if last_edited > pos {
            self.overlay.remove(pos, distance(pos, last_edited));
        }

        if self.selection.is_set() && self.selection.max() >= pos {
            self.viewport.unmark_all();
            self.selection.clear();
        }

        self.reload();

        Ok(())
    }

    /// Drops every pending edit and pulls the cursor and selection back
    /// inside the file.
    pub fn discard_edits(&mut self) {
        self.overlay.discard_all();

        let end = self.store.high_water_mark();

        self.selection.clamp_to(end);
        self.reload();

        if self.position() > end {
            self.set_cursor(end);
        }

        tracing::debug!("pending edits discarded");
    }

    /// Writes the pending edits to the file.
    ///
    /// # Errors
    ///
    /// `EditorError::ChangesLost` when a write failed. The edits are gone
    /// either way.
    pub fn save(&mut self) -> EditorResult<()> {
        let failure = self.overlay.save(&mut self.store);

        self.reload();

        if let Some(err) = failure {
            if self.cursor > self.viewport.valid_count() {
                self.set_cursor(self.file_size());
            }

            return Err(EditorError::ChangesLost(err));
        }

        tracing::info!(file = %self.store.path().display(), "saved");

        Ok(())
    }

    /// Switches to another file.
    ///
    /// # Errors
    ///
    /// - `EditorError::UnsavedChanges` while edits are pending.
    /// - `EditorError::Store` / `EditorError::WindowTooSmall` if the new file
    ///   cannot be opened or laid out. The current file stays open then.
    pub fn open_file(&mut self, path: impl AsRef<std::path::Path>) -> EditorResult<()> {
        if self.overlay.has_edits() {
            return Err(EditorError::UnsavedChanges);
        }

        let read_only = self.config.read_only || self.store.is_read_only();
        let store = io::store::FileStore::open(path, read_only)?;
        let layout = Self::fit_for(&store, &self.config, self.terminal)?;

        self.store = store;
        self.layout = layout;
        self.viewport.resize(layout.page());
        self.selection.clear();
        self.base = 0;
        self.cursor = 0;
        self.nibble = Nibble::High;
        self.drag_start = None;
        self.reload();

        tracing::info!(file = %self.store.path().display(), read_only, "switched file");

        Ok(())
    }
}

/*

====================================
======== JUMPS AND SEARCHES ========
====================================

*/

impl crate::EditorState {
    #[inline]
    pub fn goto_position(&mut self, loc: i64) -> bool {
        self.nibble = Nibble::High;
        self.set_cursor(loc)
    }

    /// Jumps to the start of 512-byte sector `sector`.
    pub fn goto_sector(&mut self, sector: u64) -> bool {
        let Some(pos) = sector
            .checked_mul(crate::config::SECTOR_SIZE.unsigned_abs())
            .and_then(|pos| i64::try_from(pos).ok())
        else {
            return false;
        };

        if !self.set_base(pos) {
            return false;
        }

        self.nibble = Nibble::High;
        self.set_cursor(pos);

        true
    }

    /// Looks for `pattern` strictly after the cursor.
    pub fn search_forward(
        &mut self,
        pattern: &[u8],
        control: &mut impl SearchControl,
    ) -> SearchOutcome {
        let from = self.position() + 1;
        let outcome = self.searcher.forward(&mut self.store, pattern, from, control);

        self.land_on(outcome);

        outcome
    }

    /// Looks for `pattern` starting strictly before the cursor.
    pub fn search_backward(
        &mut self,
        pattern: &[u8],
        control: &mut impl SearchControl,
    ) -> SearchOutcome {
        let from = self.position() - 1;
        let outcome = self
            .searcher
            .backward(&mut self.store, pattern, from, control);

        self.land_on(outcome);

        outcome
    }

    fn land_on(&mut self, outcome: SearchOutcome) {
        if let SearchOutcome::Found(loc) = outcome {
            self.nibble = Nibble::High;
            self.set_cursor(loc);
        }
    }
}

#[cfg(test)]
mod tests {
    use editor_core::enums::ByteAttributes;
    use editor_core::search::{PollFn, Uninterrupted};

    use super::*;
    use crate::config::EditorConfig;
    use crate::test_support::*;

    #[test]
    fn hex_typing_edits_both_nibbles() {
        let (temp, mut state) = session(32);

        assert!(state.insert_char(b'a').unwrap());
        assert_eq!(state.nibble(), Nibble::Low);
        assert!(state.insert_char(b'B').unwrap());

        assert_eq!(state.position(), 1);
        assert_eq!(state.viewport().byte(0), Some(0xAB));
        assert!(state.viewport().attribute(0).contains(ByteAttributes::MODIFIED));
        assert_eq!(state.overlay().get_value(0), Some(0xAB));
        assert_eq!(std::fs::read(temp.path()).unwrap()[0], 0, "file untouched");
    }

    #[test]
    fn non_hex_input_is_refused_in_hex_pane() {
        let (_temp, mut state) = session(32);

        assert!(!state.insert_char(b'z').unwrap());
        assert!(!state.has_pending_edits());
        assert_eq!(state.position(), 0);
    }

    #[test]
    fn ascii_typing_appends_at_eof() {
        let (_temp, mut state) = session(4);

        state.toggle_pane();
        state.end_of_buffer();
        assert!(state.insert_char(b'Q').unwrap());

        assert_eq!(state.file_size(), 5);
        assert_eq!(state.viewport().valid_count(), 5);
        assert_eq!(state.viewport().byte(4), Some(b'Q'));
        assert_eq!(state.position(), 5);
    }

    #[test]
    fn typing_on_read_only_file_fails() {
        let temp = temp_with(b"abcd");
        let config = EditorConfig {
            read_only: true,
            ..EditorConfig::default()
        };
        let mut state = crate::EditorState::open(temp.path(), config, TERM).unwrap();

        assert!(matches!(
            state.insert_char(b'1'),
            Err(EditorError::Store(StoreError::ReadOnly))
        ));
        assert!(!state.has_pending_edits());
    }

    #[test]
    fn delete_backward_undoes_typing() {
        let (_temp, mut state) = session(32);

        state.toggle_pane();
        state.insert_char(b'x').unwrap();
        state.insert_char(b'y').unwrap();
        state.delete_backward_char();

        assert_eq!(state.position(), 1);
        assert_eq!(state.overlay().get_value(0), Some(b'x'));
        assert_eq!(state.overlay().get_value(1), None);
        assert_eq!(state.viewport().byte(1), Some(1));
    }

    #[test]
    fn delete_past_eof_retreats_to_end() {
        let (_temp, mut state) = session(4);

        state.toggle_pane();
        state.end_of_buffer();
        state.insert_char(b'x').unwrap();
        state.insert_char(b'y').unwrap();
        state.delete_backward_char();

        assert_eq!(state.file_size(), 5);
        assert_eq!(state.position(), 5);
        assert_eq!(state.viewport().valid_count(), 5);
    }

    #[test]
    fn copy_and_yank() {
        let (_temp, mut state) = session(64);

        state.set_cursor(2);
        state.set_mark();
        state.set_cursor(5);
        state.copy_region(false).unwrap();

        assert_eq!(state.clipboard(), Some(&[2u8, 3, 4, 5][..]));
        assert!(!state.selection().is_set());

        state.set_cursor(40);
        state.yank().unwrap();

        assert_eq!(state.overlay().get_value(40), Some(2));
        assert_eq!(state.overlay().get_value(43), Some(5));
        assert_eq!(state.viewport().byte(41), Some(3));
    }

    #[test]
    fn copy_sees_pending_edits() {
        let (_temp, mut state) = session(8);

        state.toggle_pane();
        state.set_cursor(7);
        state.insert_char(b'A').unwrap();
        state.insert_char(b'B').unwrap();
        state.set_cursor(6);
        state.set_mark();
        state.set_cursor(8);

        assert_eq!(state.selected_data(), vec![6, b'A', b'B']);
    }

    #[test]
    fn selected_text_follows_pane() {
        let (_temp, mut state) = session(128);

        assert!(matches!(state.selected_text(), Err(EditorError::NothingSelected)));

        state.set_cursor(0x48);
        state.set_mark();
        state.set_cursor(0x4A);

        assert_eq!(state.selected_text().unwrap(), "48 49 4a");

        state.toggle_pane();
        assert_eq!(state.selected_text().unwrap(), "HIJ");
        assert!(state.selection().is_set());
    }

    #[test]
    fn copy_errors() {
        let (_temp, mut state) = session(64);
        let limited = EditorConfig {
            copy_limit: 4,
            ..EditorConfig::default()
        };

        assert!(matches!(state.copy_region(false), Err(EditorError::NothingSelected)));
        assert!(matches!(state.yank(), Err(EditorError::ClipboardEmpty)));

        let (_temp, mut state) = session_with(limited, 64);

        state.set_mark();
        state.set_cursor(10);
        assert!(matches!(state.copy_region(false), Err(EditorError::CopyTooLarge(11))));
        state.copy_region(true).unwrap();
        assert_eq!(state.clipboard().map(<[u8]>::len), Some(11));
    }

    #[test]
    fn yank_to_file_respects_existing_files() {
        let (_temp, mut state) = session(16);
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("clip.bin");

        state.set_mark();
        state.set_cursor(3);
        state.copy_region(false).unwrap();
        state.yank_to_file(&target, false).unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), vec![0, 1, 2, 3]);

        assert!(matches!(
            state.yank_to_file(&target, false),
            Err(EditorError::FileExists(_))
        ));
        state.yank_to_file(&target, true).unwrap();
    }

    #[test]
    fn fill_repeats_pattern() {
        let (_temp, mut state) = session(32);

        state.set_cursor(4);
        state.set_mark();
        state.set_cursor(8);

        let pattern = state.fill_pattern_from_input("ab cd").unwrap();

        state.fill_selection(&pattern).unwrap();

        assert_eq!(state.selected_data(), vec![0xAB, 0xCD, 0xAB, 0xCD, 0xAB]);
        assert!(matches!(
            state.fill_pattern_from_input("abc"),
            Err(EditorError::InvalidHex(_))
        ));
    }

    #[test]
    fn save_flushes_and_clears_modified() {
        let (temp, mut state) = session(8);

        state.toggle_pane();
        state.insert_char(b'Z').unwrap();
        state.end_of_buffer();
        state.insert_char(b'!').unwrap();
        state.save().unwrap();

        let on_disk = std::fs::read(temp.path()).unwrap();

        assert_eq!(on_disk.len(), 9);
        assert_eq!(on_disk[0], b'Z');
        assert_eq!(on_disk[8], b'!');
        assert!(!state.has_pending_edits());
        assert!(state.viewport().attributes().iter().all(|a| a.is_empty()));
        assert_eq!(state.file_size(), 9);
    }

    #[test]
    fn failed_save_reports_lost_changes() {
        let temp = temp_with(b"abcd");
        let mut state = crate::EditorState::open(temp.path(), EditorConfig::default(), TERM).unwrap();

        state.toggle_pane();
        state.insert_char(b'x').unwrap();
        // Swap in a read-only handle behind the session's back.
        state.store = io::store::FileStore::open(temp.path(), true).unwrap();

        assert!(matches!(state.save(), Err(EditorError::ChangesLost(StoreError::ReadOnly))));
        assert!(!state.has_pending_edits());
        assert_eq!(state.viewport().byte(0), Some(b'a'));
    }

    #[test]
    fn discard_pulls_cursor_back() {
        let (_temp, mut state) = session(4);

        state.toggle_pane();
        state.end_of_buffer();
        state.insert_char(b'x').unwrap();
        state.insert_char(b'y').unwrap();
        assert_eq!(state.position(), 6);

        state.discard_edits();

        assert!(!state.has_pending_edits());
        assert_eq!(state.position(), 4);
        assert_eq!(state.viewport().valid_count(), 4);
    }

    #[test]
    fn truncate_drops_tail_and_edits() {
        let (temp, mut state) = session(32);

        state.toggle_pane();
        state.set_cursor(20);
        state.insert_char(b'q').unwrap();
        state.set_cursor(10);
        state.set_mark();
        state.set_cursor(12);
        state.truncate_here().unwrap();

        assert_eq!(std::fs::read(temp.path()).unwrap().len(), 12);
        assert!(!state.has_pending_edits());
        assert!(!state.selection().is_set());
        assert_eq!(state.file_size(), 12);
    }

    #[test]
    fn open_file_refuses_with_pending_edits() {
        let (_temp, mut state) = session(32);
        let other = temp_with(&[0xEE; 700]);

        state.toggle_pane();
        state.insert_char(b'x').unwrap();
        assert!(matches!(state.open_file(other.path()), Err(EditorError::UnsavedChanges)));

        state.discard_edits();
        state.set_cursor(10);
        state.open_file(other.path()).unwrap();

        assert_eq!(state.position(), 0);
        assert_eq!(state.file_size(), 700);
        assert_eq!(state.viewport().byte(0), Some(0xEE));
    }

    #[test]
    fn goto_commands() {
        let (_temp, mut state) = session(2048);

        assert!(state.goto_position(parse_position("0x300").unwrap()));
        assert_eq!(state.position(), 0x300);

        assert!(state.goto_sector(2));
        assert_eq!(state.position(), 1024);
        assert!(!state.goto_sector(5));

        assert_eq!(parse_position(" 42 "), Some(42));
        assert_eq!(parse_position("0xZZ"), None);
        assert_eq!(parse_position("-3"), None);
    }

    #[test]
    fn searches_move_the_cursor() {
        let mut content = vec![0u8; 600];

        content[100..102].copy_from_slice(&[0xAA, 0xBB]);
        content[500..502].copy_from_slice(&[0xAA, 0xBB]);

        let temp = temp_with(&content);
        let mut state = crate::EditorState::open(temp.path(), EditorConfig::default(), TERM).unwrap();

        assert_eq!(
            state.search_forward(&[0xAA, 0xBB], &mut Uninterrupted),
            SearchOutcome::Found(100)
        );
        assert_eq!(state.position(), 100);
        assert_eq!(
            state.search_forward(&[0xAA, 0xBB], &mut Uninterrupted),
            SearchOutcome::Found(500)
        );
        assert_eq!(
            state.search_forward(&[0xAA, 0xBB], &mut Uninterrupted),
            SearchOutcome::NotFound
        );
        assert_eq!(
            state.search_backward(&[0xAA, 0xBB], &mut Uninterrupted),
            SearchOutcome::Found(100)
        );
        assert_eq!(
            state.search_backward(&[0xAA, 0xBB], &mut PollFn(|| true)),
            SearchOutcome::Cancelled
        );
        assert_eq!(state.position(), 100);
    }
}
