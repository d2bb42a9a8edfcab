//! # Editor State.
//!
//! [`EditorState`] ties one open file to everything shown for it: the
//! pending edits, the window on screen, the selection, the cursor and the
//! layout. Movement lives in [`navigation`], editing commands in
//! [`commands`] and event dispatch in [`event`].
pub mod commands;
pub mod config;
pub mod event;
pub mod layout;
pub mod navigation;

use editor_core::enums::{EditPane, Nibble};
use editor_core::overlay::span;

/// Holds the complete state of one editing session.
///
/// The window starts at `base` and the cursor is `cursor` bytes into it, so
/// the absolute cursor position is `base + cursor`. `cursor` never exceeds
/// the viewport's valid count: it may sit one past the last byte to append.
pub struct EditorState {
    store: io::store::FileStore,
    overlay: editor_core::overlay::table::EditOverlay,
    viewport: editor_core::viewport::Viewport,
    selection: editor_core::selection::Selection,
    searcher: editor_core::search::Searcher,
    clipboard: Option<Vec<u8>>,
    config: config::EditorConfig,
    terminal: layout::TerminalSize,
    layout: layout::Layout,
    base: i64,
    cursor: usize,
    nibble: Nibble,
    pane: EditPane,
    /// Absolute position of the last mouse press while a drag may follow.
    drag_start: Option<i64>,
}

/*

====================================
========= CREATION METHODS =========
====================================

*/

impl EditorState {
    /// Opens `path` and lays it out for a terminal of `terminal` cells.
    ///
    /// # Errors
    ///
    /// - `EditorError::Store` if the file cannot be opened.
    /// - `EditorError::WindowTooSmall` if the terminal cannot hold a page.
    pub fn open(
        path: impl AsRef<std::path::Path>,
        config: config::EditorConfig,
        terminal: layout::TerminalSize,
    ) -> editor_core::errors::EditorResult<Self> {
        let store = io::store::FileStore::open(path, config.read_only)?;
        let layout = Self::fit_for(&store, &config, terminal)?;
        let mut state = Self {
            overlay: editor_core::overlay::table::EditOverlay::new(),
            viewport: editor_core::viewport::Viewport::new(layout.page()),
            selection: editor_core::selection::Selection::new(),
            searcher: editor_core::search::Searcher::new(config.search_block_size),
            clipboard: None,
            store,
            config,
            terminal,
            layout,
            base: 0,
            cursor: 0,
            nibble: Nibble::High,
            pane: EditPane::Hex,
            drag_start: None,
        };

        state.reload();

        tracing::info!(
            file = %state.store.path().display(),
            size = state.store.size(),
            read_only = state.store.is_read_only(),
            "opened editing session"
        );

        Ok(state)
    }

    fn fit_for(
        store: &io::store::FileStore,
        config: &config::EditorConfig,
        terminal: layout::TerminalSize,
    ) -> editor_core::errors::EditorResult<layout::Layout> {
        let max_addr = u64::try_from(store.high_water_mark()).unwrap_or_default();

        layout::Layout::fit(config, terminal, layout::address_digits(max_addr))
    }

    /// Rebuilds the viewport at the current base.
    pub fn reload(&mut self) {
        self.viewport
            .read(&mut self.store, self.base, &self.overlay, &self.selection);
    }
}

/*

====================================
============ ACCESSORS =============
====================================

*/

impl EditorState {
    /// Absolute cursor position.
    #[inline]
    #[must_use]
    pub fn position(&self) -> i64 {
        self.base + span(self.cursor)
    }

    /// Size of the file as edited: pending edits past EOF count.
    #[inline]
    #[must_use]
    pub fn file_size(&self) -> i64 {
        self.store.logical_size(self.overlay.last_edited_loc())
    }

    #[inline]
    #[must_use]
    pub fn base(&self) -> i64 {
        self.base
    }

    #[inline]
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    #[must_use]
    pub fn nibble(&self) -> Nibble {
        self.nibble
    }

    #[inline]
    #[must_use]
    pub fn pane(&self) -> EditPane {
        self.pane
    }

    #[inline]
    #[must_use]
    pub fn viewport(&self) -> &editor_core::viewport::Viewport {
        &self.viewport
    }

    #[inline]
    #[must_use]
    pub fn selection(&self) -> &editor_core::selection::Selection {
        &self.selection
    }

    #[inline]
    #[must_use]
    pub fn overlay(&self) -> &editor_core::overlay::table::EditOverlay {
        &self.overlay
    }

    #[inline]
    #[must_use]
    pub fn layout(&self) -> &layout::Layout {
        &self.layout
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &config::EditorConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn terminal(&self) -> layout::TerminalSize {
        self.terminal
    }

    #[inline]
    #[must_use]
    pub fn clipboard(&self) -> Option<&[u8]> {
        self.clipboard.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn has_pending_edits(&self) -> bool {
        self.overlay.has_edits()
    }

    #[inline]
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.store.is_read_only()
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        self.store.path()
    }

    #[must_use]
    pub fn file_name(&self) -> String {
        self.store.base_name()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn open_loads_first_page() {
        let (_temp, state) = session(1000);

        assert_eq!(state.base(), 0);
        assert_eq!(state.position(), 0);
        assert_eq!(state.layout().page(), 256);
        assert_eq!(state.viewport().valid_count(), 256);
        assert_eq!(state.viewport().byte(255), Some(255));
        assert_eq!(state.file_size(), 1000);
        assert!(!state.has_pending_edits());
    }

    #[test]
    fn open_small_file() {
        let (_temp, state) = session(10);

        assert_eq!(state.viewport().valid_count(), 10);
        assert_eq!(state.file_size(), 10);
    }

    #[test]
    fn open_rejects_tiny_terminal() {
        let temp = temp_with(b"abc");
        let tiny = layout::TerminalSize { cols: 80, rows: 3 };

        assert!(matches!(
            EditorState::open(temp.path(), config::EditorConfig::default(), tiny),
            Err(editor_core::errors::EditorError::WindowTooSmall(_))
        ));
    }

    #[test]
    fn forced_read_only() {
        let temp = temp_with(b"abc");
        let config = config::EditorConfig {
            read_only: true,
            ..config::EditorConfig::default()
        };
        let state = EditorState::open(temp.path(), config, TERM).unwrap();

        assert!(state.is_read_only());
        assert_eq!(state.file_name(), temp.path().file_name().unwrap().to_string_lossy());
    }
}
