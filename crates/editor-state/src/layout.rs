use editor_core::enums::{DisplayMode, EditPane, Nibble};
use editor_core::errors::{EditorError, EditorResult};

/// Columns taken by one hex cell plus its separator.
const CELL_WIDTH: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TerminalSize {
    pub cols: usize,
    pub rows: usize,
}

/// How bytes are laid out on screen.
///
/// A display line is `address | hex cells | ascii`. Hex cells come in
/// blocks of `bloc_size`, with one extra column between blocks. The last
/// terminal row is left to the status line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    line_length: usize,
    bloc_size: usize,
    page: usize,
    address_digits: usize,
}

/// Hex digits shown for addresses up to `max_addr`: two per significant
/// byte, never fewer than 8.
#[must_use]
pub fn address_digits(max_addr: u64) -> usize {
    let significant_bytes = (u64::BITS - max_addr.leading_zeros()).div_ceil(8);

    (significant_bytes as usize * 2).max(8)
}

/*

====================================
============= FITTING ==============
====================================

*/

impl Layout {
    /// Derives the layout for `size`.
    ///
    /// # Errors
    ///
    /// `EditorError::WindowTooSmall` when not even one line (or one sector
    /// in sector mode) fits.
    pub fn fit(
        config: &crate::config::EditorConfig,
        size: TerminalSize,
        address_digits: usize,
    ) -> EditorResult<Self> {
        let params = config.mode_params();
        let mut layout = Self {
            line_length: params.line_length,
            bloc_size: params.bloc_size,
            page: 0,
            address_digits,
        };

        match config.mode {
            DisplayMode::BySector => {
                let rows_of_data = size.rows.saturating_sub(1) * layout.line_length;

                layout.page = rows_of_data / params.page * params.page;

                if layout.line_width() > size.cols {
                    return Err(EditorError::WindowTooSmall("width for sector view"));
                }

                if layout.page == 0 {
                    return Err(EditorError::WindowTooSmall("height for sector view"));
                }
            }
            DisplayMode::Maximized => {
                if size.rows <= 4 {
                    return Err(EditorError::WindowTooSmall("height"));
                }

                match config.line_length.filter(|&len| len > 0) {
                    Some(fixed) => {
                        layout.line_length = fixed;

                        if layout.line_width() > size.cols {
                            return Err(EditorError::WindowTooSmall(
                                "width for selected line length",
                            ));
                        }
                    }
                    None => {
                        layout.line_length = layout.bloc_size;

                        while layout.line_width() <= size.cols {
                            layout.line_length += layout.bloc_size;
                        }

                        layout.line_length -= layout.bloc_size;

                        if layout.line_length == 0 {
                            return Err(EditorError::WindowTooSmall("width"));
                        }
                    }
                }

                layout.page = layout.line_length * (size.rows - 1);
            }
        }

        tracing::debug!(
            line_length = layout.line_length,
            page = layout.page,
            cols = size.cols,
            rows = size.rows,
            "fitted layout"
        );

        Ok(layout)
    }
}

/*

====================================
============ GEOMETRY ==============
====================================

*/

impl Layout {
    /// Screen column of the in-window byte `cursor` in `pane`.
    #[must_use]
    pub fn cursor_column(&self, cursor: usize, pane: EditPane, nibble: Nibble) -> usize {
        let x = cursor % self.line_length;
        let h = if pane.is_hex() { x } else { self.line_length - 1 };
        let mut column = self.address_digits + CELL_WIDTH;

        column += CELL_WIDTH * (h % self.bloc_size)
            + (h / self.bloc_size) * (CELL_WIDTH * self.bloc_size + 1);

        match pane {
            EditPane::Hex => column + nibble.column(),
            EditPane::Ascii => column + x + CELL_WIDTH + 1,
        }
    }

    /// Columns used by one full display line.
    #[must_use]
    pub fn line_width(&self) -> usize {
        if self.line_length == 0 {
            return 0;
        }

        self.cursor_column(self.line_length - 1, EditPane::Ascii, Nibble::High) + 1
    }

    /// Maps a screen cell of the data area to the byte under it.
    #[must_use]
    pub fn hit_test(&self, row: usize, col: usize) -> Option<(usize, EditPane, Nibble)> {
        if row >= self.rows() {
            return None;
        }

        let line_start = row * self.line_length;

        for x in 0..self.line_length {
            for nibble in [Nibble::High, Nibble::Low] {
                if self.cursor_column(x, EditPane::Hex, nibble) == col {
                    return Some((line_start + x, EditPane::Hex, nibble));
                }
            }
        }

        (0..self.line_length)
            .find(|&x| self.cursor_column(x, EditPane::Ascii, Nibble::High) == col)
            .map(|x| (line_start + x, EditPane::Ascii, Nibble::High))
    }

    /// Lines of data on screen.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.page / self.line_length.max(1)
    }

    #[inline]
    #[must_use]
    pub fn line_length(&self) -> usize {
        self.line_length
    }

    #[inline]
    #[must_use]
    pub fn bloc_size(&self) -> usize {
        self.bloc_size
    }

    /// Bytes per screen, which is also the viewport capacity.
    #[inline]
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    #[inline]
    #[must_use]
    pub fn address_digits(&self) -> usize {
        self.address_digits
    }
}
