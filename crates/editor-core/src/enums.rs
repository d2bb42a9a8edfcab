bitflags::bitflags! {
    /// Per-slot display attributes of a [`crate::viewport::Viewport`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ByteAttributes: u8 {
        /// The slot shows a pending edit that differs from the file.
        const MODIFIED = 1 << 0;
        /// The slot is inside the active selection.
        const MARKED = 1 << 1;
    }
}

/// Which column of the display receives typed input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EditPane {
    #[default]
    Hex,
    Ascii,
}

impl EditPane {
    #[inline]
    #[must_use]
    pub fn is_hex(self) -> bool {
        self == EditPane::Hex
    }

    #[inline]
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            EditPane::Hex => EditPane::Ascii,
            EditPane::Ascii => EditPane::Hex,
        }
    }
}

/// Half of the byte under the cursor that a hex digit replaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Nibble {
    #[default]
    High,
    Low,
}

impl Nibble {
    #[inline]
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Nibble::High => Nibble::Low,
            Nibble::Low => Nibble::High,
        }
    }

    /// Column offset of this digit inside the two-character hex cell.
    #[inline]
    #[must_use]
    pub fn column(self) -> usize {
        match self {
            Nibble::High => 0,
            Nibble::Low => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Widest line that fits the terminal.
    #[default]
    Maximized,
    /// Whole 512-byte sectors, paged one screen of sectors at a time.
    BySector,
}
