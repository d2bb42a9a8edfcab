use editor_core::enums::DisplayMode;

/// Bytes per sector for sector navigation.
pub const SECTOR_SIZE: i64 = 512;

/// Selections larger than this need an explicit confirmation to copy.
pub const COPY_LIMIT: usize = 1024 * 1024;

/// Layout defaults of a display mode. A zero `line_length` or `page` means
/// "derive from the terminal size".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeParams {
    pub bloc_size: usize,
    pub line_length: usize,
    pub page: usize,
}

impl ModeParams {
    #[must_use]
    pub const fn for_mode(mode: DisplayMode) -> Self {
        match mode {
            DisplayMode::BySector => Self {
                bloc_size: 8,
                line_length: 16,
                page: 256,
            },
            DisplayMode::Maximized => Self {
                bloc_size: 4,
                line_length: 0,
                page: 0,
            },
        }
    }
}

/// Startup options of an editing session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditorConfig {
    pub mode: DisplayMode,
    /// Fixed bytes per line in maximized mode; `None` fits the terminal.
    pub line_length: Option<usize>,
    /// Open read-only even when the file is writable. Sticks across
    /// file switches.
    pub read_only: bool,
    pub search_block_size: usize,
    pub copy_limit: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            mode: DisplayMode::default(),
            line_length: None,
            read_only: false,
            search_block_size: editor_core::search::BLOCK_SEARCH_SIZE,
            copy_limit: COPY_LIMIT,
        }
    }
}

impl EditorConfig {
    #[inline]
    #[must_use]
    pub fn mode_params(&self) -> ModeParams {
        ModeParams::for_mode(self.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_defaults() {
        let sector = ModeParams::for_mode(DisplayMode::BySector);
        let maximized = ModeParams::for_mode(DisplayMode::Maximized);

        assert_eq!((sector.bloc_size, sector.line_length, sector.page), (8, 16, 256));
        assert_eq!((maximized.bloc_size, maximized.line_length), (4, 0));
    }

    #[test]
    fn default_config() {
        let config = EditorConfig::default();

        assert_eq!(config.mode, DisplayMode::Maximized);
        assert_eq!(config.search_block_size, 4096);
        assert_eq!(config.copy_limit, 1 << 20);
        assert!(!config.read_only);
    }
}
