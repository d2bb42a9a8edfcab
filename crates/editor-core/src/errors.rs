pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Store(#[from] io::errors::StoreError),

    #[error("Terminal too small: {0}")]
    WindowTooSmall(&'static str),

    /// A save hit at least one failed write. The overlay has been emptied
    /// regardless, so some or all unsaved changes are gone.
    #[error("{0} (unwritten changes have been discarded)")]
    ChangesLost(#[source] io::errors::StoreError),

    #[error("Unsaved changes are pending")]
    UnsavedChanges,

    #[error("Nothing to copy")]
    NothingSelected,

    #[error("Nothing to paste")]
    ClipboardEmpty,

    #[error("Selection of {0} bytes is larger than the copy limit")]
    CopyTooLarge(usize),

    #[error(transparent)]
    InvalidHex(#[from] crate::hex::HexParseError),

    #[error("{}: File exists", .0.display())]
    FileExists(std::path::PathBuf),

    #[error("{}: {}", .path.display(), .source)]
    Export {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}
