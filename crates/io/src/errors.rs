pub type StoreResult<T> = Result<T, StoreError>;

/// Failures surfaced by [`crate::store::FileStore`].
///
/// A read-write open that falls back to read-only is not an error; it only
/// shows up in [`crate::store::FileStore::is_read_only`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("No such file: {}", .0.display())]
    NotFound(std::path::PathBuf),

    #[error("{}: Not a file", .0.display())]
    NotAFile(std::path::PathBuf),

    #[error("{}: {}", .path.display(), .source)]
    OpenFailed {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Seek failed (wanted offset {0})")]
    SeekFailed(i64),

    #[error("Write error: {0}")]
    WriteFailed(#[source] std::io::Error),

    /// Kept apart from `WriteFailed` so the user sees the real cause.
    #[error("File is read-only!")]
    ReadOnly,
}
