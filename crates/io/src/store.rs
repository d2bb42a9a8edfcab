use std::io::{Read, Seek, Write};

use crate::errors::{StoreError, StoreResult};

/// A byte-addressable handle on the file being edited.
///
/// All offsets are absolute and signed so that callers can hand over the
/// result of cursor arithmetic without converting first; a negative offset
/// simply fails the seek.
#[derive(Debug)]
pub struct FileStore {
    file: std::fs::File,
    path: std::path::PathBuf,
    /// Size reported by the filesystem (or the block device) at open time,
    /// adjusted by writes and truncation.
    size: i64,
    /// Largest offset proven reachable, either by a successful read or by a
    /// flushed edit. Lets the cursor sit exactly one byte past EOF.
    high_water_mark: i64,
    read_only: bool,
}

/*

====================================
========= CREATION METHODS =========
====================================

*/

impl FileStore {
    /// Opens `path` read-write, silently falling back to read-only.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the path cannot be stat'ed.
    /// - `StoreError::NotAFile` if the path is a directory.
    /// - `StoreError::OpenFailed` if not even a read-only open succeeds.
    pub fn open(path: impl AsRef<std::path::Path>, force_read_only: bool) -> StoreResult<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let metadata = std::fs::metadata(&path_buf)
            .map_err(|_| StoreError::NotFound(path_buf.clone()))?;

        if metadata.is_dir() {
            return Err(StoreError::NotAFile(path_buf));
        }

        let mut read_only = force_read_only;
        let mut writable = None;

        if !force_read_only {
            match std::fs::OpenOptions::new()
                .read(true)
                .write(true)
                .open(&path_buf)
            {
                Ok(file) => writable = Some(file),
                Err(err) => {
                    tracing::info!(
                        path = %path_buf.display(),
                        error = %err,
                        "read-write open failed, falling back to read-only"
                    );
                    read_only = true;
                }
            }
        }

        let mut file = match writable {
            Some(file) => file,
            None => std::fs::File::open(&path_buf).map_err(|source| StoreError::OpenFailed {
                path: path_buf.clone(),
                source,
            })?,
        };
        let size = Self::detect_size(&mut file);

        tracing::debug!(path = %path_buf.display(), size, read_only, "opened file store");

        Ok(Self {
            file,
            path: path_buf,
            size,
            high_water_mark: size,
            read_only,
        })
    }

    /// Replaces the underlying file, re-deriving size and high-water mark.
    ///
    /// # Errors
    ///
    /// Same as [`FileStore::open`]. On error `self` is left untouched.
    pub fn reopen(
        &mut self,
        path: impl AsRef<std::path::Path>,
        force_read_only: bool,
    ) -> StoreResult<()> {
        *self = Self::open(path, force_read_only)?;

        Ok(())
    }

    /// Block devices report a zero length in their metadata; seeking to the
    /// end gives their real capacity.
    fn detect_size(file: &mut std::fs::File) -> i64 {
        let len = file.metadata().map(|m| m.len()).unwrap_or(0);

        if len > 0 {
            return i64::try_from(len).unwrap_or(i64::MAX);
        }

        file.seek(std::io::SeekFrom::End(0))
            .ok()
            .and_then(|end| i64::try_from(end).ok())
            .unwrap_or(0)
    }
}

/*

====================================
========= POSITIONED ACCESS ========
====================================

*/

impl FileStore {
    fn seek_to(&mut self, offset: i64) -> StoreResult<()> {
        let pos = u64::try_from(offset).map_err(|_| StoreError::SeekFailed(offset))?;

        self.file
            .seek(std::io::SeekFrom::Start(pos))
            .map_err(|_| StoreError::SeekFailed(offset))?;

        Ok(())
    }

    /// Reads up to `buf.len()` bytes at `offset` and returns how many were
    /// read. Short reads near EOF are normal; any failure reads as zero.
    pub fn read_at(&mut self, offset: i64, buf: &mut [u8]) -> usize {
        if self.seek_to(offset).is_err() {
            return 0;
        }

        let mut filled = 0;

        while filled < buf.len() {
            match self.file.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {}
                Err(err) => {
                    tracing::debug!(offset, error = %err, "positioned read failed");
                    break;
                }
            }
        }

        if filled > 0 {
            let end = offset.saturating_add(i64::try_from(filled).unwrap_or(i64::MAX));

            self.raise_high_water_mark(end);
        }

        filled
    }

    /// # Errors
    ///
    /// - `StoreError::ReadOnly` if the file was opened read-only.
    /// - `StoreError::SeekFailed` / `StoreError::WriteFailed` on I/O failure.
    pub fn write_at(&mut self, offset: i64, bytes: &[u8]) -> StoreResult<()> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }

        self.seek_to(offset)?;
        self.file.write_all(bytes).map_err(StoreError::WriteFailed)?;

        let end = offset.saturating_add(i64::try_from(bytes.len()).unwrap_or(i64::MAX));

        if end > self.size {
            self.size = end;
        }

        self.raise_high_water_mark(end);

        Ok(())
    }

    /// # Errors
    ///
    /// - `StoreError::ReadOnly` if the file was opened read-only.
    /// - `StoreError::SeekFailed` for a negative offset.
    /// - `StoreError::WriteFailed` if the OS refuses the truncation.
    pub fn truncate(&mut self, offset: i64) -> StoreResult<()> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }

        let len = u64::try_from(offset).map_err(|_| StoreError::SeekFailed(offset))?;

        self.file.set_len(len).map_err(StoreError::WriteFailed)?;
        self.high_water_mark = self.high_water_mark.min(offset);
        self.size = self.size.min(offset);

        tracing::info!(path = %self.path.display(), offset, "truncated file");

        Ok(())
    }
}

/*

====================================
======= POSITION VALIDATION ========
====================================

*/

impl FileStore {
    /// Whether the byte just before `loc` can be read. A successful probe
    /// raises the high-water mark to `loc`.
    pub fn probe(&mut self, loc: i64) -> bool {
        if loc <= 0 {
            return false;
        }

        let mut byte = [0u8; 1];

        self.read_at(loc - 1, &mut byte) == 1
    }

    /// Whether the cursor may be placed at `loc`: inside pending edits, below
    /// the high-water mark, or one past a readable byte.
    pub fn is_reachable(&mut self, loc: i64, last_edited_loc: i64) -> bool {
        if loc < 0 {
            return false;
        }

        loc <= last_edited_loc || loc <= self.high_water_mark || self.probe(loc)
    }

    /// Size as seen by the editor: the file plus any edits past its end.
    #[inline]
    #[must_use]
    pub fn logical_size(&self, last_edited_loc: i64) -> i64 {
        last_edited_loc.max(self.high_water_mark)
    }

    #[inline]
    pub fn raise_high_water_mark(&mut self, loc: i64) {
        if loc > self.high_water_mark {
            self.high_water_mark = loc;
        }
    }
}

/*

====================================
============ ACCESSORS =============
====================================

*/

impl FileStore {
    #[inline]
    #[must_use]
    pub fn size(&self) -> i64 {
        self.size
    }

    #[inline]
    #[must_use]
    pub fn high_water_mark(&self) -> i64 {
        self.high_water_mark
    }

    #[inline]
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// File name without its directory, for status lines.
    #[must_use]
    pub fn base_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn temp_with(content: &[u8]) -> tempfile::NamedTempFile {
        let mut temp = tempfile::NamedTempFile::new().expect("could not create temp file");

        temp.write_all(content).expect("could not write");
        temp.as_file().sync_all().expect("could not sync");

        temp
    }

    #[test]
    fn open_reports_size_and_mark() {
        let temp = temp_with(b"0123456789");
        let store = FileStore::open(temp.path(), false).unwrap();

        assert_eq!(store.size(), 10);
        assert_eq!(store.high_water_mark(), 10);
        assert!(!store.is_read_only());
    }

    #[test]
    fn open_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.bin");

        assert!(matches!(
            FileStore::open(&missing, false),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn open_directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();

        assert!(matches!(
            FileStore::open(dir.path(), false),
            Err(StoreError::NotAFile(_))
        ));
    }

    #[test]
    fn forced_read_only_rejects_writes() {
        let temp = temp_with(b"abc");
        let mut store = FileStore::open(temp.path(), true).unwrap();

        assert!(store.is_read_only());
        assert!(matches!(store.write_at(0, b"x"), Err(StoreError::ReadOnly)));
        assert!(matches!(store.truncate(1), Err(StoreError::ReadOnly)));
    }

    #[test]
    fn short_read_at_eof() {
        let temp = temp_with(b"abcdef");
        let mut store = FileStore::open(temp.path(), false).unwrap();
        let mut buf = [0u8; 16];

        assert_eq!(store.read_at(4, &mut buf), 2);
        assert_eq!(&buf[..2], b"ef");
        assert_eq!(store.read_at(100, &mut buf), 0);
        assert_eq!(store.read_at(-1, &mut buf), 0);
    }

    #[test]
    fn reachability_allows_one_past_eof() {
        let temp = temp_with(b"abcd");
        let mut store = FileStore::open(temp.path(), false).unwrap();

        assert!(store.is_reachable(0, 0));
        assert!(store.is_reachable(4, 0));
        assert!(!store.is_reachable(5, 0));
        assert!(store.is_reachable(5, 5), "pending edits extend reach");
        assert!(!store.is_reachable(-1, 10));
    }

    #[test]
    fn write_past_eof_grows_file() {
        let temp = temp_with(b"abcd");
        let mut store = FileStore::open(temp.path(), false).unwrap();

        store.write_at(4, b"ef").unwrap();

        assert_eq!(store.size(), 6);
        assert_eq!(store.high_water_mark(), 6);
        assert_eq!(std::fs::read(temp.path()).unwrap(), b"abcdef");
    }

    #[test]
    fn truncate_lowers_size_and_mark() {
        let temp = temp_with(b"abcdefgh");
        let mut store = FileStore::open(temp.path(), false).unwrap();

        store.truncate(3).unwrap();

        assert_eq!(store.size(), 3);
        assert_eq!(store.high_water_mark(), 3);
        assert_eq!(std::fs::read(temp.path()).unwrap(), b"abc");
        assert!(matches!(store.truncate(-2), Err(StoreError::SeekFailed(-2))));
    }

    #[test]
    fn reopen_switches_files() {
        let first = temp_with(b"ab");
        let second = temp_with(b"abcdefg");
        let mut store = FileStore::open(first.path(), false).unwrap();

        store.reopen(second.path(), true).unwrap();

        assert_eq!(store.size(), 7);
        assert!(store.is_read_only());
        assert_eq!(store.path(), second.path());
    }
}
