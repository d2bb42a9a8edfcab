/// # Overlay Module.
///
/// Pending byte edits that have not been written to the file yet. The
/// overlay is a sorted run of [`range::EditRange`]s that never overlap and
/// never touch; touching edits are merged on insertion.
pub mod range;
pub mod table;

/// Length of a byte run as a signed file distance.
#[inline]
#[must_use]
pub fn span(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}

/// Index distance from `from` to `to`. Negative distances read as 0.
#[inline]
#[must_use]
pub fn distance(from: i64, to: i64) -> usize {
    usize::try_from(to - from).unwrap_or_default()
}
