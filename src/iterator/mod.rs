pub mod prefix;
pub mod snapshot;

use crate::types::LogRecordPos;

/// The cursor abstraction over an ordered index.
///
/// A cursor starts at the first entry in its direction (ascending keys, or
/// descending when built in reverse). Callers loop on `is_valid()`:
///
/// ```text
/// iter.rewind();
/// while iter.is_valid() {
///     use(iter.key(), iter.value());
///     iter.next();
/// }
/// ```
pub trait IndexIterator: Send + Sync {
    /// Moves back to the first entry.
    fn rewind(&mut self);

    /// Positions at the first entry not before `key` in iteration order:
    /// first key >= `key` going forward, first key <= `key` in reverse.
    fn seek(&mut self, key: &[u8]);

    /// Advances to the next entry.
    fn next(&mut self);

    /// Returns true if the cursor is positioned at an entry.
    fn is_valid(&self) -> bool;

    /// Returns the current key. Only valid when is_valid() is true.
    fn key(&self) -> &[u8];

    /// Returns the current position. Only valid when is_valid() is true.
    fn value(&self) -> LogRecordPos;

    /// Releases whatever the cursor holds. Safe to call more than once.
    fn close(&mut self);
}
