pub mod skiplist;

use tracing::debug;

use crate::error::Result;
use crate::iterator::IndexIterator;
use crate::iterator::prefix::PrefixIterator;
use crate::options::{IndexOptions, IndexType, IteratorOptions};
use crate::types::{Key, LogRecordPos};

use skiplist::SkipList;

/// An ordered map from key to log position.
///
/// The engine calls `put` after appending a record, `delete` after appending
/// a tombstone, `get` before serving a read, and `iterator` for scans. It
/// only ever talks to this trait, so the structure behind it can change
/// without touching the engine.
pub trait Indexer: Send + Sync {
    /// Maps `key` to `pos`. Returns the position it replaced, if any.
    fn put(&self, key: Key, pos: LogRecordPos) -> Option<LogRecordPos>;

    /// Current position of `key`, or None if it is not live.
    fn get(&self, key: &[u8]) -> Option<LogRecordPos>;

    /// Removes `key`. Returns the position it had; None means nothing was
    /// removed.
    fn delete(&self, key: &[u8]) -> Option<LogRecordPos>;

    /// Number of live keys.
    fn size(&self) -> usize;

    /// A cursor over a snapshot of the current contents.
    fn iterator(&self, reverse: bool) -> Box<dyn IndexIterator>;

    /// Every live key, ascending.
    fn list_keys(&self) -> Vec<Key>;

    /// Releases resources. Safe to call repeatedly.
    fn close(&self) -> Result<()>;

    /// A cursor honoring the prefix and direction in `options`.
    fn iterator_with(&self, options: &IteratorOptions) -> PrefixIterator {
        PrefixIterator::new(self.iterator(options.reverse), options.clone())
    }
}

/// Opens an empty index of the requested type.
pub fn new_indexer(index_type: IndexType, options: IndexOptions) -> Result<Box<dyn Indexer>> {
    debug!(?index_type, ?options, "opening index");
    match index_type {
        IndexType::SkipList => Ok(Box::new(SkipList::with_options(options)?)),
    }
}
