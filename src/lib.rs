//! # Log Index
//!
//! The in-memory index of a log-structured key-value store.
//!
//! ## Core idea
//! Every write is appended to a log. The index remembers, for each live key,
//! where its latest record sits in that log, so a read is one lookup plus one
//! disk seek. Ordered traversal (full scans, prefix scans, reverse scans) is
//! served from the index as well, without touching the log.

pub mod error;
pub mod index;
pub mod iterator;
pub mod options;
pub mod types;

// Public re-exports for the top-level API
pub use error::{Error, Result};
pub use index::{Indexer, new_indexer, skiplist::SkipList};
pub use iterator::{IndexIterator, prefix::PrefixIterator, snapshot::SnapshotIterator};
pub use options::{IndexOptions, IndexType, IteratorOptions};
pub use types::{IndexEntry, Key, LogRecordPos};
