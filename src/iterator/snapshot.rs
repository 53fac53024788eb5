use tracing::trace;

use crate::iterator::IndexIterator;
use crate::types::{IndexEntry, LogRecordPos};

/// A point-in-time cursor over a copy of the index.
///
/// The entries are copied out while the index is read-locked; after that the
/// cursor owns them outright. Later puts and deletes on the index are never
/// observed, and a long scan never holds up a writer.
#[derive(Debug)]
pub struct SnapshotIterator {
    entries: Vec<IndexEntry>,
    cursor: usize,
    reverse: bool,
}

impl SnapshotIterator {
    /// Wraps entries sorted by ascending key. They are reversed once, in
    /// place, for a reverse cursor.
    pub fn new(mut entries: Vec<IndexEntry>, reverse: bool) -> Self {
        if reverse {
            entries.reverse();
        }
        trace!(entries = entries.len(), reverse, "snapshot iterator created");
        SnapshotIterator {
            entries,
            cursor: 0,
            reverse,
        }
    }

    /// Number of entries captured by the snapshot.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_reverse(&self) -> bool {
        self.reverse
    }

    fn current(&self) -> &IndexEntry {
        match self.entries.get(self.cursor) {
            Some(entry) => entry,
            None => panic!(
                "snapshot iterator read at {} past end ({} entries)",
                self.cursor,
                self.entries.len()
            ),
        }
    }
}

impl IndexIterator for SnapshotIterator {
    fn rewind(&mut self) {
        self.cursor = 0;
    }

    fn seek(&mut self, key: &[u8]) {
        // The entries are sorted in iteration order, so the "not yet reached"
        // prefix is a single run and binary search applies.
        self.cursor = if self.reverse {
            self.entries.partition_point(|e| e.key.as_slice() > key)
        } else {
            self.entries.partition_point(|e| e.key.as_slice() < key)
        };
    }

    fn next(&mut self) {
        self.cursor += 1;
    }

    fn is_valid(&self) -> bool {
        self.cursor < self.entries.len()
    }

    fn key(&self) -> &[u8] {
        &self.current().key
    }

    fn value(&self) -> LogRecordPos {
        self.current().pos
    }

    fn close(&mut self) {
        self.entries = Vec::new();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(keys: &[&[u8]]) -> Vec<IndexEntry> {
        keys.iter()
            .enumerate()
            .map(|(i, k)| IndexEntry {
                key: k.to_vec(),
                pos: LogRecordPos::new(1, i as u64 * 10, 10),
            })
            .collect()
    }

    #[test]
    fn reverse_flips_order_once() {
        let iter = SnapshotIterator::new(entries(&[b"a", b"b", b"c"]), true);
        assert_eq!(iter.key(), b"c");
        assert_eq!(iter.len(), 3);
    }

    #[test]
    #[should_panic(expected = "past end")]
    fn key_on_invalid_cursor_panics() {
        let iter = SnapshotIterator::new(Vec::new(), false);
        let _ = iter.key();
    }

    #[test]
    fn close_twice_is_harmless() {
        let mut iter = SnapshotIterator::new(entries(&[b"a"]), false);
        iter.close();
        iter.close();
        assert!(!iter.is_valid());
    }
}
