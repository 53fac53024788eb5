use parking_lot::RwLock;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::error::Result;
use crate::index::Indexer;
use crate::iterator::IndexIterator;
use crate::iterator::snapshot::SnapshotIterator;
use crate::options::{IndexOptions, LEVEL_CEILING};
use crate::types::{IndexEntry, Key, LogRecordPos};

/// Arena slot of the head sentinel.
const HEAD: usize = 0;

/// A single node in the skip list.
///
/// Each node has one forward link per level it takes part in. Level 0
/// contains all nodes (a regular linked list). Higher levels skip over
/// nodes, enabling O(log n) average-case search.
///
/// ```text
/// Level 3:  HEAD ──────────────────────────────► 50 ──────────► NIL
/// Level 2:  HEAD ──────────► 20 ────────────────► 50 ──────────► NIL
/// Level 1:  HEAD ──► 10 ──► 20 ────► 35 ────────► 50 ──► 60 ──► NIL
/// Level 0:  HEAD ──► 10 ──► 20 ──► 25 ──► 35 ──► 50 ──► 60 ──► 70 ► NIL
/// ```
///
/// Links are slots in `Inner::nodes`, not pointers: unlinking a node can
/// never leave a dangling reference behind.
#[derive(Debug)]
struct Node {
    key: Key,
    pos: LogRecordPos,
    forward: Vec<Option<usize>>,
}

impl Node {
    fn new(key: Key, pos: LogRecordPos, level: usize) -> Self {
        Node {
            key,
            pos,
            forward: vec![None; level],
        }
    }

    /// An empty slot waiting on the free list.
    fn vacant() -> Self {
        Node {
            key: Vec::new(),
            pos: LogRecordPos::default(),
            forward: Vec::new(),
        }
    }
}

/// Everything guarded by the list's lock.
struct Inner {
    /// Slot 0 is the head sentinel, linked at every level.
    nodes: Vec<Node>,
    /// Slots of deleted nodes, reused by later inserts.
    free: Vec<usize>,
    /// Highest level in use. Never shrinks.
    level: usize,
    len: usize,
    rng: StdRng,
}

impl Inner {
    /// Walks from the head at the top level down to level 0, moving right
    /// while the next key is smaller than `key`.
    ///
    /// Returns the level-0 predecessor of `key`. When `update` is given, the
    /// last node visited on each level is recorded in it.
    fn find(&self, key: &[u8], mut update: Option<&mut [usize]>) -> usize {
        let mut current = HEAD;
        for lvl in (0..self.level).rev() {
            while let Some(next) = self.nodes[current].forward[lvl] {
                if self.nodes[next].key.as_slice() < key {
                    current = next;
                } else {
                    break;
                }
            }
            if let Some(path) = update.as_deref_mut() {
                path[lvl] = current;
            }
        }
        current
    }

    /// The level-0 successor of `pred`, if it holds exactly `key`.
    fn successor_with_key(&self, pred: usize, key: &[u8]) -> Option<usize> {
        self.nodes[pred].forward[0].filter(|&next| self.nodes[next].key == key)
    }

    /// Geometric level: 1, plus one per successful coin flip.
    fn random_level(&mut self, max_level: usize, probability: f64) -> usize {
        let mut level = 1;
        while level < max_level && self.rng.gen_bool(probability) {
            level += 1;
        }
        level
    }

    fn alloc(&mut self, node: Node) -> usize {
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = node;
                slot
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    /// Drops every vacant slot once the list is empty. Only the head stays.
    ///
    /// Otherwise the arena keeps its high-water mark: freed slots are reused
    /// by later inserts, not returned.
    fn reset_arena(&mut self) {
        debug_assert!(self.nodes[HEAD].forward.iter().all(Option::is_none));
        self.nodes.truncate(1);
        self.nodes.shrink_to_fit();
        self.free = Vec::new();
    }

    /// Follows level 0 from the head.
    fn walk(&self) -> impl Iterator<Item = &Node> + '_ {
        let mut next = self.nodes[HEAD].forward[0];
        std::iter::from_fn(move || {
            let node = &self.nodes[next?];
            next = node.forward[0];
            Some(node)
        })
    }
}

/// A probabilistic sorted index from key to log position.
///
/// Average case: O(log n) put, get and delete, O(n) snapshot.
///
/// One reader/writer lock guards the whole structure: `put` and `delete`
/// hold it exclusively for search plus relinking, while `get`, `size` and
/// iterator construction share it. Iterators copy what they need and never
/// touch the lock again.
pub struct SkipList {
    inner: RwLock<Inner>,
    max_level: usize,
    probability: f64,
}

impl Default for SkipList {
    fn default() -> Self {
        Self::new()
    }
}

impl SkipList {
    /// Create a new empty skip list with default options.
    pub fn new() -> Self {
        let options = IndexOptions::default();
        Self::build(&options, StdRng::from_entropy())
    }

    /// Create a new empty skip list, rejecting invalid options.
    pub fn with_options(options: IndexOptions) -> Result<Self> {
        options.validate()?;
        debug!(?options, "creating skip list");
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self::build(&options, rng))
    }

    fn build(options: &IndexOptions, rng: StdRng) -> Self {
        let head = Node::new(Vec::new(), LogRecordPos::default(), options.max_level);
        SkipList {
            inner: RwLock::new(Inner {
                nodes: vec![head],
                free: Vec::new(),
                level: 1,
                len: 0,
                rng,
            }),
            max_level: options.max_level,
            probability: options.probability,
        }
    }

    /// Insert or update. Returns the position that was overwritten.
    ///
    /// Algorithm:
    ///   1. Find the predecessor at each level (the update path)
    ///   2. If the key exists, swap its position in place and stop
    ///   3. Draw a random level for the new node
    ///   4. Splice it in after the recorded predecessor on each of its levels
    pub fn put(&self, key: Key, pos: LogRecordPos) -> Option<LogRecordPos> {
        let mut guard = self.inner.write();
        let inner = &mut *guard;

        // Levels above the current top keep HEAD as their predecessor.
        let mut update = [HEAD; LEVEL_CEILING];
        let pred = inner.find(&key, Some(&mut update[..]));

        if let Some(found) = inner.successor_with_key(pred, &key) {
            let old = std::mem::replace(&mut inner.nodes[found].pos, pos);
            trace!(key_len = key.len(), "skip list update");
            return Some(old);
        }

        let level = inner.random_level(self.max_level, self.probability);
        if level > inner.level {
            debug!(from = inner.level, to = level, "skip list level raised");
            inner.level = level;
        }

        let slot = inner.alloc(Node::new(key, pos, level));
        for (lvl, &prev) in update.iter().enumerate().take(level) {
            inner.nodes[slot].forward[lvl] = inner.nodes[prev].forward[lvl];
            inner.nodes[prev].forward[lvl] = Some(slot);
        }
        inner.len += 1;
        trace!(level, len = inner.len, "skip list insert");
        None
    }

    /// Look up a key.
    pub fn get(&self, key: &[u8]) -> Option<LogRecordPos> {
        let inner = self.inner.read();
        let pred = inner.find(key, None);
        inner
            .successor_with_key(pred, key)
            .map(|slot| inner.nodes[slot].pos)
    }

    /// Unlink a key. Returns its last position, or None if it was absent.
    ///
    /// The list's level is left as is even if the top levels empty out.
    pub fn delete(&self, key: &[u8]) -> Option<LogRecordPos> {
        let mut guard = self.inner.write();
        let inner = &mut *guard;

        let mut update = [HEAD; LEVEL_CEILING];
        let pred = inner.find(key, Some(&mut update[..]));
        let target = inner.successor_with_key(pred, key)?;

        for (lvl, &prev) in update.iter().enumerate().take(inner.level) {
            if inner.nodes[prev].forward[lvl] != Some(target) {
                break;
            }
            inner.nodes[prev].forward[lvl] = inner.nodes[target].forward[lvl];
        }

        let node = std::mem::replace(&mut inner.nodes[target], Node::vacant());
        inner.free.push(target);
        inner.len -= 1;
        if inner.len == 0 {
            inner.reset_arena();
        }
        trace!(len = inner.len, "skip list delete");
        Some(node.pos)
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.inner.read().len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Highest level currently in use.
    pub fn level(&self) -> usize {
        self.inner.read().level
    }

    /// Copies every entry out, ascending, under the read lock.
    pub fn entries(&self) -> Vec<IndexEntry> {
        let inner = self.inner.read();
        let mut entries = Vec::with_capacity(inner.len);
        entries.extend(inner.walk().map(|node| IndexEntry {
            key: node.key.clone(),
            pos: node.pos,
        }));
        entries
    }

    /// A snapshot cursor, ascending or descending.
    pub fn iter(&self, reverse: bool) -> SnapshotIterator {
        SnapshotIterator::new(self.entries(), reverse)
    }
}

impl Indexer for SkipList {
    fn put(&self, key: Key, pos: LogRecordPos) -> Option<LogRecordPos> {
        SkipList::put(self, key, pos)
    }

    fn get(&self, key: &[u8]) -> Option<LogRecordPos> {
        SkipList::get(self, key)
    }

    fn delete(&self, key: &[u8]) -> Option<LogRecordPos> {
        SkipList::delete(self, key)
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn iterator(&self, reverse: bool) -> Box<dyn IndexIterator> {
        Box::new(self.iter(reverse))
    }

    fn list_keys(&self) -> Vec<Key> {
        let inner = self.inner.read();
        let mut keys = Vec::with_capacity(inner.len);
        keys.extend(inner.walk().map(|node| node.key.clone()));
        keys
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}
