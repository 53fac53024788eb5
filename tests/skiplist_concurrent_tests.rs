// Concurrent access tests
// One writer, many readers, sharing the index through Arc.

use std::sync::{Arc, Barrier};
use std::thread;

use log_index::{IndexIterator, Indexer, LogRecordPos, SkipList};

fn pos(offset: u64) -> LogRecordPos {
    LogRecordPos::new(0, offset, 4)
}

// =============================================================================
// Test 1: Concurrent readers don't block each other
// =============================================================================
#[test]
fn concurrent_readers_see_consistent_state() {
    let sl = Arc::new(SkipList::new());
    for i in 0..200u64 {
        sl.put(format!("key{i:03}").into_bytes(), pos(i));
    }

    let mut handles = vec![];
    for _ in 0..8 {
        let sl = Arc::clone(&sl);
        handles.push(thread::spawn(move || {
            for i in 0..200u64 {
                assert_eq!(sl.get(format!("key{i:03}").as_bytes()), Some(pos(i)));
            }
            let mut iter = sl.iterator(false);
            let mut count = 0;
            while iter.is_valid() {
                count += 1;
                iter.next();
            }
            assert_eq!(count, 200);
        }));
    }

    // All threads should complete without deadlock
    for h in handles {
        h.join().unwrap();
    }
}

// =============================================================================
// Test 2: Writer and readers work together
// =============================================================================
// Readers may or may not see a key depending on timing, but whatever they see
// must be a position that was actually written for it.
#[test]
fn writer_and_readers_concurrent() {
    let sl = Arc::new(SkipList::new());
    let barrier = Arc::new(Barrier::new(5));

    let writer = {
        let sl = Arc::clone(&sl);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for i in 0..500u64 {
                sl.put(format!("key{i:03}").into_bytes(), pos(i));
                if i % 5 == 0 {
                    sl.delete(format!("key{:03}", i / 2).as_bytes());
                }
            }
        })
    };

    let mut readers = vec![];
    for _ in 0..4 {
        let sl = Arc::clone(&sl);
        let barrier = Arc::clone(&barrier);
        readers.push(thread::spawn(move || {
            barrier.wait();
            for _ in 0..200 {
                if let Some(p) = sl.get(b"key250") {
                    assert_eq!(p, pos(250));
                }
                let mut iter = sl.iterator(true);
                let mut last: Option<Vec<u8>> = None;
                while iter.is_valid() {
                    let key = iter.key().to_vec();
                    if let Some(prev) = &last {
                        assert!(prev > &key, "reverse snapshot out of order");
                    }
                    last = Some(key);
                    iter.next();
                }
            }
        }));
    }

    writer.join().unwrap();
    for r in readers {
        r.join().unwrap();
    }

    assert_eq!(sl.get(b"key499"), Some(pos(499)));
    assert_eq!(sl.len(), sl.list_keys().len());
}

// =============================================================================
// Test 3: Long-lived iterator outlives the writes
// =============================================================================
// Holding an iterator must not block writers on another thread.
#[test]
fn held_iterator_does_not_block_writer() {
    let sl = Arc::new(SkipList::new());
    sl.put(b"seed".to_vec(), pos(0));

    let mut iter = sl.iterator(false);

    let writer = {
        let sl = Arc::clone(&sl);
        thread::spawn(move || {
            for i in 0..100u64 {
                sl.put(i.to_be_bytes().to_vec(), pos(i));
            }
        })
    };
    writer.join().unwrap();

    assert!(iter.is_valid());
    assert_eq!(iter.key(), b"seed");
    iter.next();
    assert!(!iter.is_valid());
    assert_eq!(sl.len(), 101);
}

// =============================================================================
// Test 4: Shared through the trait object
// =============================================================================
#[test]
fn trait_object_is_shareable_across_threads() {
    let index: Arc<dyn Indexer> = Arc::new(SkipList::new());

    let handles: Vec<_> = (0..4u64)
        .map(|t| {
            let index = Arc::clone(&index);
            thread::spawn(move || {
                for i in 0..50u64 {
                    index.put(format!("t{t}-{i:02}").into_bytes(), pos(t * 100 + i));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(index.size(), 200);
    assert_eq!(index.get(b"t3-49"), Some(pos(349)));
}
