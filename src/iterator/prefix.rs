use crate::iterator::IndexIterator;
use crate::options::IteratorOptions;
use crate::types::LogRecordPos;

/// Restricts any index cursor to keys sharing a prefix.
///
/// Built on the inner cursor's `seek`/`next`/`is_valid` only, so it works
/// the same over every index variant and in both directions. Keys with a
/// given prefix form one contiguous run, so the cursor seeks to the start of
/// that run and stops at the first key past it. Whenever this cursor is
/// valid, it sits on a matching key.
pub struct PrefixIterator {
    inner: Box<dyn IndexIterator>,
    options: IteratorOptions,
    /// Set once the inner cursor has left the prefix range.
    exhausted: bool,
}

impl PrefixIterator {
    pub fn new(inner: Box<dyn IndexIterator>, options: IteratorOptions) -> Self {
        let mut iter = PrefixIterator {
            inner,
            options,
            exhausted: false,
        };
        iter.rewind();
        iter
    }

    pub fn options(&self) -> &IteratorOptions {
        &self.options
    }

    fn skip_to_match(&mut self) {
        let prefix = &self.options.prefix;
        if prefix.is_empty() {
            return;
        }
        while self.inner.is_valid() {
            let key = self.inner.key();
            if key.starts_with(prefix) {
                return;
            }
            let past_range = if self.options.reverse {
                key < prefix.as_slice()
            } else {
                key > prefix.as_slice()
            };
            if past_range {
                self.exhausted = true;
                return;
            }
            self.inner.next();
        }
    }
}

/// Smallest key greater than every key starting with `prefix`, if any.
fn prefix_successor(prefix: &[u8]) -> Option<Vec<u8>> {
    let end = prefix.iter().rposition(|&b| b != u8::MAX)?;
    let mut upper = prefix[..=end].to_vec();
    upper[end] += 1;
    Some(upper)
}

impl IndexIterator for PrefixIterator {
    fn rewind(&mut self) {
        self.exhausted = false;
        let prefix = &self.options.prefix;
        if prefix.is_empty() {
            self.inner.rewind();
        } else if !self.options.reverse {
            self.inner.seek(prefix);
        } else {
            match prefix_successor(prefix) {
                Some(upper) => self.inner.seek(&upper),
                None => self.inner.rewind(),
            }
        }
        self.skip_to_match();
    }

    fn seek(&mut self, key: &[u8]) {
        self.exhausted = false;
        self.inner.seek(key);
        self.skip_to_match();
    }

    fn next(&mut self) {
        if self.exhausted {
            return;
        }
        self.inner.next();
        self.skip_to_match();
    }

    fn is_valid(&self) -> bool {
        !self.exhausted && self.inner.is_valid()
    }

    fn key(&self) -> &[u8] {
        self.inner.key()
    }

    fn value(&self) -> LogRecordPos {
        self.inner.value()
    }

    fn close(&mut self) {
        self.inner.close();
    }
}
