use crate::error::{Error, Result};

/// Maximum height of the skip list.
pub const DEFAULT_MAX_LEVEL: usize = 18;

/// Chance that a new node is promoted one more level.
pub const DEFAULT_PROBABILITY: f64 = 0.5;

/// Hard cap on `max_level`. 2^64 entries is more than any log will hold.
pub(crate) const LEVEL_CEILING: usize = 64;

/// Which ordered structure backs the index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IndexType {
    /// Probabilistically balanced skip list.
    #[default]
    SkipList,
}

/// Shape of a skip list index.
///
/// Each new node gets level 1, then one more level for every successful
/// coin flip with probability `probability`, up to `max_level`:
///
/// ```text
///   P(level = k) ≈ p^(k-1) · (1 - p)
///   p = 0.5 → half the nodes at level 1, a quarter at level 2, ...
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct IndexOptions {
    pub max_level: usize,
    pub probability: f64,
    /// Fixed RNG seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for IndexOptions {
    fn default() -> Self {
        IndexOptions {
            max_level: DEFAULT_MAX_LEVEL,
            probability: DEFAULT_PROBABILITY,
            seed: None,
        }
    }
}

impl IndexOptions {
    pub fn with_max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        self
    }

    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    /// Make level assignment deterministic. Meant for tests and benchmarks.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_level == 0 || self.max_level > LEVEL_CEILING {
            return Err(Error::InvalidOptions(format!(
                "max_level must be in 1..={LEVEL_CEILING}, got {}",
                self.max_level
            )));
        }
        if !(self.probability > 0.0 && self.probability < 1.0) {
            return Err(Error::InvalidOptions(format!(
                "probability must be in (0, 1), got {}",
                self.probability
            )));
        }
        Ok(())
    }
}

/// How the caller wants to walk the index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IteratorOptions {
    /// Only yield keys starting with these bytes. Empty matches everything.
    pub prefix: Vec<u8>,
    /// Walk keys in descending order.
    pub reverse: bool,
}

impl IteratorOptions {
    pub fn with_prefix(mut self, prefix: impl Into<Vec<u8>>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }
}
