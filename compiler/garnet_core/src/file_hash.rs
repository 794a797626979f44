//! Per-file hashes used for incremental decisions.
//!
//! `UsageHash` backs the symbol-search candidate filter: it records the
//! short-name hash of every name a file uses or defines, so a file whose set
//! lacks a name's hash cannot mention that name. Collisions only add
//! candidates.
//!
//! `DefinitionsHash` summarizes everything the namer and resolver would enter
//! for a file. When it is unchanged an edit can take the incremental path.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

/// 32-bit hash of a name's short text.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShortNameHash(u32);

impl ShortNameHash {
    pub fn new(short_name: &str) -> Self {
        let mut hasher = FxHasher::default();
        short_name.hash(&mut hasher);
        let wide = hasher.finish();
        // Fold so both halves contribute.
        #[allow(clippy::cast_possible_truncation)]
        let folded = (wide ^ (wide >> 32)) as u32;
        ShortNameHash(folded)
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Sorted, deduplicated short-name hashes of every name a file mentions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct UsageHash {
    pub name_hashes: Vec<ShortNameHash>,
}

impl UsageHash {
    pub fn from_hashes(mut name_hashes: Vec<ShortNameHash>) -> Self {
        name_hashes.sort_unstable();
        name_hashes.dedup();
        UsageHash { name_hashes }
    }

    pub fn contains(&self, hash: ShortNameHash) -> bool {
        self.name_hashes.binary_search(&hash).is_ok()
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DefinitionsHash(pub u64);

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FileHash {
    pub definitions: DefinitionsHash,
    pub usages: UsageHash,
}
