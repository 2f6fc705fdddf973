//! Hash states for the tables of `mapkit_model`.
//!
//! Descriptors index their fields by name with [`FixedHashState`], so a
//! table's layout never depends on the process. Mapping tables and
//! descriptor caches use keys that already are unique integers (field
//! indices and [`TypeId`](core::any::TypeId)s) and hash them with
//! [`IndexHashState`].

use core::hash::{BuildHasher, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

pub use foldhash;
pub use hashbrown;

// -----------------------------------------------------------------------------
// Fixed seed

const SEED: FixedState = FixedState::with_seed(0x6D61_706B_6974_0001);

/// `foldhash` with a constant seed.
///
/// ```
/// use core::hash::BuildHasher;
/// use mapkit_utils::hash::FixedHashState;
///
/// assert_eq!(
///     FixedHashState.hash_one("user.name"),
///     FixedHashState.hash_one("user.name"),
/// );
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FoldHasher<'static>;

    #[inline]
    fn build_hasher(&self) -> Self::Hasher {
        SEED.build_hasher()
    }
}

/// A [`hashbrown::HashMap`] hashed with [`FixedHashState`].
pub type HashMap<K, V> = hashbrown::HashMap<K, V, FixedHashState>;

// -----------------------------------------------------------------------------
// Index keys

/// Hasher that keeps the last integer written as the hash.
#[derive(Copy, Clone, Default, Debug)]
pub struct IndexHasher(u64);

impl Hasher for IndexHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        self.0 = bytes
            .iter()
            .rev()
            .fold(self.0, |hash, byte| hash.rotate_left(8) ^ u64::from(*byte));
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.0 = i;
    }

    #[inline]
    fn write_usize(&mut self, i: usize) {
        self.0 = i as u64;
    }
}

/// Hash state producing an [`IndexHasher`].
///
/// ```
/// use core::hash::BuildHasher;
/// use mapkit_utils::hash::IndexHashState;
///
/// assert_eq!(IndexHashState.hash_one(3_usize), 3);
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct IndexHashState;

impl BuildHasher for IndexHashState {
    type Hasher = IndexHasher;

    #[inline]
    fn build_hasher(&self) -> Self::Hasher {
        IndexHasher(0)
    }
}

/// A map keyed by field indices or other unique integers.
pub type IndexHashMap<K, V> = hashbrown::HashMap<K, V, IndexHashState>;

/// A set of field indices or other unique integers.
pub type IndexHashSet<T> = hashbrown::HashSet<T, IndexHashState>;

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::hash::BuildHasher;

    use super::{FixedHashState, HashMap, IndexHashMap, IndexHashSet, IndexHashState};

    #[test]
    fn index_keyed_containers() {
        let mut map = IndexHashMap::default();
        map.insert(3_usize, "c");
        map.insert(1_usize, "a");
        assert_eq!(map.get(&3), Some(&"c"));
        assert_eq!(map.len(), 2);

        let mut set = IndexHashSet::default();
        assert!(set.insert(7_usize));
        assert!(!set.insert(7_usize));

        assert_eq!(IndexHashState.hash_one(10_u32), IndexHashState.hash_one(10_u64));
    }

    #[test]
    fn name_tables_are_reproducible() {
        let names = ["id", "name", "email", "tags"];
        let a: HashMap<&str, usize> = names.iter().enumerate().map(|(i, n)| (*n, i)).collect();
        let b: HashMap<&str, usize> = names.iter().enumerate().map(|(i, n)| (*n, i)).collect();
        assert!(a.keys().eq(b.keys()));
        assert_eq!(FixedHashState.hash_one("id"), FixedHashState.hash_one("id"));
    }
}
