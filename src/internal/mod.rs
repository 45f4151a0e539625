//! Internal implementation details.

pub(crate) mod dispose_bag;

pub(crate) use dispose_bag::DisposeBag;

/// Hash map used for registry, index and cache lookups.
#[cfg(feature = "ahash")]
pub(crate) type FastMap<K, V> = std::collections::HashMap<K, V, ahash::RandomState>;
#[cfg(not(feature = "ahash"))]
pub(crate) type FastMap<K, V> = std::collections::HashMap<K, V>;
