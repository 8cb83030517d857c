//! Neighbor lists, providing the candidate pairs for pairwise interactions.
use crate::{Error, ParticleData};

mod cell_list;
pub use self::cell_list::CellListNeighbors;

mod explicit;
pub use self::explicit::ExplicitNeighbors;

/// How pairs are stored in a neighbor list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// Each unordered pair `i-j` is stored once, in the list of `min(i, j)`
    Half,
    /// Each unordered pair `i-j` is stored twice, in the lists of both `i`
    /// and `j`
    Full,
}

impl Default for StorageMode {
    fn default() -> StorageMode {
        StorageMode::Half
    }
}

/// A `NeighborProvider` gives the list of neighbors of each particle.
///
/// Lists never contain the particle itself, and never contain the same
/// neighbor twice.
pub trait NeighborProvider: Send + Sync {
    /// Make sure the lists are up to date for the given `step`. Calling this
    /// multiple times for the same step should be cheap.
    fn refresh(&mut self, step: u64, particles: &dyn ParticleData) -> Result<(), Error>;

    /// Get the neighbors of `particle`, as indexes in the particle data. This
    /// is only valid after a call to `refresh`.
    fn neighbors_of(&self, particle: usize) -> &[usize];

    /// Get the number of particles covered by the lists, i.e. the number of
    /// valid arguments for `neighbors_of`
    fn size(&self) -> usize;

    /// Get the storage mode of this neighbor list
    fn storage_mode(&self) -> StorageMode;
}

/// Convert a list of unique `(i, j)` pairs with `i < j` to per-particle lists
/// for the given storage mode. The per-particle lists are sorted.
pub(crate) fn pairs_to_lists(size: usize, pairs: &[(usize, usize)], mode: StorageMode) -> Vec<Vec<usize>> {
    let mut lists = vec![Vec::new(); size];
    for &(i, j) in pairs {
        debug_assert!(i < j);
        lists[i].push(j);
        if mode == StorageMode::Full {
            lists[j].push(i);
        }
    }

    for list in &mut lists {
        list.sort_unstable();
    }

    return lists;
}
