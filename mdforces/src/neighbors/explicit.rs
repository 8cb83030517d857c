use crate::{Error, ParticleData};
use super::{NeighborProvider, StorageMode, pairs_to_lists};

/// A neighbor list with fixed content, given when creating it
#[derive(Debug, Clone)]
pub struct ExplicitNeighbors {
    lists: Vec<Vec<usize>>,
    mode: StorageMode,
}

impl ExplicitNeighbors {
    /// Create a neighbor list for `size` particles containing the given
    /// unordered `pairs`, stored with the given `mode`. Pairs can be given in
    /// any order, self pairs and duplicated pairs are removed.
    pub fn from_pairs(size: usize, pairs: &[(usize, usize)], mode: StorageMode) -> Result<ExplicitNeighbors, Error> {
        let mut canonical = Vec::with_capacity(pairs.len());
        for &(i, j) in pairs {
            if i >= size || j >= size {
                return Err(Error::InvalidParameter(format!(
                    "pair ({}, {}) refers to particles outside of the {} particles", i, j, size
                )));
            }

            if i != j {
                canonical.push((usize::min(i, j), usize::max(i, j)));
            }
        }
        canonical.sort_unstable();
        canonical.dedup();

        Ok(ExplicitNeighbors {
            lists: pairs_to_lists(size, &canonical, mode),
            mode: mode,
        })
    }

    /// Create a neighbor list where every particle is a neighbor of every
    /// other particle
    pub fn all_pairs(size: usize, mode: StorageMode) -> ExplicitNeighbors {
        let mut pairs = Vec::new();
        for i in 0..size {
            for j in (i + 1)..size {
                pairs.push((i, j));
            }
        }

        ExplicitNeighbors {
            lists: pairs_to_lists(size, &pairs, mode),
            mode: mode,
        }
    }
}

impl NeighborProvider for ExplicitNeighbors {
    fn refresh(&mut self, _: u64, particles: &dyn ParticleData) -> Result<(), Error> {
        let size = particles.size()?;
        if size != self.lists.len() {
            return Err(Error::InvalidParameter(format!(
                "this neighbor list was created for {} particles, but the particle data contains {}",
                self.lists.len(), size
            )));
        }
        Ok(())
    }

    fn neighbors_of(&self, particle: usize) -> &[usize] {
        &self.lists[particle]
    }

    fn size(&self) -> usize {
        self.lists.len()
    }

    fn storage_mode(&self) -> StorageMode {
        self.mode
    }
}
