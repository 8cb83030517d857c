use crate::{Error, Vector3D, Quaternion};

mod cell;
pub use self::cell::{UnitCell, CellShape};

mod simple_system;
pub use self::simple_system::{SimpleParticles, Particle};

#[cfg(test)]
pub(crate) mod test_utils;

/// `ParticleData` gives access to the particles owned by the current rank.
///
/// All the slices returned by this trait must have a length of `self.size()`,
/// and use the same particle ordering. Neighbor indexes produced by a
/// [`NeighborProvider`](crate::NeighborProvider) refer to this ordering.
pub trait ParticleData: Send + Sync {
    /// Get the simulation box
    fn cell(&self) -> Result<UnitCell, Error>;

    /// Get the number of particles
    fn size(&self) -> Result<usize, Error>;

    /// Get the number of different particle types. All values returned by
    /// `types()` must be smaller than this.
    fn types_count(&self) -> Result<usize, Error>;

    /// Get the type index of all particles
    fn types(&self) -> Result<&[usize], Error>;

    /// Get the Cartesian positions of all particles
    fn positions(&self) -> Result<&[Vector3D], Error>;

    /// Get the orientations of all particles, as unit quaternions
    fn orientations(&self) -> Result<&[Quaternion], Error>;

    /// Get the charges of all particles
    fn charges(&self) -> Result<&[f64], Error>;

    /// Get the diameters of all particles
    fn diameters(&self) -> Result<&[f64], Error>;

    /// Get the velocities of all particles
    fn velocities(&self) -> Result<&[Vector3D], Error>;

    /// Get the masses of all particles
    fn masses(&self) -> Result<&[f64], Error>;

    /// Get the tags of all particles. Tags identify particles uniquely across
    /// all ranks, and do not change when particles are re-ordered.
    fn tags(&self) -> Result<&[u64], Error>;

    /// Get mutable access to the velocities of all particles
    fn velocities_mut(&mut self) -> Result<&mut [Vector3D], Error>;

    /// Get mutable access to the orientations of all particles
    fn orientations_mut(&mut self) -> Result<&mut [Quaternion], Error>;
}
