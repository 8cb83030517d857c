//! External fields, acting on each particle independently of the others.
//!
//! External potentials only provide energies, which are used to accept or
//! reject trial moves in Monte Carlo simulations.
use crate::{Communicator, Error, ParticleData, Quaternion, UnitCell, Vector3D};

mod linear;
pub use self::linear::{LinearField, LinearFieldParameters};

mod wall;
pub use self::wall::SphericalWall;

/// An `ExternalPotential` gives the energy of each particle in an external
/// field.
///
/// Fields which can return an infinite energy for some configurations (such
/// as walls) must return exactly zero when `trial` is `false`. The current
/// configuration was already accepted, and returning infinity there would
/// produce `inf - inf = NaN` when computing energy differences.
pub trait ExternalPotential: Send + Sync {
    /// Get a short name for this potential
    fn name(&self) -> String;

    /// Get the energy of a single particle with the given type, position,
    /// orientation and charge in the field.
    ///
    /// `trial` is `true` when evaluating a trial move, and `false` when
    /// evaluating the current configuration.
    fn particle_energy(
        &self,
        cell: &UnitCell,
        particle_type: usize,
        position: Vector3D,
        orientation: Quaternion,
        charge: f64,
        trial: bool,
    ) -> Result<f64, Error> {
        let _ = (cell, particle_type, position, orientation, charge, trial);
        return Ok(0.0);
    }

    /// Get the energy of all particles in the field, summed over all the
    /// ranks participating in `communicator`
    fn total_energy(
        &self,
        particles: &dyn ParticleData,
        communicator: &dyn Communicator,
        trial: bool,
    ) -> Result<f64, Error> {
        let cell = particles.cell()?;
        let types = particles.types()?;
        let positions = particles.positions()?;
        let orientations = particles.orientations()?;
        let charges = particles.charges()?;

        let mut energy = 0.0;
        for i in 0..particles.size()? {
            energy += self.particle_energy(&cell, types[i], positions[i], orientations[i], charges[i], trial)?;
        }

        if communicator.size() > 1 {
            energy = communicator.sum(energy);
        }

        return Ok(energy);
    }
}

/// A stack of external potentials, with energies summed over all of them
#[derive(Default)]
pub struct ExternalFields {
    fields: Vec<Box<dyn ExternalPotential>>,
}

impl ExternalFields {
    /// Create an empty stack of external potentials
    pub fn new() -> ExternalFields {
        ExternalFields { fields: Vec::new() }
    }

    /// Add a potential to this stack
    pub fn push(&mut self, field: Box<dyn ExternalPotential>) {
        self.fields.push(field);
    }

    /// Get the number of potentials in this stack
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Is this stack empty?
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl ExternalPotential for ExternalFields {
    fn name(&self) -> String {
        let names = self.fields.iter().map(|field| field.name()).collect::<Vec<_>>();
        format!("[{}]", names.join(", "))
    }

    fn particle_energy(
        &self,
        cell: &UnitCell,
        particle_type: usize,
        position: Vector3D,
        orientation: Quaternion,
        charge: f64,
        trial: bool,
    ) -> Result<f64, Error> {
        let mut energy = 0.0;
        for field in &self.fields {
            energy += field.particle_energy(cell, particle_type, position, orientation, charge, trial)?;
        }
        return Ok(energy);
    }
}
