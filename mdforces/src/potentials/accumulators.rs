use crate::{Matrix3, Vector3D};

/// Per-particle results of a force computation
#[derive(Debug, Clone, PartialEq)]
pub struct ForceAccumulators {
    /// Total force acting on each particle
    pub forces: Vec<Vector3D>,
    /// Potential energy of each particle, with pair energies split equally
    /// between the two particles of each pair
    pub energies: Vec<f64>,
    /// Scalar virial of each particle
    pub virials: Vec<f64>,
    /// Virial tensor of each particle, with trace equal to three times the
    /// scalar virial
    pub virial_tensors: Vec<Matrix3>,
}

impl ForceAccumulators {
    /// Create accumulators for `size` particles, with all values set to zero
    pub fn new(size: usize) -> ForceAccumulators {
        ForceAccumulators {
            forces: vec![Vector3D::zero(); size],
            energies: vec![0.0; size],
            virials: vec![0.0; size],
            virial_tensors: vec![Matrix3::zero(); size],
        }
    }

    /// Resize these accumulators to `size` particles and set all values to
    /// zero
    pub fn reset(&mut self, size: usize) {
        self.forces.clear();
        self.forces.resize(size, Vector3D::zero());
        self.energies.clear();
        self.energies.resize(size, 0.0);
        self.virials.clear();
        self.virials.resize(size, 0.0);
        self.virial_tensors.clear();
        self.virial_tensors.resize(size, Matrix3::zero());
    }

    /// Get the number of particles in these accumulators
    pub fn len(&self) -> usize {
        self.forces.len()
    }

    /// Are these accumulators empty?
    pub fn is_empty(&self) -> bool {
        self.forces.is_empty()
    }

    /// Add all values from `other` to the values in `self`
    pub(crate) fn merge(&mut self, other: &ForceAccumulators) {
        debug_assert_eq!(self.len(), other.len());
        for (force, other) in self.forces.iter_mut().zip(&other.forces) {
            *force += other;
        }
        for (energy, other) in self.energies.iter_mut().zip(&other.energies) {
            *energy += other;
        }
        for (virial, other) in self.virials.iter_mut().zip(&other.virials) {
            *virial += other;
        }
        for (tensor, other) in self.virial_tensors.iter_mut().zip(&other.virial_tensors) {
            *tensor += other;
        }
    }

    /// Sum of the energies of all particles
    pub fn total_energy(&self) -> f64 {
        self.energies.iter().sum()
    }

    /// Sum of the scalar virials of all particles
    pub fn total_virial(&self) -> f64 {
        self.virials.iter().sum()
    }

    /// Sum of the forces acting on all particles
    pub fn total_force(&self) -> Vector3D {
        self.forces.iter().copied().sum()
    }

    /// Sum of the virial tensors of all particles
    pub fn total_virial_tensor(&self) -> Matrix3 {
        self.virial_tensors.iter().copied().sum()
    }
}
