use indexmap::IndexSet;

use crate::{Error, Vector3D, Quaternion};

use super::{UnitCell, ParticleData};

/// Data for a single particle, used to add particles to [`SimpleParticles`].
///
/// Default values are a mass and diameter of 1, no charge, no velocity and
/// the identity orientation.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    /// Type index of the particle
    pub particle_type: usize,
    /// Position of the particle
    pub position: Vector3D,
    /// Velocity of the particle
    pub velocity: Vector3D,
    /// Orientation of the particle
    pub orientation: Quaternion,
    /// Mass of the particle
    pub mass: f64,
    /// Charge of the particle
    pub charge: f64,
    /// Diameter of the particle
    pub diameter: f64,
    /// Tag of the particle, if `None` the index of the particle is used
    pub tag: Option<u64>,
}

impl Particle {
    /// Create a new particle with the given type and position
    pub fn new(particle_type: usize, position: Vector3D) -> Particle {
        Particle {
            particle_type: particle_type,
            position: position,
            velocity: Vector3D::zero(),
            orientation: Quaternion::identity(),
            mass: 1.0,
            charge: 0.0,
            diameter: 1.0,
            tag: None,
        }
    }

    /// Set the velocity of this particle
    #[must_use]
    pub fn with_velocity(mut self, velocity: Vector3D) -> Particle {
        self.velocity = velocity;
        self
    }

    /// Set the orientation of this particle
    #[must_use]
    pub fn with_orientation(mut self, orientation: Quaternion) -> Particle {
        self.orientation = orientation;
        self
    }

    /// Set the mass of this particle
    #[must_use]
    pub fn with_mass(mut self, mass: f64) -> Particle {
        self.mass = mass;
        self
    }

    /// Set the charge of this particle
    #[must_use]
    pub fn with_charge(mut self, charge: f64) -> Particle {
        self.charge = charge;
        self
    }

    /// Set the diameter of this particle
    #[must_use]
    pub fn with_diameter(mut self, diameter: f64) -> Particle {
        self.diameter = diameter;
        self
    }

    /// Set the tag of this particle
    #[must_use]
    pub fn with_tag(mut self, tag: u64) -> Particle {
        self.tag = Some(tag);
        self
    }
}

/// A simple in-memory implementation of `ParticleData`, with named particle
/// types.
#[derive(Clone, Debug)]
pub struct SimpleParticles {
    cell: UnitCell,
    type_names: IndexSet<String>,
    types: Vec<usize>,
    positions: Vec<Vector3D>,
    velocities: Vec<Vector3D>,
    orientations: Vec<Quaternion>,
    masses: Vec<f64>,
    charges: Vec<f64>,
    diameters: Vec<f64>,
    tags: Vec<u64>,
}

impl SimpleParticles {
    /// Create a new empty set of particles with the given unit cell and
    /// particle types names. The type index of each type is its position in
    /// `type_names`.
    pub fn new(cell: UnitCell, type_names: &[&str]) -> SimpleParticles {
        SimpleParticles {
            cell: cell,
            type_names: type_names.iter().map(|&name| name.to_owned()).collect(),
            types: Vec::new(),
            positions: Vec::new(),
            velocities: Vec::new(),
            orientations: Vec::new(),
            masses: Vec::new(),
            charges: Vec::new(),
            diameters: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Add a new particle type, and get its index. If the type already
    /// exists, this returns the existing index.
    pub fn add_type(&mut self, name: &str) -> usize {
        let (index, _) = self.type_names.insert_full(name.to_owned());
        return index;
    }

    /// Get the index of the type with the given name
    pub fn type_index(&self, name: &str) -> Result<usize, Error> {
        self.type_names.get_index_of(name).ok_or_else(|| Error::InvalidParameter(
            format!("unknown particle type name '{}'", name)
        ))
    }

    /// Get the name of the type with the given index
    pub fn type_name(&self, index: usize) -> Result<&str, Error> {
        self.type_names.get_index(index)
            .map(|name| name.as_str())
            .ok_or(Error::UnknownType { type_index: index, types_count: self.type_names.len() })
    }

    /// Add a particle to this set, and get its index
    pub fn add_particle(&mut self, particle: Particle) -> Result<usize, Error> {
        crate::check_type(particle.particle_type, self.type_names.len())?;

        if !(particle.mass > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "particle mass must be positive, got {}", particle.mass
            )));
        }

        let index = self.types.len();
        let tag = particle.tag.unwrap_or(index as u64);
        if self.tags.contains(&tag) {
            return Err(Error::InvalidParameter(format!(
                "there is already a particle with tag {}", tag
            )));
        }

        self.types.push(particle.particle_type);
        self.positions.push(particle.position);
        self.velocities.push(particle.velocity);
        self.orientations.push(particle.orientation);
        self.masses.push(particle.mass);
        self.charges.push(particle.charge);
        self.diameters.push(particle.diameter);
        self.tags.push(tag);

        return Ok(index);
    }

    /// Change the simulation box
    pub fn set_cell(&mut self, cell: UnitCell) {
        self.cell = cell;
    }

    /// Get mutable access to the positions of all particles
    pub fn positions_mut(&mut self) -> &mut [Vector3D] {
        &mut self.positions
    }

    /// Get mutable access to the types of all particles
    pub fn types_mut(&mut self) -> &mut [usize] {
        &mut self.types
    }
}

impl ParticleData for SimpleParticles {
    fn cell(&self) -> Result<UnitCell, Error> {
        Ok(self.cell)
    }

    fn size(&self) -> Result<usize, Error> {
        Ok(self.types.len())
    }

    fn types_count(&self) -> Result<usize, Error> {
        Ok(self.type_names.len())
    }

    fn types(&self) -> Result<&[usize], Error> {
        Ok(&self.types)
    }

    fn positions(&self) -> Result<&[Vector3D], Error> {
        Ok(&self.positions)
    }

    fn orientations(&self) -> Result<&[Quaternion], Error> {
        Ok(&self.orientations)
    }

    fn charges(&self) -> Result<&[f64], Error> {
        Ok(&self.charges)
    }

    fn diameters(&self) -> Result<&[f64], Error> {
        Ok(&self.diameters)
    }

    fn velocities(&self) -> Result<&[Vector3D], Error> {
        Ok(&self.velocities)
    }

    fn masses(&self) -> Result<&[f64], Error> {
        Ok(&self.masses)
    }

    fn tags(&self) -> Result<&[u64], Error> {
        Ok(&self.tags)
    }

    fn velocities_mut(&mut self) -> Result<&mut [Vector3D], Error> {
        Ok(&mut self.velocities)
    }

    fn orientations_mut(&mut self) -> Result<&mut [Quaternion], Error> {
        Ok(&mut self.orientations)
    }
}
