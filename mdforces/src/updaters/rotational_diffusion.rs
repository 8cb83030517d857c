use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use rand_distr::{Distribution, StandardNormal, UnitSphere};

use crate::{Error, ParticleData, Quaternion, Variant, Vector3D};

use super::{ParticleGroup, Updater};

fn default_dimensions() -> usize {
    3
}

/// Parameters for [`ActiveRotationalDiffusion`]
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RotationalDiffusionParameters {
    /// Rotational diffusion constant, as a function of the time step
    pub rotational_diffusion: Variant,
    /// Integration time step between two updates
    pub time_step: f64,
    /// Seed for the random number generator
    pub seed: u64,
    /// Dimensionality of the simulation, 2 or 3. In 2D, particles rotate
    /// around the z axis.
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
    /// Direction of the active force for each particle type, in the particle
    /// reference frame
    pub active_directions: Vec<Vector3D>,
    /// Particles to rotate
    #[serde(default)]
    pub group: ParticleGroup,
}

/// Rotational diffusion of active particles orientations.
///
/// At each update, the orientation of every particle in the group is rotated
/// by an angle drawn from a normal distribution with standard deviation
/// `sqrt(2 D dt)`. In 3D, the rotation axis is a random direction
/// perpendicular to the current active direction of the particle.
///
/// The random numbers only depend on the seed, the step and the particle tag,
/// so the result does not depend on the particle ordering or on the number of
/// ranks.
#[derive(Debug, Clone)]
pub struct ActiveRotationalDiffusion {
    parameters: RotationalDiffusionParameters,
}

/// Mix the bits of `value` with the splitmix64 finalizer
fn splitmix64(value: u64) -> u64 {
    let mut z = value.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    return z ^ (z >> 31);
}

/// Create the random number generator for the particle with the given `tag`
/// at the given `step`
fn particle_rng(seed: u64, step: u64, tag: u64) -> StdRng {
    let state = splitmix64(splitmix64(splitmix64(seed) ^ step) ^ tag);
    return StdRng::seed_from_u64(state);
}

/// Get a random unit vector perpendicular to `direction`, or any random unit
/// vector if `direction` is zero
fn perpendicular_axis(rng: &mut StdRng, direction: Vector3D) -> Vector3D {
    loop {
        let random: [f64; 3] = UnitSphere.sample(rng);
        let random = Vector3D::from(random);
        if direction.norm2() == 0.0 {
            return random;
        }

        let axis = direction ^ random;
        if axis.norm2() > 1e-12 {
            return axis.normalized();
        }
    }
}

impl ActiveRotationalDiffusion {
    /// Create a new rotational diffusion updater with the given parameters
    pub fn new(parameters: RotationalDiffusionParameters) -> Result<ActiveRotationalDiffusion, Error> {
        parameters.rotational_diffusion.validate()?;

        if !(parameters.time_step > 0.0 && parameters.time_step.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "time_step must be a positive number, got {}", parameters.time_step
            )));
        }

        if parameters.dimensions != 2 && parameters.dimensions != 3 {
            return Err(Error::InvalidParameter(format!(
                "dimensions must be 2 or 3, got {}", parameters.dimensions
            )));
        }

        Ok(ActiveRotationalDiffusion { parameters })
    }

    /// Get the parameters of this updater
    pub fn parameters(&self) -> &RotationalDiffusionParameters {
        &self.parameters
    }

    /// Change the rotational diffusion constant
    pub fn set_rotational_diffusion(&mut self, rotational_diffusion: Variant) -> Result<(), Error> {
        rotational_diffusion.validate()?;
        self.parameters.rotational_diffusion = rotational_diffusion;
        Ok(())
    }

    /// Change the active direction for the given particle type
    pub fn set_active_direction(&mut self, particle_type: usize, direction: Vector3D) -> Result<(), Error> {
        crate::check_type(particle_type, self.parameters.active_directions.len())?;
        self.parameters.active_directions[particle_type] = direction;
        Ok(())
    }
}

impl Updater for ActiveRotationalDiffusion {
    #[time_graph::instrument(name = "ActiveRotationalDiffusion::update")]
    fn update(&mut self, step: u64, particles: &mut dyn ParticleData) -> Result<(), Error> {
        let diffusion = self.parameters.rotational_diffusion.value(step);
        if !(diffusion >= 0.0) {
            return Err(Error::InvalidParameter(format!(
                "the rotational diffusion constant must be positive, got {} at step {}", diffusion, step
            )));
        }

        let sigma = f64::sqrt(2.0 * diffusion * self.parameters.time_step);
        if sigma == 0.0 {
            return Ok(());
        }

        let types = particles.types()?.to_vec();
        let tags = particles.tags()?.to_vec();
        if self.parameters.dimensions == 3 {
            let directions_count = self.parameters.active_directions.len();
            for &particle_type in types.iter().filter(|&&t| self.parameters.group.contains(t)) {
                crate::check_type(particle_type, directions_count)?;
            }
        }

        let orientations = particles.orientations_mut()?;

        for (i, orientation) in orientations.iter_mut().enumerate() {
            if !self.parameters.group.contains(types[i]) {
                continue;
            }

            let mut rng = particle_rng(self.parameters.seed, step, tags[i]);
            let axis = if self.parameters.dimensions == 2 {
                Vector3D::new(0.0, 0.0, 1.0)
            } else {
                let direction = orientation.rotate(self.parameters.active_directions[types[i]]);
                perpendicular_axis(&mut rng, direction)
            };

            let angle = sigma * rng.sample::<f64, _>(StandardNormal);
            let rotation = Quaternion::from_axis_angle(axis, angle);
            *orientation = (rotation * *orientation).normalized();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{SimpleParticles, Particle, UnitCell};

    fn parameters(diffusion: f64, dimensions: usize) -> RotationalDiffusionParameters {
        RotationalDiffusionParameters {
            rotational_diffusion: Variant::from(diffusion),
            time_step: 0.005,
            seed: 42,
            dimensions: dimensions,
            active_directions: vec![Vector3D::new(1.0, 0.0, 0.0), Vector3D::zero()],
            group: ParticleGroup::All,
        }
    }

    fn particles(count: usize) -> SimpleParticles {
        let mut particles = SimpleParticles::new(UnitCell::cubic(10.0), &["A", "B"]);
        for i in 0..count {
            let position = Vector3D::new(0.01 * i as f64, 0.0, 0.0);
            particles.add_particle(Particle::new(0, position)).unwrap();
        }
        return particles;
    }

    #[test]
    fn two_dimensions() {
        let mut particles = particles(2000);
        let mut updater = ActiveRotationalDiffusion::new(parameters(1.0, 2)).unwrap();
        updater.update(3, &mut particles).unwrap();

        let mut mean_square_angle = 0.0;
        let orientations = particles.orientations().unwrap();
        for orientation in orientations {
            assert_relative_eq!(orientation.norm2(), 1.0, epsilon = 1e-12);
            // rotation around z only
            assert_eq!(orientation.v[0], 0.0);
            assert_eq!(orientation.v[1], 0.0);

            let angle = 2.0 * f64::atan2(orientation.v[2], orientation.w);
            mean_square_angle += angle * angle;
        }
        mean_square_angle /= orientations.len() as f64;

        // <θ²> = 2 D dt
        assert_relative_eq!(mean_square_angle, 2.0 * 1.0 * 0.005, max_relative = 0.15);
    }

    #[test]
    fn three_dimensions() {
        let mut particles = particles(50);
        let mut updater = ActiveRotationalDiffusion::new(parameters(0.5, 3)).unwrap();
        updater.update(0, &mut particles).unwrap();

        for orientation in particles.orientations().unwrap() {
            assert_relative_eq!(orientation.norm2(), 1.0, epsilon = 1e-12);
            // the rotation axis is perpendicular to the active direction x,
            // so the rotation does not have any component along x
            assert!(orientation.v[0].abs() < 1e-12);
        }
    }

    #[test]
    fn deterministic() {
        let mut first = particles(10);
        let mut second = particles(10);

        let mut updater = ActiveRotationalDiffusion::new(parameters(0.5, 3)).unwrap();
        updater.update(7, &mut first).unwrap();
        updater.update(7, &mut second).unwrap();
        assert_eq!(first.orientations().unwrap(), second.orientations().unwrap());

        updater.update(8, &mut second).unwrap();
        assert_ne!(first.orientations().unwrap(), second.orientations().unwrap());

        // different particles get different rotations
        let orientations = first.orientations().unwrap();
        assert_ne!(orientations[0], orientations[1]);
    }

    #[test]
    fn group_and_zero_diffusion() {
        let mut particles = particles(10);
        particles.types_mut()[3] = 1;

        let mut parameters = parameters(1.0, 3);
        parameters.group = ParticleGroup::Types(vec![1]);
        let mut updater = ActiveRotationalDiffusion::new(parameters).unwrap();
        updater.update(0, &mut particles).unwrap();

        for (i, orientation) in particles.orientations().unwrap().iter().enumerate() {
            if i == 3 {
                assert_ne!(*orientation, Quaternion::identity());
            } else {
                assert_eq!(*orientation, Quaternion::identity());
            }
        }

        let mut updater = ActiveRotationalDiffusion::new(self::parameters(0.0, 2)).unwrap();
        let before = particles.orientations().unwrap().to_vec();
        updater.update(1, &mut particles).unwrap();
        assert_eq!(particles.orientations().unwrap(), before);
    }

    #[test]
    fn missing_active_direction() {
        let mut particles = particles(4);
        particles.types_mut()[2] = 1;

        let mut parameters = parameters(1.0, 3);
        parameters.active_directions.truncate(1);
        let mut updater = ActiveRotationalDiffusion::new(parameters).unwrap();

        let error = updater.update(0, &mut particles).unwrap_err();
        assert!(matches!(error, Error::UnknownType { type_index: 1, types_count: 1 }));
        for orientation in particles.orientations().unwrap() {
            assert_eq!(*orientation, Quaternion::identity());
        }

        // 2D simulations do not use the active directions
        let mut parameters = self::parameters(1.0, 2);
        parameters.active_directions.truncate(1);
        let mut updater = ActiveRotationalDiffusion::new(parameters).unwrap();
        updater.update(0, &mut particles).unwrap();
    }

    #[test]
    fn invalid_parameters() {
        assert!(ActiveRotationalDiffusion::new(parameters(1.0, 4)).is_err());

        let mut invalid = parameters(1.0, 2);
        invalid.time_step = 0.0;
        assert!(ActiveRotationalDiffusion::new(invalid).is_err());

        let mut updater = ActiveRotationalDiffusion::new(parameters(-1.0, 2)).unwrap();
        let mut particles = particles(2);
        assert!(updater.update(0, &mut particles).is_err());

        assert!(updater.set_active_direction(2, Vector3D::zero()).is_err());
        updater.set_active_direction(1, Vector3D::new(0.0, 0.0, 1.0)).unwrap();
    }
}
