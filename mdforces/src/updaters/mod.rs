//! Updaters modify the particles state between integration steps.
use crate::{Error, ParticleData};

mod flow;
pub use self::flow::{MomentumExchangeFlow, FlowParameters};

mod rotational_diffusion;
pub use self::rotational_diffusion::{ActiveRotationalDiffusion, RotationalDiffusionParameters};

/// An `Updater` changes the state of particles at given time steps
pub trait Updater: Send + Sync {
    /// Update the particles at the given `step`
    fn update(&mut self, step: u64, particles: &mut dyn ParticleData) -> Result<(), Error>;
}

/// Selection of the particles an updater acts on
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ParticleGroup {
    /// All particles
    All,
    /// Only particles with one of the given types
    Types(Vec<usize>),
}

impl Default for ParticleGroup {
    fn default() -> ParticleGroup {
        ParticleGroup::All
    }
}

impl ParticleGroup {
    /// Does this group contain particles with the given type?
    pub fn contains(&self, particle_type: usize) -> bool {
        match self {
            ParticleGroup::All => true,
            ParticleGroup::Types(types) => types.contains(&particle_type),
        }
    }
}

/// One of the Cartesian axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
pub enum Direction {
    X,
    Y,
    Z,
}

impl Direction {
    /// Index of this direction in a `Vector3D`
    pub fn index(self) -> usize {
        match self {
            Direction::X => 0,
            Direction::Y => 1,
            Direction::Z => 2,
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = Error;

    fn from_str(value: &str) -> Result<Direction, Error> {
        match value {
            "X" | "x" => Ok(Direction::X),
            "Y" | "y" => Ok(Direction::Y),
            "Z" | "z" => Ok(Direction::Z),
            _ => Err(Error::InvalidParameter(format!(
                "direction must be X, Y, or Z, got '{}'", value
            ))),
        }
    }
}
