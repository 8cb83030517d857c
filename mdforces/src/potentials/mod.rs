//! Pairwise interactions between particles.
//!
//! The [`PairPotential`] engine computes forces, energies and virials for all
//! pairs of particles closer than a cutoff, delegating the functional form of
//! the interaction to a [`PairEvaluator`].

use crate::Error;

mod type_pairs;
pub use self::type_pairs::TypePairTable;

mod shifting;
pub use self::shifting::{EnergyShiftMode, xplor_switch, apply_xplor};

mod accumulators;
pub use self::accumulators::ForceAccumulators;

mod pair;
pub use self::pair::{PairPotential, PairPotentialParameters, PairEntry};

pub mod evaluators;

/// Output of a pair evaluator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairInteraction {
    /// Magnitude of the force divided by the distance. The force acting on
    /// the first particle is `force_divr * (r_i - r_j)`, so positive values
    /// are repulsive.
    pub force_divr: f64,
    /// Interaction energy of the pair
    pub energy: f64,
}

/// A `PairEvaluator` computes the interaction between a single pair of
/// particles, given their squared distance.
///
/// A new evaluator is created for every pair, so creating one should be
/// cheap.
pub trait PairEvaluator: Sized {
    /// Parameters of the interaction for a single pair of particle types
    type Parameters: Clone + Default + std::fmt::Debug + Send + Sync
        + serde::Serialize + serde::de::DeserializeOwned + schemars::JsonSchema;

    /// Short name of this interaction, used to name log quantities and in
    /// the force compute registry
    fn name() -> &'static str;

    /// Does this evaluator use the particles diameters?
    fn needs_diameter() -> bool {
        false
    }

    /// Does this evaluator use the particles charges?
    fn needs_charge() -> bool {
        false
    }

    /// Check that the given parameters are valid
    fn validate(parameters: &Self::Parameters) -> Result<(), Error>;

    /// Create a new evaluator for a pair at squared distance `rsq`, using the
    /// squared cutoff `rcutsq` and the given parameters
    fn new(rsq: f64, rcutsq: f64, parameters: &Self::Parameters) -> Self;

    /// Set the diameters of the two particles. This is only called if
    /// `needs_diameter()` returns `true`.
    fn set_diameter(&mut self, _di: f64, _dj: f64) {}

    /// Set the charges of the two particles. This is only called if
    /// `needs_charge()` returns `true`.
    fn set_charge(&mut self, _qi: f64, _qj: f64) {}

    /// Compute the force divided by distance and energy for this pair. When
    /// `energy_shift` is `true`, the energy must be shifted so that it is zero
    /// at the cutoff.
    ///
    /// This returns `None` when the interaction vanishes for this pair.
    fn evaluate(&self, energy_shift: bool) -> Option<PairInteraction>;
}
