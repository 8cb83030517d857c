use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::{Error, Loggable, ParticleData, NeighborProvider};
use crate::potentials::{PairEvaluator, PairPotential, PairPotentialParameters, ForceAccumulators};
use crate::potentials::evaluators::{LennardJones, InversePower, Gaussian, Yukawa};
use crate::potentials::evaluators::{ShiftedLennardJones, ScreenedCoulomb};

/// The `ForceComputeBase` trait is the interface shared by all force
/// computations, allowing to use them without knowing their concrete type.
pub trait ForceComputeBase: Loggable + Send + Sync {
    /// Get the name of this force compute, as registered
    fn name(&self) -> String;

    /// Get the current parameters of this force compute, formatted as JSON
    fn parameters(&self) -> Result<String, Error>;

    /// Get the largest interaction cutoff, which should be used to build
    /// neighbor lists
    fn max_cutoff(&self) -> f64;

    /// Compute forces, energies and virials of all particles at `step`
    fn compute(
        &mut self,
        step: u64,
        particles: &dyn ParticleData,
        neighbors: &mut dyn NeighborProvider,
    ) -> Result<(), Error>;

    /// Get the results of the last call to `compute`
    fn accumulators(&self) -> &ForceAccumulators;
}

impl<E> ForceComputeBase for PairPotential<E> where E: PairEvaluator + 'static {
    fn name(&self) -> String {
        E::name().into()
    }

    fn parameters(&self) -> Result<String, Error> {
        self.parameters_json()
    }

    fn max_cutoff(&self) -> f64 {
        self.max_r_cut()
    }

    fn compute(
        &mut self,
        step: u64,
        particles: &dyn ParticleData,
        neighbors: &mut dyn NeighborProvider,
    ) -> Result<(), Error> {
        PairPotential::compute(self, step, particles, neighbors)
    }

    fn accumulators(&self) -> &ForceAccumulators {
        PairPotential::accumulators(self)
    }
}

/// A force computation selected by name at runtime, with parameters given
/// as JSON.
///
/// ```
/// # use mdforces::{ForceCompute, Loggable};
/// let parameters = r#"{
///     "shift_mode": "shift",
///     "pairs": [{"types": [0, 0], "r_cut": 2.5, "parameters": {"epsilon": 1.0, "sigma": 1.0}}]
/// }"#;
/// let compute = ForceCompute::new("lj", 1, parameters).unwrap();
/// assert_eq!(compute.name(), "lj");
/// assert_eq!(compute.log_quantities(), ["pair_lj_energy"]);
/// ```
pub struct ForceCompute {
    implementation: Box<dyn ForceComputeBase>,
}

impl From<Box<dyn ForceComputeBase>> for ForceCompute {
    fn from(implementation: Box<dyn ForceComputeBase>) -> ForceCompute {
        ForceCompute {
            implementation: implementation,
        }
    }
}

impl std::fmt::Debug for ForceCompute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForceCompute").field("name", &self.implementation.name()).finish()
    }
}

impl ForceCompute {
    /// Create a new force compute with the given `name`, for `types_count`
    /// particle types, and `parameters`.
    ///
    /// The `parameters` should be formatted as JSON.
    ///
    /// # Errors
    ///
    /// This function returns an error if there is no registered force compute
    /// with the given `name`, or if the parameters are invalid.
    pub fn new(name: &str, types_count: usize, parameters: &str) -> Result<ForceCompute, Error> {
        let creator = match REGISTERED_FORCE_COMPUTES.get(name) {
            Some(creator) => creator,
            None => {
                return Err(Error::InvalidParameter(
                    format!("unknown force compute with name '{}'", name)
                ));
            }
        };

        return Ok(ForceCompute {
            implementation: creator(types_count, parameters)?,
        });
    }

    /// Get the names of all registered force computes
    pub fn registered() -> Vec<&'static str> {
        REGISTERED_FORCE_COMPUTES.keys().copied().collect()
    }

    /// Get the name of this force compute
    pub fn name(&self) -> String {
        self.implementation.name()
    }

    /// Get the current parameters of this force compute, formatted as JSON
    pub fn parameters(&self) -> Result<String, Error> {
        self.implementation.parameters()
    }

    /// Get the largest interaction cutoff of this force compute
    pub fn max_cutoff(&self) -> f64 {
        self.implementation.max_cutoff()
    }

    /// Compute forces, energies and virials of all particles at `step`
    #[time_graph::instrument(name = "ForceCompute::compute")]
    pub fn compute(
        &mut self,
        step: u64,
        particles: &dyn ParticleData,
        neighbors: &mut dyn NeighborProvider,
    ) -> Result<(), Error> {
        self.implementation.compute(step, particles, neighbors)
    }

    /// Get the results of the last call to `compute`
    pub fn accumulators(&self) -> &ForceAccumulators {
        self.implementation.accumulators()
    }
}

impl Loggable for ForceCompute {
    fn log_quantities(&self) -> Vec<String> {
        self.implementation.log_quantities()
    }

    fn log_value(&self, name: &str) -> Result<f64, Error> {
        self.implementation.log_value(name)
    }
}

type ForceComputeCreator = fn(usize, &str) -> Result<Box<dyn ForceComputeBase>, Error>;

macro_rules! add_pair_potential {
    ($map :expr, $evaluator :ty) => (
        $map.insert(<$evaluator as PairEvaluator>::name(), (|types_count, json| {
            let parameters = serde_json::from_str::<
                PairPotentialParameters<<$evaluator as PairEvaluator>::Parameters>
            >(json)?;
            let potential = PairPotential::<$evaluator>::with_parameters(types_count, parameters)?;
            Ok(Box::new(potential) as Box<dyn ForceComputeBase>)
        }) as ForceComputeCreator);
    );
}

static REGISTERED_FORCE_COMPUTES: Lazy<BTreeMap<&'static str, ForceComputeCreator>> = Lazy::new(|| {
    let mut map = BTreeMap::new();
    add_pair_potential!(map, LennardJones);
    add_pair_potential!(map, InversePower);
    add_pair_potential!(map, Gaussian);
    add_pair_potential!(map, Yukawa);
    add_pair_potential!(map, ShiftedLennardJones);
    add_pair_potential!(map, ScreenedCoulomb);
    return map;
});
