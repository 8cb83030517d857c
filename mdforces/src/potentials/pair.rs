use std::cell::RefCell;

use rayon::prelude::*;
use thread_local::ThreadLocal;

use crate::{Error, Loggable, Matrix3, Vector3D, UnitCell};
use crate::{Communicator, ParticleData, NeighborProvider, StorageMode};

use super::{EnergyShiftMode, ForceAccumulators, PairEvaluator, TypePairTable};
use super::apply_xplor;

/// Interaction parameters for a single pair of particle types
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PairEntry<P> {
    /// The two types in this pair. The order does not matter.
    pub types: [usize; 2],
    /// Cutoff radius for this pair
    pub r_cut: f64,
    /// Switching radius for XPLOR smoothing for this pair
    #[serde(default)]
    pub r_on: f64,
    /// Parameters of the potential for this pair
    pub parameters: P,
}

/// Full configuration of a [`PairPotential`], as stored in JSON.
///
/// Pairs of types which are not part of `pairs` use the default parameters
/// and a cutoff of zero, i.e. they do not interact.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PairPotentialParameters<P> {
    /// How energies are modified close to the cutoff
    #[serde(default)]
    pub shift_mode: EnergyShiftMode,
    /// Should the computation run in parallel over particles?
    #[serde(default)]
    pub parallel: bool,
    /// Parameters for each pair of types
    pub pairs: Vec<PairEntry<P>>,
}

/// Contribution of all the pairs around a single particle
#[derive(Debug, Clone, Copy, Default)]
struct Contribution {
    force: Vector3D,
    energy: f64,
    virial: f64,
    virial_tensor: Matrix3,
}

impl Contribution {
    /// Add this contribution to the accumulators entries for `particle`
    fn add_to(&self, accumulators: &mut ForceAccumulators, particle: usize) {
        accumulators.forces[particle] += self.force;
        accumulators.energies[particle] += self.energy;
        accumulators.virials[particle] += self.virial;
        accumulators.virial_tensors[particle] += self.virial_tensor;
    }

    /// Add the reaction to this contribution to the accumulators entries for
    /// `particle`: the force is subtracted, everything else is added.
    fn add_reaction_to(&self, accumulators: &mut ForceAccumulators, particle: usize) {
        accumulators.forces[particle] -= self.force;
        accumulators.energies[particle] += self.energy;
        accumulators.virials[particle] += self.virial;
        accumulators.virial_tensors[particle] += self.virial_tensor;
    }
}

/// Particle data needed during a single compute pass
struct PassData<'a> {
    cell: UnitCell,
    types: &'a [usize],
    positions: &'a [Vector3D],
    diameters: Option<&'a [f64]>,
    charges: Option<&'a [f64]>,
}

/// Pairwise force engine, computing forces, energies and virials for all pairs
/// of particles closer than a per-type-pair cutoff.
///
/// The functional form of the interaction is given by the [`PairEvaluator`]
/// `E`; this type handles neighbor iteration, periodic boundary conditions,
/// cutoffs, energy shifting and the accumulation of results.
///
/// ```
/// # use mdforces::{SimpleParticles, Particle, UnitCell, Vector3D, StorageMode};
/// # use mdforces::neighbors::CellListNeighbors;
/// use mdforces::potentials::PairPotential;
/// use mdforces::potentials::evaluators::{LennardJones, LennardJonesParameters};
///
/// let mut particles = SimpleParticles::new(UnitCell::cubic(10.0), &["A"]);
/// particles.add_particle(Particle::new(0, Vector3D::new(1.0, 1.0, 1.0))).unwrap();
/// particles.add_particle(Particle::new(0, Vector3D::new(2.2, 1.0, 1.0))).unwrap();
///
/// let mut potential = PairPotential::<LennardJones>::new(1);
/// potential.set_params(0, 0, LennardJonesParameters { epsilon: 1.0, sigma: 1.0 }).unwrap();
/// potential.set_r_cut(0, 0, 2.5).unwrap();
///
/// let mut neighbors = CellListNeighbors::new(2.5, StorageMode::Half).unwrap();
/// potential.compute(0, &particles, &mut neighbors).unwrap();
///
/// let forces = &potential.accumulators().forces;
/// assert_eq!(forces[0][0], -forces[1][0]);
/// ```
#[derive(Debug, Clone)]
pub struct PairPotential<E: PairEvaluator> {
    shift_mode: EnergyShiftMode,
    parallel: bool,
    rcutsq: TypePairTable<f64>,
    ronsq: TypePairTable<f64>,
    parameters: TypePairTable<E::Parameters>,
    /// pairs for which some value was explicitly set
    configured: TypePairTable<bool>,
    accumulators: ForceAccumulators,
    last_step: Option<u64>,
}

fn check_radius(name: &str, value: f64) -> Result<(), Error> {
    if !(value >= 0.0 && value.is_finite()) {
        return Err(Error::InvalidParameter(format!(
            "{} must be a positive finite number, got {}", name, value
        )));
    }
    Ok(())
}

/// Check that the lists in `neighbors` cover exactly `size` particles, and
/// only refer to particles in this range
fn check_neighbors(neighbors: &dyn NeighborProvider, size: usize) -> Result<(), Error> {
    if neighbors.size() != size {
        return Err(Error::InvalidParameter(format!(
            "the neighbor list contains {} particles, but the particle data contains {}",
            neighbors.size(), size
        )));
    }

    for i in 0..size {
        if let Some(&j) = neighbors.neighbors_of(i).iter().find(|&&j| j >= size || j == i) {
            return Err(Error::InvalidParameter(format!(
                "invalid neighbor {} for particle {} with {} particles", j, i, size
            )));
        }
    }

    Ok(())
}

impl<E: PairEvaluator> PairPotential<E> {
    /// Create a new pair potential for `types_count` particle types. All
    /// pairs start with default parameters and a cutoff of zero.
    pub fn new(types_count: usize) -> PairPotential<E> {
        PairPotential {
            shift_mode: EnergyShiftMode::NoShift,
            parallel: false,
            rcutsq: TypePairTable::new(types_count, 0.0),
            ronsq: TypePairTable::new(types_count, 0.0),
            parameters: TypePairTable::new(types_count, E::Parameters::default()),
            configured: TypePairTable::new(types_count, false),
            accumulators: ForceAccumulators::new(0),
            last_step: None,
        }
    }

    /// Create a new pair potential for `types_count` particle types, using
    /// the given configuration
    pub fn with_parameters(
        types_count: usize,
        parameters: PairPotentialParameters<E::Parameters>,
    ) -> Result<PairPotential<E>, Error> {
        let mut potential = PairPotential::new(types_count);
        potential.set_shift_mode(parameters.shift_mode);
        potential.set_parallel(parameters.parallel);

        for entry in parameters.pairs {
            let [a, b] = entry.types;
            potential.set_params(a, b, entry.parameters)?;
            potential.set_r_cut(a, b, entry.r_cut)?;
            potential.set_r_on(a, b, entry.r_on)?;
        }

        return Ok(potential);
    }

    /// Create a new pair potential for `types_count` particle types, using
    /// the configuration in the given JSON string
    pub fn from_json(types_count: usize, json: &str) -> Result<PairPotential<E>, Error> {
        let parameters = serde_json::from_str(json)?;
        return PairPotential::with_parameters(types_count, parameters);
    }

    /// Get the name of the energy log quantity of this potential
    pub fn log_name(&self) -> String {
        format!("pair_{}_energy", E::name())
    }

    /// Get the number of particle types
    pub fn types_count(&self) -> usize {
        self.rcutsq.types_count()
    }

    /// Set the potential parameters for the pair of types `(a, b)`
    pub fn set_params(&mut self, a: usize, b: usize, parameters: E::Parameters) -> Result<(), Error> {
        E::validate(&parameters)?;
        self.parameters.set(a, b, parameters)?;
        self.configured.set(a, b, true)?;
        Ok(())
    }

    /// Get the potential parameters for the pair of types `(a, b)`
    pub fn params(&self, a: usize, b: usize) -> Result<&E::Parameters, Error> {
        self.parameters.get(a, b)
    }

    /// Set the cutoff radius for the pair of types `(a, b)`
    pub fn set_r_cut(&mut self, a: usize, b: usize, r_cut: f64) -> Result<(), Error> {
        check_radius("r_cut", r_cut)?;
        self.rcutsq.set(a, b, r_cut * r_cut)?;
        self.configured.set(a, b, true)?;
        Ok(())
    }

    /// Get the cutoff radius for the pair of types `(a, b)`
    pub fn r_cut(&self, a: usize, b: usize) -> Result<f64, Error> {
        self.rcutsq.get(a, b).map(|&rcutsq| f64::sqrt(rcutsq))
    }

    /// Set the XPLOR switching radius for the pair of types `(a, b)`
    pub fn set_r_on(&mut self, a: usize, b: usize, r_on: f64) -> Result<(), Error> {
        check_radius("r_on", r_on)?;
        self.ronsq.set(a, b, r_on * r_on)?;
        self.configured.set(a, b, true)?;
        Ok(())
    }

    /// Get the XPLOR switching radius for the pair of types `(a, b)`
    pub fn r_on(&self, a: usize, b: usize) -> Result<f64, Error> {
        self.ronsq.get(a, b).map(|&ronsq| f64::sqrt(ronsq))
    }

    /// Set the energy shift mode used for all pairs
    pub fn set_shift_mode(&mut self, mode: EnergyShiftMode) {
        self.shift_mode = mode;
    }

    /// Get the energy shift mode used for all pairs
    pub fn shift_mode(&self) -> EnergyShiftMode {
        self.shift_mode
    }

    /// Run the next compute passes in parallel over particles
    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel;
    }

    /// Largest cutoff over all pairs of types, to be used when creating
    /// neighbor lists
    pub fn max_r_cut(&self) -> f64 {
        let max_rcutsq = self.rcutsq.iter().fold(0.0, |max, (_, _, &rcutsq)| f64::max(max, rcutsq));
        return f64::sqrt(max_rcutsq);
    }

    /// Get the current configuration of this potential. Only pairs of types
    /// with some explicitly set value are included.
    pub fn parameters(&self) -> PairPotentialParameters<E::Parameters> {
        let pairs = self.configured.iter()
            .filter(|entry| *entry.2)
            .map(|(a, b, _)| {
                let index = self.rcutsq.index_unchecked(a, b);
                PairEntry {
                    types: [a, b],
                    r_cut: f64::sqrt(*self.rcutsq.by_index(index)),
                    r_on: f64::sqrt(*self.ronsq.by_index(index)),
                    parameters: self.parameters.by_index(index).clone(),
                }
            })
            .collect();

        PairPotentialParameters {
            shift_mode: self.shift_mode,
            parallel: self.parallel,
            pairs: pairs,
        }
    }

    /// Get the current configuration of this potential as JSON
    pub fn parameters_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(&self.parameters())?)
    }

    /// Get the results of the last call to `compute`
    pub fn accumulators(&self) -> &ForceAccumulators {
        &self.accumulators
    }

    /// Get the step of the last call to `compute`, if any
    pub fn last_step(&self) -> Option<u64> {
        self.last_step
    }

    /// Get the total pair energy from the last compute, summed over all the
    /// ranks of `communicator`
    pub fn total_energy(&self, communicator: &dyn Communicator) -> Result<f64, Error> {
        let local = self.log_value(&self.log_name())?;
        if communicator.size() > 1 {
            return Ok(communicator.sum(local));
        }
        return Ok(local);
    }

    /// Compute forces, energies and virials for all particles at `step`.
    ///
    /// The neighbor list is refreshed for `step` first, and all results from
    /// previous calls are discarded.
    #[time_graph::instrument(name = "PairPotential::compute")]
    pub fn compute(
        &mut self,
        step: u64,
        particles: &dyn ParticleData,
        neighbors: &mut dyn NeighborProvider,
    ) -> Result<(), Error> {
        neighbors.refresh(step, particles)?;
        let neighbors: &dyn NeighborProvider = neighbors;

        let size = particles.size()?;
        check_neighbors(neighbors, size)?;

        let types = particles.types()?;
        let types_count = self.types_count();
        for &particle_type in types {
            crate::check_type(particle_type, types_count)?;
        }

        let data = PassData {
            cell: particles.cell()?,
            types: types,
            positions: particles.positions()?,
            diameters: if E::needs_diameter() { Some(particles.diameters()?) } else { None },
            charges: if E::needs_charge() { Some(particles.charges()?) } else { None },
        };

        let mut accumulators = std::mem::replace(&mut self.accumulators, ForceAccumulators::new(0));
        accumulators.reset(size);

        let third_law = neighbors.storage_mode() == StorageMode::Half;
        match (self.parallel, third_law) {
            (false, _) => self.compute_sequential(&data, neighbors, third_law, &mut accumulators),
            (true, false) => self.compute_parallel_full(&data, neighbors, &mut accumulators),
            (true, true) => self.compute_parallel_half(&data, neighbors, &mut accumulators),
        }

        self.accumulators = accumulators;
        self.last_step = Some(step);

        Ok(())
    }

    fn compute_sequential(
        &self,
        data: &PassData,
        neighbors: &dyn NeighborProvider,
        third_law: bool,
        accumulators: &mut ForceAccumulators,
    ) {
        for i in 0..data.types.len() {
            let contribution = self.particle_contribution(data, i, neighbors.neighbors_of(i), |j, pair| {
                if third_law {
                    pair.add_reaction_to(accumulators, j);
                }
            });
            contribution.add_to(accumulators, i);
        }
    }

    #[time_graph::instrument(name = "PairPotential::parallel_full")]
    fn compute_parallel_full(
        &self,
        data: &PassData,
        neighbors: &dyn NeighborProvider,
        accumulators: &mut ForceAccumulators,
    ) {
        let contributions = (0..data.types.len()).into_par_iter()
            .map(|i| self.particle_contribution(data, i, neighbors.neighbors_of(i), |_, _| {}))
            .collect::<Vec<_>>();

        for (i, contribution) in contributions.iter().enumerate() {
            contribution.add_to(accumulators, i);
        }
    }

    #[time_graph::instrument(name = "PairPotential::parallel_half")]
    fn compute_parallel_half(
        &self,
        data: &PassData,
        neighbors: &dyn NeighborProvider,
        accumulators: &mut ForceAccumulators,
    ) {
        let size = data.types.len();
        let partials = ThreadLocal::new();
        (0..size).into_par_iter().for_each(|i| {
            let mut partial = partials.get_or(|| RefCell::new(ForceAccumulators::new(size))).borrow_mut();
            let contribution = self.particle_contribution(data, i, neighbors.neighbors_of(i), |j, pair| {
                pair.add_reaction_to(&mut partial, j);
            });
            contribution.add_to(&mut partial, i);
        });

        for partial in partials.into_iter() {
            accumulators.merge(&partial.into_inner());
        }
    }

    /// Compute the contribution of all pairs `i-j` to the particle `i`, for
    /// all `j` in `neighbors`. `reaction` is called with the contribution of
    /// each interacting pair to `i`, and can be used to update `j`.
    #[inline]
    fn particle_contribution(
        &self,
        data: &PassData,
        i: usize,
        neighbors: &[usize],
        mut reaction: impl FnMut(usize, &Contribution),
    ) -> Contribution {
        let mut total = Contribution::default();

        let type_i = data.types[i];
        let position_i = data.positions[i];

        for &j in neighbors {
            let dr = data.cell.minimum_image(position_i - data.positions[j]);
            let rsq = dr.norm2();

            let pair = self.rcutsq.index_unchecked(type_i, data.types[j]);
            let rcutsq = *self.rcutsq.by_index(pair);
            if rsq >= rcutsq {
                continue;
            }
            let ronsq = *self.ronsq.by_index(pair);

            let mut evaluator = E::new(rsq, rcutsq, self.parameters.by_index(pair));
            if let Some(diameters) = data.diameters {
                evaluator.set_diameter(diameters[i], diameters[j]);
            }
            if let Some(charges) = data.charges {
                evaluator.set_charge(charges[i], charges[j]);
            }

            let interaction = match evaluator.evaluate(self.shift_mode.shifts_energy(ronsq, rcutsq)) {
                Some(interaction) => interaction,
                None => continue,
            };

            let (force_divr, energy) = if self.shift_mode.smooths(rsq, ronsq, rcutsq) {
                apply_xplor(rsq, ronsq, rcutsq, interaction.force_divr, interaction.energy)
            } else {
                (interaction.force_divr, interaction.energy)
            };

            let contribution = Contribution {
                force: force_divr * dr,
                energy: 0.5 * energy,
                virial: (1.0 / 6.0) * rsq * force_divr,
                virial_tensor: dr.tensorial(&dr) * (0.5 * force_divr),
            };

            reaction(j, &contribution);

            total.force += contribution.force;
            total.energy += contribution.energy;
            total.virial += contribution.virial;
            total.virial_tensor += contribution.virial_tensor;
        }

        return total;
    }
}

impl<E: PairEvaluator> Loggable for PairPotential<E> {
    fn log_quantities(&self) -> Vec<String> {
        vec![self.log_name()]
    }

    fn log_value(&self, name: &str) -> Result<f64, Error> {
        if name != self.log_name() {
            return Err(Error::UnsupportedQuantity(name.into()));
        }

        if self.last_step.is_none() {
            return Err(Error::Internal(format!(
                "can not get '{}' before the first call to compute", name
            )));
        }

        return Ok(self.accumulators.total_energy());
    }
}
