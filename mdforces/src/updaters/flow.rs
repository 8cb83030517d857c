use log::warn;

use crate::{Error, Extremum, Loggable, UnitCell, Variant, Vector3D};
use crate::{Communicator, SingleProcess, ParticleData};

use super::{Direction, ParticleGroup, Updater};

/// Maximal number of momentum exchanges in a single update
const MAX_EXCHANGES: usize = 100;

/// Name of the log quantity containing the total exchanged momentum
const EXCHANGED_MOMENTUM: &str = "mueller_plathe_exchanged_momentum";

/// Parameters for [`MomentumExchangeFlow`]
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FlowParameters {
    /// Target value of the exchanged momentum per unit area, as a function
    /// of the time step
    pub flow_target: Variant,
    /// Direction along which the box is split into slabs
    pub slab_direction: Direction,
    /// Direction of the velocity component to exchange
    pub flow_direction: Direction,
    /// Number of slabs
    pub n_slabs: usize,
    /// Index of the slab receiving the momentum
    pub min_slab: usize,
    /// Index of the slab giving the momentum
    pub max_slab: usize,
    /// Tolerance on the exchanged momentum per unit area
    pub flow_epsilon: f64,
    /// Particles taking part in the exchanges
    #[serde(default)]
    pub group: ParticleGroup,
}

impl FlowParameters {
    fn validate(&self) -> Result<(), Error> {
        self.flow_target.validate()?;

        if self.n_slabs == 0 {
            return Err(Error::InvalidParameter("the number of slabs must be larger than 0".into()));
        }

        if self.min_slab >= self.n_slabs || self.max_slab >= self.n_slabs {
            return Err(Error::InvalidParameter(format!(
                "slab indexes must be smaller than the number of slabs ({}), got min_slab={} and max_slab={}",
                self.n_slabs, self.min_slab, self.max_slab
            )));
        }

        if !(self.flow_epsilon > 0.0 && self.flow_epsilon.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "flow_epsilon must be a positive number, got {}", self.flow_epsilon
            )));
        }

        if self.min_slab == self.max_slab {
            warn!("using the same slab ({}) for min_slab and max_slab, no flow will be created", self.min_slab);
        }

        Ok(())
    }
}

/// Creates a shear flow with the reverse non-equilibrium method of
/// Müller-Plathe.
///
/// The box is split in `n_slabs` slabs along `slab_direction`. At each
/// update, the particle with the smallest velocity along `flow_direction` in
/// `min_slab` exchanges its momentum with the particle with the largest
/// velocity in `max_slab`, until the total exchanged momentum per unit area
/// matches the current flow target.
///
/// When the exchanged momentum overshoots the target, exchanges are done in
/// the other direction, between the largest velocity in `min_slab` and the
/// smallest one in `max_slab`.
pub struct MomentumExchangeFlow {
    parameters: FlowParameters,
    communicator: Box<dyn Communicator>,
    /// Total momentum transferred to `min_slab` so far
    exchanged_momentum: f64,
    /// Last cell that passed the orthorhombic check
    checked_cell: Option<UnitCell>,
    /// Number of exchanges done during the last update
    last_exchanges: usize,
}

impl std::fmt::Debug for MomentumExchangeFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MomentumExchangeFlow")
            .field("parameters", &self.parameters)
            .field("exchanged_momentum", &self.exchanged_momentum)
            .field("ranks", &self.communicator.size())
            .finish()
    }
}

impl MomentumExchangeFlow {
    /// Create a new flow updater running on a single rank
    pub fn new(parameters: FlowParameters) -> Result<MomentumExchangeFlow, Error> {
        return MomentumExchangeFlow::with_communicator(parameters, Box::new(SingleProcess));
    }

    /// Create a new flow updater, using the given `communicator` to find the
    /// particles to exchange over all ranks
    pub fn with_communicator(
        parameters: FlowParameters,
        communicator: Box<dyn Communicator>,
    ) -> Result<MomentumExchangeFlow, Error> {
        parameters.validate()?;
        Ok(MomentumExchangeFlow {
            parameters: parameters,
            communicator: communicator,
            exchanged_momentum: 0.0,
            checked_cell: None,
            last_exchanges: 0,
        })
    }

    /// Get the parameters of this updater
    pub fn parameters(&self) -> &FlowParameters {
        &self.parameters
    }

    /// Get the total momentum exchanged since this updater was created
    pub fn summed_exchanged_momentum(&self) -> f64 {
        self.exchanged_momentum
    }

    /// Get the number of momentum exchanges done during the last update
    pub fn last_exchanges(&self) -> usize {
        self.last_exchanges
    }

    pub fn n_slabs(&self) -> usize {
        self.parameters.n_slabs
    }

    pub fn min_slab(&self) -> usize {
        self.parameters.min_slab
    }

    pub fn max_slab(&self) -> usize {
        self.parameters.max_slab
    }

    pub fn slab_direction(&self) -> Direction {
        self.parameters.slab_direction
    }

    pub fn flow_direction(&self) -> Direction {
        self.parameters.flow_direction
    }

    pub fn flow_target(&self) -> &Variant {
        &self.parameters.flow_target
    }

    pub fn flow_epsilon(&self) -> f64 {
        self.parameters.flow_epsilon
    }

    /// Change the slab receiving the momentum
    pub fn set_min_slab(&mut self, slab: usize) -> Result<(), Error> {
        let mut parameters = self.parameters.clone();
        parameters.min_slab = slab;
        parameters.validate()?;
        self.parameters = parameters;
        Ok(())
    }

    /// Change the slab giving the momentum
    pub fn set_max_slab(&mut self, slab: usize) -> Result<(), Error> {
        let mut parameters = self.parameters.clone();
        parameters.max_slab = slab;
        parameters.validate()?;
        self.parameters = parameters;
        Ok(())
    }

    /// Exchange the roles of `min_slab` and `max_slab`, reversing the
    /// direction of the flow
    pub fn swap_min_max_slab(&mut self) {
        std::mem::swap(&mut self.parameters.min_slab, &mut self.parameters.max_slab);
    }

    /// Change the target of exchanged momentum per unit area
    pub fn set_flow_target(&mut self, flow_target: Variant) -> Result<(), Error> {
        flow_target.validate()?;
        self.parameters.flow_target = flow_target;
        Ok(())
    }

    /// Change the tolerance on the exchanged momentum per unit area
    pub fn set_flow_epsilon(&mut self, flow_epsilon: f64) -> Result<(), Error> {
        let mut parameters = self.parameters.clone();
        parameters.flow_epsilon = flow_epsilon;
        parameters.validate()?;
        self.parameters = parameters;
        Ok(())
    }

    /// Check again that the box is orthorhombic at the next update. The check
    /// also runs automatically every time the box changes.
    pub fn force_orthorhombic_box_check(&mut self) {
        self.checked_cell = None;
    }

    fn check_cell(&mut self, cell: UnitCell) -> Result<(), Error> {
        if self.checked_cell != Some(cell) {
            cell.check_orthorhombic("the momentum exchange flow")?;
            self.checked_cell = Some(cell);
        }
        Ok(())
    }

    /// Get the slab containing the given position
    fn slab_index(&self, cell: &UnitCell, position: Vector3D) -> usize {
        let axis = self.parameters.slab_direction.index();
        let mut wrapped = position;
        cell.wrap_vector(&mut wrapped);

        let n_slabs = self.parameters.n_slabs;
        let slab = f64::floor(wrapped[axis] / cell.lengths()[axis] * n_slabs as f64) as usize;
        return usize::min(slab, n_slabs - 1);
    }

    /// Find the particle with the smallest velocity in `low_slab` and the
    /// particle with the largest velocity in `high_slab`, over all ranks
    fn find_extrema(
        &self,
        particles: &dyn ParticleData,
        cell: &UnitCell,
        low_slab: usize,
        high_slab: usize,
    ) -> Result<(Extremum, Extremum), Error> {
        let types = particles.types()?;
        let positions = particles.positions()?;
        let velocities = particles.velocities()?;
        let masses = particles.masses()?;
        let tags = particles.tags()?;

        let flow_axis = self.parameters.flow_direction.index();

        let mut low = Extremum::none();
        let mut high = Extremum::none();
        for i in 0..particles.size()? {
            if !self.parameters.group.contains(types[i]) {
                continue;
            }

            let slab = self.slab_index(cell, positions[i]);
            let candidate = Extremum {
                value: velocities[i][flow_axis],
                mass: masses[i],
                tag: Some(tags[i]),
            };

            if slab == low_slab {
                low = low.min(candidate);
            }

            if slab == high_slab {
                high = high.max(candidate);
            }
        }

        let low = self.communicator.minimum(low);
        let high = self.communicator.maximum(high);
        return Ok((low, high));
    }

    /// Exchange the momentum of the `low` and `high` particles, on the ranks
    /// owning them
    fn exchange(&self, particles: &mut dyn ParticleData, low: &Extremum, high: &Extremum) -> Result<(), Error> {
        let (low_index, high_index) = {
            let tags = particles.tags()?;
            let find = |tag: Option<u64>| tags.iter().position(|&t| Some(t) == tag);
            (find(low.tag), find(high.tag))
        };

        let flow_axis = self.parameters.flow_direction.index();
        let velocities = particles.velocities_mut()?;
        if let Some(i) = low_index {
            velocities[i][flow_axis] = high.value * high.mass / low.mass;
        }

        if let Some(i) = high_index {
            velocities[i][flow_axis] = low.value * low.mass / high.mass;
        }

        Ok(())
    }
}

impl Updater for MomentumExchangeFlow {
    #[time_graph::instrument(name = "MomentumExchangeFlow::update")]
    fn update(&mut self, step: u64, particles: &mut dyn ParticleData) -> Result<(), Error> {
        let cell = particles.cell()?;
        self.check_cell(cell)?;

        let lengths = cell.lengths();
        let slab_axis = self.parameters.slab_direction.index();
        let area = (0..3).filter(|&axis| axis != slab_axis).map(|axis| lengths[axis]).product::<f64>();

        let target = self.parameters.flow_target.value(step);
        let epsilon = self.parameters.flow_epsilon;

        self.last_exchanges = 0;
        loop {
            if self.last_exchanges == MAX_EXCHANGES {
                warn!(
                    "the momentum exchange flow did not reach its target after {} exchanges at step {}, \
                    the flow target might be too large for this system",
                    MAX_EXCHANGES, step
                );
                break;
            }
            let forward = self.exchanged_momentum / area < target;
            let (low_slab, high_slab) = if forward {
                (self.parameters.min_slab, self.parameters.max_slab)
            } else {
                (self.parameters.max_slab, self.parameters.min_slab)
            };

            let (low, high) = self.find_extrema(&*particles, &cell, low_slab, high_slab)?;
            if !low.is_some() || !high.is_some() {
                warn!(
                    "no particle of the group in slab {} at step {}, skipping momentum exchange",
                    if low.is_some() { high_slab } else { low_slab }, step
                );
                break;
            }

            if low.tag == high.tag {
                break;
            }

            self.exchange(particles, &low, &high)?;
            self.last_exchanges += 1;

            let exchanged = high.mass * high.value - low.mass * low.value;
            if forward {
                self.exchanged_momentum += exchanged;
            } else {
                self.exchanged_momentum -= exchanged;
            }

            if f64::abs(self.exchanged_momentum / area - target) <= epsilon {
                break;
            }
        }

        Ok(())
    }
}

impl Loggable for MomentumExchangeFlow {
    fn log_quantities(&self) -> Vec<String> {
        vec![EXCHANGED_MOMENTUM.into()]
    }

    fn log_value(&self, name: &str) -> Result<f64, Error> {
        if name == EXCHANGED_MOMENTUM {
            Ok(self.exchanged_momentum)
        } else {
            Err(Error::UnsupportedQuantity(name.into()))
        }
    }
}
