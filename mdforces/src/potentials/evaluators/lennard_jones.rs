use crate::Error;
use crate::potentials::{PairEvaluator, PairInteraction};

/// Parameters for the Lennard-Jones potential
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LennardJonesParameters {
    /// Depth of the potential well
    pub epsilon: f64,
    /// Distance at which the potential is zero
    pub sigma: f64,
}

/// Lennard-Jones potential: `V(r) = 4 ε ((σ/r)^12 - (σ/r)^6)`
#[derive(Debug, Clone)]
pub struct LennardJones {
    rsq: f64,
    rcutsq: f64,
    lj1: f64,
    lj2: f64,
}

impl PairEvaluator for LennardJones {
    type Parameters = LennardJonesParameters;

    fn name() -> &'static str {
        "lj"
    }

    fn validate(parameters: &LennardJonesParameters) -> Result<(), Error> {
        if !parameters.epsilon.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "epsilon must be finite for Lennard-Jones, got {}", parameters.epsilon
            )));
        }

        if !(parameters.sigma >= 0.0 && parameters.sigma.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "sigma must be positive for Lennard-Jones, got {}", parameters.sigma
            )));
        }

        Ok(())
    }

    fn new(rsq: f64, rcutsq: f64, parameters: &LennardJonesParameters) -> LennardJones {
        let sigma6 = parameters.sigma.powi(6);
        LennardJones {
            rsq: rsq,
            rcutsq: rcutsq,
            lj1: 4.0 * parameters.epsilon * sigma6 * sigma6,
            lj2: 4.0 * parameters.epsilon * sigma6,
        }
    }

    fn evaluate(&self, energy_shift: bool) -> Option<PairInteraction> {
        if self.lj1 == 0.0 && self.lj2 == 0.0 {
            return None;
        }

        let r2inv = 1.0 / self.rsq;
        let r6inv = r2inv * r2inv * r2inv;

        let force_divr = r2inv * r6inv * (12.0 * self.lj1 * r6inv - 6.0 * self.lj2);
        let mut energy = r6inv * (self.lj1 * r6inv - self.lj2);

        if energy_shift {
            let rcut2inv = 1.0 / self.rcutsq;
            let rcut6inv = rcut2inv * rcut2inv * rcut2inv;
            energy -= rcut6inv * (self.lj1 * rcut6inv - self.lj2);
        }

        Some(PairInteraction { force_divr, energy })
    }
}
