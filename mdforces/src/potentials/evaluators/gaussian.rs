use crate::Error;
use crate::potentials::{PairEvaluator, PairInteraction};

/// Parameters for the Gaussian potential
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GaussianParameters {
    /// Energy at zero distance
    pub epsilon: f64,
    /// Width of the Gaussian
    pub sigma: f64,
}

/// Gaussian potential: `V(r) = ε exp(-r^2 / 2σ^2)`
#[derive(Debug, Clone)]
pub struct Gaussian {
    rsq: f64,
    rcutsq: f64,
    epsilon: f64,
    sigma: f64,
}

impl PairEvaluator for Gaussian {
    type Parameters = GaussianParameters;

    fn name() -> &'static str {
        "gauss"
    }

    fn validate(parameters: &GaussianParameters) -> Result<(), Error> {
        if !(parameters.sigma > 0.0 && parameters.sigma.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "sigma must be positive for Gaussian potential, got {}", parameters.sigma
            )));
        }

        if !parameters.epsilon.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "epsilon must be finite for Gaussian potential, got {}", parameters.epsilon
            )));
        }

        Ok(())
    }

    fn new(rsq: f64, rcutsq: f64, parameters: &GaussianParameters) -> Gaussian {
        Gaussian {
            rsq: rsq,
            rcutsq: rcutsq,
            epsilon: parameters.epsilon,
            sigma: parameters.sigma,
        }
    }

    fn evaluate(&self, energy_shift: bool) -> Option<PairInteraction> {
        if self.sigma == 0.0 {
            return None;
        }

        let sigma_sq = self.sigma * self.sigma;
        let mut energy = self.epsilon * f64::exp(-0.5 * self.rsq / sigma_sq);
        let force_divr = energy / sigma_sq;

        if energy_shift {
            energy -= self.epsilon * f64::exp(-0.5 * self.rcutsq / sigma_sq);
        }

        Some(PairInteraction { force_divr, energy })
    }
}
