use crate::Error;
use crate::potentials::{PairEvaluator, PairInteraction};

/// Parameters for the inverse power potential
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct InversePowerParameters {
    /// Energy scale
    pub epsilon: f64,
    /// Length scale
    pub sigma: f64,
    /// Exponent of the potential
    pub n: f64,
}

/// Purely repulsive inverse power potential: `V(r) = ε (σ/r)^n`
#[derive(Debug, Clone)]
pub struct InversePower {
    rsq: f64,
    rcutsq: f64,
    parameters: InversePowerParameters,
}

impl InversePower {
    fn energy(&self, rsq: f64) -> f64 {
        let p = &self.parameters;
        p.epsilon * f64::powf(p.sigma * p.sigma / rsq, 0.5 * p.n)
    }
}

impl PairEvaluator for InversePower {
    type Parameters = InversePowerParameters;

    fn name() -> &'static str {
        "inverse_power"
    }

    fn validate(parameters: &InversePowerParameters) -> Result<(), Error> {
        if !(parameters.n > 0.0 && parameters.n.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "the exponent must be positive for inverse power potential, got {}", parameters.n
            )));
        }

        if !(parameters.sigma >= 0.0 && parameters.sigma.is_finite()) || !parameters.epsilon.is_finite() {
            return Err(Error::InvalidParameter(
                "epsilon and sigma must be finite, and sigma positive for inverse power potential".into()
            ));
        }

        Ok(())
    }

    fn new(rsq: f64, rcutsq: f64, parameters: &InversePowerParameters) -> InversePower {
        InversePower {
            rsq: rsq,
            rcutsq: rcutsq,
            parameters: *parameters,
        }
    }

    fn evaluate(&self, energy_shift: bool) -> Option<PairInteraction> {
        if self.parameters.epsilon == 0.0 || self.parameters.sigma == 0.0 {
            return None;
        }

        let mut energy = self.energy(self.rsq);
        let force_divr = self.parameters.n * energy / self.rsq;

        if energy_shift {
            energy -= self.energy(self.rcutsq);
        }

        Some(PairInteraction { force_divr, energy })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn values() {
        let parameters = InversePowerParameters { epsilon: 2.0, sigma: 1.0, n: 12.0 };
        let interaction = InversePower::new(4.0, 9.0, &parameters).evaluate(false).unwrap();
        assert_relative_eq!(interaction.energy, 2.0 / 4096.0, max_relative = 1e-14);
        assert_relative_eq!(interaction.force_divr, 12.0 * 2.0 / 4096.0 / 4.0, max_relative = 1e-14);

        let shifted = InversePower::new(4.0, 9.0, &parameters).evaluate(true).unwrap();
        assert_relative_eq!(shifted.energy, 2.0 / 4096.0 - 2.0 / 531441.0, max_relative = 1e-14);
    }

    #[test]
    fn force() {
        let parameters = InversePowerParameters { epsilon: 1.0, sigma: 1.0, n: 6.0 };
        crate::potentials::evaluators::tests::check_force::<InversePower>(
            &parameters, 3.0, &[0.9, 1.3, 2.7], (1.0, 1.0), (0.0, 0.0)
        );
    }

    #[test]
    fn validation() {
        let parameters = InversePowerParameters { epsilon: 1.0, sigma: 1.0, n: 0.0 };
        assert!(InversePower::validate(&parameters).is_err());
        assert!(InversePower::new(1.0, 4.0, &InversePowerParameters::default()).evaluate(false).is_none());
    }
}
