use crate::Error;
use crate::potentials::{PairEvaluator, PairInteraction};

/// Parameters for the shifted Lennard-Jones potential
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ShiftedLennardJonesParameters {
    /// Depth of the potential well
    pub epsilon: f64,
    /// Distance at which the potential is zero for particles of diameter 1
    pub sigma: f64,
}

/// Lennard-Jones potential shifted by the particles diameters:
/// `V(r) = 4 ε ((σ/(r - Δ))^12 - (σ/(r - Δ))^6)` with `Δ = (d_i + d_j)/2 - 1`
#[derive(Debug, Clone)]
pub struct ShiftedLennardJones {
    rsq: f64,
    rcutsq: f64,
    lj1: f64,
    lj2: f64,
    delta: f64,
}

impl ShiftedLennardJones {
    /// Get the energy and force divided by `r - Δ` at distance `r`
    fn energy_force(&self, r: f64) -> (f64, f64) {
        let rmd = r - self.delta;
        let rmd2inv = 1.0 / (rmd * rmd);
        let rmd6inv = rmd2inv * rmd2inv * rmd2inv;

        let energy = rmd6inv * (self.lj1 * rmd6inv - self.lj2);
        let force_divrmd = rmd2inv * rmd6inv * (12.0 * self.lj1 * rmd6inv - 6.0 * self.lj2);
        return (energy, force_divrmd);
    }
}

impl PairEvaluator for ShiftedLennardJones {
    type Parameters = ShiftedLennardJonesParameters;

    fn name() -> &'static str {
        "slj"
    }

    fn needs_diameter() -> bool {
        true
    }

    fn validate(parameters: &ShiftedLennardJonesParameters) -> Result<(), Error> {
        if !(parameters.sigma >= 0.0 && parameters.sigma.is_finite()) || !parameters.epsilon.is_finite() {
            return Err(Error::InvalidParameter(
                "epsilon and sigma must be finite, and sigma positive for shifted Lennard-Jones".into()
            ));
        }
        Ok(())
    }

    fn new(rsq: f64, rcutsq: f64, parameters: &ShiftedLennardJonesParameters) -> ShiftedLennardJones {
        let sigma6 = parameters.sigma.powi(6);
        ShiftedLennardJones {
            rsq: rsq,
            rcutsq: rcutsq,
            lj1: 4.0 * parameters.epsilon * sigma6 * sigma6,
            lj2: 4.0 * parameters.epsilon * sigma6,
            delta: 0.0,
        }
    }

    fn set_diameter(&mut self, di: f64, dj: f64) {
        self.delta = 0.5 * (di + dj) - 1.0;
    }

    fn evaluate(&self, energy_shift: bool) -> Option<PairInteraction> {
        if self.lj1 == 0.0 && self.lj2 == 0.0 {
            return None;
        }

        let r = f64::sqrt(self.rsq);
        let (mut energy, force_divrmd) = self.energy_force(r);
        let force_divr = force_divrmd * (r - self.delta) / r;

        if energy_shift {
            energy -= self.energy_force(f64::sqrt(self.rcutsq)).0;
        }

        Some(PairInteraction { force_divr, energy })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    use crate::potentials::evaluators::{LennardJones, LennardJonesParameters};

    #[test]
    fn unit_diameter_is_lennard_jones() {
        let parameters = ShiftedLennardJonesParameters { epsilon: 1.0, sigma: 1.0 };
        let mut slj = ShiftedLennardJones::new(1.44, 6.25, &parameters);
        slj.set_diameter(1.0, 1.0);
        let slj = slj.evaluate(true).unwrap();

        let lj = LennardJones::new(1.44, 6.25, &LennardJonesParameters { epsilon: 1.0, sigma: 1.0 });
        let lj = lj.evaluate(true).unwrap();

        assert_relative_eq!(slj.energy, lj.energy, max_relative = 1e-12);
        assert_relative_eq!(slj.force_divr, lj.force_divr, max_relative = 1e-12);
    }

    #[test]
    fn diameter_shift() {
        let parameters = ShiftedLennardJonesParameters { epsilon: 1.0, sigma: 1.0 };
        let mut slj = ShiftedLennardJones::new(2.0 * 2.0, 9.0, &parameters);
        // Δ = 1, so the energy is zero at r = σ + Δ = 2
        slj.set_diameter(2.0, 2.0);
        let interaction = slj.evaluate(false).unwrap();
        assert!(interaction.energy.abs() < 1e-12);
    }

    #[test]
    fn force() {
        let parameters = ShiftedLennardJonesParameters { epsilon: 0.5, sigma: 1.0 };
        crate::potentials::evaluators::tests::check_force::<ShiftedLennardJones>(
            &parameters, 3.0, &[1.6, 1.9, 2.5], (1.5, 1.7), (0.0, 0.0)
        );
    }
}
