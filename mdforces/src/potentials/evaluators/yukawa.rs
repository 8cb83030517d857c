use crate::Error;
use crate::potentials::{PairEvaluator, PairInteraction};

/// Parameters for the Yukawa potential
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct YukawaParameters {
    /// Energy scale
    pub epsilon: f64,
    /// Inverse screening length
    pub kappa: f64,
}

/// Yukawa potential: `V(r) = ε exp(-κ r) / r`
#[derive(Debug, Clone)]
pub struct Yukawa {
    rsq: f64,
    rcutsq: f64,
    epsilon: f64,
    kappa: f64,
}

/// Energy and force divided by r of a screened `1/r` interaction with energy
/// scale `scale`
pub(super) fn screened(scale: f64, kappa: f64, rsq: f64) -> (f64, f64) {
    let r = f64::sqrt(rsq);
    let energy = scale * f64::exp(-kappa * r) / r;
    let force_divr = energy * (1.0 + kappa * r) / rsq;
    return (energy, force_divr);
}

impl PairEvaluator for Yukawa {
    type Parameters = YukawaParameters;

    fn name() -> &'static str {
        "yukawa"
    }

    fn validate(parameters: &YukawaParameters) -> Result<(), Error> {
        if !(parameters.kappa >= 0.0 && parameters.kappa.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "kappa must be positive for Yukawa potential, got {}", parameters.kappa
            )));
        }

        if !parameters.epsilon.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "epsilon must be finite for Yukawa potential, got {}", parameters.epsilon
            )));
        }

        Ok(())
    }

    fn new(rsq: f64, rcutsq: f64, parameters: &YukawaParameters) -> Yukawa {
        Yukawa {
            rsq: rsq,
            rcutsq: rcutsq,
            epsilon: parameters.epsilon,
            kappa: parameters.kappa,
        }
    }

    fn evaluate(&self, energy_shift: bool) -> Option<PairInteraction> {
        if self.epsilon == 0.0 {
            return None;
        }

        let (mut energy, force_divr) = screened(self.epsilon, self.kappa, self.rsq);
        if energy_shift {
            energy -= screened(self.epsilon, self.kappa, self.rcutsq).0;
        }

        Some(PairInteraction { force_divr, energy })
    }
}
