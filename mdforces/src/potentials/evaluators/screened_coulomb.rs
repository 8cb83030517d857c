use crate::Error;
use crate::potentials::{PairEvaluator, PairInteraction};

use super::yukawa::screened;

/// Parameters for the screened Coulomb potential
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ScreenedCoulombParameters {
    /// Inverse Debye screening length
    pub kappa: f64,
}

/// Screened Coulomb (Debye-Hückel) potential between charged particles:
/// `V(r) = q_i q_j exp(-κ r) / r`
#[derive(Debug, Clone)]
pub struct ScreenedCoulomb {
    rsq: f64,
    rcutsq: f64,
    kappa: f64,
    qiqj: f64,
}

impl PairEvaluator for ScreenedCoulomb {
    type Parameters = ScreenedCoulombParameters;

    fn name() -> &'static str {
        "screened_coulomb"
    }

    fn needs_charge() -> bool {
        true
    }

    fn validate(parameters: &ScreenedCoulombParameters) -> Result<(), Error> {
        if !(parameters.kappa >= 0.0 && parameters.kappa.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "kappa must be positive for screened Coulomb potential, got {}", parameters.kappa
            )));
        }
        Ok(())
    }

    fn new(rsq: f64, rcutsq: f64, parameters: &ScreenedCoulombParameters) -> ScreenedCoulomb {
        ScreenedCoulomb {
            rsq: rsq,
            rcutsq: rcutsq,
            kappa: parameters.kappa,
            qiqj: 0.0,
        }
    }

    fn set_charge(&mut self, qi: f64, qj: f64) {
        self.qiqj = qi * qj;
    }

    fn evaluate(&self, energy_shift: bool) -> Option<PairInteraction> {
        if self.qiqj == 0.0 {
            return None;
        }

        let (mut energy, force_divr) = screened(self.qiqj, self.kappa, self.rsq);
        if energy_shift {
            energy -= screened(self.qiqj, self.kappa, self.rcutsq).0;
        }

        Some(PairInteraction { force_divr, energy })
    }
}
