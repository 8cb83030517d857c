/// How pair energies are modified close to the cutoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
pub enum EnergyShiftMode {
    /// The energy is used as-is, and jumps to zero at the cutoff
    #[serde(rename = "none")]
    NoShift,
    /// A constant is subtracted from the energy so that it goes to zero at
    /// the cutoff. Forces are not modified.
    #[serde(rename = "shift")]
    Shift,
    /// Both the energy and forces are smoothly switched to zero between the
    /// switching radius `r_on` and the cutoff, using the XPLOR switching
    /// function. If `r_on` is larger than the cutoff, this behaves like
    /// `Shift`.
    #[serde(rename = "xplor")]
    Xplor,
}

impl Default for EnergyShiftMode {
    fn default() -> EnergyShiftMode {
        EnergyShiftMode::NoShift
    }
}

impl EnergyShiftMode {
    /// Should the evaluator shift the energy to zero at the cutoff for a type
    /// pair with the given squared switching radius and cutoff?
    #[inline]
    pub fn shifts_energy(self, ronsq: f64, rcutsq: f64) -> bool {
        match self {
            EnergyShiftMode::NoShift => false,
            EnergyShiftMode::Shift => true,
            EnergyShiftMode::Xplor => ronsq > rcutsq,
        }
    }

    /// Should the XPLOR switching function be applied to a pair at squared
    /// distance `rsq`?
    #[inline]
    pub fn smooths(self, rsq: f64, ronsq: f64, rcutsq: f64) -> bool {
        self == EnergyShiftMode::Xplor && rsq >= ronsq && ronsq < rcutsq
    }
}

/// Value of the XPLOR switching function `s` and of `(ds/dr) / r` for a pair
/// at squared distance `rsq`, when switching between `ronsq` and `rcutsq`.
///
/// `s` goes from 1 at `r_on` to 0 at the cutoff, and both its first
/// derivatives are zero at these points.
#[inline]
pub fn xplor_switch(rsq: f64, ronsq: f64, rcutsq: f64) -> (f64, f64) {
    let rcut_minus_r = rcutsq - rsq;
    let denom = (rcutsq - ronsq) * (rcutsq - ronsq) * (rcutsq - ronsq);

    let s = rcut_minus_r * rcut_minus_r * (rcutsq + 2.0 * rsq - 3.0 * ronsq) / denom;
    let dsdr_over_r = 12.0 * (rsq - ronsq) * (rsq - rcutsq) / denom;

    return (s, dsdr_over_r);
}

/// Apply the XPLOR switching function to the output of a pair evaluator,
/// returning the modified `(force_divr, energy)`.
#[inline]
pub fn apply_xplor(rsq: f64, ronsq: f64, rcutsq: f64, force_divr: f64, energy: f64) -> (f64, f64) {
    let (s, dsdr_over_r) = xplor_switch(rsq, ronsq, rcutsq);
    let force_divr = s * force_divr - dsdr_over_r * energy;
    let energy = s * energy;
    return (force_divr, energy);
}
