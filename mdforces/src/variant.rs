use crate::Error;

/// A scalar quantity changing with the simulation time step
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields, tag = "type")]
pub enum Variant {
    /// A constant value
    Constant {
        value: f64,
    },
    /// Linear interpolation from `a` to `b` over `t_ramp` steps, starting at
    /// `t_start`
    Ramp {
        a: f64,
        b: f64,
        t_start: u64,
        t_ramp: u64,
    },
    /// Periodic cycle: hold `a` for `t_a` steps, ramp to `b` over `t_up`
    /// steps, hold `b` for `t_b` steps, and ramp back to `a` over `t_down`
    /// steps. The value is `a` before `t_start`.
    Cycle {
        a: f64,
        b: f64,
        t_start: u64,
        t_a: u64,
        t_up: u64,
        t_b: u64,
        t_down: u64,
    },
    /// Go from `a` to `b` over `t_ramp` steps, starting at `t_start`,
    /// interpolating linearly `value^(1/power)`.
    Power {
        a: f64,
        b: f64,
        power: f64,
        t_start: u64,
        t_ramp: u64,
    },
}

impl From<f64> for Variant {
    fn from(value: f64) -> Variant {
        Variant::Constant { value }
    }
}

/// Total length of a cycle, saturating at `u64::MAX`
fn cycle_period(t_a: u64, t_up: u64, t_b: u64, t_down: u64) -> u64 {
    t_a.saturating_add(t_up).saturating_add(t_b).saturating_add(t_down)
}

fn interpolate(a: f64, b: f64, step: u64, length: u64) -> f64 {
    a + (b - a) * (step as f64 / length as f64)
}

impl Variant {
    /// Check that this variant is well defined
    pub fn validate(&self) -> Result<(), Error> {
        match *self {
            Variant::Constant { .. } | Variant::Ramp { .. } => Ok(()),
            Variant::Cycle { t_a, t_up, t_b, t_down, .. } => {
                if cycle_period(t_a, t_up, t_b, t_down) == 0 {
                    return Err(Error::InvalidParameter(
                        "the period of a cycle variant must be larger than zero".into()
                    ));
                }
                Ok(())
            }
            Variant::Power { a, b, power, .. } => {
                if power == 0.0 || !power.is_finite() {
                    return Err(Error::InvalidParameter(format!(
                        "the power of a power variant must be a non-zero finite number, got {}", power
                    )));
                }

                if a < 0.0 || b < 0.0 {
                    return Err(Error::InvalidParameter(
                        "the values of a power variant must be positive".into()
                    ));
                }
                Ok(())
            }
        }
    }

    /// Evaluate this variant at the given time step
    pub fn value(&self, step: u64) -> f64 {
        match *self {
            Variant::Constant { value } => value,
            Variant::Ramp { a, b, t_start, t_ramp } => {
                if step < t_start {
                    a
                } else if step >= t_start.saturating_add(t_ramp) {
                    b
                } else {
                    interpolate(a, b, step - t_start, t_ramp)
                }
            }
            Variant::Cycle { a, b, t_start, t_a, t_up, t_b, t_down } => {
                if step < t_start {
                    return a;
                }

                let period = cycle_period(t_a, t_up, t_b, t_down);
                if period == 0 {
                    return a;
                }
                let step = (step - t_start) % period;
                if step < t_a {
                    a
                } else if step < t_a.saturating_add(t_up) {
                    interpolate(a, b, step - t_a, t_up)
                } else if step < t_a.saturating_add(t_up).saturating_add(t_b) {
                    b
                } else {
                    interpolate(b, a, step - t_a - t_up - t_b, t_down)
                }
            }
            Variant::Power { a, b, power, t_start, t_ramp } => {
                if step < t_start {
                    a
                } else if step >= t_start.saturating_add(t_ramp) {
                    b
                } else {
                    let inv_a = f64::powf(a, 1.0 / power);
                    let inv_b = f64::powf(b, 1.0 / power);
                    let value = interpolate(inv_a, inv_b, step - t_start, t_ramp);
                    f64::powf(value, power)
                }
            }
        }
    }
}
