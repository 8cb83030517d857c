//! Implementations of `PairEvaluator` for common pair potentials.
//!
//! All evaluators ignore the `energy_shift` request when their parameters make
//! the interaction vanish, and return `None` in this case.

mod lennard_jones;
pub use self::lennard_jones::{LennardJones, LennardJonesParameters};

mod inverse_power;
pub use self::inverse_power::{InversePower, InversePowerParameters};

mod gaussian;
pub use self::gaussian::{Gaussian, GaussianParameters};

mod yukawa;
pub use self::yukawa::{Yukawa, YukawaParameters};

mod shifted_lj;
pub use self::shifted_lj::{ShiftedLennardJones, ShiftedLennardJonesParameters};

mod screened_coulomb;
pub use self::screened_coulomb::{ScreenedCoulomb, ScreenedCoulombParameters};
