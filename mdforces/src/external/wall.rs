use crate::{Error, Quaternion, UnitCell, Vector3D};
use super::ExternalPotential;

/// A hard spherical wall confining particles inside a sphere.
///
/// Trial positions outside of the sphere have an infinite energy, and all
/// other positions a zero energy.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SphericalWall {
    /// Center of the sphere
    pub center: Vector3D,
    /// Radius of the sphere
    pub radius: f64,
}

impl SphericalWall {
    /// Create a new spherical wall with the given `center` and `radius`
    pub fn new(center: Vector3D, radius: f64) -> Result<SphericalWall, Error> {
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "the radius of a spherical wall must be positive, got {}", radius
            )));
        }

        Ok(SphericalWall { center, radius })
    }

    /// Is the given position inside the wall?
    pub fn contains(&self, position: Vector3D) -> bool {
        (position - self.center).norm2() <= self.radius * self.radius
    }
}

impl ExternalPotential for SphericalWall {
    fn name(&self) -> String {
        "spherical_wall".into()
    }

    fn particle_energy(
        &self,
        _: &UnitCell,
        _: usize,
        position: Vector3D,
        _: Quaternion,
        _: f64,
        trial: bool,
    ) -> Result<f64, Error> {
        if trial && !self.contains(position) {
            return Ok(f64::INFINITY);
        }
        return Ok(0.0);
    }
}
