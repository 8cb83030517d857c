use crate::{Error, Quaternion, UnitCell, Vector3D};
use super::ExternalPotential;

/// Parameters for [`LinearField`]
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LinearFieldParameters {
    /// A point on the plane where the energy is zero
    pub plane_origin: Vector3D,
    /// Normal to the plane where the energy is zero. The field increases
    /// along this direction.
    pub plane_normal: Vector3D,
    /// Strength of the field for each particle type
    pub alpha: Vec<f64>,
}

/// A field increasing linearly with the distance to a plane:
/// `E = alpha[type] * n · (r - r_0)`
#[derive(Debug, Clone)]
pub struct LinearField {
    parameters: LinearFieldParameters,
}

impl LinearField {
    /// Create a new linear field for `types_count` types, with all `alpha`
    /// set to zero
    pub fn new(types_count: usize, plane_origin: Vector3D, plane_normal: Vector3D) -> Result<LinearField, Error> {
        return LinearField::with_parameters(LinearFieldParameters {
            plane_origin: plane_origin,
            plane_normal: plane_normal,
            alpha: vec![0.0; types_count],
        });
    }

    /// Create a new linear field from the given parameters
    pub fn with_parameters(parameters: LinearFieldParameters) -> Result<LinearField, Error> {
        let normal = parameters.plane_normal;
        if !(normal.norm2() > 0.0 && normal.norm2().is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "the plane normal of a linear field must be a finite non-zero vector, got {:?}", normal.as_array()
            )));
        }

        if parameters.alpha.iter().any(|alpha| !alpha.is_finite()) {
            return Err(Error::InvalidParameter("alpha must be finite for a linear field".into()));
        }

        Ok(LinearField { parameters })
    }

    /// Get the parameters of this field
    pub fn parameters(&self) -> &LinearFieldParameters {
        &self.parameters
    }

    /// Set the strength of the field for the given particle type
    pub fn set_alpha(&mut self, particle_type: usize, alpha: f64) -> Result<(), Error> {
        crate::check_type(particle_type, self.parameters.alpha.len())?;
        if !alpha.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "alpha must be finite for a linear field, got {}", alpha
            )));
        }
        self.parameters.alpha[particle_type] = alpha;
        Ok(())
    }

    /// Get the strength of the field for the given particle type
    pub fn alpha(&self, particle_type: usize) -> Result<f64, Error> {
        crate::check_type(particle_type, self.parameters.alpha.len())?;
        Ok(self.parameters.alpha[particle_type])
    }
}

impl ExternalPotential for LinearField {
    fn name(&self) -> String {
        "linear".into()
    }

    fn particle_energy(
        &self,
        _: &UnitCell,
        particle_type: usize,
        position: Vector3D,
        _: Quaternion,
        _: f64,
        _: bool,
    ) -> Result<f64, Error> {
        let alpha = self.alpha(particle_type)?;
        return Ok(alpha * (self.parameters.plane_normal * (position - self.parameters.plane_origin)));
    }
}
