use crate::Error;

/// Objects providing scalar quantities to be recorded in simulation logs
pub trait Loggable {
    /// Get the names of all the quantities this object can provide
    fn log_quantities(&self) -> Vec<String>;

    /// Get the current value of the quantity with the given `name`. This
    /// fails with `Error::UnsupportedQuantity` if `name` is not one of the
    /// names returned by `log_quantities`.
    fn log_value(&self, name: &str) -> Result<f64, Error>;
}
