#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// Got an invalid parameter value in a function
    InvalidParameter(String),
    /// A particle type index is outside of the range of known types
    UnknownType {
        /// the invalid type index
        type_index: usize,
        /// the number of types known to the object raising the error
        types_count: usize,
    },
    /// The requested log quantity is not provided by this object
    UnsupportedQuantity(String),
    /// The simulation box shape is not supported by this object
    UnsupportedBox(String),
    /// Error while serializing/deserializing data
    Json(serde_json::Error),
    /// Error used for invalid use of the API, or other unexpected conditions
    Internal(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidParameter(e) => write!(f, "invalid parameter: {}", e),
            Error::UnknownType { type_index, types_count } => write!(f,
                "unknown particle type {}, there are only {} types", type_index, types_count
            ),
            Error::UnsupportedQuantity(name) => write!(f, "unsupported log quantity: '{}'", name),
            Error::UnsupportedBox(e) => write!(f, "unsupported simulation box: {}", e),
            Error::Json(e) => write!(f, "json error: {}", e),
            Error::Internal(e) => write!(f, "internal error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidParameter(_) |
            Error::UnknownType { .. } |
            Error::UnsupportedQuantity(_) |
            Error::UnsupportedBox(_) |
            Error::Internal(_) => None,
            Error::Json(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Error {
        Error::Json(error)
    }
}

/// Check that `type_index` is a valid type when there are `types_count` types
pub(crate) fn check_type(type_index: usize, types_count: usize) -> Result<(), Error> {
    if type_index >= types_count {
        return Err(Error::UnknownType { type_index, types_count });
    }
    Ok(())
}
