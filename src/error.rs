use thiserror::Error;

/// Top-level error type for contour extraction.
#[derive(Debug, Error)]
pub enum ContourError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to mesh topology.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("degenerate face: {0}")]
    DegenerateFace(String),

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Errors related to per-vertex weight fields.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("weight group '{name}' used for contouring does not exist")]
    MissingContourField { name: String },

    #[error("weight array has {actual} values, mesh has {expected} vertices")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("weight {value} at index {index} is not finite")]
    NonFinite { index: usize, value: f64 },
}

/// Errors related to contouring operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("there are no values in the chosen range")]
    NoCurvesProduced,
}

/// Convenience type alias for results using [`ContourError`].
pub type Result<T> = std::result::Result<T, ContourError>;
