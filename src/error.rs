use thiserror::Error;

/// Top-level error type for the boardstep exporter.
#[derive(Debug, Error)]
pub enum BoardStepError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Outline(#[from] OutlineError),

    #[error(transparent)]
    Step(#[from] StepError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to topological operations.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),
}

/// Errors related to the board outline input.
#[derive(Debug, Error)]
pub enum OutlineError {
    #[error("outline has no contours")]
    Empty,

    #[error("polygonal contour needs at least 3 points, got {0}")]
    TooFewPoints(usize),

    #[error("circular contour radius must be positive, got {0}")]
    InvalidRadius(f64),

    #[error("extrusion thickness must be positive, got {0}")]
    InvalidThickness(f64),
}

/// Errors raised while writing a STEP document.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("failed to write STEP output: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for results using [`BoardStepError`].
pub type Result<T> = std::result::Result<T, BoardStepError>;
