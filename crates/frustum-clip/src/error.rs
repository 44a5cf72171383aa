use thiserror::Error;

/// Result type for frustum and clipping operations
pub type Result<T> = std::result::Result<T, GeometryError>;

/// Precondition violations reported by the public entry points.
///
/// Degenerate geometry (a clip leaving fewer than three vertices) is not an
/// error; it turns the frustum into the empty state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Index {index} out of range for {len} elements")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Mismatched array lengths: expected {expected}, got {actual}")]
    MismatchedArrayLengths { expected: usize, actual: usize },

    #[error("Need at least 3 vertices, got {count}")]
    TooFewVertices { count: usize },

    #[error("Plane normal cannot be zero")]
    DegeneratePlane,
}
