//! Error types for geometry and averaging operations.

use thiserror::Error;

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, GeomError>;

/// Errors that can occur while masking a mesh or averaging over it.
#[derive(Error, Debug)]
pub enum GeomError {
    /// The shape predicate selected zero cells. A run cannot proceed with
    /// an empty geometry; the embedding treats this as fatal.
    #[error("Geometry is completely empty: shape selects no cells")]
    EmptyGeometry,

    /// Shifting by zero cells is a contract violation, not a no-op.
    #[error("Shift by zero cells violates the shift contract")]
    ZeroShift,

    /// An average was requested over zero occupied volume.
    #[error("Average over zero volume: mask or region fraction is empty")]
    EmptyVolume,

    /// Mesh construction parameters are invalid.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// A mask exists without a retained shape; the edge band of a shifted
    /// mask cannot be re-evaluated.
    #[error("No shape retained for edge re-evaluation")]
    NoShape,

    /// Device layer error.
    #[error("Device error: {0}")]
    Core(#[from] voxkernel_core::CoreError),
}
