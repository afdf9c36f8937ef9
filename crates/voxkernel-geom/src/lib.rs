//! # VoxKernel Geom
//!
//! Masked, volume-weighted aggregation and geometric masking over a regular
//! 3D simulation mesh.
//!
//! Many cells of a simulation mesh may be only partially inside the
//! simulated object. This crate maintains a per-cell fill-fraction mask
//! rasterized from a [`Shape`] predicate, translates the mask incrementally
//! when the simulation window moves, and averages arbitrary device fields
//! with the correct volume weighting.
//!
//! ## Components
//!
//! - [`Mesh`] - fixed-size 3D grid with an index-to-coordinate mapping
//! - [`Shape`] - pure predicate `(x, y, z) -> bool` defining "inside"
//! - [`Geometry`] - builds and translates the fill-fraction mask,
//!   re-normalizing registered fields on every change
//! - [`average`] - per-component, mask-weighted volume averages
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use voxkernel_core::DeviceField;
//! use voxkernel_geom::prelude::*;
//!
//! let mesh = Arc::new(Mesh::new([4, 4, 4], [1e-9, 1e-9, 1e-9])?);
//! let mut geom = Geometry::new(Arc::clone(&mesh));
//!
//! // Left half of the domain.
//! geom.set_geom(Shape::new(|x, _, _| x < 0.0))?;
//! assert_eq!(geom.space_fill(), 0.5);
//!
//! let mut field = DeviceField::alloc(3, mesh.cell_count())?;
//! field.set_uniform(&[1.0, 0.0, 0.0])?;
//!
//! // Weighting cancels for a uniform field: the average is exact.
//! let avg = average(&geom, &field)?;
//! assert_eq!(avg, vec![1.0, 0.0, 0.0]);
//! # Ok::<(), voxkernel_geom::GeomError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod average;
pub mod error;
pub mod geometry;
pub mod mask;
pub mod mesh;
pub mod shape;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::average::{average, Quantity};
    pub use crate::error::{GeomError, Result};
    pub use crate::geometry::{Geometry, NormalizeTarget};
    pub use crate::mask::MaskBuffer;
    pub use crate::mesh::Mesh;
    pub use crate::shape::Shape;
}

// Re-exports
pub use average::{average, Quantity};
pub use error::{GeomError, Result};
pub use geometry::{Geometry, NormalizeTarget};
pub use mask::MaskBuffer;
pub use mesh::Mesh;
pub use shape::Shape;
