//! # VoxKernel Core
//!
//! Device buffer, pool and reduction primitives for regular-mesh field
//! solvers.
//!
//! This crate provides the memory layer consumed by the geometry and
//! averaging core in `voxkernel-geom`:
//!
//! - [`DeviceBuffer`] - linear device-resident storage with host-mapped access
//! - [`DeviceField`] - multi-component scalar field over one cell count (SoA)
//! - [`BufferPool`] - free-list pool with RAII [`PooledBuffer`] guards
//! - [`reduce`] - scalar reductions (`sum`, `dot`) read back to the host
//! - [`transform`] - whole-cell axis shift and out-of-volume zeroing
//!
//! All operations assume a single logical device memory space. Buffers are
//! host-mapped: reductions and `as_slice` views act as the synchronization
//! points at which device contents become host-visible.
//!
//! # Example
//!
//! ```
//! use voxkernel_core::prelude::*;
//!
//! let mut buf = DeviceBuffer::<f32>::alloc(64)?;
//! buf.fill(0.5);
//! assert_eq!(reduce::sum(&buf), 32.0);
//! # Ok::<(), voxkernel_core::CoreError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod buffer;
pub mod error;
pub mod pool;
pub mod reduce;
pub mod transform;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::buffer::{DeviceBuffer, DeviceField};
    pub use crate::error::{CoreError, Result};
    pub use crate::pool::{BufferPool, PooledBuffer};
    pub use crate::{reduce, transform};
}

// Re-exports
pub use buffer::{DeviceBuffer, DeviceField};
pub use error::{CoreError, Result};
pub use pool::{BufferPool, PooledBuffer};
