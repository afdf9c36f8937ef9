//! Regular 3D simulation mesh.
//!
//! The mesh is immutable for the lifetime of the components that reference
//! it. Memory layout is z-major (z varies slowest):
//! `index = z * (nx * ny) + y * nx + x`.

use crate::error::{GeomError, Result};

/// Fixed-size 3D grid with cell dimensions and an index-to-coordinate map.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    size: [usize; 3],
    cell_size: [f64; 3],
}

impl Mesh {
    /// Create a mesh of `size` cells with physical `cell_size` spacing.
    pub fn new(size: [usize; 3], cell_size: [f64; 3]) -> Result<Self> {
        if size.iter().any(|&n| n == 0) {
            return Err(GeomError::InvalidMesh(format!(
                "mesh size must be positive in every axis, got {size:?}"
            )));
        }
        if cell_size.iter().any(|&c| c.is_nan() || c <= 0.0) {
            return Err(GeomError::InvalidMesh(format!(
                "cell size must be positive in every axis, got {cell_size:?}"
            )));
        }
        Ok(Self { size, cell_size })
    }

    /// Grid dimensions as `[nx, ny, nz]`.
    #[inline]
    pub fn size(&self) -> [usize; 3] {
        self.size
    }

    /// Cell spacing as `[cx, cy, cz]`.
    #[inline]
    pub fn cell_size(&self) -> [f64; 3] {
        self.cell_size
    }

    /// Total number of cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.size[0] * self.size[1] * self.size[2]
    }

    /// Convert integer cell indices to the linear z-major index.
    #[inline]
    pub fn index(&self, ix: usize, iy: usize, iz: usize) -> usize {
        (iz * self.size[1] + iy) * self.size[0] + ix
    }

    /// Continuous coordinates of the center of cell `(ix, iy, iz)`.
    ///
    /// The mesh is centered on the origin: cell `i` along an axis of `n`
    /// cells sits at `(i - (n - 1) / 2) * cell_size`.
    #[inline]
    pub fn cell_center(&self, ix: usize, iy: usize, iz: usize) -> (f64, f64, f64) {
        (
            (ix as f64 - 0.5 * (self.size[0] - 1) as f64) * self.cell_size[0],
            (iy as f64 - 0.5 * (self.size[1] - 1) as f64) * self.cell_size[1],
            (iz as f64 - 0.5 * (self.size[2] - 1) as f64) * self.cell_size[2],
        )
    }
}
