//! Geometry controller: mask (re)computation and incremental translation.
//!
//! [`Geometry`] owns the fill-fraction mask exclusively. It rasterizes a
//! [`Shape`] over the mesh, translates the mask by whole cells when the
//! simulation window moves, and re-zeroes registered fields outside the
//! active volume after every geometry change.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use voxkernel_core::{reduce, transform, BufferPool, DeviceBuffer, DeviceField};

use crate::error::{GeomError, Result};
use crate::mask::MaskBuffer;
use crate::mesh::Mesh;
use crate::shape::Shape;

/// Shared handle to a field that must be re-normalized on geometry change.
///
/// Fields are externally owned; the controller keeps a registered list
/// instead of reaching into global state.
pub type NormalizeTarget = Arc<RwLock<DeviceField>>;

/// Orchestrates mask computation from a shape predicate and incremental
/// translation of the mask.
pub struct Geometry {
    mesh: Arc<Mesh>,
    pool: Arc<BufferPool>,
    mask: MaskBuffer,
    /// Shape that defined the current mask, retained so a translated mask
    /// can be repaired against the original definition.
    shape: Option<Shape>,
    /// Accumulated window translation along X, in cells. Folded into the
    /// coordinate mapping so edge repair sees the moved frame.
    window_shift: i64,
    targets: Vec<NormalizeTarget>,
}

impl Geometry {
    /// Create an unmasked geometry over `mesh` (every cell fully filled).
    pub fn new(mesh: Arc<Mesh>) -> Self {
        let pool = Arc::new(BufferPool::new(mesh.cell_count(), 2));
        Self::with_pool(mesh, pool)
    }

    /// Create a geometry sharing an existing scratch buffer pool.
    pub fn with_pool(mesh: Arc<Mesh>, pool: Arc<BufferPool>) -> Self {
        Self {
            mesh,
            pool,
            mask: MaskBuffer::new(),
            shape: None,
            window_shift: 0,
            targets: Vec::new(),
        }
    }

    /// The mesh this geometry is defined over.
    #[inline]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// The explicit device mask, or `None` while every cell is fully filled.
    #[inline]
    pub fn mask(&self) -> Option<&DeviceBuffer<f32>> {
        self.mask.device()
    }

    /// Register a field to be re-zeroed outside the mask after every
    /// geometry change.
    pub fn register_target(&mut self, target: NormalizeTarget) {
        self.targets.push(target);
    }

    /// Coordinates of cell `(ix, iy, iz)` in the current (possibly moved)
    /// frame.
    #[inline]
    pub fn cell_center(&self, ix: usize, iy: usize, iz: usize) -> (f64, f64, f64) {
        let (x, y, z) = self.mesh.cell_center(ix, iy, iz);
        (
            x + self.window_shift as f64 * self.mesh.cell_size()[0],
            y,
            z,
        )
    }

    /// Install or replace the active geometry.
    ///
    /// Rasterizes the predicate over the whole mesh and uploads the result
    /// in one bulk transfer. Fails with [`GeomError::EmptyGeometry`] if the
    /// shape selects no cells, in which case no state is mutated.
    pub fn set_geom(&mut self, shape: Shape) -> Result<()> {
        let [nx, ny, nz] = self.mesh.size();
        let mut raster = vec![0.0f32; self.mesh.cell_count()];
        let mut filled = 0usize;

        // z outer, y middle, x inner: matches the buffer layout.
        for iz in 0..nz {
            for iy in 0..ny {
                for ix in 0..nx {
                    let (x, y, z) = self.cell_center(ix, iy, iz);
                    if shape.inside(x, y, z) {
                        raster[self.mesh.index(ix, iy, iz)] = 1.0;
                        filled += 1;
                    }
                }
            }
        }

        if filled == 0 {
            return Err(GeomError::EmptyGeometry);
        }

        let (device, host) = self.mask.ensure_allocated(self.mesh.cell_count())?;
        host.copy_from_slice(&raster);
        device.copy_from_host(host)?;
        self.shape = Some(shape);

        info!(
            filled,
            total = self.mesh.cell_count(),
            fill = filled as f64 / self.mesh.cell_count() as f64,
            "geometry installed"
        );

        self.normalize_targets()
    }

    /// Translate the mask by `dx` whole cells along X.
    ///
    /// Cells sliding off one edge are discarded; cells exposed at the other
    /// edge are provisionally filled with 1 and then re-evaluated against
    /// the retained shape in the moved frame. Only the exposed band of
    /// width `|dx|` is re-rasterized, `O(ny * nz * |dx|)` work instead of a
    /// full volume scan.
    pub fn shift(&mut self, dx: i64) -> Result<()> {
        if dx == 0 {
            return Err(GeomError::ZeroShift);
        }

        // A uniform fill is shift-invariant.
        if self.mask.is_uniform() {
            debug!(dx, "shift of unmasked geometry is a no-op");
            return Ok(());
        }

        let shape = self.shape.clone().ok_or(GeomError::NoShape)?;
        let [nx, ny, nz] = self.mesh.size();

        // The window moves against the data shift; coordinates computed
        // below already account for it.
        self.window_shift -= dx;

        {
            let pool = Arc::clone(&self.pool);
            let mut scratch = pool.acquire()?;
            if let Some(mask) = self.mask.device_mut() {
                transform::shift_x(&mut scratch, mask, [nx, ny, nz], dx, 1.0, 1.0)?;
                mask.copy_from(&scratch)?;
            }
        }

        // Re-evaluate true occupancy of the newly exposed edge band. The
        // provisional 1-fill above must already be in place: cells the
        // shape still accepts keep it, the rest are zeroed here.
        let (x1, x2) = if dx < 0 {
            ((nx as i64 + dx).max(0) as usize, nx)
        } else {
            (0, (dx as usize).min(nx))
        };

        let mut rejected = Vec::new();
        for iz in 0..nz {
            for iy in 0..ny {
                for ix in x1..x2 {
                    let (x, y, z) = self.cell_center(ix, iy, iz);
                    if !shape.inside(x, y, z) {
                        rejected.push(self.mesh.index(ix, iy, iz));
                    }
                }
            }
        }
        if let Some(mask) = self.mask.device_mut() {
            // Per-cell writes are slow but confined to the edge band.
            for &idx in &rejected {
                mask.write(idx, 0.0)?;
            }
        }

        debug!(
            dx,
            band = x2 - x1,
            rezeroed = rejected.len(),
            window_shift = self.window_shift,
            "mask shifted"
        );

        self.normalize_targets()
    }

    /// Fraction of the mesh volume actually occupied: mean mask value, or
    /// exactly 1 while unmasked. Reads a scalar back to the host.
    pub fn space_fill(&self) -> f64 {
        match self.mask.device() {
            None => 1.0,
            Some(mask) => reduce::sum(mask) / self.mesh.cell_count() as f64,
        }
    }

    /// Read-only snapshot of the per-cell fill fractions, for inspection
    /// and output.
    pub fn fill_fraction(&self) -> Vec<f32> {
        self.mask.snapshot(self.mesh.cell_count())
    }

    /// Zero every registered field outside the mask.
    fn normalize_targets(&self) -> Result<()> {
        let Some(mask) = self.mask.device() else {
            return Ok(());
        };
        for target in &self.targets {
            let mut field = target.write();
            transform::zero_where_empty(&mut field, mask)?;
        }
        Ok(())
    }
}
