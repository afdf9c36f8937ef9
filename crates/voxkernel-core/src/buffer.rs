//! Device-resident buffers and multi-component fields.
//!
//! [`DeviceBuffer`] models a linear allocation in the single logical device
//! memory space. Storage is host-mapped: the contents become host-visible at
//! synchronization points (any reduction, `copy_to_host`, or an `as_slice`
//! view). All kernels are issued and retired in program order from one
//! logical caller, so no additional fencing is required here.

use bytemuck::{Pod, Zeroable};

use crate::error::{CoreError, Result};

/// Linear device-resident storage with a fixed element count.
///
/// Allocation is zero-initialized. Buffers are never resized; they are
/// overwritten in place for the lifetime of the owning component.
#[derive(Debug, Clone)]
pub struct DeviceBuffer<T: Pod> {
    data: Vec<T>,
}

impl<T: Pod> DeviceBuffer<T> {
    /// Allocate a zero-initialized buffer for `len` elements.
    pub fn alloc(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(CoreError::AllocationFailed {
                size: 0,
                reason: "cannot allocate zero-sized buffer".to_string(),
            });
        }
        Ok(Self {
            data: vec![T::zeroed(); len],
        })
    }

    /// Allocate and upload host data in one step.
    pub fn from_host(data: &[T]) -> Result<Self> {
        let mut buf = Self::alloc(data.len())?;
        buf.copy_from_host(data)?;
        Ok(buf)
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// A zero-length buffer cannot be constructed; always false.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Fill every element with `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Bulk host-to-device transfer. Lengths must match exactly.
    pub fn copy_from_host(&mut self, data: &[T]) -> Result<()> {
        self.check_len(data.len())?;
        self.data.copy_from_slice(data);
        Ok(())
    }

    /// Bulk device-to-host transfer. Lengths must match exactly.
    ///
    /// This is a synchronization point: all prior device work on this
    /// buffer is visible in `data` afterwards.
    pub fn copy_to_host(&self, data: &mut [T]) -> Result<()> {
        self.check_len(data.len())?;
        data.copy_from_slice(&self.data);
        Ok(())
    }

    /// Device-to-device copy. Lengths must match exactly.
    pub fn copy_from(&mut self, src: &DeviceBuffer<T>) -> Result<()> {
        self.check_len(src.len())?;
        self.data.copy_from_slice(&src.data);
        Ok(())
    }

    /// Read a single element back to the host.
    pub fn read(&self, idx: usize) -> Result<T> {
        self.data
            .get(idx)
            .copied()
            .ok_or(CoreError::InvalidIndex(idx))
    }

    /// Write a single element.
    ///
    /// Per-cell writes are the slow path; prefer bulk transfers for anything
    /// larger than an edge band.
    pub fn write(&mut self, idx: usize, value: T) -> Result<()> {
        match self.data.get_mut(idx) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(CoreError::InvalidIndex(idx)),
        }
    }

    /// Host-visible view of the buffer contents.
    ///
    /// Valid at synchronization points only; callers must not hold the view
    /// across device mutations they issue themselves.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable host-visible view, used by device-side transforms.
    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    fn check_len(&self, actual: usize) -> Result<()> {
        if actual != self.data.len() {
            return Err(CoreError::SizeMismatch {
                expected: self.data.len(),
                actual,
            });
        }
        Ok(())
    }
}

/// Multi-component scalar field sharing one cell count (SoA layout).
///
/// Component `i` is an independent [`DeviceBuffer<f32>`]; a vector field
/// over a mesh is `ncomp = 3` buffers of `cell_count` elements each.
#[derive(Debug)]
pub struct DeviceField {
    comps: Vec<DeviceBuffer<f32>>,
    len: usize,
}

impl DeviceField {
    /// Allocate a zero-initialized field with `ncomp` components of `len`
    /// cells each.
    pub fn alloc(ncomp: usize, len: usize) -> Result<Self> {
        if ncomp == 0 {
            return Err(CoreError::invalid_argument(
                "field must have at least one component",
            ));
        }
        let comps = (0..ncomp)
            .map(|_| DeviceBuffer::alloc(len))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { comps, len })
    }

    /// Number of components.
    #[inline]
    pub fn ncomp(&self) -> usize {
        self.comps.len()
    }

    /// Cell count shared by every component.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the field holds zero cells (never true for a constructed field).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Component `i`.
    #[inline]
    pub fn comp(&self, i: usize) -> &DeviceBuffer<f32> {
        &self.comps[i]
    }

    /// Mutable component `i`.
    #[inline]
    pub fn comp_mut(&mut self, i: usize) -> &mut DeviceBuffer<f32> {
        &mut self.comps[i]
    }

    /// Set every cell to the given per-component values.
    ///
    /// `values.len()` must equal the component count.
    pub fn set_uniform(&mut self, values: &[f32]) -> Result<()> {
        if values.len() != self.comps.len() {
            return Err(CoreError::SizeMismatch {
                expected: self.comps.len(),
                actual: values.len(),
            });
        }
        for (comp, &v) in self.comps.iter_mut().zip(values) {
            comp.fill(v);
        }
        Ok(())
    }
}
