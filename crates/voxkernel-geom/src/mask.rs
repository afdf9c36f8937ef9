//! Fill-fraction mask buffer lifecycle.
//!
//! The mask is a per-cell scalar in `[0, 1]` giving the fraction of the
//! cell occupied by the simulated object. The common unmasked case carries
//! no allocation at all: a `Uniform` mask means every cell is fully filled.
//! Consumers branch on the tag, never on buffer content.

use voxkernel_core::{DeviceBuffer, Result as CoreResult};

/// The two mask representations.
enum MaskState {
    /// Every cell implicitly filled (value 1). No device allocation.
    Uniform,
    /// Explicit per-cell fill fractions, with a private host mirror used as
    /// scratch during rasterization.
    Explicit {
        device: DeviceBuffer<f32>,
        host: Vec<f32>,
    },
}

/// Owner of the optional device-resident fill-fraction field.
///
/// The `Uniform -> Explicit` transition happens exactly once per geometry
/// lifetime; once allocated, the buffer is only overwritten in place.
pub struct MaskBuffer {
    state: MaskState,
}

impl MaskBuffer {
    /// A fully-filled mask with no allocation.
    pub fn new() -> Self {
        Self {
            state: MaskState::Uniform,
        }
    }

    /// Whether the mask is the implicit fully-filled one.
    pub fn is_uniform(&self) -> bool {
        matches!(self.state, MaskState::Uniform)
    }

    /// The explicit device mask, if one has been allocated.
    pub fn device(&self) -> Option<&DeviceBuffer<f32>> {
        match &self.state {
            MaskState::Uniform => None,
            MaskState::Explicit { device, .. } => Some(device),
        }
    }

    /// Mutable access to the explicit device mask, if allocated.
    pub(crate) fn device_mut(&mut self) -> Option<&mut DeviceBuffer<f32>> {
        match &mut self.state {
            MaskState::Uniform => None,
            MaskState::Explicit { device, .. } => Some(device),
        }
    }

    /// Allocate the device buffer and host mirror on first use, then hand
    /// out both for rasterization. Subsequent calls reuse the allocation.
    pub(crate) fn ensure_allocated(
        &mut self,
        cell_count: usize,
    ) -> CoreResult<(&mut DeviceBuffer<f32>, &mut Vec<f32>)> {
        if matches!(self.state, MaskState::Uniform) {
            self.state = MaskState::Explicit {
                device: DeviceBuffer::alloc(cell_count)?,
                host: vec![0.0; cell_count],
            };
        }
        match &mut self.state {
            MaskState::Explicit { device, host } => Ok((device, host)),
            MaskState::Uniform => unreachable!("mask allocated above"),
        }
    }

    /// Snapshot of the fill fractions, materializing the implicit uniform
    /// fill when no buffer exists.
    pub fn snapshot(&self, cell_count: usize) -> Vec<f32> {
        match &self.state {
            MaskState::Uniform => vec![1.0; cell_count],
            MaskState::Explicit { device, .. } => device.as_slice().to_vec(),
        }
    }
}

impl Default for MaskBuffer {
    fn default() -> Self {
        Self::new()
    }
}
