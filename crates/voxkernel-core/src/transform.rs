//! Device-side transforms over z-major 3D cell buffers.
//!
//! Layout convention matches the rest of the workspace: z varies slowest,
//! `index = z * (nx * ny) + y * nx + x`.

use rayon::prelude::*;

use crate::buffer::{DeviceBuffer, DeviceField};
use crate::error::{CoreError, Result};

/// Translate `src` by `dx` whole cells along X into `dst`.
///
/// Cells that slide past an edge are discarded. Newly exposed cells take
/// `fill_lo` on the low-X side (exposed when `dx > 0`) or `fill_hi` on the
/// high-X side (exposed when `dx < 0`).
///
/// `dst` and `src` must both cover `dims` exactly, and must be distinct
/// buffers; callers shift through a pooled scratch copy.
pub fn shift_x(
    dst: &mut DeviceBuffer<f32>,
    src: &DeviceBuffer<f32>,
    dims: [usize; 3],
    dx: i64,
    fill_lo: f32,
    fill_hi: f32,
) -> Result<()> {
    let [nx, ny, nz] = dims;
    let cell_count = nx * ny * nz;
    check_volume(dst.len(), cell_count)?;
    check_volume(src.len(), cell_count)?;

    let slice_size = nx * ny;
    let src_cells = src.as_slice();

    dst.as_mut_slice()
        .par_chunks_mut(slice_size)
        .enumerate()
        .for_each(|(iz, plane)| {
            for iy in 0..ny {
                let row = iy * nx;
                for ix in 0..nx {
                    let sx = ix as i64 - dx;
                    plane[row + ix] = if sx < 0 {
                        fill_lo
                    } else if sx >= nx as i64 {
                        fill_hi
                    } else {
                        src_cells[iz * slice_size + row + sx as usize]
                    };
                }
            }
        });

    Ok(())
}

/// Force field samples to zero wherever the mask is zero.
///
/// Invariant maintained across geometry changes: no simulated quantity may
/// hold a non-zero value at a cell with zero fill fraction.
pub fn zero_where_empty(field: &mut DeviceField, mask: &DeviceBuffer<f32>) -> Result<()> {
    check_volume(field.len(), mask.len())?;

    let mask_cells = mask.as_slice();
    for i in 0..field.ncomp() {
        field
            .comp_mut(i)
            .as_mut_slice()
            .par_iter_mut()
            .zip(mask_cells.par_iter())
            .for_each(|(sample, &fill)| {
                if fill == 0.0 {
                    *sample = 0.0;
                }
            });
    }
    Ok(())
}

fn check_volume(actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(CoreError::SizeMismatch { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_buffer(dims: [usize; 3]) -> DeviceBuffer<f32> {
        let n = dims[0] * dims[1] * dims[2];
        DeviceBuffer::from_host(&(0..n).map(|i| i as f32).collect::<Vec<_>>()).unwrap()
    }

    #[test]
    fn test_shift_x_positive() {
        let dims = [4, 1, 1];
        let src = DeviceBuffer::from_host(&[10.0f32, 11.0, 12.0, 13.0]).unwrap();
        let mut dst = DeviceBuffer::alloc(4).unwrap();

        shift_x(&mut dst, &src, dims, 1, -1.0, -2.0).unwrap();
        assert_eq!(dst.as_slice(), &[-1.0, 10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_shift_x_negative() {
        let dims = [4, 1, 1];
        let src = DeviceBuffer::from_host(&[10.0f32, 11.0, 12.0, 13.0]).unwrap();
        let mut dst = DeviceBuffer::alloc(4).unwrap();

        shift_x(&mut dst, &src, dims, -2, -1.0, -2.0).unwrap();
        assert_eq!(dst.as_slice(), &[12.0, 13.0, -2.0, -2.0]);
    }

    #[test]
    fn test_shift_x_preserves_rows_independently() {
        let dims = [3, 2, 2];
        let src = linear_buffer(dims);
        let mut dst = DeviceBuffer::alloc(12).unwrap();

        shift_x(&mut dst, &src, dims, 1, 99.0, 99.0).unwrap();

        // Each (y, z) row shifts on its own; no bleed across rows or planes.
        assert_eq!(
            dst.as_slice(),
            &[99.0, 0.0, 1.0, 99.0, 3.0, 4.0, 99.0, 6.0, 7.0, 99.0, 9.0, 10.0]
        );
    }

    #[test]
    fn test_shift_x_whole_width_discards_everything() {
        let dims = [3, 1, 1];
        let src = DeviceBuffer::from_host(&[1.0f32, 2.0, 3.0]).unwrap();
        let mut dst = DeviceBuffer::alloc(3).unwrap();

        shift_x(&mut dst, &src, dims, 3, 0.5, 0.5).unwrap();
        assert_eq!(dst.as_slice(), &[0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_shift_x_volume_mismatch() {
        let src = DeviceBuffer::alloc(8).unwrap();
        let mut dst = DeviceBuffer::alloc(8).unwrap();
        assert!(shift_x(&mut dst, &src, [4, 1, 1], 1, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_zero_where_empty() {
        let mut field = DeviceField::alloc(2, 4).unwrap();
        field.set_uniform(&[1.0, 2.0]).unwrap();

        let mask = DeviceBuffer::from_host(&[1.0f32, 0.0, 0.5, 0.0]).unwrap();
        zero_where_empty(&mut field, &mask).unwrap();

        assert_eq!(field.comp(0).as_slice(), &[1.0, 0.0, 1.0, 0.0]);
        assert_eq!(field.comp(1).as_slice(), &[2.0, 0.0, 2.0, 0.0]);
    }

    #[test]
    fn test_zero_where_empty_length_mismatch() {
        let mut field = DeviceField::alloc(1, 4).unwrap();
        let mask = DeviceBuffer::alloc(5).unwrap();
        assert!(zero_where_empty(&mut field, &mask).is_err());
    }
}
