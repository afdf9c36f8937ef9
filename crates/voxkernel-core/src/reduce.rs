//! Scalar reductions over device buffers.
//!
//! Every reduction returns its result to host memory and is therefore an
//! implicit device synchronization point. Accumulation happens in `f64`
//! regardless of the element type, so large meshes do not lose precision
//! to single-precision partial sums.

use rayon::prelude::*;

use crate::buffer::DeviceBuffer;
use crate::error::{CoreError, Result};

/// Sum of all elements.
pub fn sum(buf: &DeviceBuffer<f32>) -> f64 {
    buf.as_slice().par_iter().map(|&v| v as f64).sum()
}

/// Dot product of two buffers of equal length.
pub fn dot(a: &DeviceBuffer<f32>, b: &DeviceBuffer<f32>) -> Result<f64> {
    if a.len() != b.len() {
        return Err(CoreError::SizeMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(a.as_slice()
        .par_iter()
        .zip(b.as_slice().par_iter())
        .map(|(&x, &y)| x as f64 * y as f64)
        .sum())
}

/// Maximum absolute element value.
pub fn max_abs(buf: &DeviceBuffer<f32>) -> f32 {
    buf.as_slice()
        .par_iter()
        .map(|&v| v.abs())
        .reduce(|| 0.0, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum() {
        let buf = DeviceBuffer::from_host(&[1.0f32, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(sum(&buf), 10.0);
    }

    #[test]
    fn test_sum_precision() {
        // 1e7 elements of 0.1 would drift badly with f32 accumulation.
        let buf = DeviceBuffer::from_host(&vec![0.1f32; 1 << 20]).unwrap();
        let expected = 0.1f32 as f64 * (1 << 20) as f64;
        assert!((sum(&buf) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_dot() {
        let a = DeviceBuffer::from_host(&[1.0f32, 2.0, 3.0]).unwrap();
        let b = DeviceBuffer::from_host(&[4.0f32, 5.0, 6.0]).unwrap();
        assert_eq!(dot(&a, &b).unwrap(), 32.0);
    }

    #[test]
    fn test_dot_length_mismatch() {
        let a = DeviceBuffer::from_host(&[1.0f32, 2.0]).unwrap();
        let b = DeviceBuffer::from_host(&[1.0f32, 2.0, 3.0]).unwrap();
        assert!(matches!(
            dot(&a, &b),
            Err(CoreError::SizeMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_max_abs() {
        let buf = DeviceBuffer::from_host(&[1.0f32, -5.0, 3.0]).unwrap();
        assert_eq!(max_abs(&buf), 5.0);
    }
}
