//! Mask-weighted volume averaging.
//!
//! Averages are weighted by the volume in which a quantity is defined.
//! A quantity restricted to its own sub-region reports that region's
//! normalized volume through [`Quantity::volume_fraction`] and is averaged
//! over it; everything else is averaged over the globally masked geometry.

use tracing::warn;

use voxkernel_core::{reduce, DeviceField};

use crate::error::{GeomError, Result};
use crate::geometry::Geometry;

/// A device-resident quantity that can be averaged.
pub trait Quantity {
    /// The sampled field. Every component shares the mesh cell count.
    fn field(&self) -> &DeviceField;

    /// Normalized volume (0..1) over which this quantity is defined, when
    /// the quantity carries its own sub-region masking. Takes precedence
    /// over the mesh-level mask.
    fn volume_fraction(&self) -> Option<f64> {
        None
    }
}

impl Quantity for DeviceField {
    fn field(&self) -> &DeviceField {
        self
    }
}

/// Per-component average of `quantity`, weighted by the volume in which it
/// is defined.
///
/// Returns one value per component, in component order. Reading the result
/// back to the host is a device synchronization point.
pub fn average<Q: Quantity + ?Sized>(geom: &Geometry, quantity: &Q) -> Result<Vec<f64>> {
    let field = quantity.field();
    let cell_count = geom.mesh().cell_count();
    if field.len() != cell_count {
        return Err(GeomError::Core(voxkernel_core::CoreError::SizeMismatch {
            expected: cell_count,
            actual: field.len(),
        }));
    }
    let ncell = cell_count as f64;

    // Self-reported sub-volume takes precedence over the mesh-level mask.
    if let Some(fraction) = quantity.volume_fraction() {
        if fraction <= 0.0 {
            warn!(fraction, "average over empty self-reported volume");
            return Err(GeomError::EmptyVolume);
        }
        return Ok((0..field.ncomp())
            .map(|i| reduce::sum(field.comp(i)) / ncell / fraction)
            .collect());
    }

    match geom.mask() {
        // Unmasked: plain arithmetic mean.
        None => Ok((0..field.ncomp())
            .map(|i| reduce::sum(field.comp(i)) / ncell)
            .collect()),
        Some(mask) => {
            let fill = geom.space_fill();
            if fill == 0.0 {
                warn!("average over zero-volume mask");
                return Err(GeomError::EmptyVolume);
            }
            (0..field.ncomp())
                .map(|i| Ok(reduce::dot(field.comp(i), mask)? / (fill * ncell)))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;
    use crate::shape::Shape;
    use std::sync::Arc;

    struct RegionQuantity {
        field: DeviceField,
        fraction: f64,
    }

    impl Quantity for RegionQuantity {
        fn field(&self) -> &DeviceField {
            &self.field
        }

        fn volume_fraction(&self) -> Option<f64> {
            Some(self.fraction)
        }
    }

    fn geom_4x4x4() -> Geometry {
        let mesh = Arc::new(Mesh::new([4, 4, 4], [1.0, 1.0, 1.0]).unwrap());
        Geometry::new(mesh)
    }

    #[test]
    fn test_unmasked_plain_mean() {
        let geom = geom_4x4x4();
        let mut field = DeviceField::alloc(2, 64).unwrap();
        field.comp_mut(0).fill(2.0);
        // Component 1: half zeros, half fours.
        field
            .comp_mut(1)
            .copy_from_host(
                &(0..64)
                    .map(|i| if i < 32 { 0.0 } else { 4.0 })
                    .collect::<Vec<f32>>(),
            )
            .unwrap();

        let avg = average(&geom, &field).unwrap();
        assert_eq!(avg, vec![2.0, 2.0]);
    }

    #[test]
    fn test_self_reported_volume_takes_precedence() {
        let mut geom = geom_4x4x4();
        // Even with a mesh mask installed, the quantity's own fraction wins.
        geom.set_geom(Shape::new(|x, _, _| x < 0.0)).unwrap();

        let mut field = DeviceField::alloc(1, 64).unwrap();
        // Value 3.0 over a quarter of the cells, zero elsewhere.
        field
            .comp_mut(0)
            .copy_from_host(
                &(0..64)
                    .map(|i| if i < 16 { 3.0 } else { 0.0 })
                    .collect::<Vec<f32>>(),
            )
            .unwrap();
        let q = RegionQuantity {
            field,
            fraction: 0.25,
        };

        let avg = average(&geom, &q).unwrap();
        assert!((avg[0] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_self_reported_volume() {
        let geom = geom_4x4x4();
        let q = RegionQuantity {
            field: DeviceField::alloc(1, 64).unwrap(),
            fraction: 0.0,
        };
        assert!(matches!(average(&geom, &q), Err(GeomError::EmptyVolume)));
    }

    #[test]
    fn test_cell_count_mismatch() {
        let geom = geom_4x4x4();
        let field = DeviceField::alloc(1, 63).unwrap();
        assert!(matches!(average(&geom, &field), Err(GeomError::Core(_))));
    }
}
