//! Shape predicates defining the interior of the simulated object.
//!
//! A [`Shape`] is a pure function of continuous coordinates. This crate
//! defines no built-in primitive shapes; callers bring their own predicates
//! and combine them with the boolean algebra below.

use std::fmt;
use std::sync::Arc;

/// Boolean predicate over continuous coordinates: `true` means "inside".
///
/// Cheaply clonable; the geometry controller retains a clone so that a
/// translated mask can be repaired against the original definition.
#[derive(Clone)]
pub struct Shape {
    inside: Arc<dyn Fn(f64, f64, f64) -> bool + Send + Sync>,
}

impl Shape {
    /// Wrap a predicate function.
    pub fn new(inside: impl Fn(f64, f64, f64) -> bool + Send + Sync + 'static) -> Self {
        Self {
            inside: Arc::new(inside),
        }
    }

    /// Evaluate the predicate at `(x, y, z)`.
    #[inline]
    pub fn inside(&self, x: f64, y: f64, z: f64) -> bool {
        (self.inside)(x, y, z)
    }

    /// Intersection of two shapes.
    pub fn and(self, other: Shape) -> Shape {
        Shape::new(move |x, y, z| self.inside(x, y, z) && other.inside(x, y, z))
    }

    /// Union of two shapes.
    pub fn or(self, other: Shape) -> Shape {
        Shape::new(move |x, y, z| self.inside(x, y, z) || other.inside(x, y, z))
    }

    /// Complement of a shape.
    pub fn inverse(self) -> Shape {
        Shape::new(move |x, y, z| !self.inside(x, y, z))
    }

    /// Shape translated by `(dx, dy, dz)`.
    pub fn translated(self, dx: f64, dy: f64, dz: f64) -> Shape {
        Shape::new(move |x, y, z| self.inside(x - dx, y - dy, z - dz))
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Shape(..)")
    }
}
