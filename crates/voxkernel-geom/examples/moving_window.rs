//! Moving simulation window demo.
//!
//! Installs a slab geometry on a small mesh, registers a vector field for
//! re-normalization, then tracks the slab with incremental window shifts
//! instead of re-rasterizing the whole volume each step.

use std::sync::Arc;

use parking_lot::RwLock;
use voxkernel_core::DeviceField;
use voxkernel_geom::prelude::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    let mesh = Arc::new(Mesh::new([64, 16, 16], [5e-9, 5e-9, 5e-9])?);
    let mut geom = Geometry::new(Arc::clone(&mesh));

    let field = Arc::new(RwLock::new(DeviceField::alloc(3, mesh.cell_count())?));
    field.write().set_uniform(&[1.0, 0.0, 0.0])?;
    geom.register_target(Arc::clone(&field));

    // A slab covering the low-x quarter of the domain.
    let bound = -0.25 * 64.0 * 5e-9;
    geom.set_geom(Shape::new(move |x, _, _| x < bound))?;

    for step in 0..8 {
        geom.shift(2)?;
        let avg = average(&geom, &*field.read())?;
        println!(
            "step {step}: space_fill = {:.4}, <m> = {avg:?}",
            geom.space_fill()
        );
    }

    Ok(())
}
