//! Spatial queries against the block registry.
//!
//! # Invariants
//! - Queries are read-only; they never mutate the registry.
//! - The nearest hit wins; exact ties keep registry iteration order.
//! - Cube faces are double-sided, so a ray starting inside a block reports
//!   the face it leaves through.
//!
//! Every query is a linear scan over all blocks. The world is small and
//! bounded, so no acceleration structure is kept.

mod probe;
mod ray;

pub use probe::{GroundContact, ceiling, ground, target, wall};
pub use ray::{Ray, RayHit, intersect_voxel, nearest_hit};

pub fn crate_info() -> &'static str {
    "blockworld-query v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("query"));
    }
}
