//! Developer tooling: world inspector and summaries.
//!
//! # Invariants
//! - Tools only read world state; they never mutate it.

mod inspector;

pub use inspector::{CreatureInfo, StateCounts, WorldInspector, WorldSummary};

pub fn crate_info() -> &'static str {
    "blockworld-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
