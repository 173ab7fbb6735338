//! Domain models: sighting rows, snapshots and chart descriptions.

pub mod chart;
pub mod sighting;
