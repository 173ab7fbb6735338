//! Aggregation, view assembly and periodic refresh.

pub mod aggregation;
pub mod dashboard;
pub mod refresher;
