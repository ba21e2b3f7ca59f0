//! File output for run artifacts.

/// CSV writers for readings and schedules.
pub mod export;
