//! Microgrid telemetry simulator and day-ahead dispatch planner.

/// Scenario configuration and presets.
pub mod config;
pub mod devices;
pub mod io;
pub mod runner;
/// Telemetry, forecasting, dispatch, and battery-state modules.
pub mod sim;
