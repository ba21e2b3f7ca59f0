//! Signal models for the microgrid's generation and demand sources.

/// Household demand profile with time-of-day bands.
pub mod demand;
/// Bell-curve solar array model.
pub mod solar;
/// Uniform-band wind turbine model.
pub mod wind;

// Re-export the main types for convenience
pub use demand::DemandProfile;
pub use solar::SolarArray;
pub use wind::WindTurbine;
