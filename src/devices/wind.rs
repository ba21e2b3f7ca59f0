use rand::{Rng, SeedableRng, rngs::StdRng};

/// A small wind turbine modelled as a uniform power band.
///
/// Wind output is independent of the time of day; each call draws a fresh
/// value uniformly from `[min_w, max_w)` using the turbine's seeded RNG.
#[derive(Debug, Clone)]
pub struct WindTurbine {
    /// Lower bound of the output band (W).
    pub min_w: f32,

    /// Upper bound of the output band (W, exclusive).
    pub max_w: f32,

    /// Random number generator for output draws.
    rng: StdRng,
}

impl WindTurbine {
    /// Creates a new wind turbine producing within `[min_w, max_w)`.
    ///
    /// # Panics
    ///
    /// Panics if `min_w` is negative or not below `max_w`.
    pub fn new(min_w: f32, max_w: f32, seed: u64) -> Self {
        assert!(min_w >= 0.0 && min_w < max_w);
        Self {
            min_w,
            max_w,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws the instantaneous output (W).
    pub fn power_w(&mut self) -> f32 {
        self.rng.random_range(self.min_w..self.max_w)
    }
}
