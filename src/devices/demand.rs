use rand::{Rng, SeedableRng, rngs::StdRng};

/// A household demand profile driven by time-of-day multiplier bands.
///
/// Demand is a base load scaled by a band multiplier (morning peak, evening
/// peak, daytime, night), reduced on weekends, with multiplicative uniform
/// noise applied last. The band table is a pure function; only the noise
/// draw consumes the profile's seeded RNG.
#[derive(Debug, Clone)]
pub struct DemandProfile {
    /// Baseline consumption before the band multiplier (W).
    pub base_w: f32,

    /// Multiplier during the morning peak, hours [7, 9].
    pub morning_mult: f32,

    /// Multiplier during the evening peak, hours [17, 20].
    pub evening_mult: f32,

    /// Multiplier during daytime, hours [10, 16].
    pub daytime_mult: f32,

    /// Multiplier during the remaining night hours.
    pub night_mult: f32,

    /// Additional factor applied on weekends.
    pub weekend_factor: f32,

    /// Lower bound of the multiplicative noise band.
    pub noise_lo: f32,

    /// Upper bound of the multiplicative noise band (exclusive).
    pub noise_hi: f32,

    /// Random number generator for the noise draw.
    rng: StdRng,
}

impl DemandProfile {
    /// Creates a demand profile with the given base load and seed, using the
    /// standard band multipliers (2.5 morning, 2.8 evening, 1.8 daytime,
    /// 0.8 night), a 0.7 weekend factor, and noise in [0.9, 1.1).
    pub fn new(base_w: f32, seed: u64) -> Self {
        Self {
            base_w: base_w.max(0.0),
            morning_mult: 2.5,
            evening_mult: 2.8,
            daytime_mult: 1.8,
            night_mult: 0.8,
            weekend_factor: 0.7,
            noise_lo: 0.9,
            noise_hi: 1.1,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Time-of-day band multiplier for the given hour.
    ///
    /// The bands are exhaustive and non-overlapping over [0, 23]:
    /// [7, 9] morning, [17, 20] evening, [10, 16] daytime, all other hours
    /// night.
    pub fn multiplier(&self, hour: u32) -> f32 {
        match hour {
            7..=9 => self.morning_mult,
            17..=20 => self.evening_mult,
            10..=16 => self.daytime_mult,
            _ => self.night_mult,
        }
    }

    /// Instantaneous demand at the given hour (W).
    ///
    /// Applies the band multiplier, the weekend factor when `is_weekend`,
    /// and finally one multiplicative noise draw from the profile's RNG.
    pub fn power_w(&mut self, hour: u32, is_weekend: bool) -> f32 {
        let mut mult = self.multiplier(hour);
        if is_weekend {
            mult *= self.weekend_factor;
        }

        let noise: f32 = self.rng.random_range(self.noise_lo..self.noise_hi);
        self.base_w * mult * noise
    }
}
