//! Live battery state-of-charge integration.

/// State of charge of the physical battery, as tracked by the live telemetry
/// loop (%, 0–100).
///
/// This is a separate type from the optimizer's planned trajectory on
/// purpose: the live loop and the day-ahead plan advance different SOC
/// values and must never alias each other.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct LiveSoc(f32);

impl LiveSoc {
    /// Wraps a percentage, clamped to [0, 100].
    pub fn new(pct: f32) -> Self {
        Self(pct.clamp(0.0, 100.0))
    }

    /// The SOC as a percentage.
    pub fn percent(&self) -> f32 {
        self.0
    }
}

/// Integrates the instantaneous power balance into the live SOC.
///
/// The tracker is the sole mutator of the live-loop SOC: the telemetry
/// generator only reads it, and the driving loop calls [`update`] exactly
/// once per tick with that tick's own `delta_ms`.
///
/// [`update`]: BatteryStateTracker::update
#[derive(Debug, Clone)]
pub struct BatteryStateTracker {
    /// Battery capacity (Wh).
    capacity_wh: f32,
    /// Lowest SOC the live loop may reach (%).
    floor_pct: f32,
    /// Highest SOC the live loop may reach (%).
    ceiling_pct: f32,
}

impl BatteryStateTracker {
    /// Creates a tracker for a battery of the given capacity with the given
    /// operating band.
    ///
    /// # Panics
    ///
    /// Panics if capacity is not positive or the band is not ordered within
    /// [0, 100].
    pub fn new(capacity_kwh: f32, floor_pct: f32, ceiling_pct: f32) -> Self {
        assert!(capacity_kwh > 0.0);
        assert!(0.0 <= floor_pct && floor_pct < ceiling_pct && ceiling_pct <= 100.0);
        Self {
            capacity_wh: capacity_kwh * 1000.0,
            floor_pct,
            ceiling_pct,
        }
    }

    /// Advances the SOC over one tick.
    ///
    /// The energy balance is `generation - demand - grid` in watts,
    /// integrated over `delta_ms` and converted to percentage points of the
    /// battery capacity. The result is clamped to the operating band, so the
    /// output is always valid for any finite inputs.
    pub fn update(
        &self,
        soc: LiveSoc,
        generation_w: f32,
        demand_w: f32,
        grid_w: f32,
        delta_ms: f32,
    ) -> LiveSoc {
        let balance_w = generation_w - demand_w - grid_w;
        let energy_wh = balance_w * (delta_ms / 3_600_000.0);
        let soc_delta_pct = energy_wh / self.capacity_wh * 100.0;

        LiveSoc((soc.percent() + soc_delta_pct).clamp(self.floor_pct, self.ceiling_pct))
    }
}
