//! Synthetic telemetry snapshots for the live loop.

use chrono::{DateTime, Datelike, Local, Timelike, Weekday};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::devices::{DemandProfile, SolarArray, WindTurbine};
use crate::sim::battery::LiveSoc;
use crate::sim::types::EnergyReading;

/// Battery electrical parameters needed to render a reading.
#[derive(Debug, Clone)]
pub struct BatteryElectrical {
    /// Nominal pack voltage at 50% SOC (V).
    pub nominal_voltage: f32,
    /// Voltage change per SOC percentage point (V/%).
    pub volts_per_soc_pct: f32,
    /// SOC above which a deficit is split with the grid (%).
    pub deficit_share_floor_pct: f32,
    /// SOC below which surplus is routed to charging, not export (%).
    pub export_floor_pct: f32,
}

impl Default for BatteryElectrical {
    fn default() -> Self {
        Self {
            nominal_voltage: 48.0,
            volts_per_soc_pct: 0.05,
            deficit_share_floor_pct: 30.0,
            export_floor_pct: 85.0,
        }
    }
}

/// Weather sampling bands for telemetry snapshots.
#[derive(Debug, Clone)]
pub struct WeatherBands {
    /// Cloud cover band (%, lower inclusive, upper exclusive).
    pub cloud_min_pct: f32,
    /// Upper cloud cover bound (%).
    pub cloud_max_pct: f32,
    /// Ambient temperature band (°C).
    pub temp_min_c: f32,
    /// Upper temperature bound (°C).
    pub temp_max_c: f32,
}

impl Default for WeatherBands {
    fn default() -> Self {
        Self {
            cloud_min_pct: 20.0,
            cloud_max_pct: 60.0,
            temp_min_c: 25.0,
            temp_max_c: 35.0,
        }
    }
}

/// Assembles one [`EnergyReading`] per call from the signal models and the
/// current live SOC.
///
/// The generator holds its own seeded RNG for weather sampling plus the
/// stochastic signal models; the time is an explicit parameter, so a fixed
/// `now` and seed reproduce a reading bit for bit. It never mutates the SOC
/// it is given; advancing the SOC between ticks is the battery tracker's
/// job.
#[derive(Debug, Clone)]
pub struct TelemetryGenerator {
    solar: SolarArray,
    wind: WindTurbine,
    demand: DemandProfile,
    battery: BatteryElectrical,
    weather: WeatherBands,
    rng: StdRng,
}

/// Whether the given date falls on a weekend.
pub fn is_weekend(date: &DateTime<Local>) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

impl TelemetryGenerator {
    /// Creates a generator from its signal models and sampling parameters.
    pub fn new(
        solar: SolarArray,
        wind: WindTurbine,
        demand: DemandProfile,
        battery: BatteryElectrical,
        weather: WeatherBands,
        seed: u64,
    ) -> Self {
        Self {
            solar,
            wind,
            demand,
            battery,
            weather,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Produces one telemetry snapshot for the given instant and live SOC.
    ///
    /// Grid balance policy: in deficit, the grid covers half the shortfall
    /// when SOC is above the share floor (the battery is assumed to cover
    /// the rest; an approximation carried in the reading only, not debited
    /// from the SOC) and the full shortfall otherwise. In surplus, grid
    /// power is zero while the battery has charging headroom, else the
    /// surplus is exported.
    pub fn generate(&mut self, now: DateTime<Local>, soc: LiveSoc) -> EnergyReading {
        let hour = now.hour();
        let weekend = is_weekend(&now);

        let w = &self.weather;
        let cloud_cover_pct = self.rng.random_range(w.cloud_min_pct..w.cloud_max_pct);
        let temperature_c = self.rng.random_range(w.temp_min_c..w.temp_max_c);

        let solar_w = self.solar.power_w(hour, cloud_cover_pct);
        let wind_w = self.wind.power_w();
        let demand_w = self.demand.power_w(hour, weekend);

        let soc_pct = soc.percent();
        let b = &self.battery;
        let battery_voltage = b.nominal_voltage + (soc_pct - 50.0) * b.volts_per_soc_pct;

        let generation_w = solar_w + wind_w;
        let grid_w = if generation_w < demand_w {
            let deficit = demand_w - generation_w;
            if soc_pct > b.deficit_share_floor_pct {
                deficit * 0.5
            } else {
                deficit
            }
        } else if soc_pct < b.export_floor_pct {
            0.0
        } else {
            -(generation_w - demand_w)
        };

        EnergyReading {
            timestamp: now,
            solar_w,
            wind_w,
            battery_soc_pct: soc_pct,
            battery_voltage,
            grid_w,
            demand_w,
            temperature_c,
            cloud_cover_pct,
        }
    }
}
