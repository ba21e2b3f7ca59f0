//! End-to-end scenario execution: live tick loop plus day-ahead planning.

use crate::config::ScenarioConfig;
use crate::devices::{DemandProfile, SolarArray, WindTurbine};
use crate::sim::battery::{BatteryStateTracker, LiveSoc};
use crate::sim::clock::{Clock, TickSchedule};
use crate::sim::dispatch::{DispatchOptimizer, DispatchParams, TariffSchedule};
use crate::sim::forecast::ForecastGenerator;
use crate::sim::summary::ScheduleSummary;
use crate::sim::telemetry::{BatteryElectrical, TelemetryGenerator, WeatherBands};
use crate::sim::types::{EnergyReading, ForecastPoint, OptimizationResult};

/// Seed offsets so each stochastic component gets an uncorrelated stream.
const WIND_SEED_OFFSET: u64 = 11;
const DEMAND_SEED_OFFSET: u64 = 23;
const FORECAST_SEED_OFFSET: u64 = 37;
const FORECAST_DEMAND_SEED_OFFSET: u64 = 53;

/// Everything one scenario run produces.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Live-loop telemetry, one reading per tick.
    pub readings: Vec<EnergyReading>,
    /// Final live SOC after the last tick.
    pub final_soc: LiveSoc,
    /// The forecast the dispatch plan was built from.
    pub forecast: Vec<ForecastPoint>,
    /// Day-ahead dispatch plan, one result per forecast hour.
    pub schedule: Vec<OptimizationResult>,
    /// Aggregates over the dispatch plan.
    pub summary: ScheduleSummary,
}

fn build_solar(cfg: &ScenarioConfig) -> SolarArray {
    SolarArray::new(
        cfg.solar.peak_w,
        cfg.solar.sunrise_hour,
        cfg.solar.sunset_hour,
        cfg.solar.curve_width,
        cfg.solar.max_cloud_attenuation,
    )
}

fn build_telemetry(cfg: &ScenarioConfig) -> TelemetryGenerator {
    let seed = cfg.simulation.seed;
    let tel = &cfg.telemetry;
    TelemetryGenerator::new(
        build_solar(cfg),
        WindTurbine::new(
            cfg.wind.min_w,
            cfg.wind.max_w,
            seed.wrapping_add(WIND_SEED_OFFSET),
        ),
        DemandProfile::new(cfg.demand.base_w, seed.wrapping_add(DEMAND_SEED_OFFSET)),
        BatteryElectrical {
            nominal_voltage: cfg.battery.nominal_voltage,
            volts_per_soc_pct: cfg.battery.volts_per_soc_pct,
            deficit_share_floor_pct: tel.deficit_share_floor_pct,
            export_floor_pct: tel.export_floor_pct,
        },
        WeatherBands {
            cloud_min_pct: tel.cloud_min_pct,
            cloud_max_pct: tel.cloud_max_pct,
            temp_min_c: tel.temp_min_c,
            temp_max_c: tel.temp_max_c,
        },
        seed,
    )
}

fn build_forecaster(cfg: &ScenarioConfig) -> ForecastGenerator {
    let seed = cfg.simulation.seed;
    let mut forecaster = ForecastGenerator::new(
        build_solar(cfg),
        DemandProfile::new(
            cfg.demand.base_w,
            seed.wrapping_add(FORECAST_DEMAND_SEED_OFFSET),
        ),
        seed.wrapping_add(FORECAST_SEED_OFFSET),
    );
    forecaster.horizon = cfg.simulation.forecast_horizon;
    forecaster.cloud_min_pct = cfg.forecast.cloud_min_pct;
    forecaster.cloud_max_pct = cfg.forecast.cloud_max_pct;
    forecaster
}

fn build_optimizer(cfg: &ScenarioConfig) -> DispatchOptimizer {
    let d = &cfg.dispatch;
    let t = &cfg.tariff;
    DispatchOptimizer::new(
        DispatchParams {
            capacity_kwh: cfg.battery.capacity_kwh,
            max_charge_kw: d.max_charge_kw,
            max_discharge_kw: d.max_discharge_kw,
            initial_soc_pct: cfg.battery.initial_soc_pct,
            charge_target_pct: d.charge_target_pct,
            discharge_floor_pct: d.discharge_floor_pct,
            reserve_pct: d.reserve_pct,
            degradation_rs_per_kwh: d.degradation_rs_per_kwh,
            residual_threshold_kw: d.residual_threshold_kw,
        },
        TariffSchedule {
            peak_rs_per_kwh: t.peak_rs_per_kwh,
            off_peak_rs_per_kwh: t.off_peak_rs_per_kwh,
            morning_peak: (t.morning_peak_start, t.morning_peak_end),
            evening_peak: (t.evening_peak_start, t.evening_peak_end),
            export_price_factor: t.export_price_factor,
        },
    )
}

/// Runs one complete scenario against the given time source.
///
/// The live loop advances a [`LiveSoc`] through the battery tracker once per
/// tick; the planning path generates a fresh forecast from the same starting
/// instant and folds the optimizer over it. The two paths share only that
/// instant; the planned trajectory never touches the live SOC.
pub fn run_scenario(cfg: &ScenarioConfig, clock: &impl Clock) -> RunOutput {
    let start = clock.now();
    let s = &cfg.simulation;

    // Live telemetry loop
    let mut generator = build_telemetry(cfg);
    let tracker = BatteryStateTracker::new(
        cfg.battery.capacity_kwh,
        cfg.battery.live_floor_pct,
        cfg.battery.live_ceiling_pct,
    );
    let schedule_of_ticks = TickSchedule::new(start, s.ticks, s.tick_ms, s.speed);

    let mut soc = LiveSoc::new(cfg.battery.initial_soc_pct);
    let mut readings = Vec::with_capacity(s.ticks);
    for tick in schedule_of_ticks.iter() {
        let reading = generator.generate(tick.at, soc);
        soc = tracker.update(
            soc,
            reading.generation_w(),
            reading.demand_w,
            reading.grid_w,
            tick.delta_ms,
        );
        readings.push(reading);
    }

    // Day-ahead planning, independent of the live loop
    let forecast = build_forecaster(cfg).generate(start);
    let schedule = build_optimizer(cfg).optimize(&forecast);
    let summary = ScheduleSummary::from_results(&schedule);

    RunOutput {
        readings,
        final_soc: soc,
        forecast,
        schedule,
        summary,
    }
}
