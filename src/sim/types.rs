//! Core record types: telemetry readings, forecast points, dispatch results.

use std::fmt;

use chrono::{DateTime, Local};

/// One telemetry snapshot of the whole microgrid.
///
/// Produced once per tick by the telemetry generator and immutable after
/// creation. Grid power is signed: positive = import, negative = export.
#[derive(Debug, Clone)]
pub struct EnergyReading {
    /// Wall-clock time the reading was taken.
    pub timestamp: DateTime<Local>,
    /// Solar array output (W).
    pub solar_w: f32,
    /// Wind turbine output (W).
    pub wind_w: f32,
    /// Battery state of charge (%, 0–100).
    pub battery_soc_pct: f32,
    /// Battery terminal voltage (V).
    pub battery_voltage: f32,
    /// Grid power (W; positive = import, negative = export).
    pub grid_w: f32,
    /// Household demand (W).
    pub demand_w: f32,
    /// Ambient temperature (°C).
    pub temperature_c: f32,
    /// Cloud cover (%, 0–100).
    pub cloud_cover_pct: f32,
}

impl EnergyReading {
    /// Total renewable generation in this snapshot (W).
    pub fn generation_w(&self) -> f32 {
        self.solar_w + self.wind_w
    }

    /// Fraction of demand covered by renewable generation.
    ///
    /// Defined as 0 when demand is 0 rather than propagating infinity.
    pub fn renewable_fraction(&self) -> f32 {
        if self.demand_w <= 0.0 {
            0.0
        } else {
            self.generation_w() / self.demand_w
        }
    }
}

impl fmt::Display for EnergyReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | solar={:>6.0} W  wind={:>5.0} W  demand={:>6.0} W  \
             grid={:>7.0} W | SOC={:.1}%  {:.2} V | {:.1} °C  cloud={:.0}%",
            self.timestamp.format("%H:%M:%S"),
            self.solar_w,
            self.wind_w,
            self.demand_w,
            self.grid_w,
            self.battery_soc_pct,
            self.battery_voltage,
            self.temperature_c,
            self.cloud_cover_pct,
        )
    }
}

/// One hour of the day-ahead forecast.
///
/// Solar and demand are rounded to whole watts; confidence decays with
/// horizon distance and never drops below the forecast floor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastPoint {
    /// Hour of day (0–23).
    pub hour: u32,
    /// Predicted solar output (W).
    pub solar_w: u32,
    /// Predicted demand (W).
    pub demand_w: u32,
    /// Forecast confidence (%, 0–100).
    pub confidence_pct: u8,
}

impl ForecastPoint {
    /// Human-readable hour label, e.g. `"14:00"`.
    pub fn hour_label(&self) -> String {
        format!("{}:00", self.hour)
    }
}

impl fmt::Display for ForecastPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>5} | solar={:>5} W  demand={:>5} W  confidence={}%",
            self.hour_label(),
            self.solar_w,
            self.demand_w,
            self.confidence_pct,
        )
    }
}

/// Battery dispatch decision for one hour of the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryAction {
    /// Store surplus generation.
    Charge,
    /// Cover a deficit from the battery.
    Discharge,
    /// Leave the battery untouched.
    Idle,
}

impl BatteryAction {
    /// Lowercase wire/display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Charge => "charge",
            Self::Discharge => "discharge",
            Self::Idle => "idle",
        }
    }
}

impl fmt::Display for BatteryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One hour of the day-ahead dispatch plan.
///
/// Import, export, and cost are rounded to two decimals when the result is
/// built; import and export are never both nonzero. Cost is signed: positive
/// = net cost, negative = net revenue.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    /// Hour label, e.g. `"14:00"`.
    pub hour_label: String,
    /// Hour of day (0–23).
    pub hour: u32,
    /// Planned battery action for this hour.
    pub action: BatteryAction,
    /// Grid import (kW, >= 0).
    pub grid_import_kw: f32,
    /// Grid export (kW, >= 0).
    pub grid_export_kw: f32,
    /// Net cost for this hour (Rupees).
    pub cost_rupees: f32,
}

impl fmt::Display for OptimizationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>5} | {:<9} | import={:>6.2} kW  export={:>6.2} kW | cost={:>7.2} Rs",
            self.hour_label, self.action, self.grid_import_kw, self.grid_export_kw, self.cost_rupees,
        )
    }
}
