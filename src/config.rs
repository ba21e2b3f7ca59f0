//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields default to the baseline microgrid. Load from TOML with
/// [`ScenarioConfig::from_toml_file`] or use [`ScenarioConfig::baseline`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Run timing, seed, and horizon.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Solar array parameters.
    #[serde(default)]
    pub solar: SolarConfig,
    /// Wind turbine parameters.
    #[serde(default)]
    pub wind: WindConfig,
    /// Demand profile parameters.
    #[serde(default)]
    pub demand: DemandConfig,
    /// Battery pack parameters.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Telemetry weather sampling and grid-balance policy.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    /// Forecast weather sampling.
    #[serde(default)]
    pub forecast: ForecastConfig,
    /// Import/export pricing.
    #[serde(default)]
    pub tariff: TariffConfig,
    /// Dispatch policy parameters.
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

/// Run timing, seed, and horizon.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of telemetry ticks to run.
    pub ticks: usize,
    /// Nominal tick period (ms, must be > 0).
    pub tick_ms: u64,
    /// Speed multiplier scaling simulated time per tick (must be > 0).
    pub speed: f32,
    /// Master random seed.
    pub seed: u64,
    /// Forecast horizon in hours.
    pub forecast_horizon: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks: 24,
            tick_ms: 5000,
            // 720x: one 5-second tick per simulated hour, so the default
            // run covers a full day.
            speed: 720.0,
            seed: 42,
            forecast_horizon: 24,
        }
    }
}

/// Solar array parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolarConfig {
    /// Clear-sky peak output (W).
    pub peak_w: f32,
    /// First daylight hour (inclusive).
    pub sunrise_hour: u32,
    /// Last daylight hour (inclusive).
    pub sunset_hour: u32,
    /// Width of the Gaussian falloff.
    pub curve_width: f32,
    /// Output reduction at 100% cloud cover (0.0–1.0).
    pub max_cloud_attenuation: f32,
}

impl Default for SolarConfig {
    fn default() -> Self {
        Self {
            peak_w: 3500.0,
            sunrise_hour: 6,
            sunset_hour: 18,
            curve_width: 18.0,
            max_cloud_attenuation: 0.6,
        }
    }
}

/// Wind turbine parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindConfig {
    /// Lower output bound (W).
    pub min_w: f32,
    /// Upper output bound (W, exclusive).
    pub max_w: f32,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            min_w: 300.0,
            max_w: 700.0,
        }
    }
}

/// Demand profile parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemandConfig {
    /// Baseline consumption before band multipliers (W).
    pub base_w: f32,
}

impl Default for DemandConfig {
    fn default() -> Self {
        Self { base_w: 800.0 }
    }
}

/// Battery pack parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Capacity (kWh).
    pub capacity_kwh: f32,
    /// Live SOC at run start (%).
    pub initial_soc_pct: f32,
    /// Lowest SOC the live loop may reach (%).
    pub live_floor_pct: f32,
    /// Highest SOC the live loop may reach (%).
    pub live_ceiling_pct: f32,
    /// Nominal pack voltage at 50% SOC (V).
    pub nominal_voltage: f32,
    /// Voltage change per SOC percentage point (V/%).
    pub volts_per_soc_pct: f32,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            capacity_kwh: 100.0,
            initial_soc_pct: 65.0,
            live_floor_pct: 20.0,
            live_ceiling_pct: 90.0,
            nominal_voltage: 48.0,
            volts_per_soc_pct: 0.05,
        }
    }
}

/// Telemetry weather sampling and grid-balance policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TelemetryConfig {
    /// Lower cloud cover bound (%).
    pub cloud_min_pct: f32,
    /// Upper cloud cover bound (%, exclusive).
    pub cloud_max_pct: f32,
    /// Lower ambient temperature bound (°C).
    pub temp_min_c: f32,
    /// Upper ambient temperature bound (°C, exclusive).
    pub temp_max_c: f32,
    /// SOC above which a deficit is split with the grid (%).
    pub deficit_share_floor_pct: f32,
    /// SOC below which surplus charges the battery instead of exporting (%).
    pub export_floor_pct: f32,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            cloud_min_pct: 20.0,
            cloud_max_pct: 60.0,
            temp_min_c: 25.0,
            temp_max_c: 35.0,
            deficit_share_floor_pct: 30.0,
            export_floor_pct: 85.0,
        }
    }
}

/// Forecast weather sampling.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForecastConfig {
    /// Lower cloud cover bound (%).
    pub cloud_min_pct: f32,
    /// Upper cloud cover bound (%, exclusive).
    pub cloud_max_pct: f32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            cloud_min_pct: 20.0,
            cloud_max_pct: 50.0,
        }
    }
}

/// Import/export pricing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TariffConfig {
    /// Peak import price (Rs/kWh).
    pub peak_rs_per_kwh: f32,
    /// Off-peak import price (Rs/kWh).
    pub off_peak_rs_per_kwh: f32,
    /// First hour of the morning peak (inclusive).
    pub morning_peak_start: u32,
    /// Last hour of the morning peak (inclusive).
    pub morning_peak_end: u32,
    /// First hour of the evening peak (inclusive).
    pub evening_peak_start: u32,
    /// Last hour of the evening peak (inclusive).
    pub evening_peak_end: u32,
    /// Export compensation as a fraction of the off-peak rate.
    pub export_price_factor: f32,
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            peak_rs_per_kwh: 8.0,
            off_peak_rs_per_kwh: 5.0,
            morning_peak_start: 7,
            morning_peak_end: 11,
            evening_peak_start: 17,
            evening_peak_end: 21,
            export_price_factor: 0.8,
        }
    }
}

/// Dispatch policy parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    /// Maximum charge power (kW).
    pub max_charge_kw: f32,
    /// Maximum discharge power (kW).
    pub max_discharge_kw: f32,
    /// Planned SOC the optimizer stops charging at (%).
    pub charge_target_pct: f32,
    /// Planned SOC below which the optimizer stops discharging (%).
    pub discharge_floor_pct: f32,
    /// SOC reserve protected when sizing a discharge (%).
    pub reserve_pct: f32,
    /// Battery wear cost per kWh of throughput (Rs/kWh).
    pub degradation_rs_per_kwh: f32,
    /// Residuals below this magnitude do not produce a grid entry (kW).
    pub residual_threshold_kw: f32,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_charge_kw: 25.0,
            max_discharge_kw: 25.0,
            charge_target_pct: 85.0,
            discharge_floor_pct: 30.0,
            reserve_pct: 20.0,
            degradation_rs_per_kwh: 0.75,
            residual_threshold_kw: 0.1,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"battery.capacity_kwh"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl ScenarioConfig {
    /// Returns the baseline scenario.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            solar: SolarConfig::default(),
            wind: WindConfig::default(),
            demand: DemandConfig::default(),
            battery: BatteryConfig::default(),
            telemetry: TelemetryConfig::default(),
            forecast: ForecastConfig::default(),
            tariff: TariffConfig::default(),
            dispatch: DispatchConfig::default(),
        }
    }

    /// Returns the monsoon preset: heavy cloud, derated array, calmer wind.
    pub fn monsoon() -> Self {
        Self {
            solar: SolarConfig {
                peak_w: 2800.0,
                ..SolarConfig::default()
            },
            telemetry: TelemetryConfig {
                cloud_min_pct: 60.0,
                cloud_max_pct: 95.0,
                temp_min_c: 22.0,
                temp_max_c: 30.0,
                ..TelemetryConfig::default()
            },
            forecast: ForecastConfig {
                cloud_min_pct: 55.0,
                cloud_max_pct: 90.0,
            },
            wind: WindConfig {
                min_w: 400.0,
                max_w: 900.0,
            },
            ..Self::baseline()
        }
    }

    /// Returns the high-solar preset: oversized array driving the export path.
    pub fn high_solar() -> Self {
        Self {
            solar: SolarConfig {
                peak_w: 9000.0,
                ..SolarConfig::default()
            },
            telemetry: TelemetryConfig {
                cloud_min_pct: 10.0,
                cloud_max_pct: 30.0,
                ..TelemetryConfig::default()
            },
            forecast: ForecastConfig {
                cloud_min_pct: 10.0,
                cloud_max_pct: 25.0,
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "monsoon", "high_solar"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "monsoon" => Ok(Self::monsoon()),
            "high_solar" => Ok(Self::high_solar()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: String| {
            errors.push(ConfigError {
                field: field.to_string(),
                message,
            });
        };

        let s = &self.simulation;
        if s.tick_ms == 0 {
            push("simulation.tick_ms", "must be > 0".into());
        }
        if s.speed <= 0.0 {
            push("simulation.speed", "must be > 0".into());
        }
        if s.forecast_horizon == 0 {
            push("simulation.forecast_horizon", "must be > 0".into());
        }

        let sol = &self.solar;
        if sol.sunrise_hour >= sol.sunset_hour {
            push("solar.sunrise_hour", "must be < solar.sunset_hour".into());
        }
        if sol.sunset_hour > 23 {
            push("solar.sunset_hour", "must be <= 23".into());
        }
        if sol.curve_width <= 0.0 {
            push("solar.curve_width", "must be > 0".into());
        }
        if !(0.0..=1.0).contains(&sol.max_cloud_attenuation) {
            push("solar.max_cloud_attenuation", "must be in [0.0, 1.0]".into());
        }

        let wind = &self.wind;
        if wind.min_w < 0.0 || wind.min_w >= wind.max_w {
            push("wind.min_w", "must be >= 0 and < wind.max_w".into());
        }

        if self.demand.base_w < 0.0 {
            push("demand.base_w", "must be >= 0".into());
        }

        let bat = &self.battery;
        if bat.capacity_kwh <= 0.0 {
            push("battery.capacity_kwh", "must be > 0".into());
        }
        if bat.live_floor_pct < 0.0
            || bat.live_floor_pct >= bat.live_ceiling_pct
            || bat.live_ceiling_pct > 100.0
        {
            push(
                "battery.live_floor_pct",
                "band must satisfy 0 <= floor < ceiling <= 100".into(),
            );
        }
        if !(bat.live_floor_pct..=bat.live_ceiling_pct).contains(&bat.initial_soc_pct) {
            push(
                "battery.initial_soc_pct",
                "must be within the live SOC band".into(),
            );
        }

        let tel = &self.telemetry;
        if tel.cloud_min_pct < 0.0
            || tel.cloud_min_pct >= tel.cloud_max_pct
            || tel.cloud_max_pct > 100.0
        {
            push(
                "telemetry.cloud_min_pct",
                "band must satisfy 0 <= min < max <= 100".into(),
            );
        }
        if tel.temp_min_c >= tel.temp_max_c {
            push("telemetry.temp_min_c", "must be < telemetry.temp_max_c".into());
        }

        let fc = &self.forecast;
        if fc.cloud_min_pct < 0.0 || fc.cloud_min_pct >= fc.cloud_max_pct || fc.cloud_max_pct > 100.0
        {
            push(
                "forecast.cloud_min_pct",
                "band must satisfy 0 <= min < max <= 100".into(),
            );
        }

        let tariff = &self.tariff;
        if tariff.peak_rs_per_kwh <= 0.0 || tariff.off_peak_rs_per_kwh <= 0.0 {
            push("tariff.peak_rs_per_kwh", "tariff rates must be > 0".into());
        }
        if tariff.morning_peak_start > tariff.morning_peak_end
            || tariff.evening_peak_start > tariff.evening_peak_end
            || tariff.evening_peak_end > 23
        {
            push(
                "tariff.morning_peak_start",
                "peak windows must be ordered within [0, 23]".into(),
            );
        }
        if !(0.0..=1.0).contains(&tariff.export_price_factor) {
            push("tariff.export_price_factor", "must be in [0.0, 1.0]".into());
        }

        let d = &self.dispatch;
        if d.max_charge_kw < 0.0 || d.max_discharge_kw < 0.0 {
            push("dispatch.max_charge_kw", "power caps must be >= 0".into());
        }
        if !(d.reserve_pct < d.discharge_floor_pct && d.discharge_floor_pct < d.charge_target_pct)
            || d.charge_target_pct > 100.0
        {
            push(
                "dispatch.reserve_pct",
                "must satisfy reserve < discharge_floor < charge_target <= 100".into(),
            );
        }
        if d.residual_threshold_kw < 0.0 {
            push("dispatch.residual_threshold_kw", "must be >= 0".into());
        }
        if d.degradation_rs_per_kwh < 0.0 {
            push("dispatch.degradation_rs_per_kwh", "must be >= 0".into());
        }

        errors
    }
}
