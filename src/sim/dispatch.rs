//! Greedy day-ahead dispatch planning over a 24-hour forecast.

use crate::sim::types::{BatteryAction, ForecastPoint, OptimizationResult};

/// Rounds to two decimals for result output. Never applied to the running
/// SOC, so rounding cannot drift into later steps.
fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

/// Peak/off-peak import tariff bands.
///
/// Peak pricing applies during the morning window [7, 11] and the evening
/// window [17, 21], both inclusive; all other hours are off-peak. Export is
/// compensated at a fraction of the off-peak rate.
#[derive(Debug, Clone)]
pub struct TariffSchedule {
    /// Import price during peak hours (Rs/kWh).
    pub peak_rs_per_kwh: f32,
    /// Import price during off-peak hours (Rs/kWh).
    pub off_peak_rs_per_kwh: f32,
    /// Morning peak window (inclusive hours).
    pub morning_peak: (u32, u32),
    /// Evening peak window (inclusive hours).
    pub evening_peak: (u32, u32),
    /// Export compensation as a fraction of the off-peak rate.
    pub export_price_factor: f32,
}

impl Default for TariffSchedule {
    fn default() -> Self {
        Self {
            peak_rs_per_kwh: 8.0,
            off_peak_rs_per_kwh: 5.0,
            morning_peak: (7, 11),
            evening_peak: (17, 21),
            export_price_factor: 0.8,
        }
    }
}

impl TariffSchedule {
    /// Whether the given hour falls in a peak window.
    pub fn is_peak(&self, hour: u32) -> bool {
        let (m0, m1) = self.morning_peak;
        let (e0, e1) = self.evening_peak;
        (m0..=m1).contains(&hour) || (e0..=e1).contains(&hour)
    }

    /// Import price for the given hour (Rs/kWh).
    pub fn import_rate(&self, hour: u32) -> f32 {
        if self.is_peak(hour) {
            self.peak_rs_per_kwh
        } else {
            self.off_peak_rs_per_kwh
        }
    }

    /// Export compensation rate (Rs/kWh), independent of hour.
    pub fn export_rate(&self) -> f32 {
        self.off_peak_rs_per_kwh * self.export_price_factor
    }
}

/// Battery and policy parameters for a dispatch run.
#[derive(Debug, Clone)]
pub struct DispatchParams {
    /// Battery capacity (kWh).
    pub capacity_kwh: f32,
    /// Maximum charge power (kW).
    pub max_charge_kw: f32,
    /// Maximum discharge power (kW).
    pub max_discharge_kw: f32,
    /// Planned SOC at the start of every run (%).
    pub initial_soc_pct: f32,
    /// SOC above which the plan stops charging (%).
    pub charge_target_pct: f32,
    /// SOC below which the plan stops discharging (%).
    pub discharge_floor_pct: f32,
    /// SOC reserve the discharge sizing protects (%).
    pub reserve_pct: f32,
    /// Wear cost per kWh of battery throughput (Rs/kWh).
    pub degradation_rs_per_kwh: f32,
    /// Residual power below this magnitude is not worth a grid entry (kW).
    pub residual_threshold_kw: f32,
}

impl Default for DispatchParams {
    fn default() -> Self {
        Self {
            capacity_kwh: 100.0,
            max_charge_kw: 25.0,
            max_discharge_kw: 25.0,
            initial_soc_pct: 65.0,
            charge_target_pct: 85.0,
            discharge_floor_pct: 30.0,
            reserve_pct: 20.0,
            degradation_rs_per_kwh: 0.75,
            residual_threshold_kw: 0.1,
        }
    }
}

/// State of charge of the optimizer's planned trajectory (%).
///
/// Deliberately distinct from the live loop's SOC type: a dispatch run
/// simulates its own day-ahead trajectory from a fixed starting point and
/// never reads or writes the live battery state.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct PlannedSoc(f32);

impl PlannedSoc {
    /// Wraps a percentage, clamped to [0, 100].
    pub fn new(pct: f32) -> Self {
        Self(pct.clamp(0.0, 100.0))
    }

    /// The SOC as a percentage.
    pub fn percent(&self) -> f32 {
        self.0
    }
}

/// Greedy, single-pass day-ahead dispatch planner.
///
/// Walks the forecast in order carrying a running planned SOC and decides,
/// for each hour, whether to charge, discharge, or idle the battery and how
/// much to import or export. Myopic by design: no lookahead, no reordering,
/// no optimality guarantee.
#[derive(Debug, Clone, Default)]
pub struct DispatchOptimizer {
    /// Battery and policy parameters.
    pub params: DispatchParams,
    /// Import/export pricing.
    pub tariff: TariffSchedule,
}

impl DispatchOptimizer {
    /// Creates an optimizer with the given parameters and tariff.
    pub fn new(params: DispatchParams, tariff: TariffSchedule) -> Self {
        Self { params, tariff }
    }

    /// Plans one dispatch result per forecast point.
    ///
    /// Each run is independent: the planned SOC always starts from
    /// `params.initial_soc_pct` and is folded forward through the forecast
    /// in order. An empty forecast yields an empty plan.
    pub fn optimize(&self, forecast: &[ForecastPoint]) -> Vec<OptimizationResult> {
        let start = PlannedSoc::new(self.params.initial_soc_pct);
        forecast
            .iter()
            .fold((start, Vec::with_capacity(forecast.len())), |(soc, mut results), point| {
                let (next, result) = self.step(soc, point);
                results.push(result);
                (next, results)
            })
            .1
    }

    /// Pure transition for one forecast hour.
    ///
    /// Returns the next planned SOC and the dispatch result for this hour.
    /// Output fields are rounded to two decimals; the returned SOC is not.
    pub fn step(&self, soc: PlannedSoc, point: &ForecastPoint) -> (PlannedSoc, OptimizationResult) {
        let p = &self.params;
        let hour = point.hour;

        let solar_kw = point.solar_w as f32 / 1000.0;
        let demand_kw = point.demand_w as f32 / 1000.0;
        let surplus_kw = solar_kw - demand_kw;

        let mut action = BatteryAction::Idle;
        let mut import_kw = 0.0;
        let mut export_kw = 0.0;
        let mut cost = 0.0;
        let mut next_soc = soc.percent();

        if surplus_kw > 0.0 {
            if soc.percent() < p.charge_target_pct {
                // Store as much surplus as rate and headroom allow.
                let headroom_kwh = (p.charge_target_pct - soc.percent()) * p.capacity_kwh / 100.0;
                let charge_kw = surplus_kw.min(p.max_charge_kw).min(headroom_kwh);
                next_soc += charge_kw / p.capacity_kwh * 100.0;
                action = BatteryAction::Charge;
                cost = charge_kw * p.degradation_rs_per_kwh;

                let residual_kw = surplus_kw - charge_kw;
                if residual_kw > p.residual_threshold_kw {
                    export_kw = residual_kw;
                    cost -= export_kw * self.tariff.export_rate();
                }
            } else {
                // Battery at target, sell the whole surplus.
                export_kw = surplus_kw;
                cost = -export_kw * self.tariff.export_rate();
            }
        } else {
            let deficit_kw = -surplus_kw;
            if deficit_kw > 0.0 && !self.tariff.is_peak(hour) && soc.percent() > p.discharge_floor_pct {
                let available_kwh = (soc.percent() - p.reserve_pct) * p.capacity_kwh / 100.0;
                let discharge_kw = deficit_kw.min(p.max_discharge_kw).min(available_kwh);
                next_soc -= discharge_kw / p.capacity_kwh * 100.0;
                action = BatteryAction::Discharge;
                cost = discharge_kw * p.degradation_rs_per_kwh;

                let residual_kw = deficit_kw - discharge_kw;
                if residual_kw > p.residual_threshold_kw {
                    import_kw = residual_kw;
                    cost += import_kw * self.tariff.import_rate(hour);
                }
            } else if deficit_kw > 0.0 {
                // Peak hour or battery too low: buy the whole deficit.
                import_kw = deficit_kw;
                cost = import_kw * self.tariff.import_rate(hour);
            }
        }

        let result = OptimizationResult {
            hour_label: point.hour_label(),
            hour,
            action,
            grid_import_kw: round2(import_kw),
            grid_export_kw: round2(export_kw),
            cost_rupees: round2(cost),
        };
        (PlannedSoc::new(next_soc), result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(hour: u32, solar_w: u32, demand_w: u32) -> ForecastPoint {
        ForecastPoint {
            hour,
            solar_w,
            demand_w,
            confidence_pct: 90,
        }
    }

    fn flat_forecast(solar_w: u32, demand_w: u32) -> Vec<ForecastPoint> {
        (0..24).map(|h| point(h, solar_w, demand_w)).collect()
    }

    #[test]
    fn tariff_peak_windows() {
        let tariff = TariffSchedule::default();
        for hour in 0..24 {
            let expected = (7..=11).contains(&hour) || (17..=21).contains(&hour);
            assert_eq!(tariff.is_peak(hour), expected, "hour {hour}");
        }
        assert_eq!(tariff.import_rate(8), 8.0);
        assert_eq!(tariff.import_rate(13), 5.0);
        assert_eq!(tariff.export_rate(), 4.0);
    }

    #[test]
    fn empty_forecast_yields_empty_plan() {
        let optimizer = DispatchOptimizer::default();
        assert!(optimizer.optimize(&[]).is_empty());
    }

    #[test]
    fn all_zero_forecast_is_all_idle_and_free() {
        let optimizer = DispatchOptimizer::default();
        let results = optimizer.optimize(&flat_forecast(0, 0));
        assert_eq!(results.len(), 24);
        for r in &results {
            assert_eq!(r.action, BatteryAction::Idle);
            assert_eq!(r.grid_import_kw, 0.0);
            assert_eq!(r.grid_export_kw, 0.0);
            assert_eq!(r.cost_rupees, 0.0);
        }
    }

    #[test]
    fn sustained_surplus_fills_battery_then_exports() {
        let optimizer = DispatchOptimizer::default();
        // 10 kW surplus every hour; SOC 65 → 75 → 85, then export only.
        let results = optimizer.optimize(&flat_forecast(10_000, 0));

        assert_eq!(results[0].action, BatteryAction::Charge);
        assert_eq!(results[1].action, BatteryAction::Charge);
        for r in &results[2..] {
            assert_eq!(r.action, BatteryAction::Idle);
            assert!((r.grid_export_kw - 10.0).abs() < 1e-3);
            assert!(r.cost_rupees < 0.0, "export hours earn revenue");
        }
        // Charging hours pay degradation only, no grid entry
        assert_eq!(results[0].grid_import_kw, 0.0);
        assert_eq!(results[0].grid_export_kw, 0.0);
        assert!((results[0].cost_rupees - 7.5).abs() < 1e-3);
    }

    #[test]
    fn charge_splits_surplus_when_rate_capped() {
        let optimizer = DispatchOptimizer::default();
        // 30 kW surplus: charge 25 kW (rate cap), export residual 5 kW.
        let (soc, r) = optimizer.step(PlannedSoc::new(50.0), &point(13, 30_000, 0));
        assert_eq!(r.action, BatteryAction::Charge);
        assert!((r.grid_export_kw - 5.0).abs() < 1e-3);
        assert_eq!(r.grid_import_kw, 0.0);
        // 25 kWh * 0.75 - 5 kWh * 4.0 = 18.75 - 20.0
        assert!((r.cost_rupees - -1.25).abs() < 1e-2);
        assert!((soc.percent() - 75.0).abs() < 1e-3);
    }

    #[test]
    fn off_peak_deficit_discharges_battery() {
        let optimizer = DispatchOptimizer::default();
        let (soc, r) = optimizer.step(PlannedSoc::new(65.0), &point(2, 0, 5_000));
        assert_eq!(r.action, BatteryAction::Discharge);
        assert_eq!(r.grid_import_kw, 0.0);
        assert!((r.cost_rupees - 5.0 * 0.75).abs() < 1e-3);
        assert!((soc.percent() - 60.0).abs() < 1e-3);
    }

    #[test]
    fn peak_deficit_imports_instead_of_discharging() {
        let optimizer = DispatchOptimizer::default();
        let (soc, r) = optimizer.step(PlannedSoc::new(65.0), &point(18, 0, 5_000));
        assert_eq!(r.action, BatteryAction::Idle);
        assert!((r.grid_import_kw - 5.0).abs() < 1e-3);
        assert!((r.cost_rupees - 40.0).abs() < 1e-3);
        assert_eq!(soc.percent(), 65.0);
    }

    #[test]
    fn low_battery_imports_even_off_peak() {
        let optimizer = DispatchOptimizer::default();
        let (soc, r) = optimizer.step(PlannedSoc::new(30.0), &point(2, 0, 5_000));
        assert_eq!(r.action, BatteryAction::Idle);
        assert!((r.grid_import_kw - 5.0).abs() < 1e-3);
        assert!((r.cost_rupees - 25.0).abs() < 1e-3);
        assert_eq!(soc.percent(), 30.0);
    }

    #[test]
    fn deep_deficit_discharges_then_imports_residual() {
        let optimizer = DispatchOptimizer::default();
        // 40 kW deficit off-peak: discharge 25 kW, import 15 kW at 5 Rs.
        let (_, r) = optimizer.step(PlannedSoc::new(80.0), &point(2, 0, 40_000));
        assert_eq!(r.action, BatteryAction::Discharge);
        assert!((r.grid_import_kw - 15.0).abs() < 1e-3);
        assert!((r.cost_rupees - (25.0 * 0.75 + 15.0 * 5.0)).abs() < 1e-2);
    }

    #[test]
    fn tiny_residual_below_threshold_is_dropped() {
        let optimizer = DispatchOptimizer::default();
        // 25.05 kW surplus: charge 25, residual 0.05 < 0.1 → no export row.
        let (_, r) = optimizer.step(PlannedSoc::new(50.0), &point(13, 25_050, 0));
        assert_eq!(r.grid_export_kw, 0.0);
        assert_eq!(r.action, BatteryAction::Charge);
    }

    #[test]
    fn import_and_export_are_mutually_exclusive() {
        let optimizer = DispatchOptimizer::default();
        for solar in [0u32, 1_000, 5_000, 20_000, 40_000] {
            for demand in [0u32, 800, 2_500, 12_000] {
                let results = optimizer.optimize(&flat_forecast(solar, demand));
                for r in &results {
                    assert!(
                        r.grid_import_kw == 0.0 || r.grid_export_kw == 0.0,
                        "solar={solar} demand={demand} hour={}",
                        r.hour
                    );
                }
            }
        }
    }

    #[test]
    fn soc_carries_unrounded_across_steps() {
        let optimizer = DispatchOptimizer::default();
        // Repeated odd charge amounts must accumulate exactly, not via the
        // 2-decimal output values.
        let forecast: Vec<ForecastPoint> = (0..3).map(|h| point(h, 1_234, 0)).collect();
        let mut soc = PlannedSoc::new(65.0);
        for p in &forecast {
            let (next, _) = optimizer.step(soc, p);
            soc = next;
        }
        let expected = 65.0 + 3.0 * (1.234 / 100.0 * 100.0);
        assert!((soc.percent() - expected).abs() < 1e-4);
    }

    #[test]
    fn discharge_respects_reserve_sizing() {
        let optimizer = DispatchOptimizer::default();
        // SOC 31: available = (31-20) kWh = 11, deficit 20 → discharge 11.
        let (soc, r) = optimizer.step(PlannedSoc::new(31.0), &point(2, 0, 20_000));
        assert_eq!(r.action, BatteryAction::Discharge);
        assert!((r.grid_import_kw - 9.0).abs() < 1e-3);
        assert!((soc.percent() - 20.0).abs() < 1e-3);
    }
}
