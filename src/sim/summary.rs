//! Post-hoc aggregation of a dispatch run.

use std::fmt;

use super::types::{BatteryAction, OptimizationResult};

/// Aggregate figures for one day-ahead dispatch plan.
///
/// Computed post-hoc from the result vector so the table and the summary
/// can never disagree.
#[derive(Debug, Clone)]
pub struct ScheduleSummary {
    /// Net cost over the plan (Rs; negative = net revenue).
    pub total_cost_rs: f32,
    /// Total energy imported (kWh, hourly steps).
    pub import_kwh: f32,
    /// Total energy exported (kWh, hourly steps).
    pub export_kwh: f32,
    /// Largest single-hour import (kW).
    pub peak_import_kw: f32,
    /// Hours planned as charge.
    pub charge_hours: usize,
    /// Hours planned as discharge.
    pub discharge_hours: usize,
    /// Hours planned as idle.
    pub idle_hours: usize,
}

impl ScheduleSummary {
    /// Computes the summary from a complete plan.
    pub fn from_results(results: &[OptimizationResult]) -> Self {
        let mut total_cost_rs = 0.0;
        let mut import_kwh = 0.0;
        let mut export_kwh = 0.0;
        let mut peak_import_kw = 0.0_f32;
        let mut charge_hours = 0;
        let mut discharge_hours = 0;
        let mut idle_hours = 0;

        for r in results {
            total_cost_rs += r.cost_rupees;
            import_kwh += r.grid_import_kw;
            export_kwh += r.grid_export_kw;
            peak_import_kw = peak_import_kw.max(r.grid_import_kw);
            match r.action {
                BatteryAction::Charge => charge_hours += 1,
                BatteryAction::Discharge => discharge_hours += 1,
                BatteryAction::Idle => idle_hours += 1,
            }
        }

        Self {
            total_cost_rs,
            import_kwh,
            export_kwh,
            peak_import_kw,
            charge_hours,
            discharge_hours,
            idle_hours,
        }
    }
}

impl fmt::Display for ScheduleSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Dispatch Summary ---")?;
        writeln!(f, "Net cost:        {:.2} Rs", self.total_cost_rs)?;
        writeln!(f, "Grid import:     {:.2} kWh", self.import_kwh)?;
        writeln!(f, "Grid export:     {:.2} kWh", self.export_kwh)?;
        writeln!(f, "Peak import:     {:.2} kW", self.peak_import_kw)?;
        write!(
            f,
            "Battery hours:   {} charge / {} discharge / {} idle",
            self.charge_hours, self.discharge_hours, self.idle_hours
        )
    }
}
