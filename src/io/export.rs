//! CSV export for telemetry readings and dispatch schedules.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::{EnergyReading, OptimizationResult};

/// Column header for telemetry readings export.
const READINGS_HEADER: &str = "timestamp,solar_w,wind_w,battery_soc_pct,battery_voltage,\
                               grid_w,demand_w,temperature_c,cloud_cover_pct";

/// Column header for dispatch schedule export.
const SCHEDULE_HEADER: &str = "hour_label,hour,action,grid_import_kw,grid_export_kw,cost_rupees";

/// Exports telemetry readings to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_readings_csv(readings: &[EnergyReading], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_readings_csv(readings, buf)
}

/// Writes telemetry readings as CSV to any writer.
///
/// One row per reading, RFC 3339 timestamps, deterministic output for
/// identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_readings_csv(readings: &[EnergyReading], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(READINGS_HEADER.split(',').map(str::trim))?;

    for r in readings {
        wtr.write_record(&[
            r.timestamp.to_rfc3339(),
            format!("{:.1}", r.solar_w),
            format!("{:.1}", r.wind_w),
            format!("{:.2}", r.battery_soc_pct),
            format!("{:.2}", r.battery_voltage),
            format!("{:.1}", r.grid_w),
            format!("{:.1}", r.demand_w),
            format!("{:.1}", r.temperature_c),
            format!("{:.1}", r.cloud_cover_pct),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports a dispatch schedule to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_schedule_csv(results: &[OptimizationResult], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_schedule_csv(results, buf)
}

/// Writes a dispatch schedule as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_schedule_csv(results: &[OptimizationResult], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(SCHEDULE_HEADER.split(','))?;

    for r in results {
        wtr.write_record(&[
            r.hour_label.clone(),
            r.hour.to_string(),
            r.action.as_str().to_string(),
            format!("{:.2}", r.grid_import_kw),
            format!("{:.2}", r.grid_export_kw),
            format!("{:.2}", r.cost_rupees),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::types::BatteryAction;
    use chrono::{Local, TimeZone};

    fn reading(hour: u32) -> EnergyReading {
        EnergyReading {
            timestamp: Local.with_ymd_and_hms(2025, 6, 2, hour, 0, 0).unwrap(),
            solar_w: 1800.0,
            wind_w: 450.0,
            battery_soc_pct: 65.0,
            battery_voltage: 48.75,
            grid_w: -120.0,
            demand_w: 1400.0,
            temperature_c: 29.5,
            cloud_cover_pct: 35.0,
        }
    }

    fn result(hour: u32) -> OptimizationResult {
        OptimizationResult {
            hour_label: format!("{hour}:00"),
            hour,
            action: BatteryAction::Charge,
            grid_import_kw: 0.0,
            grid_export_kw: 1.25,
            cost_rupees: -3.5,
        }
    }

    #[test]
    fn readings_header_and_row_count() {
        let readings: Vec<EnergyReading> = (0..24).map(reading).collect();
        let mut buf = Vec::new();
        write_readings_csv(&readings, &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        let lines: Vec<&str> = output.as_deref().unwrap_or("").lines().collect();
        assert_eq!(lines.len(), 25);
        assert!(lines[0].starts_with("timestamp,solar_w,wind_w"));
    }

    #[test]
    fn schedule_header_and_row_count() {
        let results: Vec<OptimizationResult> = (0..24).map(result).collect();
        let mut buf = Vec::new();
        write_schedule_csv(&results, &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        let lines: Vec<&str> = output.as_deref().unwrap_or("").lines().collect();
        assert_eq!(lines.len(), 25);
        assert_eq!(
            lines[0],
            "hour_label,hour,action,grid_import_kw,grid_export_kw,cost_rupees"
        );
    }

    #[test]
    fn deterministic_output() {
        let results: Vec<OptimizationResult> = (0..5).map(result).collect();
        let mut buf1 = Vec::new();
        let mut buf2 = Vec::new();
        write_schedule_csv(&results, &mut buf1).ok();
        write_schedule_csv(&results, &mut buf2).ok();
        assert_eq!(buf1, buf2);
    }

    #[test]
    fn schedule_rows_parse_back() {
        let results: Vec<OptimizationResult> = (0..3).map(result).collect();
        let mut buf = Vec::new();
        write_schedule_csv(&results, &mut buf).ok();

        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let mut rows = 0;
        for record in rdr.records() {
            let rec = record.ok();
            assert!(rec.is_some(), "every row should parse");
            let rec = rec.as_ref();
            let hour: Result<u32, _> = rec.unwrap()[1].parse();
            assert!(hour.is_ok());
            for i in 3..6 {
                let val: Result<f32, _> = rec.unwrap()[i].parse();
                assert!(val.is_ok(), "column {i} should parse as f32");
            }
            rows += 1;
        }
        assert_eq!(rows, 3);
    }
}
