//! Microgrid simulator entry point: CLI wiring and scenario execution.

use std::path::Path;
use std::process;

use microgrid_sim::config::ScenarioConfig;
use microgrid_sim::io::export::{export_readings_csv, export_schedule_csv};
use microgrid_sim::runner::run_scenario;
use microgrid_sim::sim::clock::SystemClock;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    seed_override: Option<u64>,
    ticks_override: Option<usize>,
    readings_out: Option<String>,
    schedule_out: Option<String>,
}

fn print_help() {
    eprintln!("microgrid-sim: microgrid telemetry simulator and day-ahead dispatch planner");
    eprintln!();
    eprintln!("Usage: microgrid-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>       Load scenario from TOML config file");
    eprintln!("  --preset <name>         Use a built-in preset (baseline, monsoon, high_solar)");
    eprintln!("  --seed <u64>            Override random seed");
    eprintln!("  --ticks <n>             Override number of telemetry ticks");
    eprintln!("  --readings-out <path>   Export telemetry readings to CSV");
    eprintln!("  --schedule-out <path>   Export dispatch schedule to CSV");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        seed_override: None,
        ticks_override: None,
        readings_out: None,
        schedule_out: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --scenario requires a path argument");
                    process::exit(1);
                }
                cli.scenario_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--seed" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --seed requires a u64 argument");
                    process::exit(1);
                }
                if let Ok(s) = args[i].parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{}\" is not a valid u64", args[i]);
                    process::exit(1);
                }
            }
            "--ticks" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --ticks requires a number argument");
                    process::exit(1);
                }
                if let Ok(n) = args[i].parse::<usize>() {
                    cli.ticks_override = Some(n);
                } else {
                    eprintln!("error: --ticks value \"{}\" is not a valid number", args[i]);
                    process::exit(1);
                }
            }
            "--readings-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --readings-out requires a path argument");
                    process::exit(1);
                }
                cli.readings_out = Some(args[i].clone());
            }
            "--schedule-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --schedule-out requires a path argument");
                    process::exit(1);
                }
                cli.schedule_out = Some(args[i].clone());
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn main() {
    let cli = parse_args();

    // Load config: --scenario takes priority, then --preset, then baseline
    let mut scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::baseline()
    };

    // Apply overrides
    if let Some(seed) = cli.seed_override {
        scenario.simulation.seed = seed;
    }
    if let Some(ticks) = cli.ticks_override {
        scenario.simulation.ticks = ticks;
    }

    // Validate
    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    // Run
    let out = run_scenario(&scenario, &SystemClock);

    println!("--- Telemetry ({} ticks) ---", out.readings.len());
    for r in &out.readings {
        println!("{r}");
    }

    println!("\n--- Day-ahead dispatch plan ---");
    for r in &out.schedule {
        println!("{r}");
    }

    println!("\n{}", out.summary);

    // Export CSVs if requested
    if let Some(ref path) = cli.readings_out {
        if let Err(e) = export_readings_csv(&out.readings, Path::new(path)) {
            eprintln!("error: failed to write readings CSV: {e}");
            process::exit(1);
        }
        eprintln!("Readings written to {path}");
    }
    if let Some(ref path) = cli.schedule_out {
        if let Err(e) = export_schedule_csv(&out.schedule, Path::new(path)) {
            eprintln!("error: failed to write schedule CSV: {e}");
            process::exit(1);
        }
        eprintln!("Schedule written to {path}");
    }
}
