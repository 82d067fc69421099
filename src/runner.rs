//! Command-line entry point: load a parameter file, run the simulation, write the history.
use std::path::PathBuf;

use clap::Parser;
use log::info;

use crate::error::EpiError;
use crate::log::apply_log_spec;
use crate::parameters::Parameters;
use crate::report::{write_history, ReportOptions};
use crate::simulation::Simulation;

#[derive(Parser, Debug)]
#[command(name = "epigrid", version, about)]
pub struct Args {
    /// Path to the JSON parameter file
    #[arg(short, long)]
    pub config: PathBuf,

    /// Random seed
    #[arg(short, long, default_value = "0")]
    pub random_seed: u64,

    /// Directory for the history report. No report is written without it
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Prefix for the report file name
    #[arg(long, default_value = "")]
    pub file_prefix: String,

    /// Replace an existing report file
    #[arg(short, long)]
    pub force_overwrite: bool,

    /// Override the run budget from the parameter file
    #[arg(long)]
    pub cycles: Option<usize>,

    /// Log level, e.g. `info` or `epigrid::controller=debug,warn`
    #[arg(short, long)]
    pub log_level: Option<String>,
}

/// Runs a simulation as described by `args` and returns it after the run.
///
/// # Errors
/// Returns an error if the log specification or parameter file is invalid, or if the report
/// cannot be written. Parameter errors are reported before any tick runs.
pub fn run_with_args(args: Args) -> Result<Simulation, EpiError> {
    if let Some(spec) = &args.log_level {
        apply_log_spec(spec)?;
    }

    info!("loading parameters from {}", args.config.display());
    let mut parameters = Parameters::from_json_file(&args.config)?;
    if let Some(cycles) = args.cycles {
        parameters.cycles = cycles;
    }

    let mut simulation = Simulation::new(parameters, args.random_seed)?;
    println!("Population: {}", simulation.population().len());
    println!("Free beds in the hospital: {}", simulation.bed_capacity());

    simulation.run();

    if let Some(output_dir) = args.output_dir {
        let mut options = ReportOptions::new();
        options
            .directory(output_dir)
            .file_prefix(args.file_prefix)
            .overwrite(args.force_overwrite);
        write_history(simulation.history(), &options)?;
    }

    println!("Total deaths: {}", simulation.counts().deaths);
    Ok(simulation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const CONFIG: &str = r#"{
        "grid_width": 20,
        "grid_height": 20,
        "density": 0.5,
        "initial_infected": 0.1,
        "recovery_period": 30,
        "infect_rate": 0.2,
        "critical_rate": 0.15,
        "hospital_capacity_rate": 0.1,
        "immunity_chance": 1.0,
        "quarantine_rate": 0.6,
        "hospital_period": 40,
        "die_in_hospital_rate": 0.001,
        "lockdown_policy": {"kind": "case_threshold"},
        "rate_basis": "per_episode",
        "cycles": 500
    }"#;

    fn args_for(config: PathBuf) -> Args {
        Args {
            config,
            random_seed: 42,
            output_dir: None,
            file_prefix: String::new(),
            force_overwrite: false,
            cycles: Some(25),
            log_level: None,
        }
    }

    #[test]
    fn cycles_flag_overrides_parameter_file() {
        let temp_dir = tempdir().unwrap();
        let config = temp_dir.path().join("params.json");
        fs::write(&config, CONFIG).unwrap();

        let simulation = run_with_args(args_for(config)).unwrap();
        assert_eq!(simulation.current_cycle(), 25);
        assert_eq!(simulation.seed(), 42);
    }

    #[test]
    fn writes_report_when_output_dir_given() {
        let temp_dir = tempdir().unwrap();
        let config = temp_dir.path().join("params.json");
        fs::write(&config, CONFIG).unwrap();

        let args = Args {
            output_dir: Some(temp_dir.path().join("out")),
            file_prefix: "seed42_".to_string(),
            ..args_for(config)
        };
        run_with_args(args).unwrap();

        let mut reader =
            csv::Reader::from_path(temp_dir.path().join("out").join("seed42_history.csv"))
                .unwrap();
        assert_eq!(reader.records().count(), 25);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let result = run_with_args(args_for(temp_dir.path().join("absent.json")));
        assert!(matches!(result, Err(EpiError::IoError(_))));
    }

    #[test]
    fn parses_command_line() {
        let args = Args::try_parse_from([
            "epigrid",
            "--config",
            "params.json",
            "-r",
            "7",
            "--cycles",
            "10",
            "--log-level",
            "info",
        ])
        .unwrap();
        assert_eq!(args.config, PathBuf::from("params.json"));
        assert_eq!(args.random_seed, 7);
        assert_eq!(args.cycles, Some(10));
        assert_eq!(args.log_level.as_deref(), Some("info"));
        assert!(args.output_dir.is_none());
    }

    #[test]
    fn config_is_required() {
        assert!(Args::try_parse_from(["epigrid"]).is_err());
    }
}
