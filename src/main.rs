use std::process::ExitCode;

use clap::Parser;
use epigrid::runner::{run_with_args, Args};

fn main() -> ExitCode {
    match run_with_args(Args::parse()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("epigrid: {error}");
            ExitCode::FAILURE
        }
    }
}
