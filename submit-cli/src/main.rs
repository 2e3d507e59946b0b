//! `submit` command-line entry point

use clap::Parser;
use std::process::ExitCode;
use submit_cli::commands::SubmitArgs;

fn main() -> ExitCode {
    let args = SubmitArgs::parse();
    args.init_logging();

    log::debug!("Arguments: {:?}", args);

    match args.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
