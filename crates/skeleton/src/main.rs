mod cli;

use std::process::ExitCode;

use clap::Parser;
use skeleton_core::kernel::constants::DEFAULT_LOG_DIRECTIVE;
use skeleton_core::logging;

use crate::cli::CliArgs;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    let log = match logging::init(args.log_format, DEFAULT_LOG_DIRECTIVE) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    match cli::run(args, log).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
