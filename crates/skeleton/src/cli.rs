use std::path::PathBuf;

use clap::{Parser, Subcommand};
use skeleton_core::kernel::constants::DEFAULT_CONFIG_PATH;
use skeleton_core::kernel::{AppMode, ShutdownReport};
use skeleton_core::logging::{LogFormat, LogHandle};
use skeleton_core::registry::Named;
use skeleton_core::Result;

/// Skeleton: a web API and job scheduler on one provider-driven core
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Settings file (TOML, YAML or JSON)
    #[arg(long, short, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Log line format
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Serve HTTP until interrupted
    Serve,
    /// Run scheduled jobs until interrupted
    Schedule,
    /// Boot in web mode and list the registered route groups
    Routes,
    /// Boot in scheduler mode and list the scheduled jobs
    Jobs,
}

impl Command {
    fn mode(self) -> AppMode {
        match self {
            Command::Serve | Command::Routes => AppMode::Web,
            Command::Schedule | Command::Jobs => AppMode::Scheduler,
        }
    }
}

pub async fn run(args: CliArgs, log: LogHandle) -> Result<()> {
    let mut app = skeleton::application(args.command.mode(), &args.config, log);
    app.boot().await?;

    match args.command {
        Command::Serve | Command::Schedule => {
            let report = app.start().await?;
            print_report(&report);
        }
        Command::Routes => {
            println!("Route groups:");
            for name in app.routes().names() {
                println!("  - {name}");
            }
        }
        Command::Jobs => {
            let jobs = app.load_jobs()?;
            println!("{:<16} {:<16} {}", "NAME", "SCHEDULE", "ENABLED");
            for job in jobs.iter() {
                println!("{:<16} {:<16} {}", job.name(), job.cron(), job.is_enabled());
            }
        }
    }
    Ok(())
}

fn print_report(report: &ShutdownReport) {
    if report.is_clean() {
        log::info!("Application stopped gracefully");
    } else {
        for failure in &report.failures {
            log::warn!("Shutdown hook '{}' failed: {}", failure.hook, failure.error);
        }
    }
}
