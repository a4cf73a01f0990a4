//! axpilot CLI
//!
//! Drives one command against a running GUI application located by PID:
//!
//!   axpilot <pid> wait
//!   axpilot <pid> mouse m <abs|rel> X Y
//!   axpilot <pid> mouse b1c
//!   axpilot <pid> query-screen-size W H
//!   axpilot <pid> take-screenshot PATH
//!   axpilot <pid> focus
//!   axpilot <pid> key|key-down|key-up KEYSYM
//!   axpilot <pid> resize W H
//!
//! Exit codes: 0 success, 1 failure (init/lookup/timeout/external call),
//! 2 unknown command, 3/4 query-screen-size match/mismatch.

use axpilot::{
    create_backend, CommandParseError, Driver, DriverCommand, ExitStatus, MonitorCapturer,
    XdotoolInjector,
};
use clap::Parser;
use std::process;
use tracing::debug;

#[derive(Parser)]
#[command(name = "axpilot")]
#[command(version)]
#[command(about = "Accessibility-driven GUI test driver")]
struct Cli {
    /// Process ID of the target application
    pid: u32,

    /// Command to run against the application's drawing surface
    command: String,

    /// Command arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let command = match DriverCommand::parse(&cli.command, &cli.args) {
        Ok(command) => command,
        Err(e @ CommandParseError::UnknownCommand(_)) => {
            eprintln!("{e}");
            process::exit(ExitStatus::UnknownCommand.code());
        }
        Err(e) => {
            eprintln!("{e}");
            process::exit(ExitStatus::Failure.code());
        }
    };
    debug!(pid = cli.pid, ?command, "dispatching");

    let backend = match create_backend() {
        Ok(backend) => backend,
        Err(e) => {
            eprintln!("{e}");
            process::exit(ExitStatus::Failure.code());
        }
    };

    let driver = Driver::new(
        backend,
        Box::new(XdotoolInjector::default()),
        Box::new(MonitorCapturer),
    );

    match driver.run(cli.pid, &command) {
        Ok(status) => process::exit(status.code()),
        Err(e) => {
            eprintln!("{e}");
            process::exit(ExitStatus::Failure.code());
        }
    }
}
