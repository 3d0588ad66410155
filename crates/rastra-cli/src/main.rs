//! rastra: run image transform scripts.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rastra_cli::{CliConfig, CommandError, Session};
use tracing_subscriber::EnvFilter;

/// Run a script of image commands, or read commands from stdin.
#[derive(Parser, Debug)]
#[command(name = "rastra")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXIT CODES:
    0 - Every command succeeded
    1 - At least one command failed
    2 - Setup error (bad config, unreadable script)")]
struct Cli {
    /// Script to run; commands are read from stdin when omitted
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log filter, e.g. "info" or "rastra_codec=debug"
    #[arg(long, value_name = "LEVEL")]
    log: Option<String>,

    /// Print each command before running it
    #[arg(long)]
    echo: bool,

    /// Stop at the first failing command
    #[arg(long)]
    stop_on_error: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match CliConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };
    if let Some(log) = cli.log {
        config.log_filter = log;
    }
    config.echo_commands |= cli.echo;
    config.stop_on_error |= cli.stop_on_error;

    init_logging(&config.log_filter);

    let mut session = Session::new(config);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = match &cli.script {
        Some(path) => session.run_file(path, &mut out),
        None => session.run_script(io::stdin().lock(), &mut out),
    };

    match result {
        Ok(()) | Err(CommandError::Aborted) if session.failures() == 0 => ExitCode::SUCCESS,
        Ok(()) | Err(CommandError::Aborted) => ExitCode::from(1),
        Err(e) => {
            tracing::error!("{e}");
            println!("error: {e}");
            ExitCode::from(2)
        }
    }
}

/// Install a stderr subscriber so stdout carries only command output.
fn init_logging(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|e| {
        eprintln!("warning: bad log filter {filter:?} ({e}), using \"warn\"");
        EnvFilter::new("warn")
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
