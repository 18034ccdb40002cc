use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod error;
mod fetch;
mod layout;
mod payload;
mod position;
mod reconcile;
mod report;
mod workflow;

use cli::Args;

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match workflow::run(&args) {
        Ok(summary) => {
            if let Some(warning) = workflow::extra_positions_warning(&summary.extra_positions) {
                eprintln!("{warning}");
            }
            println!("{}", workflow::summary_line(&summary));
            ExitCode::from(workflow::EXIT_SUCCESS)
        }
        Err(err) => {
            eprintln!("ERROR: {err:#}");
            ExitCode::from(workflow::exit_code_for(&err))
        }
    }
}

/// Diagnostics go to stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "warn,rackmatch=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();
}
