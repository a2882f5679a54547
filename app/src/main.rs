//! FILENAME: app/src/main.rs
// PURPOSE: Command-line entry point.
// FORMAT: seq|level|category|message (log lines on stderr)

use clap::Parser;
use dashboard_lib::cli::{run, Cli};
use dashboard_lib::log_error;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        log_error!("CLI", "{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
