//! CLI binary for the eisenhower matrix store.
//!
//! A thin wrapper: parse arguments, delegate to the library, report
//! errors on stderr.

use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = eisenhower::cli::Cli::parse();

    match eisenhower::cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
