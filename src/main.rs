//! Binary entrypoint for the `gitree` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // Recording and replay are handled in commands::dispatch via
    // GITREE_RECORD=<dir> and GITREE_REPLAY=<cassette>.
    match gitree::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
