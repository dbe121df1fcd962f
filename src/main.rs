//! taskrank - rank tasks by priority from the command line

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = taskrank::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
