use colored::Colorize;
use std::process::ExitCode;

fn main() -> ExitCode {
    match log_triage::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
