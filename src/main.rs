//! `go-mod-what`: print the versions of dependencies declared in a `go.mod`.

use std::process::ExitCode;

mod cli;
use cli::Cli;

fn main() -> ExitCode {
    let result = Cli::try_parse_go_style(std::env::args_os())
        .map_err(cli::Error::from)
        .and_then(Cli::run);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error.report();
            ExitCode::FAILURE
        }
    }
}
