//! skysense CLI entry point.

use clap::Parser;
use sky_core::cli::{run, Cli};
use sky_core::ExitCode;

fn main() {
    let code = match Cli::try_parse() {
        Ok(cli) => run(&cli),
        Err(err) => {
            let _ = err.print();
            if err.use_stderr() {
                ExitCode::InputError
            } else {
                ExitCode::Clean
            }
        }
    };
    std::process::exit(code.as_i32());
}
