mod cli;
mod config;
pub mod modules;
pub mod utils;

use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let cli_res = cli::cli();

    let err_exit = ExitCode::from(1);
    let ok_exit = ExitCode::from(0);

    match cli_res {
        cli::CliRes::NoCli | cli::CliRes::Ok => ok_exit,
        cli::CliRes::Err => err_exit,
    }
}
