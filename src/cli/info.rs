use super::*;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::modules::info::style_info;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct InfoCliStruct {
    // This is just dummy command because we are already in the command
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Info {
        /// Sets path to the style file
        path: PathBuf,
    },
}

pub struct Info;
impl Cli for Info {
    fn name(&self) -> &'static str {
        "info"
    }

    fn cli(&self) -> CliRes {
        let cli = InfoCliStruct::parse();

        let Commands::Info { path } = cli.command;

        match style_info(&path) {
            Ok(_) => CliRes::Ok,
            Err(err) => {
                println!("Error reading style file: {}", err);
                CliRes::Err
            }
        }
    }

    fn cli_help(&self) {
        println!(
            "\
Prints the asset tables of a GBST style file.

<.sty>
"
        )
    }
}
