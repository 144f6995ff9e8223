use super::*;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{
    config::parse_config,
    modules::extract::{extract_style, ExtractOptions},
};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct ExtractCliStruct {
    // This is just dummy command because we are already in the command
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Extract {
        /// Sets path to the style file
        path: PathBuf,
        /// Sets the output directory, defaults to the style file name
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Writes tile graphics
        #[arg(long)]
        tiles: bool,
        /// Writes sprite graphics
        #[arg(long)]
        sprites: bool,
        /// Writes sprite delta frames
        #[arg(long)]
        deltas: bool,
    },
}

pub struct Extract;
impl Cli for Extract {
    fn name(&self) -> &'static str {
        "extract"
    }

    fn cli(&self) -> CliRes {
        let cli = ExtractCliStruct::parse();

        let Commands::Extract {
            path,
            output,
            tiles,
            sprites,
            deltas,
        } = cli.command;

        let output = match output {
            Some(output) => output,
            None => {
                let Some(stem) = path.file_stem() else {
                    println!("Cannot derive an output folder from {}", path.display());
                    self.cli_help();
                    return CliRes::Err;
                };

                let config = match parse_config() {
                    Ok(config) => config,
                    Err(_) => {
                        println!("Error parsing config.toml");
                        return CliRes::Err;
                    }
                };

                config
                    .output_dir
                    .map(PathBuf::from)
                    .unwrap_or_default()
                    .join(stem)
            }
        };

        // with no category picked, write everything
        let all = !tiles && !sprites && !deltas;

        let options = ExtractOptions {
            output,
            tiles: tiles || all,
            sprites: sprites || all,
            deltas: deltas || all,
        };

        match extract_style(&path, &options) {
            Ok(_) => CliRes::Ok,
            Err(err) => {
                println!("Error extracting style file: {}", err);
                CliRes::Err
            }
        }
    }

    fn cli_help(&self) {
        println!(
            "\
Decodes a GBST style file and writes its graphics as .png files.

<.sty> [-o <output folder>] [--tiles] [--sprites] [--deltas]
"
        )
    }
}
