//! Bone Mirror CLI - Command-line interface for skeletal pose mirroring
//!
//! This binary provides commands for inspecting the mirror pairs and flip
//! rules inferred from a skeleton, and for mirroring pose documents.

use clap::Parser;
use std::process::ExitCode;

mod cli_args;

use bonemirror_cli::{commands, logger};
use cli_args::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = logger::init(cli.verbose) {
        eprintln!("{}: {}", colored::Colorize::yellow("warning"), e);
    }

    let result = match cli.command {
        Commands::Pairs { input, json } => commands::pairs::run(
            &input.skeleton,
            input.config.as_deref(),
            input.plane,
            json,
        ),
        Commands::Rules { input, json } => commands::rules::run(
            &input.skeleton,
            input.config.as_deref(),
            input.plane,
            json,
        ),
        Commands::Mirror {
            input,
            pose,
            output,
            pretty,
        } => commands::mirror::run(
            &input.skeleton,
            &pose,
            input.config.as_deref(),
            input.plane,
            output.as_deref(),
            pretty,
        ),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
