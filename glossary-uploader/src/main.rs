use std::process::ExitCode;

use clap::Parser;
use colored::*;
use log::{debug, warn};

use glossary_uploader::cli::{self, Cli, Exit};
use glossary_uploader::logging;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init(cli.verbose);

    let exit = tokio::select! {
        result = cli::commands::run(cli) => match result {
            Ok(()) => Exit::Ok,
            Err(err) => {
                debug!(target: logging::CLI, "{:?}", err);
                eprintln!("{} {:#}", "Error:".bright_red().bold(), err);
                Exit::Error
            }
        },
        _ = tokio::signal::ctrl_c() => {
            warn!(target: logging::CLI, "Interrupted, shutting down");
            eprintln!("{}", "Interrupted".yellow());
            Exit::Interrupted
        }
    };

    exit.into()
}
