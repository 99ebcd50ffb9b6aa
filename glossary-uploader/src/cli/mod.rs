//! Command line interface

pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::config::ConnectionOverrides;

use commands::{delete_all::DeleteAllArgs, init::InitArgs, upload::UploadArgs};

#[derive(Parser)]
#[command(name = "glossary-uploader")]
#[command(version, about = "Upload public data standard glossaries to a metadata catalog")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub server: ServerArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the glossary (or update it if it already exists)
    Init(InitArgs),

    /// Upload the terms of one workbook sheet into a glossary
    Upload(UploadArgs),

    /// Delete every term of a glossary
    #[command(alias = "delete_all")]
    DeleteAll(DeleteAllArgs),
}

/// Connection options shared by every command
#[derive(clap::Args, Clone, Debug, Default)]
pub struct ServerArgs {
    /// Catalog server root, e.g. http://localhost:8585
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// JWT bearer token
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// API version segment
    #[arg(long, global = true)]
    pub api_version: Option<String>,

    /// Do not check the server version before running
    #[arg(long, global = true)]
    pub skip_version_check: bool,

    /// Settings file (default: <config dir>/glossary-uploader/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

impl ServerArgs {
    pub fn overrides(&self) -> ConnectionOverrides {
        ConnectionOverrides {
            server: self.server.clone(),
            token: self.token.clone(),
            api_version: self.api_version.clone(),
            skip_version_check: self.skip_version_check,
        }
    }
}

/// Process exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Ok,
    Error,
    Interrupted,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        match exit {
            Exit::Ok => ExitCode::SUCCESS,
            Exit::Error => ExitCode::from(1),
            Exit::Interrupted => ExitCode::from(2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::SourceType;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_upload() {
        let cli = Cli::try_parse_from([
            "glossary-uploader",
            "upload",
            "--name",
            "PublicDataStandards",
            "--type",
            "excel",
            "--path",
            "standard.xlsx",
            "--sheet-name",
            "공통표준용어",
            "--server",
            "http://localhost:8585",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.server.server.as_deref(), Some("http://localhost:8585"));
        match cli.command {
            Commands::Upload(args) => {
                assert_eq!(args.name, "PublicDataStandards");
                assert_eq!(args.source_type, SourceType::Excel);
                assert_eq!(args.sheet_name, "공통표준용어");
                assert!(!args.dry_run);
            }
            _ => panic!("expected upload"),
        }
    }

    #[test]
    fn test_delete_all_alias() {
        let cli = Cli::try_parse_from(["glossary-uploader", "delete_all", "--name", "G"]).unwrap();
        assert!(matches!(cli.command, Commands::DeleteAll(_)));

        let cli = Cli::try_parse_from([
            "glossary-uploader",
            "delete-all",
            "--name",
            "G",
            "--hard-delete",
        ])
        .unwrap();
        match cli.command {
            Commands::DeleteAll(args) => assert!(args.hard_delete),
            _ => panic!("expected delete-all"),
        }
    }
}
