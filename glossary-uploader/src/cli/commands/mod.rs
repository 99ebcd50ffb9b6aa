//! Command handlers

pub mod delete_all;
pub mod init;
pub mod upload;

use anyhow::{Context, Result};
use colored::*;
use log::info;

use super::{Cli, Commands, ServerArgs};
use crate::api::{CatalogClient, Glossary};
use crate::config::Settings;
use crate::logging;

/// Run the parsed command line
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init(args) => init::handle_init_command(args, &cli.server).await,
        Commands::Upload(args) => upload::handle_upload_command(args, &cli.server).await,
        Commands::DeleteAll(args) => {
            delete_all::handle_delete_all_command(args, &cli.server).await
        }
    }
}

/// Resolve settings and open a client to the catalog server
async fn connect(server: &ServerArgs) -> Result<CatalogClient> {
    let settings = Settings::load(server.config.as_deref())?;
    let connection = settings
        .server_connection(&server.overrides(), |key| std::env::var(key).ok())
        .context("Failed to resolve server connection")?;

    info!(target: logging::CLI, "Connecting to {}", connection.host_port);
    println!("Server: {}", connection.host_port.cyan());

    CatalogClient::connect(connection, settings.resilience())
        .await
        .context("Failed to connect to the catalog server")
}

/// Fetch a glossary that must already exist
async fn require_glossary(client: &CatalogClient, name: &str) -> Result<Glossary> {
    client
        .get_by_name::<Glossary>(name, &[], true)
        .await
        .with_context(|| format!("Failed to look up glossary '{}'", name))?
        .with_context(|| format!("Glossary '{}' not found. Create it with 'init' first", name))
}
