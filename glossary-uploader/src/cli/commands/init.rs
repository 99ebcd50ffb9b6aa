//! `init`: create or update a glossary

use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use log::info;

use super::connect;
use crate::api::{CatalogClient, CreateGlossaryRequest, Glossary};
use crate::cli::ServerArgs;
use crate::logging;

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Glossary name
    #[arg(long)]
    pub name: String,

    /// Name shown in the catalog UI (defaults to the name)
    #[arg(long)]
    pub display_name: Option<String>,

    /// Glossary description
    #[arg(long = "desc")]
    pub description: String,
}

impl InitArgs {
    fn to_request(&self) -> CreateGlossaryRequest {
        CreateGlossaryRequest {
            name: self.name.clone(),
            display_name: Some(self.display_name.clone().unwrap_or_else(|| self.name.clone())),
            description: self.description.clone(),
            ..Default::default()
        }
    }
}

pub async fn handle_init_command(args: InitArgs, server: &ServerArgs) -> Result<()> {
    let client = connect(server).await?;
    let result = init_glossary(&client, &args).await;
    client.close();

    let glossary = result?;
    println!(
        "{} Glossary {} ({})",
        "✓".bright_green(),
        glossary.fqn().bright_green().bold(),
        glossary.id.dimmed()
    );
    Ok(())
}

async fn init_glossary(client: &CatalogClient, args: &InitArgs) -> Result<Glossary> {
    let glossary = client
        .create_or_update(&args.to_request())
        .await
        .with_context(|| format!("Failed to create glossary '{}'", args.name))?;
    info!(target: logging::CLI, "Glossary {} ready [{}]", glossary.fqn(), glossary.id);
    Ok(glossary)
}
