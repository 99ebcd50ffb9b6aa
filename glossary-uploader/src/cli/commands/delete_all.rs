//! `delete-all`: remove every term of a glossary

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::*;
use futures::TryStreamExt;
use log::{error, info};

use super::{connect, require_glossary};
use crate::api::{CatalogClient, GlossaryTerm, ListOptions};
use crate::cli::ServerArgs;
use crate::logging;

#[derive(Args, Debug, Clone)]
pub struct DeleteAllArgs {
    /// Glossary whose terms are deleted
    #[arg(long)]
    pub name: String,

    /// Remove the terms permanently instead of soft-deleting them
    #[arg(long)]
    pub hard_delete: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteSummary {
    pub deleted: usize,
    pub failed: usize,
}

pub async fn handle_delete_all_command(args: DeleteAllArgs, server: &ServerArgs) -> Result<()> {
    let client = connect(server).await?;
    let result = delete_glossary_terms(&client, &args.name, args.hard_delete).await;
    client.close();

    let summary = result?;
    println!(
        "{} Deleted {} terms from {}",
        "✓".bright_green(),
        summary.deleted.to_string().bright_green(),
        args.name.bold()
    );
    if summary.failed > 0 {
        bail!("{} terms could not be deleted", summary.failed);
    }
    Ok(())
}

/// Delete every term listed under glossary `name`
///
/// The full listing is collected before deleting so the paging cursor is
/// not affected by the deletes. A listed term that cannot be decoded fails
/// the command before anything is deleted.
pub async fn delete_glossary_terms(
    client: &CatalogClient,
    name: &str,
    hard_delete: bool,
) -> Result<DeleteSummary> {
    let glossary = require_glossary(client, name).await?;

    let options = ListOptions::default()
        .with_limit(client.connection().limit_records)
        .with_param("glossary", glossary.fqn());
    let terms: Vec<GlossaryTerm> = client
        .list_all_entities::<GlossaryTerm>(options)
        .try_collect()
        .await
        .with_context(|| format!("Failed to list terms of glossary '{}'", name))?;

    info!(
        target: logging::CLI,
        "Deleting {} terms from glossary {}",
        terms.len(),
        glossary.fqn()
    );

    let mut summary = DeleteSummary::default();
    for term in &terms {
        let label = term.fully_qualified_name.as_deref().unwrap_or(&term.name);
        match client
            .delete::<GlossaryTerm>(&term.id, true, hard_delete)
            .await
        {
            Ok(()) => {
                info!(target: logging::CLI, "Deleted {} [{}]", label, term.id);
                summary.deleted += 1;
            }
            Err(err) => {
                error!(target: logging::CLI, "Failed to delete {}: {}", label, err);
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}
