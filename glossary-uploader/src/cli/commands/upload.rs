//! `upload`: map workbook rows to glossary terms and PUT them

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::*;
use log::{debug, error, info, warn};

use super::{connect, require_glossary};
use crate::api::CatalogClient;
use crate::cli::ServerArgs;
use crate::glossary::{StandardSheet, TermDraft, build_term_request};
use crate::logging;
use crate::reader::{DataFrame, GlossarySourceConfig, SourceType, open_reader};

#[derive(Args, Debug, Clone)]
pub struct UploadArgs {
    /// Target glossary name
    #[arg(long)]
    pub name: String,

    /// Source file type
    #[arg(long = "type", value_enum, default_value_t = SourceType::Excel)]
    pub source_type: SourceType,

    /// Source file path
    #[arg(long)]
    pub path: PathBuf,

    /// Sheet to read, e.g. 공통표준용어 or 공통표준단어
    #[arg(long)]
    pub sheet_name: String,

    /// Print the mapped requests as JSON instead of uploading them
    #[arg(long)]
    pub dry_run: bool,
}

/// Counts for one upload run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSummary {
    pub uploaded: usize,
    pub skipped: usize,
    /// Sheet rows whose upload failed
    pub failed_rows: Vec<usize>,
}

impl UploadSummary {
    pub fn failed(&self) -> usize {
        self.failed_rows.len()
    }

    pub fn total(&self) -> usize {
        self.uploaded + self.skipped + self.failed()
    }
}

pub async fn handle_upload_command(args: UploadArgs, server: &ServerArgs) -> Result<()> {
    let Some(sheet) = StandardSheet::from_sheet_name(&args.sheet_name) else {
        bail!(
            "Unsupported sheet '{}'. Expected '{}' or '{}'",
            args.sheet_name,
            StandardSheet::Terminology.sheet_name(),
            StandardSheet::Word.sheet_name()
        );
    };

    let frame = read_frame(&args)?;
    println!(
        "Read {} rows from sheet {}",
        frame.len().to_string().cyan(),
        args.sheet_name.cyan()
    );

    if args.dry_run {
        return print_requests(&args.name, sheet, &frame);
    }

    let client = connect(server).await?;
    let result = upload_to_glossary(&client, &args.name, sheet, &frame).await;
    client.close();

    let summary = result?;
    print_summary(&summary);
    if summary.failed() > 0 {
        bail!("{} of {} rows failed to upload", summary.failed(), summary.total());
    }
    Ok(())
}

fn read_frame(args: &UploadArgs) -> Result<DataFrame> {
    let source = GlossarySourceConfig::new(args.source_type, &args.path)?;
    let mut reader = open_reader(&source)?;
    debug!(
        target: logging::CLI,
        "Sheets in {}: {}",
        args.path.display(),
        reader.sheet_names().join(", ")
    );
    let frame = reader
        .read_sheet(&args.sheet_name)
        .with_context(|| format!("Failed to read {}", args.path.display()))?;
    Ok(frame)
}

async fn upload_to_glossary(
    client: &CatalogClient,
    glossary_name: &str,
    sheet: StandardSheet,
    frame: &DataFrame,
) -> Result<UploadSummary> {
    let glossary = require_glossary(client, glossary_name).await?;
    info!(
        target: logging::CLI,
        "Uploading {} rows into glossary {}",
        frame.len(),
        glossary.fqn()
    );
    upload_rows(client, glossary.fqn(), sheet, frame).await
}

/// PUT every mappable row of `frame` as a term of `glossary_fqn`
///
/// Rows with a blank key cell are skipped without a request. A failed row
/// is logged and counted; the remaining rows are still sent.
pub async fn upload_rows(
    client: &CatalogClient,
    glossary_fqn: &str,
    sheet: StandardSheet,
    frame: &DataFrame,
) -> Result<UploadSummary> {
    let key_column = sheet.key_column();
    let Some(key_index) = frame.column_index(key_column) else {
        bail!(
            "Sheet '{}' has no '{}' column",
            sheet.sheet_name(),
            key_column
        );
    };

    let mut summary = UploadSummary::default();
    for (index, values) in frame.rows.iter().enumerate() {
        let row_number = frame.row_number(index);

        let key = values
            .get(key_index)
            .and_then(|v| v.as_deref())
            .map(str::trim)
            .unwrap_or("");
        if key.is_empty() {
            debug!(target: logging::CLI, "[{}] empty {}, skipped", row_number, key_column);
            summary.skipped += 1;
            continue;
        }

        let request =
            match build_term_request(glossary_fqn, sheet.sheet_name(), &frame.columns, values) {
                TermDraft::Ready(request) => request,
                TermDraft::Uninitialized => {
                    warn!(
                        target: logging::CLI,
                        "[{}] {} could not be mapped, skipped",
                        row_number,
                        key
                    );
                    summary.skipped += 1;
                    continue;
                }
            };

        debug!(target: logging::CLI, "[{}] Create Glossary Term req: {:?}", row_number, request);
        match client.create_or_update(&*request).await {
            Ok(term) => {
                info!(
                    target: logging::CLI,
                    "[{}] {} uploaded [{}]",
                    row_number,
                    term.fully_qualified_name.as_deref().unwrap_or(&term.name),
                    term.id
                );
                summary.uploaded += 1;
            }
            Err(err) => {
                error!(target: logging::CLI, "[{}] {} failed: {}", row_number, key, err);
                summary.failed_rows.push(row_number);
            }
        }
    }

    Ok(summary)
}

fn print_requests(glossary_fqn: &str, sheet: StandardSheet, frame: &DataFrame) -> Result<()> {
    for values in &frame.rows {
        if let TermDraft::Ready(request) =
            build_term_request(glossary_fqn, sheet.sheet_name(), &frame.columns, values)
        {
            println!("{}", serde_json::to_string_pretty(&request)?);
        }
    }
    Ok(())
}

fn print_summary(summary: &UploadSummary) {
    println!();
    println!("{}", "Upload summary".bold());
    println!("  uploaded: {}", summary.uploaded.to_string().bright_green());
    println!("  skipped:  {}", summary.skipped.to_string().yellow());
    let failed = summary.failed().to_string();
    if summary.failed() > 0 {
        let rows: Vec<String> = summary.failed_rows.iter().map(usize::to_string).collect();
        println!(
            "  failed:   {} (rows {})",
            failed.bright_red().bold(),
            rows.join(", ")
        );
    } else {
        println!("  failed:   {}", failed.dimmed());
    }
}
