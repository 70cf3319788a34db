//! Import command implementation.

use super::Context;
use crate::cli::ImportArgs;
use crate::error::Result;
use begrep_domain::{ImportResult, ImportStatus};
use std::fs;
use tracing::info;

/// Execute the import command.
pub async fn execute_import(args: ImportArgs, ctx: &Context) -> Result<()> {
    let job = import(args, ctx).await?;

    println!("{}", ctx.formatter.format_job(&job)?);
    match job.status {
        ImportStatus::PendingConfirmation => eprintln!(
            "{}",
            ctx.formatter
                .info(&format!("Review the records, then run `begrep job confirm {}`", job.id))
        ),
        ImportStatus::Failed => eprintln!("{}", ctx.formatter.error("Import failed")),
        ImportStatus::PartiallyCompleted => {
            eprintln!("{}", ctx.formatter.warning("Some concepts were not saved"))
        }
        ImportStatus::Completed => eprintln!(
            "{}",
            ctx.formatter
                .success(&format!("Saved {} concept(s)", job.counts.saved))
        ),
        _ => {}
    }
    Ok(())
}

/// Run the import and return the job in its final state for this invocation.
pub(crate) async fn import(args: ImportArgs, ctx: &Context) -> Result<ImportResult> {
    let catalog = ctx.config.catalog_or(args.catalog)?;
    let turtle = fs::read_to_string(&args.file)?;
    info!("Importing {} into {}", args.file.display(), catalog);

    let started = ctx.imports.start(&ctx.principal, &catalog, turtle).await?;
    // Background processing must finish before the process exits
    ctx.imports.drain().await;

    let jobs = ctx.imports.jobs();
    let job = jobs.get(&ctx.principal, started.id)?;
    if args.confirm && job.status == ImportStatus::PendingConfirmation {
        return Ok(jobs.confirm(&ctx.principal, job.id)?);
    }
    Ok(job)
}
