//! Import job command implementation.

use super::{parse_id, Context};
use crate::cli::JobCommand;
use crate::error::Result;
use crate::output::status_label;
use begrep_domain::ImportId;

/// Execute a job subcommand.
pub async fn execute_job(command: JobCommand, ctx: &Context) -> Result<()> {
    let jobs = ctx.imports.jobs();

    match command {
        JobCommand::Show { id } => {
            let job = jobs.get(&ctx.principal, parse_id::<ImportId>(&id)?)?;
            println!("{}", ctx.formatter.format_job(&job)?);
        }
        JobCommand::Confirm { id } => {
            let job = jobs.confirm(&ctx.principal, parse_id::<ImportId>(&id)?)?;
            println!("{}", ctx.formatter.format_job(&job)?);
            eprintln!(
                "{}",
                ctx.formatter.success(&format!(
                    "Import {}: {} saved, {} failed",
                    status_label(job.status),
                    job.counts.saved,
                    job.counts.failed
                ))
            );
        }
        JobCommand::Cancel { id } => {
            let job = jobs.cancel(&ctx.principal, parse_id::<ImportId>(&id)?)?;
            eprintln!("{}", ctx.formatter.success(&format!("Cancelled import {}", job.id)));
        }
        JobCommand::List { catalog } => {
            let catalog = ctx.config.catalog_or(catalog)?;
            let list = jobs.list(&ctx.principal, &catalog)?;
            println!("{}", ctx.formatter.format_jobs(&list)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ImportArgs;
    use crate::commands::import::import;
    use crate::commands::test_support::{context, turtle_file};
    use crate::error::CliError;
    use begrep_domain::{ErrorCategory, ImportStatus};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_confirm_then_cancel_conflicts() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let args = ImportArgs {
            file: turtle_file(&dir),
            catalog: None,
            confirm: false,
        };
        let job = import(args, &ctx).await.unwrap();

        execute_job(JobCommand::Confirm { id: job.id.to_string() }, &ctx)
            .await
            .unwrap();
        let stored = ctx.imports.jobs().get("alice", job.id).unwrap();
        assert_eq!(stored.status, ImportStatus::Completed);

        let err = execute_job(JobCommand::Cancel { id: job.id.to_string() }, &ctx)
            .await
            .unwrap_err();
        match err {
            CliError::Import(e) => assert_eq!(e.category(), ErrorCategory::Conflict),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_job() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let err = execute_job(JobCommand::Show { id: ImportId::new().to_string() }, &ctx)
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
