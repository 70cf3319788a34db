//! Concept command implementation.

use super::{parse_id, Context};
use crate::cli::ConceptCommand;
use crate::error::{CliError, Result};
use begrep_domain::{ConceptId, ConceptStatus};

/// Execute a concept subcommand.
pub async fn execute_concept(command: ConceptCommand, ctx: &Context) -> Result<()> {
    let concepts = &ctx.concepts;

    match command {
        ConceptCommand::List { catalog, status } => {
            let catalog = ctx.config.catalog_or(catalog)?;
            let status = status
                .map(|s| {
                    ConceptStatus::parse(&s)
                        .ok_or_else(|| CliError::InvalidInput(format!("Unknown status '{}'", s)))
                })
                .transpose()?;
            let list = concepts.list(&ctx.principal, &catalog, status)?;
            println!("{}", ctx.formatter.format_concepts(&list)?);
        }
        ConceptCommand::Show { id, lineage } => {
            let id = parse_id::<ConceptId>(&id)?;
            if lineage {
                let versions = concepts.lineage(&ctx.principal, id)?;
                println!("{}", ctx.formatter.format_concepts(&versions)?);
            } else {
                let concept = concepts.get(&ctx.principal, id)?;
                println!("{}", ctx.formatter.format_concept(&concept)?);
            }
        }
        ConceptCommand::Publish { id } => {
            let concept = concepts.publish(&ctx.principal, parse_id(&id)?)?;
            eprintln!(
                "{}",
                ctx.formatter.success(&format!("Published concept {}", concept.id))
            );
        }
        ConceptCommand::Revise { id } => {
            let revision = concepts.create_revision(&ctx.principal, parse_id(&id)?)?;
            println!("{}", ctx.formatter.format_concept(&revision)?);
        }
    }

    Ok(())
}
