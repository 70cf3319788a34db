//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Begrep CLI - Import and manage SKOS-AP-NO concept catalogs.
#[derive(Debug, Parser)]
#[command(name = "begrep")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "BEGREP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Act as this principal instead of the configured one
    #[arg(long, global = true, env = "BEGREP_PRINCIPAL")]
    pub principal: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import concepts from a Turtle file
    Import(ImportArgs),

    /// Inspect and resolve import jobs
    #[command(subcommand)]
    Job(JobCommand),

    /// Inspect, publish and revise concepts
    #[command(subcommand)]
    Concept(ConceptCommand),
}

/// Arguments for the import command.
#[derive(Debug, Parser)]
pub struct ImportArgs {
    /// Turtle file to import
    pub file: PathBuf,

    /// Catalog (organization id) to import into
    #[arg(long)]
    pub catalog: Option<String>,

    /// Save the concepts right away if extraction succeeds
    #[arg(long)]
    pub confirm: bool,
}

/// Import job subcommands.
#[derive(Debug, Subcommand)]
pub enum JobCommand {
    /// Show a job and its extraction records
    Show {
        /// Job id
        id: String,
    },

    /// Save the extracted concepts of a job awaiting confirmation
    Confirm {
        /// Job id
        id: String,
    },

    /// Cancel a job that has not been confirmed
    Cancel {
        /// Job id
        id: String,
    },

    /// List the jobs of a catalog, newest first
    List {
        /// Catalog (organization id)
        #[arg(long)]
        catalog: Option<String>,
    },
}

/// Concept subcommands.
#[derive(Debug, Subcommand)]
pub enum ConceptCommand {
    /// List the concept versions of a catalog
    List {
        /// Catalog (organization id)
        #[arg(long)]
        catalog: Option<String>,

        /// Only versions with this status (draft, hearing, approved, published)
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Show a concept version
    Show {
        /// Concept id
        id: String,

        /// Show every version of the lineage instead
        #[arg(long)]
        lineage: bool,
    },

    /// Publish a concept version
    Publish {
        /// Concept id
        id: String,
    },

    /// Create a new unpublished revision of a published concept
    Revise {
        /// Concept id
        id: String,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_import() {
        let cli = Cli::parse_from([
            "begrep",
            "import",
            "concepts.ttl",
            "--catalog",
            "910244132",
            "--confirm",
        ]);
        match cli.command {
            Command::Import(args) => {
                assert_eq!(args.file, PathBuf::from("concepts.ttl"));
                assert_eq!(args.catalog.as_deref(), Some("910244132"));
                assert!(args.confirm);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_concept_show_lineage() {
        let cli = Cli::parse_from(["begrep", "-f", "json", "concept", "show", "abc", "--lineage"]);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert!(matches!(
            cli.command,
            Command::Concept(ConceptCommand::Show { lineage: true, .. })
        ));
    }
}
