//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use begrep_domain::{Concept, ImportResult, ImportStatus, IssueSeverity};
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a list of concept versions.
    pub fn format_concepts(&self, concepts: &[Concept]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(concepts)?),
            OutputFormat::Quiet => Ok(join_ids(concepts.iter().map(|c| c.id.to_string()))),
            OutputFormat::Table => Ok(self.concepts_table(concepts)),
        }
    }

    /// Format one concept version with its terms and definition.
    pub fn format_concept(&self, concept: &Concept) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(concept)?),
            OutputFormat::Quiet => Ok(concept.id.to_string()),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                builder.push_record(["ID".to_string(), concept.id.to_string()]);
                builder.push_record(["Lineage".to_string(), concept.original_id.to_string()]);
                builder.push_record(["Version".to_string(), version(concept)]);
                builder.push_record(["Status".to_string(), concept.status.to_string()]);
                builder.push_record(["Published".to_string(), published(concept)]);
                for (lang, term) in &concept.preferred_term {
                    builder.push_record([format!("Term ({})", lang), term.clone()]);
                }
                if let Some(definition) = &concept.definition {
                    for (lang, text) in &definition.text {
                        builder.push_record([format!("Definition ({})", lang), text.clone()]);
                    }
                }
                builder.push_record([
                    "Changes".to_string(),
                    concept.history.change_element.len().to_string(),
                ]);
                Ok(styled(builder))
            }
        }
    }

    /// Format a list of import jobs.
    pub fn format_jobs(&self, jobs: &[ImportResult]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(jobs)?),
            OutputFormat::Quiet => Ok(join_ids(jobs.iter().map(|j| j.id.to_string()))),
            OutputFormat::Table => {
                if jobs.is_empty() {
                    return Ok(self.colorize("No import jobs found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["ID", "Status", "Created", "Extracted", "Saved", "Failed"]);
                for job in jobs {
                    builder.push_record([
                        job.id.to_string(),
                        self.job_status(job.status),
                        job.created.format("%Y-%m-%d %H:%M").to_string(),
                        job.counts.extracted.to_string(),
                        job.counts.saved.to_string(),
                        job.counts.failed.to_string(),
                    ]);
                }
                Ok(styled(builder))
            }
        }
    }

    /// Format one import job with its extraction records and save failures.
    pub fn format_job(&self, job: &ImportResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(job)?),
            OutputFormat::Quiet => Ok(job.id.to_string()),
            OutputFormat::Table => {
                let mut out = format!(
                    "Import {} into {}: {}\n",
                    job.id,
                    job.catalog_id,
                    self.job_status(job.status)
                );
                if job.extraction_records.is_empty() {
                    out.push_str(&self.colorize("No concepts extracted.", "yellow"));
                    return Ok(out);
                }

                let mut builder = Builder::default();
                builder.push_record(["Resource", "Concept", "Operations", "Issues"]);
                for record in &job.extraction_records {
                    let issues: Vec<String> = record
                        .extract_result
                        .issues
                        .iter()
                        .map(|issue| match issue.severity {
                            IssueSeverity::Error => format!("error: {}", issue.message),
                            IssueSeverity::Warning => format!("warning: {}", issue.message),
                        })
                        .collect();
                    builder.push_record([
                        record.external_id.clone(),
                        record
                            .internal_id
                            .map(|id| id.to_string())
                            .unwrap_or_else(|| "-".to_string()),
                        record.extract_result.operations.len().to_string(),
                        issues.join("\n"),
                    ]);
                }
                out.push_str(&styled(builder));

                for failure in &job.save_failures {
                    out.push('\n');
                    out.push_str(&self.error(&format!(
                        "{} not saved: {}",
                        failure.external_id, failure.reason
                    )));
                }
                Ok(out)
            }
        }
    }

    fn concepts_table(&self, concepts: &[Concept]) -> String {
        if concepts.is_empty() {
            return self.colorize("No concepts found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Version", "Status", "Published", "Preferred term"]);
        for concept in concepts {
            builder.push_record([
                concept.id.to_string(),
                version(concept),
                concept.status.to_string(),
                published(concept),
                preferred_term(concept),
            ]);
        }
        styled(builder)
    }

    fn job_status(&self, status: ImportStatus) -> String {
        let label = status_label(status);
        match status {
            ImportStatus::Completed => self.colorize(label, "green"),
            ImportStatus::PartiallyCompleted | ImportStatus::PendingConfirmation => {
                self.colorize(label, "yellow")
            }
            ImportStatus::Failed => self.colorize(label, "red"),
            _ => label.to_string(),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Human-readable job status
pub fn status_label(status: ImportStatus) -> &'static str {
    match status {
        ImportStatus::InProgress => "in progress",
        ImportStatus::PendingConfirmation => "pending confirmation",
        ImportStatus::Saving => "saving",
        ImportStatus::Completed => "completed",
        ImportStatus::PartiallyCompleted => "partially completed",
        ImportStatus::Failed => "failed",
        ImportStatus::Cancelled => "cancelled",
    }
}

fn styled(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

fn join_ids(ids: impl Iterator<Item = String>) -> String {
    ids.collect::<Vec<_>>().join("\n")
}

fn version(concept: &Concept) -> String {
    concept
        .sem_ver
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn published(concept: &Concept) -> String {
    match (concept.published, concept.published_at) {
        (true, Some(at)) => at.format("%Y-%m-%d").to_string(),
        (true, None) => "yes".to_string(),
        (false, _) => "no".to_string(),
    }
}

/// Bokmål term when present, else the first language
fn preferred_term(concept: &Concept) -> String {
    concept
        .preferred_term
        .get("nb")
        .or_else(|| concept.preferred_term.values().next())
        .cloned()
        .unwrap_or_default()
}
