//! Make-job and validate-job commands.
//!
//! These run the pipeline locally against captured documents, which is the
//! usual way to try a new job before wiring it into a playbook.

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

use sj_core::{make_job, EnrichmentJob, PipelineConfig, ResultCode};

use crate::OutputFormat;

/// Arguments of the make-job command.
#[derive(Debug, Clone)]
pub struct MakeJobArgs {
    /// Sentinel incident JSON (raw, or a captured trigger output).
    pub incident: PathBuf,
    /// Enrichment job JSON.
    pub job: PathBuf,
    /// Write the combined request payload here.
    pub dump: Option<PathBuf>,
}

fn read_json(path: &Path) -> Result<Value> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Captured trigger outputs wrap the incident in a `body` member.
fn unwrap_trigger_output(document: Value) -> Value {
    match document {
        Value::Object(mut map) if !map.contains_key("object") && map.contains_key("body") => {
            map.remove("body").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Runs the make-job pipeline on files.
pub fn run_make_job(
    args: MakeJobArgs,
    config: &PipelineConfig,
    format: OutputFormat,
) -> Result<()> {
    let incident = unwrap_trigger_output(read_json(&args.incident)?);
    let job = read_json(&args.job)?;

    if let Some(dump) = &args.dump {
        let payload = json!({ "enrichment_job": job, "sentinel_incident": incident });
        std::fs::write(dump, serde_json::to_string_pretty(&payload)?)
            .with_context(|| format!("Failed to write {}", dump.display()))?;
        if format == OutputFormat::Text {
            println!(
                "{} Request payload written to {}",
                "✓".green(),
                dump.display()
            );
        }
    }

    let outcome = make_job(&incident, &job, config);
    let body = serde_json::to_string_pretty(&outcome.envelope)?;

    match format {
        OutputFormat::Json => println!("{}", body),
        OutputFormat::Text => {
            let code = outcome.code.http_status().to_string();
            let code = match outcome.code {
                ResultCode::Ok => code.green(),
                ResultCode::NoWork => code.yellow(),
                ResultCode::InvalidJob | ResultCode::MalformedPayload => code.red(),
            };
            println!("{} {}", "Result code:".bold(), code);
            println!("{} {}", "Jobs:".bold(), outcome.envelope.jobs.len());
            for job in &outcome.envelope.jobs {
                println!(
                    "  {} {} {}",
                    "→".green(),
                    job.entity.kind.cyan(),
                    job.query_to_run
                );
            }
            println!();
            println!("{}", body);
        }
    }

    Ok(())
}

/// Validates a job file and reports every rule violation.
pub fn run_validate_job(path: &Path, format: OutputFormat) -> Result<bool> {
    let job = EnrichmentJob::from_value(&read_json(path)?)?;
    let report = job.validate()?;

    match format {
        OutputFormat::Json => println!(
            "{}",
            json!({ "valid": report.is_ok(), "reasons": report.reasons })
        ),
        OutputFormat::Text => {
            if report.is_ok() {
                println!("{} Job is valid", "✓".green());
            } else {
                println!("{}", "Job Errors:".red().bold());
                for reason in &report.reasons {
                    println!("  {} {}", "✗".red(), reason);
                }
            }
        }
    }

    Ok(report.is_ok())
}
