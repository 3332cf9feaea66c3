//! Evaluation dashboard command handlers
//!
//! `run` submits a job and drives the poller with a live status line;
//! `summary` and `history` read the dashboard endpoints directly.

use crate::api::{BackendClient, EvalBackend, EvalMode};
use crate::config::Config;
use crate::error::{Result, ShopchatError};
use crate::eval::{JobOutcome, JobPoller};

use colored::Colorize;
use prettytable::{row, Table};
use std::io::Write;

/// Submit an evaluation job and poll it to completion
pub async fn run_eval(config: Config, mode: &str) -> Result<()> {
    let mode = EvalMode::parse_str(mode).map_err(ShopchatError::Eval)?;
    let client = BackendClient::new(&config.backend)?;
    let poller = JobPoller::from_config(&config.eval);

    println!("Submitting evaluation job (mode={})...", mode);
    let outcome = poller
        .run_with_progress(&client, mode, |update| {
            print!(
                "\r  status={} attempt={}/{}   ",
                update.status, update.attempt, config.eval.max_poll_attempts
            );
            let _ = std::io::stdout().flush();
        })
        .await?;
    println!();

    match outcome {
        JobOutcome::Completed { summary, history } => {
            println!("{}", "Evaluation completed.".green());
            print_summary(&summary);
            print_history(&history);
        }
        JobOutcome::Failed { error } => {
            println!("{} {}", "Evaluation failed:".red(), error);
        }
        JobOutcome::TimedOut { waited } => {
            println!(
                "{}",
                format!(
                    "Evaluation timed out after {} minutes (job may still be running server-side)",
                    waited.as_secs() / 60
                )
                .yellow()
            );
        }
    }
    Ok(())
}

/// Show the latest evaluation summary
pub async fn show_summary(config: Config) -> Result<()> {
    let client = BackendClient::new(&config.backend)?;
    let summary = client.eval_summary().await?;
    print_summary(&summary);
    Ok(())
}

/// Show past evaluation runs
pub async fn show_history(config: Config) -> Result<()> {
    let client = BackendClient::new(&config.backend)?;
    let history = client.eval_history().await?;
    print_history(&history);
    Ok(())
}

/// Renders the `key_metrics` object of a summary payload
fn print_summary(summary: &serde_json::Value) {
    let Some(metrics) = summary.get("key_metrics").and_then(|m| m.as_object()) else {
        println!("No summary metrics available.");
        return;
    };
    let mut table = Table::new();
    table.add_row(row!["Metric", "Value"]);
    for (name, value) in metrics {
        table.add_row(row![name, value]);
    }
    table.printstd();
}

/// Renders the `evaluations` list of a history payload
fn print_history(history: &serde_json::Value) {
    let Some(runs) = history.get("evaluations").and_then(|e| e.as_array()) else {
        println!("No evaluation history available.");
        return;
    };
    if runs.is_empty() {
        println!("No past evaluation runs.");
        return;
    }
    let mut table = Table::new();
    table.add_row(row!["Timestamp", "Duration (s)", "Catalog", "nDCG@5"]);
    for run in runs {
        table.add_row(row![
            run.get("timestamp").and_then(|v| v.as_str()).unwrap_or("-"),
            run.get("duration_seconds")
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string()),
            run.get("catalog_size")
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string()),
            run.get("ndcg@5")
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table.printstd();
}
