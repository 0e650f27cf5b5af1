//! Advisory board-health report.
//!
//! The text generator itself lives outside this workspace; only its contract
//! and the prompt it is given are defined here.

use async_trait::async_trait;
use log::error;
use thiserror::Error;

use crate::board::EntityGraph;

pub const FALLBACK_EMPTY_REPORT: &str = "Unable to generate an analysis report.";
pub const FALLBACK_NOT_CONFIGURED: &str =
    "Configure a text-generation API key to use board analysis.";
pub const FALLBACK_NETWORK: &str =
    "Network connection failed; the analysis service could not be reached. Check your network settings.";
pub const FALLBACK_UNAVAILABLE: &str =
    "The analysis service is temporarily unavailable. Please try again later.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdvisoryError {
    #[error("Report generator is not configured")]
    NotConfigured,

    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Report generator unavailable: {0}")]
    Unavailable(String),
}

impl AdvisoryError {
    /// Message safe to show the user in place of a report.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NotConfigured => FALLBACK_NOT_CONFIGURED,
            Self::NetworkFailure(_) => FALLBACK_NETWORK,
            Self::Unavailable(_) => FALLBACK_UNAVAILABLE,
        }
    }
}

/// Turns a prompt into natural-language text.
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AdvisoryError>;
}

/// One block per task; blocks are separated by `---` lines.
pub fn build_board_summary(graph: &EntityGraph) -> String {
    graph
        .tasks
        .iter()
        .map(|task| {
            let assignee = graph
                .member(&task.assigned_to)
                .map(|m| m.name.as_str())
                .unwrap_or("Unknown");
            let latest = task
                .logs
                .last()
                .map(|l| l.note.as_str())
                .unwrap_or("No logs");
            format!(
                "Task: {}\nAssignee: {}\nGoal: {}\nDue: {}\nProgress: {}%\nLatest Log: {}",
                task.title, assignee, task.outcome, task.due_date, task.progress, latest
            )
        })
        .collect::<Vec<_>>()
        .join("\n---\n")
}

pub fn build_prompt(graph: &EntityGraph) -> String {
    format!(
        "You are a project manager assistant for a results-oriented leader.\n\
         The leader does not want details, only RISKS and OUTCOMES.\n\n\
         Analyze the following tasks and identify:\n\
         1. Which tasks are most likely to be delayed given due date and current progress?\n\
         2. Is anyone overloaded or stuck?\n\n\
         Give a concise executive summary of project health in 3-4 bullet points.\n\
         Do not list every task; highlight only problems or significant successes.\n\n\
         Tasks:\n{}",
        build_board_summary(graph)
    )
}

/// Always resolves to something displayable.
pub async fn analyze_board_health(generator: &dyn ReportGenerator, graph: &EntityGraph) -> String {
    match generator.generate(&build_prompt(graph)).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => FALLBACK_EMPTY_REPORT.to_string(),
        Err(e) => {
            error!("Board analysis failed: {}", e);
            e.user_message().to_string()
        }
    }
}
