//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, error, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { input } => {
                info!(input = %input, "Starting due diligence run");
            }
            ProgressEvent::StageStarted { stage } => {
                info!(stage = %stage, "Starting stage");
            }
            ProgressEvent::StageComplete { stage, duration } => {
                info!(
                    stage = %stage,
                    duration_ms = duration.as_millis(),
                    "Stage complete"
                );
            }
            ProgressEvent::TaskStarted {
                task_id,
                query,
                index,
                total,
            } => {
                info!(task = %task_id, index, total, query = %query, "Researching");
            }
            ProgressEvent::TaskComplete {
                task_id,
                status,
                sources,
                confidence,
                duration,
            } => {
                if status == "failed" {
                    warn!(task = %task_id, "Research found nothing");
                } else {
                    info!(
                        task = %task_id,
                        status = %status,
                        sources,
                        confidence = %format!("{:.0}%", confidence * 100.0),
                        duration_ms = duration.as_millis(),
                        "Research task complete"
                    );
                }
            }
            ProgressEvent::ClaimValidated {
                validation_id,
                status,
                severity,
                index,
                total,
            } => {
                if status == "contradicted" || status == "suspicious" {
                    warn!(
                        claim = %validation_id,
                        index,
                        total,
                        status = %status,
                        severity = %severity,
                        "Claim flagged"
                    );
                } else {
                    info!(claim = %validation_id, index, total, status = %status, "Claim validated");
                }
            }
            ProgressEvent::ArtifactWritten { path } => {
                debug!(path = %path.display(), "Artifact written");
            }
            ProgressEvent::Cancelled { stage } => {
                info!(stage = %stage, "Cancelled by user");
            }
            ProgressEvent::Completed {
                total_cost,
                total_time,
            } => {
                info!(
                    cost_usd = %format!("{:.4}", total_cost),
                    total_time_ms = total_time.as_millis(),
                    "Run complete"
                );
            }
            ProgressEvent::Failed { error: message } => {
                error!(error = %message, "Run failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_logging_all_events() {
        let handler = LoggingHandler;

        let events = vec![
            ProgressEvent::Started {
                input: "acme.pdf".to_string(),
            },
            ProgressEvent::StageStarted {
                stage: "Extract".to_string(),
            },
            ProgressEvent::StageComplete {
                stage: "Extract".to_string(),
                duration: Duration::from_millis(120),
            },
            ProgressEvent::TaskStarted {
                task_id: "T001".to_string(),
                query: "Verify Acme".to_string(),
                index: 1,
                total: 3,
            },
            ProgressEvent::TaskComplete {
                task_id: "T001".to_string(),
                status: "success".to_string(),
                sources: 3,
                confidence: 0.8,
                duration: Duration::from_secs(4),
            },
            ProgressEvent::TaskComplete {
                task_id: "T002".to_string(),
                status: "failed".to_string(),
                sources: 0,
                confidence: 0.0,
                duration: Duration::from_millis(300),
            },
            ProgressEvent::ClaimValidated {
                validation_id: "V001".to_string(),
                status: "contradicted".to_string(),
                severity: "critical".to_string(),
                index: 1,
                total: 2,
            },
            ProgressEvent::ArtifactWritten {
                path: PathBuf::from("output/acme_research_plan.json"),
            },
            ProgressEvent::Cancelled {
                stage: "Research".to_string(),
            },
            ProgressEvent::Completed {
                total_cost: 0.31,
                total_time: Duration::from_secs(60),
            },
            ProgressEvent::Failed {
                error: "boom".to_string(),
            },
        ];

        for event in events {
            handler.on_progress(&event);
        }
    }
}
