use generator::{GenerationReport, ProbabilityConfig};
use serde::Serialize;
use tracing::{info, info_span};

/// Run lifecycle event.
/// Structured for JSON serialization so runs can be audited by machines.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum JournalEvent {
    /// Generation is about to start.
    RunStarted {
        /// Target repository.
        directory: String,
        /// Steps requested.
        commit_count: u64,
        /// Seed in use, if any.
        seed: Option<u64>,
        /// Effective probability thresholds.
        probabilities: ProbabilityConfig,
    },
    /// Every step completed.
    RunCompleted {
        /// Run summary.
        report: GenerationReport,
        /// Wall-clock duration in milliseconds.
        elapsed_ms: u128,
    },
    /// A step failed and the run was aborted.
    RunFailed {
        /// Error chain, outermost first.
        error: String,
        /// Wall-clock duration in milliseconds.
        elapsed_ms: u128,
    },
}

/// Logs a journal event to the dedicated `journal` target as structured JSON.
/// The target can be filtered by the subscriber to redirect runs to a file.
pub fn record(event: &JournalEvent) {
    let span = info_span!(target: "journal", "journal_event");
    let _enter = span.enter();

    let json = to_json(event);
    info!(target: "journal", journal_json = %json, "Run Journal Event");
}

fn to_json(event: &JournalEvent) -> String {
    serde_json::to_string(event).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_in_snake_case() {
        let json = to_json(&JournalEvent::RunFailed {
            error: "boom".into(),
            elapsed_ms: 3,
        });
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["event"], "run_failed");
        assert_eq!(value["error"], "boom");
    }

    #[test]
    fn started_event_carries_probabilities() {
        let json = to_json(&JournalEvent::RunStarted {
            directory: "repo".into(),
            commit_count: 5,
            seed: Some(1),
            probabilities: ProbabilityConfig::default(),
        });
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["event"], "run_started");
        assert_eq!(value["probabilities"]["files"]["edit"], 0.6);
    }

    #[test]
    fn record_variants() {
        // These calls should not panic
        record(&JournalEvent::RunCompleted {
            report: GenerationReport::default(),
            elapsed_ms: 0,
        });
        record(&JournalEvent::RunFailed {
            error: "Testing".into(),
            elapsed_ms: 0,
        });
    }
}
