//! Asynchronous analysis job states

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

use super::analysis::AnalysisRecord;

/// Lifecycle states of an asynchronous (PDF-sourced) analysis job
///
/// Transitions are one-way in declaration order; `Completed` and `Error` are
/// terminal. The derived `Ord` is the transition order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Starting,
    ExtractingText,
    Analyzing,
    Completed,
    Error,
}

impl JobStatus {
    /// Caller-visible progress checkpoint for this state
    pub fn progress(&self) -> u8 {
        match self {
            JobStatus::Starting => 0,
            JobStatus::ExtractingText => 10,
            JobStatus::Analyzing => 50,
            JobStatus::Completed => 100,
            // Progress is unspecified for failed jobs; report the last
            // checkpoint-independent value
            JobStatus::Error => 0,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Starting => "starting",
            JobStatus::ExtractingText => "extracting_text",
            JobStatus::Analyzing => "analyzing",
            JobStatus::Completed => "completed",
            JobStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// Tracked state of one asynchronous analysis job
///
/// Owned by the job tracker; callers only ever see clones of this snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Job {
    pub id: Uuid,
    pub status: JobStatus,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Job {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            status: JobStatus::Starting,
            progress: JobStatus::Starting.progress(),
            result: None,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_order_matches_lifecycle() {
        assert!(JobStatus::Starting < JobStatus::ExtractingText);
        assert!(JobStatus::ExtractingText < JobStatus::Analyzing);
        assert!(JobStatus::Analyzing < JobStatus::Completed);
        assert!(JobStatus::Analyzing < JobStatus::Error);
    }

    #[test]
    fn test_terminal_states() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Error.is_terminal());
        assert!(!JobStatus::Analyzing.is_terminal());
    }

    #[test]
    fn test_progress_checkpoints() {
        assert_eq!(JobStatus::Starting.progress(), 0);
        assert_eq!(JobStatus::ExtractingText.progress(), 10);
        assert_eq!(JobStatus::Analyzing.progress(), 50);
        assert_eq!(JobStatus::Completed.progress(), 100);
    }
}
