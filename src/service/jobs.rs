//! Concurrent tracker for asynchronous analysis jobs
//!
//! The tracker's map is the only mutable state shared between analysis runs.
//! Each job is written by exactly one runner; arbitrary callers read
//! concurrently and only ever receive snapshots.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::model::{AnalysisRecord, Job, JobStatus};

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Job not found: {0}")]
    NotFound(Uuid),
}

struct TrackedJob {
    job: Job,
    updated_at: DateTime<Utc>,
}

/// Tracks asynchronous analysis jobs through their fixed state progression
///
/// Transitions are monotonic: a request to move a job backwards, or out of a
/// terminal state, is ignored. Ids are random v4 uuids and never reused.
/// Terminal jobs stay queryable for the process lifetime; nothing evicts them
/// unless a deployment wires up [`JobTracker::purge_terminal_older_than`].
#[derive(Default)]
pub struct JobTracker {
    jobs: RwLock<HashMap<Uuid, TrackedJob>>,
}

impl JobTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new job in `Starting` and return its id
    pub fn submit(&self) -> Uuid {
        let id = Uuid::new_v4();
        let tracked = TrackedJob {
            job: Job::new(id),
            updated_at: Utc::now(),
        };

        let mut jobs = self.jobs.write().expect("job tracker lock poisoned");
        jobs.insert(id, tracked);

        tracing::info!(job_id = %id, "Job submitted");
        id
    }

    /// Advance a job to a later non-terminal state
    pub fn advance(&self, id: Uuid, status: JobStatus) -> Result<(), JobError> {
        debug_assert!(!status.is_terminal(), "use complete/fail for terminal states");
        self.update(id, |job| {
            if job.status.is_terminal() || status <= job.status {
                tracing::warn!(
                    job_id = %id,
                    from = %job.status,
                    to = %status,
                    "Ignoring non-monotonic job transition"
                );
                return;
            }
            job.status = status;
            job.progress = status.progress();
        })
    }

    /// Move a job to `Completed` with its result attached
    pub fn complete(&self, id: Uuid, result: AnalysisRecord) -> Result<(), JobError> {
        self.update(id, |job| {
            if job.status.is_terminal() {
                return;
            }
            job.status = JobStatus::Completed;
            job.progress = JobStatus::Completed.progress();
            job.result = Some(result);
            tracing::info!(job_id = %id, "Job completed");
        })
    }

    /// Move a job to `Error` with the failure message attached
    pub fn fail(&self, id: Uuid, error: impl Into<String>) -> Result<(), JobError> {
        let error = error.into();
        self.update(id, |job| {
            if job.status.is_terminal() {
                return;
            }
            job.status = JobStatus::Error;
            job.error = Some(error.clone());
            tracing::warn!(job_id = %id, error = %error, "Job failed");
        })
    }

    /// Snapshot of the job's current state
    pub fn query(&self, id: Uuid) -> Result<Job, JobError> {
        let jobs = self.jobs.read().expect("job tracker lock poisoned");
        jobs.get(&id)
            .map(|t| t.job.clone())
            .ok_or(JobError::NotFound(id))
    }

    /// Drop terminal jobs last touched before the cutoff; returns how many
    /// were removed
    ///
    /// Not scheduled by the service itself; exposed for deployments that run
    /// their own sweeper.
    pub fn purge_terminal_older_than(&self, cutoff: DateTime<Utc>) -> usize {
        let mut jobs = self.jobs.write().expect("job tracker lock poisoned");
        let before = jobs.len();
        jobs.retain(|_, t| !(t.job.status.is_terminal() && t.updated_at < cutoff));
        before - jobs.len()
    }

    fn update(&self, id: Uuid, apply: impl FnOnce(&mut Job)) -> Result<(), JobError> {
        let mut jobs = self.jobs.write().expect("job tracker lock poisoned");
        let tracked = jobs.get_mut(&id).ok_or(JobError::NotFound(id))?;
        apply(&mut tracked.job);
        tracked.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        AnalysisResult, DocumentInfo, DocumentType, ExtractedEntitySet, RiskAssessment, RiskLevel,
    };
    use std::collections::BTreeMap;

    fn sample_record() -> AnalysisRecord {
        AnalysisRecord {
            document_id: "abc123".to_string(),
            filename: None,
            byte_size: 42,
            result: AnalysisResult {
                document_info: DocumentInfo {
                    document_type: DocumentType::Contract,
                    confidence: 1.0,
                    word_count: 7,
                    processed_at: Utc::now(),
                },
                entities: ExtractedEntitySet::default(),
                key_clauses: BTreeMap::new(),
                summary: "a summary".to_string(),
                classification_scores: BTreeMap::new(),
            },
            risk: RiskAssessment {
                financial_risk: 0.0,
                legal_risk: 0.0,
                operational_risk: 0.0,
                compliance_risk: 0.0,
                overall_risk: 0.0,
                risk_level: RiskLevel::Low,
                risk_factors: vec![],
            },
        }
    }

    #[test]
    fn test_fresh_job_observable_in_starting() {
        let tracker = JobTracker::new();
        let id = tracker.submit();

        let job = tracker.query(id).unwrap();
        assert_eq!(job.status, JobStatus::Starting);
        assert_eq!(job.progress, 0);
        assert!(job.result.is_none());
        assert!(job.error.is_none());
    }

    #[test]
    fn test_unknown_id_not_found() {
        let tracker = JobTracker::new();
        assert!(matches!(
            tracker.query(Uuid::new_v4()),
            Err(JobError::NotFound(_))
        ));
    }

    #[test]
    fn test_monotonic_progression() {
        let tracker = JobTracker::new();
        let id = tracker.submit();

        tracker.advance(id, JobStatus::ExtractingText).unwrap();
        assert_eq!(tracker.query(id).unwrap().progress, 10);

        tracker.advance(id, JobStatus::Analyzing).unwrap();
        assert_eq!(tracker.query(id).unwrap().progress, 50);

        // Backward transition is ignored
        tracker.advance(id, JobStatus::ExtractingText).unwrap();
        assert_eq!(tracker.query(id).unwrap().status, JobStatus::Analyzing);
    }

    #[test]
    fn test_terminal_states_sticky() {
        let tracker = JobTracker::new();
        let id = tracker.submit();

        tracker.fail(id, "boom").unwrap();
        let job = tracker.query(id).unwrap();
        assert_eq!(job.status, JobStatus::Error);
        assert_eq!(job.error.as_deref(), Some("boom"));

        // Neither advancing nor completing leaves the terminal state
        tracker.advance(id, JobStatus::Analyzing).unwrap();
        tracker.complete(id, sample_record()).unwrap();
        let job = tracker.query(id).unwrap();
        assert_eq!(job.status, JobStatus::Error);
        assert!(job.result.is_none());
    }

    #[test]
    fn test_complete_attaches_result() {
        let tracker = JobTracker::new();
        let id = tracker.submit();

        tracker.advance(id, JobStatus::ExtractingText).unwrap();
        tracker.advance(id, JobStatus::Analyzing).unwrap();
        tracker.complete(id, sample_record()).unwrap();

        let job = tracker.query(id).unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.progress, 100);
        assert_eq!(
            job.result.unwrap().document_id,
            "abc123"
        );
    }

    #[test]
    fn test_ids_unique_across_submissions() {
        let tracker = JobTracker::new();
        let a = tracker.submit();
        let b = tracker.submit();
        assert_ne!(a, b);
    }

    #[test]
    fn test_purge_removes_only_old_terminal_jobs() {
        let tracker = JobTracker::new();
        let done = tracker.submit();
        let running = tracker.submit();
        tracker.fail(done, "gone").unwrap();
        tracker.advance(running, JobStatus::Analyzing).unwrap();

        let removed = tracker.purge_terminal_older_than(Utc::now() + chrono::Duration::seconds(1));
        assert_eq!(removed, 1);
        assert!(tracker.query(done).is_err());
        assert!(tracker.query(running).is_ok());
    }

    #[test]
    fn test_concurrent_submissions() {
        use std::sync::Arc;

        let tracker = Arc::new(JobTracker::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let tracker = Arc::clone(&tracker);
            handles.push(std::thread::spawn(move || {
                let id = tracker.submit();
                tracker.advance(id, JobStatus::ExtractingText).unwrap();
                tracker.advance(id, JobStatus::Analyzing).unwrap();
                tracker.fail(id, "done").unwrap();
                id
            }));
        }

        let ids: Vec<Uuid> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for id in ids {
            assert_eq!(tracker.query(id).unwrap().status, JobStatus::Error);
        }
    }
}
