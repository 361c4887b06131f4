//! In-memory submission store.

use anyhow::Result;

use crate::model::ExamSubmission;
use crate::traits::{SubmissionQuery, SubmissionStore};

/// Keeps submissions in insertion order and lists them newest first, the
/// way a database-backed store usually returns them.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    submissions: Vec<ExamSubmission>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored submissions in insertion order.
    pub fn submissions(&self) -> &[ExamSubmission] {
        &self.submissions
    }

    pub fn into_submissions(self) -> Vec<ExamSubmission> {
        self.submissions
    }

    pub fn len(&self) -> usize {
        self.submissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.submissions.is_empty()
    }
}

impl From<Vec<ExamSubmission>> for MemoryStore {
    fn from(submissions: Vec<ExamSubmission>) -> Self {
        Self { submissions }
    }
}

impl SubmissionStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn list(&self, query: &SubmissionQuery) -> Result<Vec<ExamSubmission>> {
        let mut out: Vec<ExamSubmission> = self
            .submissions
            .iter()
            .filter(|s| query.matches(s))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.exam_date.cmp(&a.exam_date));
        Ok(out)
    }

    fn insert(&mut self, submission: ExamSubmission) -> Result<()> {
        if self.submissions.iter().any(|s| s.id == submission.id) {
            anyhow::bail!("submission id already exists: {}", submission.id);
        }
        self.submissions.push(submission);
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<bool> {
        let before = self.submissions.len();
        self.submissions.retain(|s| s.id != id);
        let removed = self.submissions.len() != before;
        if removed {
            tracing::debug!(%id, "deleted submission");
        }
        Ok(removed)
    }
}
