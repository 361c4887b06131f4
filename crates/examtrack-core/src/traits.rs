//! Trait definitions for the storage collaborator.
//!
//! The analytics pipeline never performs I/O. Callers fetch submissions
//! through a [`SubmissionStore`] before running it and apply deletions after.

use serde::{Deserialize, Serialize};

use crate::model::{ExamSubmission, ExamType};

// ---------------------------------------------------------------------------
// Submission store trait
// ---------------------------------------------------------------------------

/// Backend holding raw exam submissions.
pub trait SubmissionStore {
    /// Human-readable backend name (e.g. "memory").
    fn name(&self) -> &str;

    /// Submissions matching the query. Order is backend-defined.
    fn list(&self, query: &SubmissionQuery) -> anyhow::Result<Vec<ExamSubmission>>;

    /// Store a new submission. Ids must be unique.
    fn insert(&mut self, submission: ExamSubmission) -> anyhow::Result<()>;

    /// Delete one submission by id. Returns `false` if no such id exists.
    fn delete(&mut self, id: &str) -> anyhow::Result<bool>;
}

/// Pre-filter applied by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionQuery {
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub exam_type: Option<ExamType>,
}

impl SubmissionQuery {
    pub fn matches(&self, submission: &ExamSubmission) -> bool {
        self.student_id
            .as_deref()
            .map_or(true, |id| submission.student_id == id)
            && self
                .exam_type
                .map_or(true, |t| submission.exam_type == t)
    }
}
