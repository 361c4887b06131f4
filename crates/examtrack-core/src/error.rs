//! Exam data error types.
//!
//! These errors describe submissions whose content cannot be scored as
//! declared. The analytics pipeline never propagates them: it degrades the
//! affected submission to a zero contribution and records the error as an
//! anomaly so callers can still see it.

use thiserror::Error;

use crate::model::{ExamType, PayloadKind};

/// Errors raised while interpreting exam submission data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    /// The exam type string is not one of TYT, AYT, LGS.
    #[error("unknown exam type: {0}")]
    UnknownExamType(String),

    /// The submission carries no subject payload at all.
    #[error("subject payload is missing")]
    MissingPayload,

    /// The subject payload did not match any known schema.
    #[error("malformed subject payload: {0}")]
    MalformedPayload(String),

    /// The payload variant is not allowed for the submission's exam type.
    #[error("{kind} payload is not valid for exam type {exam_type}")]
    VariantMismatch { exam_type: ExamType, kind: PayloadKind },

    /// The declared subject has no slot in the exam's hierarchy.
    #[error("subject '{subject}' is not part of the {exam_type} hierarchy")]
    UnknownSubject { exam_type: ExamType, subject: String },
}

impl DataError {
    /// Returns `true` if the payload could not be read at all, as opposed to
    /// being readable but attached to the wrong exam type.
    pub fn is_unreadable(&self) -> bool {
        matches!(
            self,
            DataError::MissingPayload | DataError::MalformedPayload(_)
        )
    }
}
