use thiserror::Error;

use crate::features::reports::models::{AllocationError, Folio, ImageReference};
use crate::modules::storage::StoreError;

/// A report durably committed to the store
#[derive(Debug, Clone)]
pub struct SubmittedReport {
    pub folio: Folio,
    pub image_reference: ImageReference,
    /// Store reference for the record write (commit URL)
    pub confirmation_reference: String,
}

/// Which fatal step stopped a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionFailureKind {
    Allocation,
    RecordPersist,
}

/// Fatal submission failures
///
/// Image upload failures never surface here; they degrade the report's
/// image reference instead.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The next folio could not be computed; nothing was written
    #[error("Failed to compute the next folio: {0}")]
    Allocation(#[source] AllocationError),

    /// The folio was allocated but the record could not be encoded
    #[error("Failed to encode report {folio}: {source}")]
    RecordEncode {
        folio: Folio,
        #[source]
        source: serde_json::Error,
    },

    /// The folio was allocated but the record was not written
    #[error("Failed to persist report {folio}: {source}")]
    RecordPersist {
        folio: Folio,
        #[source]
        source: StoreError,
    },
}

impl SubmissionError {
    pub fn kind(&self) -> SubmissionFailureKind {
        match self {
            SubmissionError::Allocation(_) => SubmissionFailureKind::Allocation,
            SubmissionError::RecordEncode { .. } | SubmissionError::RecordPersist { .. } => {
                SubmissionFailureKind::RecordPersist
            }
        }
    }

    /// Folio consumed by the failed submission, if one was assigned
    pub fn assigned_folio(&self) -> Option<Folio> {
        match self {
            SubmissionError::Allocation(_) => None,
            SubmissionError::RecordEncode { folio, .. }
            | SubmissionError::RecordPersist { folio, .. } => Some(*folio),
        }
    }

    /// Message of the underlying failure
    pub fn details(&self) -> String {
        match self {
            SubmissionError::Allocation(source) => source.to_string(),
            SubmissionError::RecordEncode { source, .. } => source.to_string(),
            SubmissionError::RecordPersist { source, .. } => source.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_failure_keeps_assigned_folio() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = SubmissionError::RecordEncode {
            folio: Folio::new(12),
            source,
        };

        assert_eq!(err.kind(), SubmissionFailureKind::RecordPersist);
        assert_eq!(err.assigned_folio(), Some(Folio::new(12)));
        assert!(err.to_string().contains("encode report F-0012"));
        assert!(!err.details().is_empty());
    }

    #[test]
    fn test_exhausted_allocation_has_no_folio() {
        let err = SubmissionError::Allocation(AllocationError::Exhausted(u64::MAX));

        assert_eq!(err.kind(), SubmissionFailureKind::Allocation);
        assert_eq!(err.assigned_folio(), None);
        assert!(err.details().contains("18446744073709551615"));
    }
}
