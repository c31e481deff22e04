use thiserror::Error;

use crate::domain::ImageBucket;

/// Failures reported by an external store. The record store's schema
/// complaints are kept apart from plain connectivity problems because schema
/// drift is the dominant expected failure mode and the operator needs the raw
/// detail to diagnose it.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },
    #[error("{0}")]
    Transport(String),
}

/// Outcome taxonomy of one submission attempt. Store messages pass through
/// unmodified; nothing here retries on the caller's behalf.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("upload of '{filename}' to bucket {bucket} failed: {source}")]
    Upload {
        bucket: ImageBucket,
        filename: String,
        source: StoreError,
    },
    #[error("record insert failed: {source}")]
    Insert { source: StoreError },
    #[error("precondition violated: {0}")]
    Precondition(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_detail_survives_display_chain() {
        let err = SubmissionError::Insert {
            source: StoreError::SchemaMismatch {
                message: "Could not find the 'roofShape' column".to_string(),
            },
        };
        assert!(err.to_string().contains("Could not find the 'roofShape' column"));
    }

    #[test]
    fn upload_error_names_bucket_and_file() {
        let err = SubmissionError::Upload {
            bucket: ImageBucket::Gutters,
            filename: "g1.jpg".to_string(),
            source: StoreError::Transport("quota exceeded".to_string()),
        };
        let text = err.to_string();
        assert!(text.contains("guttersPhotos"));
        assert!(text.contains("g1.jpg"));
        assert!(text.contains("quota exceeded"));
    }
}
