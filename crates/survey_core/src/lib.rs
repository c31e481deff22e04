use std::{sync::Arc, time::Duration};

use chrono::{Local, Utc};
use shared::{
    domain::{FieldKey, ImageBucket, InspectionFields, InspectionReport, LocalImage, ReportId},
    error::{StoreError, SubmissionError},
};
use stores::{BlobStore, RecordStore};
use tracing::{info, warn};

pub mod buckets;
mod upload;

pub use buckets::ImageBucketSet;

pub const DEFAULT_REPORT_COLLECTION: &str = "inspection_reports";

/// Lifecycle of the current submission attempt. `Failed` is terminal per
/// attempt only: a fresh `submit` call is allowed from `Failed` without any
/// automatic mutation of the form in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

/// One form session: the scalar answers, the locally selected photos, and an
/// explicit phase machine guarding the single in-flight submission. Owned by
/// the caller and mutated only through this API; during `submit` the borrow
/// checker already rules out concurrent edits. Dropping the `submit` future
/// mid-flight records the attempt as `Failed` so the session stays usable.
pub struct SurveySession {
    blob_store: Arc<dyn BlobStore>,
    record_store: Arc<dyn RecordStore>,
    collection: String,
    op_timeout: Option<Duration>,
    fields: InspectionFields,
    buckets: ImageBucketSet,
    phase: SubmissionPhase,
    last_error: Option<String>,
}

impl SurveySession {
    pub fn new(blob_store: Arc<dyn BlobStore>, record_store: Arc<dyn RecordStore>) -> Self {
        Self {
            blob_store,
            record_store,
            collection: DEFAULT_REPORT_COLLECTION.to_string(),
            op_timeout: None,
            fields: InspectionFields::fresh(Local::now()),
            buckets: ImageBucketSet::new(),
            phase: SubmissionPhase::Idle,
            last_error: None,
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Caps every individual store operation (each `put`, the `insert`).
    /// Without it, failures surface only as the stores report them.
    pub fn with_op_timeout(mut self, limit: Duration) -> Self {
        self.op_timeout = Some(limit);
        self
    }

    /// Seeds the form with pre-filled answers, replacing the fresh defaults.
    pub fn with_fields(mut self, fields: InspectionFields) -> Self {
        self.fields = fields;
        self
    }

    pub fn fields(&self) -> &InspectionFields {
        &self.fields
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn set_field(&mut self, key: FieldKey, value: impl Into<String>) {
        self.fields.set(key, value);
    }

    pub fn add_images(
        &mut self,
        bucket: ImageBucket,
        images: impl IntoIterator<Item = LocalImage>,
    ) {
        self.buckets.add_images(bucket, images);
    }

    pub fn remove_image(&mut self, bucket: ImageBucket, index: usize) -> Option<LocalImage> {
        self.buckets.remove_image(bucket, index)
    }

    pub fn images(&self, bucket: ImageBucket) -> &[LocalImage] {
        self.buckets.images(bucket)
    }

    /// One end-to-end submission attempt: upload every non-empty bucket,
    /// merge the resolved URLs into the scalar answers, insert exactly one
    /// row. No step is retried; a failed attempt leaves the form untouched
    /// so the caller can resubmit. Uploads that completed before a later
    /// failure remain in the blob store as unreferenced objects.
    pub async fn submit(&mut self) -> Result<ReportId, SubmissionError> {
        if self.phase == SubmissionPhase::InFlight {
            return Err(SubmissionError::Precondition(
                "a submission is already in flight for this session".to_string(),
            ));
        }
        self.phase = SubmissionPhase::InFlight;
        self.last_error = None;

        // The guard settles the phase if the caller drops this future
        // mid-flight (timeout, select, UI teardown); otherwise InFlight
        // would stick and every later submit/reset would be rejected.
        let mut guard = FlightGuard {
            session: self,
            settled: false,
        };
        let result = guard.session.submit_once().await;
        guard.settled = true;

        match &result {
            Ok(report_id) => {
                guard.session.phase = SubmissionPhase::Succeeded;
                info!(report_id = report_id.0, "inspection report recorded");
            }
            Err(err) => {
                guard.session.phase = SubmissionPhase::Failed;
                guard.session.last_error = Some(err.to_string());
                warn!(error = %err, "submission attempt failed");
            }
        }
        result
    }

    async fn submit_once(&self) -> Result<ReportId, SubmissionError> {
        let stamp_millis = Utc::now().timestamp_millis();
        let images = upload::upload_bucket_set(
            self.blob_store.as_ref(),
            &self.buckets,
            stamp_millis,
            self.op_timeout,
        )
        .await?;

        let report = InspectionReport {
            fields: self.fields.clone(),
            images,
        };
        let record = serde_json::to_value(&report).map_err(|e| SubmissionError::Insert {
            source: StoreError::Transport(format!("failed to encode report record: {e}")),
        })?;

        info!(
            collection = %self.collection,
            uploaded = self.buckets.total_images(),
            "inserting inspection report"
        );
        let insert = self.record_store.insert(&self.collection, record);
        upload::with_timeout(self.op_timeout, insert)
            .await
            .map_err(|source| SubmissionError::Insert { source })
    }

    /// Returns the session to a fresh baseline: all scalar answers cleared,
    /// date and time recomputed to the current moment, photo selections
    /// dropped, phase back to `Idle`. Idempotent on an already-fresh session;
    /// rejected only while a submission is in flight.
    pub fn reset(&mut self) -> Result<(), SubmissionError> {
        if self.phase == SubmissionPhase::InFlight {
            return Err(SubmissionError::Precondition(
                "cannot reset while a submission is in flight".to_string(),
            ));
        }
        self.fields = InspectionFields::fresh(Local::now());
        self.buckets = ImageBucketSet::new();
        self.phase = SubmissionPhase::Idle;
        self.last_error = None;
        Ok(())
    }
}

/// Marks a cancelled attempt as failed. Any store call abandoned on the way
/// down may or may not have taken effect remotely, so the attempt cannot be
/// treated as never started.
struct FlightGuard<'a> {
    session: &'a mut SurveySession,
    settled: bool,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.session.phase = SubmissionPhase::Failed;
            self.session.last_error =
                Some("submission cancelled before completion".to_string());
            warn!("in-flight submission dropped before completion");
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
