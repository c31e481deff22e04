use std::{future::Future, time::Duration};

use futures::future;
use shared::{
    domain::{ImageBucket, ImageRefs},
    error::{StoreError, SubmissionError},
};
use stores::{BlobStore, PutOptions};
use tracing::info;

use crate::buckets::ImageBucketSet;

/// Derives the storage object name for one file. The submission timestamp
/// keeps repeated submissions apart, the bucket prefix keeps buckets apart,
/// and the position keeps same-named files within one selection apart.
pub(crate) fn object_name(
    bucket: ImageBucket,
    stamp_millis: i64,
    index: usize,
    filename: &str,
) -> String {
    format!("{}/{stamp_millis}_{index}_{filename}", bucket.column_name())
}

/// Uploads every non-empty bucket and resolves the resulting public URLs.
///
/// Files within a bucket upload concurrently behind an all-or-nothing
/// barrier; the output order matches the selection order regardless of
/// completion order. Any single failure abandons the whole attempt with no
/// partial reference set. Objects already uploaded when a later file fails
/// stay behind in the blob store unreferenced; there is no rollback.
pub(crate) async fn upload_bucket_set(
    blob_store: &dyn BlobStore,
    buckets: &ImageBucketSet,
    stamp_millis: i64,
    op_timeout: Option<Duration>,
) -> Result<ImageRefs, SubmissionError> {
    let mut refs = ImageRefs::default();
    for (bucket, images) in buckets.non_empty() {
        info!(
            bucket = bucket.column_name(),
            files = images.len(),
            "uploading image bucket"
        );
        let uploads = images.iter().enumerate().map(|(index, image)| {
            let name = object_name(bucket, stamp_millis, index, &image.filename);
            async move {
                let options = PutOptions::default();
                let put = blob_store.put(
                    &name,
                    image.bytes.clone(),
                    image.mime_type.as_deref(),
                    &options,
                );
                match with_timeout(op_timeout, put).await {
                    Ok(()) => Ok(blob_store.resolve_public_url(&name)),
                    Err(source) => Err(SubmissionError::Upload {
                        bucket,
                        filename: image.filename.clone(),
                        source,
                    }),
                }
            }
        });
        let urls = future::try_join_all(uploads).await?;
        refs.set(bucket, urls);
    }
    Ok(refs)
}

pub(crate) async fn with_timeout<T>(
    limit: Option<Duration>,
    operation: impl Future<Output = Result<T, StoreError>>,
) -> Result<T, StoreError> {
    match limit {
        Some(limit) => match tokio::time::timeout(limit, operation).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Transport(format!(
                "store operation timed out after {limit:?}"
            ))),
        },
        None => operation.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_name_embeds_bucket_stamp_position_and_filename() {
        assert_eq!(
            object_name(ImageBucket::BrokenTiles, 1724390000000, 2, "tile.jpg"),
            "brokenTilesPhoto/1724390000000_2_tile.jpg"
        );
    }

    #[test]
    fn object_names_differ_across_buckets_and_positions() {
        let a = object_name(ImageBucket::Defects, 1, 0, "photo.jpg");
        let b = object_name(ImageBucket::Gutters, 1, 0, "photo.jpg");
        let c = object_name(ImageBucket::Defects, 1, 1, "photo.jpg");
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
