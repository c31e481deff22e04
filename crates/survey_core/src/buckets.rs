use shared::domain::{ImageBucket, LocalImage};

/// The locally selected photos of the active form session, one ordered list
/// per bucket. Owned exclusively by the session; the lists are discarded once
/// a submission has turned them into uploaded references.
#[derive(Debug, Default)]
pub struct ImageBucketSet {
    buckets: [Vec<LocalImage>; ImageBucket::COUNT],
}

impl ImageBucketSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_images(&mut self, bucket: ImageBucket, images: impl IntoIterator<Item = LocalImage>) {
        self.buckets[bucket.index()].extend(images);
    }

    /// Removes the file at `index`, shifting later selections down. Returns
    /// `None` when the index is out of range.
    pub fn remove_image(&mut self, bucket: ImageBucket, index: usize) -> Option<LocalImage> {
        let files = &mut self.buckets[bucket.index()];
        if index < files.len() {
            Some(files.remove(index))
        } else {
            None
        }
    }

    pub fn images(&self, bucket: ImageBucket) -> &[LocalImage] {
        &self.buckets[bucket.index()]
    }

    pub fn total_images(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_images() == 0
    }

    /// Buckets that have at least one file, in declaration order.
    pub fn non_empty(&self) -> impl Iterator<Item = (ImageBucket, &[LocalImage])> {
        ImageBucket::ALL
            .into_iter()
            .map(|bucket| (bucket, self.images(bucket)))
            .filter(|(_, images)| !images.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(name: &str) -> LocalImage {
        LocalImage::new(name, Some("image/jpeg".to_string()), vec![0u8; 4])
    }

    #[test]
    fn add_preserves_selection_order() {
        let mut buckets = ImageBucketSet::new();
        buckets.add_images(ImageBucket::Defects, [image("a.jpg"), image("b.jpg")]);
        buckets.add_images(ImageBucket::Defects, [image("c.jpg")]);

        let names: Vec<_> = buckets
            .images(ImageBucket::Defects)
            .iter()
            .map(|i| i.filename.as_str())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg", "c.jpg"]);
        assert_eq!(buckets.total_images(), 3);
    }

    #[test]
    fn remove_drops_selected_file_and_preserves_order() {
        let mut buckets = ImageBucketSet::new();
        buckets.add_images(
            ImageBucket::Gutters,
            [image("a.jpg"), image("b.jpg"), image("c.jpg")],
        );

        let removed = buckets.remove_image(ImageBucket::Gutters, 1).expect("removed");
        assert_eq!(removed.filename, "b.jpg");

        let names: Vec<_> = buckets
            .images(ImageBucket::Gutters)
            .iter()
            .map(|i| i.filename.as_str())
            .collect();
        assert_eq!(names, vec!["a.jpg", "c.jpg"]);
    }

    #[test]
    fn remove_out_of_range_is_a_no_op() {
        let mut buckets = ImageBucketSet::new();
        buckets.add_images(ImageBucket::Overview, [image("a.jpg")]);

        assert!(buckets.remove_image(ImageBucket::Overview, 5).is_none());
        assert_eq!(buckets.total_images(), 1);
    }

    #[test]
    fn non_empty_skips_buckets_without_files() {
        let mut buckets = ImageBucketSet::new();
        buckets.add_images(ImageBucket::BrokenTiles, [image("tile.jpg")]);
        buckets.add_images(ImageBucket::Completion, [image("done.jpg")]);

        let seen: Vec<_> = buckets.non_empty().map(|(bucket, _)| bucket).collect();
        assert_eq!(seen, vec![ImageBucket::BrokenTiles, ImageBucket::Completion]);
    }
}
