use std::{fs, path::Path};

use anyhow::{Context, Result};
use shared::domain::{ImageBucket, LocalImage};

/// Collects photo selections from a directory laid out as one subdirectory
/// per bucket column (e.g. `photos/defectPhotos/crack.jpg`). Files are taken
/// in name order so the resulting reference order is reproducible.
pub fn collect_bucket_images(photos_dir: &Path) -> Result<Vec<(ImageBucket, Vec<LocalImage>)>> {
    let mut selections = Vec::new();
    for bucket in ImageBucket::ALL {
        let dir = photos_dir.join(bucket.column_name());
        if !dir.is_dir() {
            continue;
        }
        let mut paths: Vec<_> = fs::read_dir(&dir)
            .with_context(|| format!("failed to read photo directory '{}'", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file())
            .collect();
        paths.sort();

        let mut images = Vec::with_capacity(paths.len());
        for path in paths {
            let bytes = fs::read(&path)
                .with_context(|| format!("failed to read photo '{}'", path.display()))?;
            let filename = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("photo")
                .to_string();
            let mime_type = path
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(mime_for_extension)
                .map(str::to_string);
            images.push(LocalImage::new(filename, mime_type, bytes));
        }
        if !images.is_empty() {
            selections.push((bucket, images));
        }
    }
    Ok(selections)
}

fn mime_for_extension(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::{
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    #[test]
    fn recognizes_common_photo_extensions() {
        assert_eq!(mime_for_extension("jpg"), Some("image/jpeg"));
        assert_eq!(mime_for_extension("JPEG"), Some("image/jpeg"));
        assert_eq!(mime_for_extension("png"), Some("image/png"));
        assert_eq!(mime_for_extension("heic"), Some("image/heic"));
        assert_eq!(mime_for_extension("txt"), None);
    }

    #[test]
    fn collects_only_bucket_named_subdirectories_in_name_order() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let root = env::temp_dir().join(format!("survey_cli_photos_{suffix}"));
        let defects = root.join("defectPhotos");
        fs::create_dir_all(&defects).expect("mkdir");
        fs::write(defects.join("b.jpg"), [1u8, 2]).expect("write");
        fs::write(defects.join("a.jpg"), [3u8]).expect("write");
        fs::create_dir_all(root.join("notABucket")).expect("mkdir");
        fs::write(root.join("notABucket").join("x.jpg"), [9u8]).expect("write");

        let selections = collect_bucket_images(&root).expect("collect");
        fs::remove_dir_all(&root).expect("cleanup");

        assert_eq!(selections.len(), 1);
        let (bucket, images) = &selections[0];
        assert_eq!(*bucket, ImageBucket::Defects);
        let names: Vec<_> = images.iter().map(|i| i.filename.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg"]);
        assert_eq!(images[0].mime_type.as_deref(), Some("image/jpeg"));
    }
}
