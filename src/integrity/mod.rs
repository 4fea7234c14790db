//! Image integrity checks: decode classification and image/label pairing.
//!
//! Decoders in the `image` crate always produce one of a fixed set of
//! sample layouts, so the pixel-range check cannot fail the way it can for
//! an arbitrary array library: an 8-bit decode is in `[0, 255]` by
//! construction. The check still records min/max per image and classifies
//! 16-bit and float decodes as anomalous, which surfaces corrupt or
//! mis-exported sources.

mod report;

pub use report::{
    DepthEntry, PairingReport, PixelRangeReport, RangeEntry, UnreadableEntry,
};

use std::collections::BTreeSet;
use std::path::Path;

use image::DynamicImage;

use crate::dataset::{
    collect_files_with_extensions, rel_stem, rel_string, IMAGE_EXTENSIONS, LABEL_EXTENSION,
};
use crate::error::YolocheckError;

/// Decode every image under `images_dir` and classify it by sample range.
pub fn check_pixel_range(images_dir: &Path) -> Result<PixelRangeReport, YolocheckError> {
    let files = collect_files_with_extensions(images_dir, &IMAGE_EXTENSIONS)?;

    let mut report = PixelRangeReport::default();

    for path in files {
        let rel = rel_string(images_dir, &path);

        let img = match image::open(&path) {
            Ok(img) => img,
            Err(err) => {
                report.unreadable.push(UnreadableEntry {
                    path: rel,
                    reason: err.to_string(),
                });
                continue;
            }
        };

        if is_byte_sampled(&img) {
            let bytes = img.as_bytes();
            let min = bytes.iter().copied().min().unwrap_or(0);
            let max = bytes.iter().copied().max().unwrap_or(0);
            report.valid_range.push(RangeEntry {
                path: rel,
                min,
                max,
            });
        } else {
            report.invalid_range.push(DepthEntry {
                path: rel,
                color: format!("{:?}", img.color()),
            });
        }
    }

    Ok(report)
}

fn is_byte_sampled(img: &DynamicImage) -> bool {
    matches!(
        img,
        DynamicImage::ImageLuma8(_)
            | DynamicImage::ImageLumaA8(_)
            | DynamicImage::ImageRgb8(_)
            | DynamicImage::ImageRgba8(_)
    )
}

/// Verify that every image has a same-stem label file and vice versa.
///
/// Presence only: label contents are the validator's concern.
pub fn check_pairing(
    images_dir: &Path,
    labels_dir: &Path,
) -> Result<PairingReport, YolocheckError> {
    let image_files = collect_files_with_extensions(images_dir, &IMAGE_EXTENSIONS)?;
    let label_files = collect_files_with_extensions(labels_dir, &[LABEL_EXTENSION])?;

    let label_stems: BTreeSet<String> = label_files
        .iter()
        .map(|path| rel_stem(labels_dir, path))
        .collect();
    let image_stems: BTreeSet<String> = image_files
        .iter()
        .map(|path| rel_stem(images_dir, path))
        .collect();

    let missing_labels = image_files
        .iter()
        .filter(|path| !label_stems.contains(&rel_stem(images_dir, path)))
        .map(|path| rel_string(images_dir, path))
        .collect();

    let missing_images = label_files
        .iter()
        .filter(|path| !image_stems.contains(&rel_stem(labels_dir, path)))
        .map(|path| rel_string(labels_dir, path))
        .collect();

    Ok(PairingReport {
        images_checked: image_files.len(),
        labels_checked: label_files.len(),
        missing_labels,
        missing_images,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_gray_png(path: &Path, width: u32, height: u32, value: u8) {
        let img = image::GrayImage::from_pixel(width, height, image::Luma([value]));
        img.save(path).expect("save png");
    }

    #[test]
    fn byte_image_reports_valid_range() {
        let temp = tempfile::tempdir().expect("create temp dir");
        write_gray_png(&temp.path().join("pixel.png"), 1, 1, 0);

        let report = check_pixel_range(temp.path()).expect("check");
        assert_eq!(report.valid_range.len(), 1);
        assert_eq!(report.valid_range[0].min, 0);
        assert_eq!(report.valid_range[0].max, 0);
        assert!(report.is_clean());
    }

    #[test]
    fn corrupt_file_reports_unreadable() {
        let temp = tempfile::tempdir().expect("create temp dir");
        fs::write(temp.path().join("broken.jpg"), b"not an image").expect("write garbage");

        let report = check_pixel_range(temp.path()).expect("check");
        assert_eq!(report.unreadable.len(), 1);
        assert_eq!(report.unreadable[0].path, "broken.jpg");
        assert_eq!(report.error_count(), 1);
    }

    #[test]
    fn sixteen_bit_png_reports_invalid_range() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let img = image::ImageBuffer::<image::Luma<u16>, Vec<u16>>::from_pixel(
            2,
            2,
            image::Luma([40_000u16]),
        );
        img.save(temp.path().join("deep.png")).expect("save png16");

        let report = check_pixel_range(temp.path()).expect("check");
        assert_eq!(report.invalid_range.len(), 1);
        assert!(report.invalid_range[0].color.contains("16"));
    }

    #[test]
    fn non_image_extensions_are_ignored() {
        let temp = tempfile::tempdir().expect("create temp dir");
        fs::write(temp.path().join("notes.txt"), b"hello").expect("write notes");

        let report = check_pixel_range(temp.path()).expect("check");
        assert_eq!(report.total_checked(), 0);
    }

    #[test]
    fn pairing_flags_both_directions() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let images = temp.path().join("images");
        let labels = temp.path().join("labels");
        fs::create_dir_all(&images).expect("create images");
        fs::create_dir_all(&labels).expect("create labels");

        write_gray_png(&images.join("paired.png"), 1, 1, 7);
        fs::write(labels.join("paired.txt"), "0 0.5 0.5 0.2 0.2\n").expect("write label");
        write_gray_png(&images.join("lonely.png"), 1, 1, 7);
        fs::write(labels.join("orphan.txt"), "").expect("write orphan");

        let report = check_pairing(&images, &labels).expect("check");
        assert_eq!(report.missing_labels, vec!["lonely.png"]);
        assert_eq!(report.missing_images, vec!["orphan.txt"]);
        assert_eq!(report.warning_count(), 2);
    }

    #[test]
    fn pairing_matches_nested_stems() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let images = temp.path().join("images");
        let labels = temp.path().join("labels");
        fs::create_dir_all(images.join("train")).expect("create images/train");
        fs::create_dir_all(labels.join("train")).expect("create labels/train");

        write_gray_png(&images.join("train/frame.png"), 1, 1, 7);
        fs::write(labels.join("train/frame.txt"), "").expect("write label");

        let report = check_pairing(&images, &labels).expect("check");
        assert!(report.is_clean(), "unexpected findings: {:?}", report);
    }
}
