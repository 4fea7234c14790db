//! Image-quality checks and size-distribution analysis.
//!
//! The quality pass fully decodes each image and measures dimensions,
//! aspect ratio and grayscale variance; classification over those
//! measurements is a pure function so thresholds can be tested without
//! touching the filesystem. The size pass reads only dimensions from file
//! headers and never decodes pixel data.

mod report;

pub use report::{
    QualityFinding, QualityIssueKind, QualityReport, SizeBuckets, SizeEntry, SizeReadFailure,
    SizeReport, LARGE_MAX, MEDIUM_MAX, OVERSIZE_DIM, PERFECT_MAX, PERFECT_MIN, SMALL_MAX,
};

use std::path::Path;

use image::DynamicImage;

use crate::dataset::{collect_files_with_extensions, IMAGE_EXTENSIONS};
use crate::error::YolocheckError;

/// Thresholds for the quality pass.
#[derive(Clone, Debug)]
pub struct QualityOptions {
    pub min_width: u32,
    pub min_height: u32,
    /// Limit on `max(w/h, h/w)`.
    pub max_aspect_ratio: f64,
    /// Grayscale variance below this is considered near-blank.
    pub min_variance: f64,
}

impl Default for QualityOptions {
    fn default() -> Self {
        Self {
            min_width: 64,
            min_height: 64,
            max_aspect_ratio: 5.0,
            min_variance: 3.0,
        }
    }
}

/// Measurements taken from one decoded image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageMeasure {
    pub width: u32,
    pub height: u32,
    /// `max(w/h, h/w)`, 0.0 for degenerate dimensions.
    pub aspect: f64,
    /// Population variance of the grayscale pixels.
    pub variance: f64,
}

/// Measure a decoded image.
pub fn measure_image(img: &DynamicImage) -> ImageMeasure {
    let width = img.width();
    let height = img.height();

    let aspect = if width == 0 || height == 0 {
        0.0
    } else {
        let w = width as f64;
        let h = height as f64;
        (w / h).max(h / w)
    };

    let gray = img.to_luma8();
    let count = gray.as_raw().len();
    let variance = if count == 0 {
        0.0
    } else {
        let mut sum = 0.0f64;
        let mut sum_sq = 0.0f64;
        for value in gray.as_raw() {
            let v = *value as f64;
            sum += v;
            sum_sq += v * v;
        }
        let n = count as f64;
        let mean = sum / n;
        (sum_sq / n - mean * mean).max(0.0)
    };

    ImageMeasure {
        width,
        height,
        aspect,
        variance,
    }
}

/// Classify a measurement against the thresholds.
///
/// Zero-size short-circuits the remaining checks; everything else is
/// independent, so one image can collect several kinds.
pub fn evaluate_measure(measure: &ImageMeasure, opts: &QualityOptions) -> Vec<QualityIssueKind> {
    if measure.width == 0 || measure.height == 0 {
        return vec![QualityIssueKind::ZeroSize];
    }

    let mut kinds = Vec::new();
    if measure.width < opts.min_width || measure.height < opts.min_height {
        kinds.push(QualityIssueKind::TooSmall);
    }
    if measure.aspect > opts.max_aspect_ratio {
        kinds.push(QualityIssueKind::ExtremeAspect);
    }
    if measure.variance < opts.min_variance {
        kinds.push(QualityIssueKind::LowVariance);
    }
    kinds
}

/// Decode and classify every image under `images_dir`.
pub fn check_quality(
    images_dir: &Path,
    opts: &QualityOptions,
) -> Result<QualityReport, YolocheckError> {
    let files = collect_files_with_extensions(images_dir, &IMAGE_EXTENSIONS)?;

    let mut report = QualityReport::default();

    for path in files {
        report.images_checked += 1;

        let img = match image::open(&path) {
            Ok(img) => img,
            Err(_) => {
                report.findings.push(QualityFinding {
                    kind: QualityIssueKind::Unreadable,
                    path,
                    width: None,
                    height: None,
                    aspect: None,
                    variance: None,
                });
                continue;
            }
        };

        let measure = measure_image(&img);
        for kind in evaluate_measure(&measure, opts) {
            report.findings.push(QualityFinding {
                kind,
                path: path.clone(),
                width: Some(measure.width),
                height: Some(measure.height),
                aspect: Some(measure.aspect),
                variance: Some(measure.variance),
            });
        }
    }

    Ok(report)
}

/// Options for the size-distribution pass.
#[derive(Clone, Copy, Debug)]
pub struct SizeOptions {
    pub target_width: u32,
    pub target_height: u32,
}

impl Default for SizeOptions {
    fn default() -> Self {
        Self {
            target_width: 640,
            target_height: 640,
        }
    }
}

/// Read the dimensions of every image under `images_dir` and bucket them.
pub fn analyze_sizes(images_dir: &Path, opts: &SizeOptions) -> Result<SizeReport, YolocheckError> {
    let files = collect_files_with_extensions(images_dir, &IMAGE_EXTENSIONS)?;

    let mut report = SizeReport {
        target_width: opts.target_width,
        target_height: opts.target_height,
        ..Default::default()
    };

    for path in files {
        let size = match imagesize::size(&path) {
            Ok(size) => size,
            Err(err) => {
                report.read_failures.push(SizeReadFailure {
                    path,
                    reason: err.to_string(),
                });
                continue;
            }
        };

        let entry = SizeEntry {
            path,
            width: size.width as u32,
            height: size.height as u32,
        };

        report.total += 1;
        if entry.width == opts.target_width && entry.height == opts.target_height {
            report.matching_target += 1;
        }
        if (PERFECT_MIN..=PERFECT_MAX).contains(&entry.width)
            && (PERFECT_MIN..=PERFECT_MAX).contains(&entry.height)
        {
            report.perfect_range += 1;
        }

        let max_dim = entry.max_dim();
        if max_dim < SMALL_MAX {
            report.buckets.small += 1;
        } else if max_dim <= MEDIUM_MAX {
            report.buckets.medium += 1;
        } else if max_dim <= LARGE_MAX {
            report.buckets.large += 1;
        } else {
            report.buckets.very_large += 1;
        }

        report.entries.push(entry);
    }

    Ok(report)
}
