//! Quality and size-distribution report types.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Size-bucket boundary: anything with a max dimension below this is small.
pub const SMALL_MAX: u32 = 416;
/// Upper edge of the medium bucket.
pub const MEDIUM_MAX: u32 = 820;
/// Upper edge of the large bucket; above is very large.
pub const LARGE_MAX: u32 = 1920;
/// Dimensions past this are called out separately in deletion plans.
pub const OVERSIZE_DIM: u32 = 4000;
/// Inclusive band considered ideal for training input.
pub const PERFECT_MIN: u32 = 416;
/// Upper edge of the ideal band.
pub const PERFECT_MAX: u32 = 640;

/// A named category of image-quality finding.
///
/// Buckets are independent: one image can be both too small and near-blank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityIssueKind {
    /// The image could not be decoded.
    Unreadable,
    /// Decoded but one dimension is zero.
    ZeroSize,
    /// Below the configured minimum width/height.
    TooSmall,
    /// Aspect ratio beyond the configured limit.
    ExtremeAspect,
    /// Grayscale variance below the configured threshold (near-blank).
    LowVariance,
}

impl QualityIssueKind {
    /// Every kind, in report display order.
    pub const ALL: [QualityIssueKind; 5] = [
        QualityIssueKind::Unreadable,
        QualityIssueKind::ZeroSize,
        QualityIssueKind::TooSmall,
        QualityIssueKind::ExtremeAspect,
        QualityIssueKind::LowVariance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityIssueKind::Unreadable => "unreadable",
            QualityIssueKind::ZeroSize => "zero_size",
            QualityIssueKind::TooSmall => "too_small",
            QualityIssueKind::ExtremeAspect => "extreme_aspect",
            QualityIssueKind::LowVariance => "low_variance",
        }
    }
}

impl FromStr for QualityIssueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unreadable" => Ok(QualityIssueKind::Unreadable),
            "zero_size" => Ok(QualityIssueKind::ZeroSize),
            "too_small" => Ok(QualityIssueKind::TooSmall),
            "extreme_aspect" => Ok(QualityIssueKind::ExtremeAspect),
            "low_variance" => Ok(QualityIssueKind::LowVariance),
            other => Err(format!(
                "unknown issue kind '{}' (expected one of: unreadable, zero_size, too_small, extreme_aspect, low_variance)",
                other
            )),
        }
    }
}

impl fmt::Display for QualityIssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One flagged image with the measurements that triggered the flag.
#[derive(Clone, Debug, Serialize)]
pub struct QualityFinding {
    pub kind: QualityIssueKind,
    pub path: PathBuf,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub aspect: Option<f64>,
    pub variance: Option<f64>,
}

impl fmt::Display for QualityFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path.display();
        match self.kind {
            QualityIssueKind::Unreadable | QualityIssueKind::ZeroSize => {
                write!(f, "{}", path)
            }
            QualityIssueKind::TooSmall => write!(
                f,
                "{} ({}x{})",
                path,
                self.width.unwrap_or(0),
                self.height.unwrap_or(0)
            ),
            QualityIssueKind::ExtremeAspect => write!(
                f,
                "{} (AR={:.2}, {}x{})",
                path,
                self.aspect.unwrap_or(0.0),
                self.width.unwrap_or(0),
                self.height.unwrap_or(0)
            ),
            QualityIssueKind::LowVariance => {
                write!(f, "{} (var={:.2})", path, self.variance.unwrap_or(0.0))
            }
        }
    }
}

/// The result of a quality scan.
#[derive(Clone, Debug, Default, Serialize)]
pub struct QualityReport {
    /// Images that were examined (readable or not).
    pub images_checked: usize,
    /// All findings, grouped implicitly by kind through `count_for`.
    pub findings: Vec<QualityFinding>,
}

impl QualityReport {
    pub fn count_for(&self, kind: QualityIssueKind) -> usize {
        self.findings
            .iter()
            .filter(|finding| finding.kind == kind)
            .count()
    }

    /// Quality findings are advisory: candidates for pruning, not corruption.
    pub fn warning_count(&self) -> usize {
        self.findings.len()
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

impl fmt::Display for QualityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Checked {} image(s)", self.images_checked)?;

        if self.findings.is_empty() {
            return writeln!(f, "No obvious image quality issues found");
        }

        for kind in QualityIssueKind::ALL {
            let entries: Vec<&QualityFinding> = self
                .findings
                .iter()
                .filter(|finding| finding.kind == kind)
                .collect();
            if entries.is_empty() {
                continue;
            }

            writeln!(f, "{} ({}):", kind, entries.len())?;
            for finding in entries {
                writeln!(f, "  {}", finding)?;
            }
        }

        Ok(())
    }
}

/// Dimensions of one successfully probed image.
#[derive(Clone, Debug, Serialize)]
pub struct SizeEntry {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl SizeEntry {
    pub fn max_dim(&self) -> u32 {
        self.width.max(self.height)
    }
}

/// An image whose dimensions could not be read.
#[derive(Clone, Debug, Serialize)]
pub struct SizeReadFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Counts of images per size bucket, keyed by max dimension.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SizeBuckets {
    /// max dimension < 416
    pub small: usize,
    /// 416..=820
    pub medium: usize,
    /// 821..=1920
    pub large: usize,
    /// > 1920
    pub very_large: usize,
}

/// The result of the size-distribution pass.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SizeReport {
    pub target_width: u32,
    pub target_height: u32,
    pub total: usize,
    /// Images matching the target resolution exactly.
    pub matching_target: usize,
    /// Images with both dimensions in the ideal 416..=640 band.
    pub perfect_range: usize,
    pub buckets: SizeBuckets,
    /// Every probed image, sorted by path.
    pub entries: Vec<SizeEntry>,
    pub read_failures: Vec<SizeReadFailure>,
}

impl SizeReport {
    /// Entries exceeding `max_dim` on either axis, deletion candidates.
    pub fn oversized(&self, max_dim: u32) -> Vec<&SizeEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.width > max_dim || entry.height > max_dim)
            .collect()
    }

    fn pct(&self, count: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count as f64 / self.total as f64 * 100.0
        }
    }
}

impl fmt::Display for SizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Target size check ({}x{}):",
            self.target_width, self.target_height
        )?;
        writeln!(f, "  Total images: {}", self.total)?;

        if self.total == 0 {
            if !self.read_failures.is_empty() {
                writeln!(f, "  Unreadable headers: {}", self.read_failures.len())?;
            }
            return writeln!(f, "  No images found");
        }

        let non_matching = self.total - self.matching_target;
        writeln!(
            f,
            "  Matching target size: {} ({:.1}%)",
            self.matching_target,
            self.pct(self.matching_target)
        )?;
        writeln!(
            f,
            "  Perfect range ({}-{}): {} ({:.1}%)",
            PERFECT_MIN,
            PERFECT_MAX,
            self.perfect_range,
            self.pct(self.perfect_range)
        )?;
        writeln!(
            f,
            "  Not matching: {} ({:.1}%)",
            non_matching,
            self.pct(non_matching)
        )?;

        let mismatched: Vec<&SizeEntry> = self
            .entries
            .iter()
            .filter(|entry| {
                entry.width != self.target_width || entry.height != self.target_height
            })
            .collect();
        if !mismatched.is_empty() {
            writeln!(f, "Images with different sizes:")?;
            for entry in mismatched.iter().take(20) {
                writeln!(
                    f,
                    "  {}: {}x{}",
                    entry.path.display(),
                    entry.width,
                    entry.height
                )?;
            }
            if mismatched.len() > 20 {
                writeln!(f, "  ... and {} more", mismatched.len() - 20)?;
            }
        }

        writeln!(f, "Size categories:")?;
        writeln!(f, "  Small (<{}px): {}", SMALL_MAX, self.buckets.small)?;
        writeln!(
            f,
            "  Medium ({}-{}px): {}",
            SMALL_MAX, MEDIUM_MAX, self.buckets.medium
        )?;
        writeln!(
            f,
            "  Large ({}-{}px): {}",
            MEDIUM_MAX, LARGE_MAX, self.buckets.large
        )?;
        writeln!(f, "  Very large (>{}px): {}", LARGE_MAX, self.buckets.very_large)?;

        if !self.read_failures.is_empty() {
            writeln!(f, "Unreadable headers ({}):", self.read_failures.len())?;
            for failure in &self.read_failures {
                writeln!(f, "  {}: {}", failure.path.display(), failure.reason)?;
            }
        }

        Ok(())
    }
}
