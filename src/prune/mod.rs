//! Deletion of flagged image/label pairs.
//!
//! A plan is built purely from scan findings; applying it is the only
//! mutating operation in the crate. Whether to apply is decided by the
//! caller (prompt, `--yes`, dry-run), never in here. Image and label
//! deletions are attempted independently: a permission error on one file
//! is recorded and the run continues.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{error, info};

use crate::dataset::label_path_for_image;
use crate::quality::{QualityIssueKind, QualityReport, SizeReport, OVERSIZE_DIM};

/// One image staged for deletion together with its label file.
#[derive(Clone, Debug, Serialize)]
pub struct PrunePair {
    pub image: PathBuf,
    pub label: PathBuf,
    /// The issue kind (or size category) that flagged the image.
    pub reason: String,
}

/// The full set of pairs staged for deletion.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PrunePlan {
    pub pairs: Vec<PrunePair>,
}

impl PrunePlan {
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

impl fmt::Display for PrunePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Found {} image(s) staged for deletion:",
            self.pairs.len()
        )?;
        for (index, pair) in self.pairs.iter().enumerate() {
            writeln!(f, "{}. Issue: {}", index + 1, pair.reason)?;
            writeln!(f, "   Image: {}", pair.image.display())?;
            if pair.label.exists() {
                writeln!(f, "   Label: {}", pair.label.display())?;
            } else {
                writeln!(f, "   Label: {} (not found)", pair.label.display())?;
            }
        }
        Ok(())
    }
}

/// Build a plan from quality findings matching `kinds`.
///
/// An empty filter selects every kind. One image flagged for several kinds
/// is staged once, under the first kind that matched.
pub fn plan_from_quality(
    report: &QualityReport,
    kinds: &[QualityIssueKind],
    labels_dir: Option<&Path>,
) -> PrunePlan {
    let mut pairs: Vec<PrunePair> = Vec::new();

    for finding in &report.findings {
        if !kinds.is_empty() && !kinds.contains(&finding.kind) {
            continue;
        }
        if pairs.iter().any(|pair| pair.image == finding.path) {
            continue;
        }
        pairs.push(PrunePair {
            image: finding.path.clone(),
            label: label_path_for_image(&finding.path, labels_dir),
            reason: finding.kind.to_string(),
        });
    }

    PrunePlan { pairs }
}

/// Build a plan from the size analyzer's oversized entries.
pub fn plan_from_oversized(
    report: &SizeReport,
    max_dim: u32,
    labels_dir: Option<&Path>,
) -> PrunePlan {
    let pairs = report
        .oversized(max_dim)
        .into_iter()
        .map(|entry| {
            let reason = if entry.width > OVERSIZE_DIM || entry.height > OVERSIZE_DIM {
                format!("very large ({}x{})", entry.width, entry.height)
            } else {
                format!("large ({}x{})", entry.width, entry.height)
            };
            PrunePair {
                image: entry.path.clone(),
                label: label_path_for_image(&entry.path, labels_dir),
                reason,
            }
        })
        .collect();

    PrunePlan { pairs }
}

/// A deletion that did not go through.
#[derive(Clone, Debug, Serialize)]
pub struct PruneFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Tally of an applied plan.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PruneOutcome {
    pub deleted_images: usize,
    pub deleted_labels: usize,
    pub failures: Vec<PruneFailure>,
}

impl fmt::Display for PruneOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Deleted {} image(s) and {} label file(s)",
            self.deleted_images, self.deleted_labels
        )?;
        if !self.failures.is_empty() {
            writeln!(f, "Failed to delete {} file(s):", self.failures.len())?;
            for failure in &self.failures {
                writeln!(f, "  {}: {}", failure.path.display(), failure.error)?;
            }
        }
        Ok(())
    }
}

/// Apply a pre-confirmed plan.
///
/// Labels that never existed are skipped silently; a label the pairing
/// resolved but that vanished between scan and apply is also a skip, not a
/// failure.
pub fn apply(plan: &PrunePlan) -> PruneOutcome {
    let mut outcome = PruneOutcome::default();

    for pair in &plan.pairs {
        if pair.image.exists() {
            match fs::remove_file(&pair.image) {
                Ok(()) => {
                    info!(image = %pair.image.display(), reason = %pair.reason, "deleted image");
                    outcome.deleted_images += 1;
                }
                Err(err) => {
                    error!(image = %pair.image.display(), %err, "failed to delete image");
                    outcome.failures.push(PruneFailure {
                        path: pair.image.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }

        if pair.label.exists() {
            match fs::remove_file(&pair.label) {
                Ok(()) => {
                    info!(label = %pair.label.display(), "deleted label");
                    outcome.deleted_labels += 1;
                }
                Err(err) => {
                    error!(label = %pair.label.display(), %err, "failed to delete label");
                    outcome.failures.push(PruneFailure {
                        path: pair.label.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }
    }

    outcome
}
