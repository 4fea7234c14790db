//! YOLO label-format validation.
//!
//! Scans every `.txt` file under a label directory and checks each
//! annotation row: token format, class ID range, coordinate normalization,
//! positive box dimensions, and box containment. Violations on a row are
//! reported independently; only a parse failure short-circuits the
//! remaining checks for that row.

mod report;

pub use report::{LabelIssue, LabelIssueCode, LabelReport, Severity};

use std::fs;
use std::path::Path;

use crate::dataset::{collect_files_with_extensions, rel_string, LABEL_EXTENSION};
use crate::error::YolocheckError;
use crate::label::{parse_label_line, LabelLine};

/// Options for label validation.
#[derive(Clone, Debug)]
pub struct ValidateOptions {
    /// Number of classes; valid IDs are `[0, num_classes)`.
    pub num_classes: i64,
    /// When set, additionally require every class ID to equal this value.
    pub expect_class: Option<i64>,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            num_classes: 6,
            expect_class: None,
        }
    }
}

/// Validate every label file under `labels_dir`.
///
/// File-read failures become findings, never fatal errors; the only fatal
/// condition is `labels_dir` itself being absent.
pub fn validate_labels(
    labels_dir: &Path,
    opts: &ValidateOptions,
) -> Result<LabelReport, YolocheckError> {
    let files = collect_files_with_extensions(labels_dir, &[LABEL_EXTENSION])?;

    let mut report = LabelReport::new();

    for path in files {
        report.files_checked += 1;
        let rel = rel_string(labels_dir, &path);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                report.add(LabelIssue::error(
                    LabelIssueCode::ReadFailure,
                    rel,
                    None,
                    format!("error reading file: {}", err),
                ));
                continue;
            }
        };

        for (line_idx, line) in content.lines().enumerate() {
            let line_num = line_idx + 1;
            match parse_label_line(line) {
                Ok(None) => continue,
                Ok(Some(row)) => {
                    report.annotations_checked += 1;
                    check_row(&row, &rel, line_num, opts, &mut report);
                }
                Err(err) => {
                    report.add(LabelIssue::error(
                        LabelIssueCode::MalformedLine,
                        rel.clone(),
                        Some(line_num),
                        err.to_string(),
                    ));
                }
            }
        }
    }

    Ok(report)
}

/// Run every numeric check on one parsed row. Checks do not short-circuit
/// each other: a row can collect several findings.
fn check_row(
    row: &LabelLine,
    rel: &str,
    line_num: usize,
    opts: &ValidateOptions,
    report: &mut LabelReport,
) {
    if row.class_id < 0 || row.class_id >= opts.num_classes {
        report.add(LabelIssue::error(
            LabelIssueCode::InvalidClassId,
            rel,
            Some(line_num),
            format!(
                "class_id={} outside valid range [0, {})",
                row.class_id, opts.num_classes
            ),
        ));
    }

    if let Some(expected) = opts.expect_class {
        if row.class_id != expected {
            report.add(LabelIssue::error(
                LabelIssueCode::ClassMismatch,
                rel,
                Some(line_num),
                format!("class_id={} (expected {})", row.class_id, expected),
            ));
        }
    }

    let fields = [
        ("center_x", row.cx),
        ("center_y", row.cy),
        ("width", row.w),
        ("height", row.h),
    ];
    for (name, value) in fields {
        if !(0.0..=1.0).contains(&value) {
            report.add(LabelIssue::error(
                LabelIssueCode::CoordOutOfRange,
                rel,
                Some(line_num),
                format!("{}={} out of range [0, 1]", name, value),
            ));
        }
    }

    if row.w <= 0.0 || row.h <= 0.0 {
        report.add(LabelIssue::error(
            LabelIssueCode::NonPositiveSize,
            rel,
            Some(line_num),
            "width and height must be > 0".to_string(),
        ));
    }

    let x_min = row.cx - row.w / 2.0;
    let x_max = row.cx + row.w / 2.0;
    let y_min = row.cy - row.h / 2.0;
    let y_max = row.cy + row.h / 2.0;
    if x_min < 0.0 || x_max > 1.0 || y_min < 0.0 || y_max > 1.0 {
        report.add(LabelIssue::error(
            LabelIssueCode::BoxOutOfBounds,
            rel,
            Some(line_num),
            "bounding box extends beyond image boundaries".to_string(),
        ));
    }
}
