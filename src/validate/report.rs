//! Label validation report types.
//!
//! Findings are tagged records (code + location + message) so one structure
//! feeds both the console rendering and the JSON output.

use serde::Serialize;
use std::fmt;

/// The result of validating a label directory.
#[derive(Clone, Debug, Default, Serialize)]
pub struct LabelReport {
    /// Number of label files scanned.
    pub files_checked: usize,
    /// Number of annotation rows that parsed.
    pub annotations_checked: usize,
    /// All findings, in path/line order.
    pub issues: Vec<LabelIssue>,
}

impl LabelReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, issue: LabelIssue) {
        self.issues.push(issue);
    }

    /// Returns the number of error findings.
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == Severity::Error)
            .count()
    }

    /// Returns the number of warning findings.
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == Severity::Warning)
            .count()
    }

    /// Returns true if there are no findings at all.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for LabelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Checked {} label file(s) with {} annotation(s)",
            self.files_checked, self.annotations_checked
        )?;

        if self.issues.is_empty() {
            return writeln!(f, "All annotations are valid");
        }

        writeln!(f, "Found {} annotation issue(s):", self.issues.len())?;
        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }

        Ok(())
    }
}

/// A single label validation finding.
#[derive(Clone, Debug, Serialize)]
pub struct LabelIssue {
    pub severity: Severity,
    pub code: LabelIssueCode,
    /// Path of the label file, relative to the scanned directory.
    pub path: String,
    /// 1-based line number, absent for whole-file findings.
    pub line: Option<usize>,
    pub message: String,
}

impl LabelIssue {
    pub fn error(
        code: LabelIssueCode,
        path: impl Into<String>,
        line: Option<usize>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Error,
            code,
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for LabelIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN ",
        };
        match self.line {
            Some(line) => write!(
                f,
                "[{}] {:?} in {}:{}: {}",
                severity, self.code, self.path, line, self.message
            ),
            None => write!(
                f,
                "[{}] {:?} in {}: {}",
                severity, self.code, self.path, self.message
            ),
        }
    }
}

/// The severity of a finding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Severity {
    /// Worth surfacing but does not invalidate the dataset.
    Warning,
    /// Invalid or corrupt annotation data.
    Error,
}

/// A stable code identifying the type of label finding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum LabelIssueCode {
    /// The label file could not be read.
    ReadFailure,
    /// A line did not parse into 5 numeric tokens.
    MalformedLine,
    /// `class_id` outside `[0, num_classes)`.
    InvalidClassId,
    /// A normalized coordinate outside `[0, 1]`.
    CoordOutOfRange,
    /// Zero or negative box width/height.
    NonPositiveSize,
    /// Box edges extend beyond the image boundaries.
    BoxOutOfBounds,
    /// `class_id` differs from the single expected class.
    ClassMismatch,
}
