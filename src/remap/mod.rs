//! Class-ID remapping over a label directory.
//!
//! Rewrites `old_id -> new_id` in place across every label file. Lines
//! that fail to parse are preserved verbatim and counted; a file is only
//! rewritten when at least one of its lines actually changed.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use crate::dataset::{collect_files_with_extensions, rel_string, LABEL_EXTENSION};
use crate::error::YolocheckError;
use crate::label::parse_label_line;

/// Tally of a remap run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RemapOutcome {
    pub files_scanned: usize,
    pub files_rewritten: usize,
    pub lines_remapped: usize,
    /// Lines that did not parse and were left untouched.
    pub parse_failures: usize,
    /// Files that could not be read or written.
    pub io_failures: Vec<String>,
}

impl fmt::Display for RemapOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Remapped {} line(s) across {} of {} file(s)",
            self.lines_remapped, self.files_rewritten, self.files_scanned
        )?;
        if self.parse_failures > 0 {
            writeln!(f, "Left {} unparsable line(s) untouched", self.parse_failures)?;
        }
        for failure in &self.io_failures {
            writeln!(f, "  {}", failure)?;
        }
        Ok(())
    }
}

/// Rewrite class IDs under `labels_dir` according to `mapping`.
///
/// With `dry_run` set the outcome is computed but nothing is written.
pub fn remap_classes(
    labels_dir: &Path,
    mapping: &BTreeMap<i64, i64>,
    dry_run: bool,
) -> Result<RemapOutcome, YolocheckError> {
    let files = collect_files_with_extensions(labels_dir, &[LABEL_EXTENSION])?;

    let mut outcome = RemapOutcome::default();

    for path in files {
        outcome.files_scanned += 1;
        let rel = rel_string(labels_dir, &path);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                warn!(path = %rel, %err, "skipping unreadable label file");
                outcome.io_failures.push(format!("{}: {}", rel, err));
                continue;
            }
        };

        let mut changed = false;
        let mut lines_out: Vec<String> = Vec::new();

        for line in content.lines() {
            match parse_label_line(line) {
                Ok(Some(row)) => {
                    if let Some(new_id) = mapping.get(&row.class_id) {
                        let mut tokens: Vec<String> = line
                            .split_whitespace()
                            .map(str::to_string)
                            .collect();
                        tokens[0] = new_id.to_string();
                        lines_out.push(tokens.join(" "));
                        outcome.lines_remapped += 1;
                        changed = true;
                    } else {
                        lines_out.push(line.trim().to_string());
                    }
                }
                Ok(None) => lines_out.push(String::new()),
                Err(_) => {
                    outcome.parse_failures += 1;
                    lines_out.push(line.trim().to_string());
                }
            }
        }

        if !changed {
            continue;
        }

        outcome.files_rewritten += 1;
        if dry_run {
            continue;
        }

        let mut rewritten = lines_out.join("\n");
        rewritten.push('\n');
        if let Err(err) = fs::write(&path, rewritten) {
            warn!(path = %rel, %err, "failed to rewrite label file");
            outcome.io_failures.push(format!("{}: {}", rel, err));
            continue;
        }
        info!(path = %rel, "rewrote label file");
    }

    Ok(outcome)
}
