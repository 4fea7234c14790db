//! Duplicate-filename detection.
//!
//! Groups every file under a root by basename and reports groups with more
//! than one member. Detection is name-based on purpose: it catches the same
//! frame landing in two dataset splits, which content hashing would miss
//! once the copies diverge by a single re-encode.

mod report;

pub use report::{DuplicateReport, DuplicateSet};

use std::collections::BTreeMap;
use std::path::Path;

use walkdir::WalkDir;

use crate::dataset::rel_string;
use crate::error::YolocheckError;

/// Scan `root` recursively for files sharing a basename.
pub fn scan_duplicates(root: &Path) -> Result<DuplicateReport, YolocheckError> {
    if !root.is_dir() {
        return Err(YolocheckError::LayoutInvalid {
            path: root.to_path_buf(),
            message: "scan root is not a directory".to_string(),
        });
    }

    let mut by_name: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut total_files = 0usize;

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }
        total_files += 1;

        let name = entry.file_name().to_string_lossy().into_owned();
        by_name
            .entry(name)
            .or_default()
            .push(rel_string(root, entry.path()));
    }

    let sets = by_name
        .into_iter()
        .filter(|(_, paths)| paths.len() > 1)
        .map(|(name, mut paths)| {
            paths.sort();
            DuplicateSet { name, paths }
        })
        .collect();

    Ok(DuplicateReport { total_files, sets })
}
