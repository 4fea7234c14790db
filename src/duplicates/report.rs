//! Duplicate-filename report types.

use serde::Serialize;
use std::fmt;

/// The result of scanning a tree for duplicate filenames.
#[derive(Clone, Debug, Default, Serialize)]
pub struct DuplicateReport {
    /// Total files seen during the walk.
    pub total_files: usize,
    /// Groups of paths sharing a filename, sorted by name.
    pub sets: Vec<DuplicateSet>,
}

impl DuplicateReport {
    /// Duplicate sets are collisions worth a look, not corruption.
    pub fn warning_count(&self) -> usize {
        self.sets.len()
    }

    pub fn is_clean(&self) -> bool {
        self.sets.is_empty()
    }
}

impl fmt::Display for DuplicateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Scanned {} file(s)", self.total_files)?;

        if self.sets.is_empty() {
            return writeln!(f, "No duplicate filenames found");
        }

        writeln!(f, "Found {} set(s) of duplicate filenames:", self.sets.len())?;
        for (index, set) in self.sets.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "Set {} ('{}'):", index + 1, set.name)?;
            for path in &set.paths {
                writeln!(f, "  - {}", path)?;
            }
        }

        Ok(())
    }
}

/// Paths under the scanned root sharing one filename.
#[derive(Clone, Debug, Serialize)]
pub struct DuplicateSet {
    /// The colliding filename.
    pub name: String,
    /// Every path carrying it, sorted, relative to the scan root.
    pub paths: Vec<String>,
}
