//! Pixel-range and pairing report types.

use serde::Serialize;
use std::fmt;

/// Classification of every image under a directory by decode outcome.
///
/// Each image lands in exactly one of the three lists.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PixelRangeReport {
    /// Decoded to 8-bit samples; observed min/max recorded.
    pub valid_range: Vec<RangeEntry>,
    /// Decoded, but to a non-byte sample depth.
    pub invalid_range: Vec<DepthEntry>,
    /// Could not be decoded at all.
    pub unreadable: Vec<UnreadableEntry>,
}

impl PixelRangeReport {
    pub fn total_checked(&self) -> usize {
        self.valid_range.len() + self.invalid_range.len() + self.unreadable.len()
    }

    pub fn error_count(&self) -> usize {
        self.invalid_range.len() + self.unreadable.len()
    }

    pub fn is_clean(&self) -> bool {
        self.error_count() == 0
    }
}

impl fmt::Display for PixelRangeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Checked {} image(s)", self.total_checked())?;

        if !self.valid_range.is_empty() {
            writeln!(
                f,
                "Valid [0, 255] range: {} image(s)",
                self.valid_range.len()
            )?;
        }
        if !self.invalid_range.is_empty() {
            writeln!(f, "Unexpected pixel depth ({}):", self.invalid_range.len())?;
            for entry in &self.invalid_range {
                writeln!(f, "  {} ({})", entry.path, entry.color)?;
            }
        }
        if !self.unreadable.is_empty() {
            writeln!(f, "Unreadable ({}):", self.unreadable.len())?;
            for entry in &self.unreadable {
                writeln!(f, "  {}: {}", entry.path, entry.reason)?;
            }
        }
        if self.is_clean() {
            writeln!(f, "All images decode to the standard [0, 255] byte range")?;
        }

        Ok(())
    }
}

/// An image with byte-valued samples.
#[derive(Clone, Debug, Serialize)]
pub struct RangeEntry {
    pub path: String,
    pub min: u8,
    pub max: u8,
}

/// An image decoding to an anomalous sample depth.
#[derive(Clone, Debug, Serialize)]
pub struct DepthEntry {
    pub path: String,
    /// The decoded color layout, e.g. `L16`.
    pub color: String,
}

/// An image that failed to decode.
#[derive(Clone, Debug, Serialize)]
pub struct UnreadableEntry {
    pub path: String,
    pub reason: String,
}

/// Presence check between the `images/` and `labels/` trees.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PairingReport {
    pub images_checked: usize,
    pub labels_checked: usize,
    /// Image paths (relative) lacking a same-stem label file.
    pub missing_labels: Vec<String>,
    /// Label paths (relative) lacking a same-stem image file.
    pub missing_images: Vec<String>,
}

impl PairingReport {
    pub fn warning_count(&self) -> usize {
        self.missing_labels.len() + self.missing_images.len()
    }

    pub fn is_clean(&self) -> bool {
        self.warning_count() == 0
    }
}

impl fmt::Display for PairingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Checked {} image(s) against {} label file(s)",
            self.images_checked, self.labels_checked
        )?;

        if !self.missing_labels.is_empty() {
            writeln!(f, "Images missing a label file ({}):", self.missing_labels.len())?;
            for path in &self.missing_labels {
                writeln!(f, "  {}", path)?;
            }
        }
        if !self.missing_images.is_empty() {
            writeln!(f, "Labels missing an image file ({}):", self.missing_images.len())?;
            for path in &self.missing_images {
                writeln!(f, "  {}", path)?;
            }
        }
        if self.is_clean() {
            writeln!(f, "Every image has a label file and vice versa")?;
        }

        Ok(())
    }
}
