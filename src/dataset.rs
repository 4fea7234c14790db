//! Dataset layout discovery and image/label pairing.
//!
//! A dataset root contains an `images/` tree and a sibling `labels/` tree;
//! a label file shares its relative stem with exactly one image file. All
//! traversal helpers return lexicographically sorted paths so that reports
//! are deterministic across runs.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use walkdir::WalkDir;

use crate::error::YolocheckError;

/// Extensions considered to be corpus images.
pub const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "bmp", "tif", "tiff", "webp"];

/// Extension of YOLO label files.
pub const LABEL_EXTENSION: &str = "txt";

/// Resolved `images/` + `labels/` directories for a dataset root.
#[derive(Clone, Debug)]
pub struct DatasetLayout {
    pub root: PathBuf,
    pub images_dir: PathBuf,
    pub labels_dir: PathBuf,
}

/// Resolve the layout for `root`, which must contain `images/` and `labels/`.
pub fn discover_layout(root: &Path) -> Result<DatasetLayout, YolocheckError> {
    if !root.is_dir() {
        return Err(YolocheckError::LayoutInvalid {
            path: root.to_path_buf(),
            message: "dataset root is not a directory".to_string(),
        });
    }

    let images_dir = root.join("images");
    if !images_dir.is_dir() {
        return Err(YolocheckError::LayoutInvalid {
            path: images_dir,
            message: "missing images/ directory".to_string(),
        });
    }

    let labels_dir = root.join("labels");
    if !labels_dir.is_dir() {
        return Err(YolocheckError::LayoutInvalid {
            path: labels_dir,
            message: "missing labels/ directory".to_string(),
        });
    }

    Ok(DatasetLayout {
        root: root.to_path_buf(),
        images_dir,
        labels_dir,
    })
}

/// Collect every file under `root` with one of `extensions`, sorted by
/// relative path. Unreadable directory entries are skipped, matching the
/// degrade-and-continue behavior of the scans.
pub fn collect_files_with_extensions(
    root: &Path,
    extensions: &[&str],
) -> Result<Vec<PathBuf>, YolocheckError> {
    if !root.is_dir() {
        return Err(YolocheckError::LayoutInvalid {
            path: root.to_path_buf(),
            message: "scan root is not a directory".to_string(),
        });
    }

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file() && has_extension(entry.path(), extensions))
        .map(|entry| entry.path().to_path_buf())
        .collect();

    files.sort_by_cached_key(|path| rel_string(root, path));
    Ok(files)
}

/// Case-insensitive extension membership test.
pub fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    allowed
        .iter()
        .any(|allowed_ext| ext.eq_ignore_ascii_case(allowed_ext))
}

/// Forward-slashed path relative to `root`, for display and sorting.
pub fn rel_string(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}

/// Relative stem (relative path minus extension) used to pair files.
pub fn rel_stem(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.with_extension("")
        .to_string_lossy()
        .replace('\\', "/")
}

/// Resolve the label file that annotates `image_path`.
///
/// With an explicit `labels_dir` the label is `<labels_dir>/<stem>.txt`.
/// Otherwise the deepest `images` component of the image's directory is
/// swapped for `labels`; an image outside any `images/` tree pairs with a
/// label next to it.
pub fn label_path_for_image(image_path: &Path, labels_dir: Option<&Path>) -> PathBuf {
    let mut file_name: OsString = image_path
        .file_stem()
        .map(|stem| stem.to_os_string())
        .unwrap_or_default();
    file_name.push(".");
    file_name.push(LABEL_EXTENSION);

    if let Some(dir) = labels_dir {
        return dir.join(file_name);
    }

    let parent = image_path.parent().unwrap_or_else(|| Path::new(""));
    let components: Vec<_> = parent.components().collect();
    let swap_at = components
        .iter()
        .rposition(|component| component.as_os_str() == "images");

    let mut dir = PathBuf::new();
    for (index, component) in components.iter().enumerate() {
        if Some(index) == swap_at {
            dir.push("labels");
        } else {
            dir.push(component.as_os_str());
        }
    }

    dir.join(file_name)
}

/// Find the image file annotated by a label at `label_rel` under `images_dir`.
///
/// Extensions are probed in declaration order, so a `.jpg` wins over a
/// `.png` sharing the stem.
pub fn image_for_label(images_dir: &Path, label_rel: &Path) -> Option<PathBuf> {
    let stem_rel = label_rel.with_extension("");
    for ext in IMAGE_EXTENSIONS {
        let candidate = images_dir.join(&stem_rel).with_extension(ext);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

#[derive(Debug, Deserialize)]
struct DataYaml {
    names: DataYamlNames,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DataYamlNames {
    Sequence(Vec<String>),
    Mapping(BTreeMap<usize, String>),
}

/// Discover the class count from `data.yaml` or `classes.txt` at the root.
///
/// Returns `Ok(None)` when neither file is present; the caller decides
/// whether an explicit `--classes` value is required instead.
pub fn discover_class_count(root: &Path) -> Result<Option<usize>, YolocheckError> {
    let data_yaml = root.join("data.yaml");
    if data_yaml.is_file() {
        let data = fs::read_to_string(&data_yaml)?;
        let parsed: DataYaml =
            serde_yaml::from_str(&data).map_err(|source| YolocheckError::ClassMapParse {
                path: data_yaml,
                source,
            })?;

        let count = match parsed.names {
            DataYamlNames::Sequence(names) => names.len(),
            DataYamlNames::Mapping(mapping) => {
                mapping.keys().max().map(|max| max + 1).unwrap_or(0)
            }
        };
        return Ok(Some(count));
    }

    let classes_txt = root.join("classes.txt");
    if classes_txt.is_file() {
        let data = fs::read_to_string(&classes_txt)?;
        let count = data.lines().filter(|line| !line.trim().is_empty()).count();
        return Ok(Some(count));
    }

    Ok(None)
}
