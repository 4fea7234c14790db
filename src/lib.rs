//! Yolocheck: validation and curation for YOLO detection datasets.
//!
//! Yolocheck scans a dataset laid out as `images/` plus sibling `labels/`
//! trees and reports what a training run would trip over: malformed or
//! out-of-bounds annotations, filename collisions, undecodable or
//! anomalous images, low-quality frames, and size outliers. Flagged
//! image/label pairs can be pruned behind a single confirmation.
//!
//! # Modules
//!
//! - [`dataset`]: layout discovery and image/label pairing
//! - [`label`]: single-line YOLO record parsing
//! - [`validate`]: label-format validation
//! - [`duplicates`]: duplicate-filename scanning
//! - [`integrity`]: decode/pixel-range classification and pairing checks
//! - [`quality`]: quality buckets and size-distribution analysis
//! - [`prune`]: confirm-gated deletion of flagged pairs
//! - [`remap`]: class-ID rewriting
//! - [`error`]: error types for yolocheck operations

pub mod dataset;
pub mod duplicates;
pub mod error;
pub mod integrity;
pub mod label;
pub mod prune;
pub mod quality;
pub mod remap;
pub mod validate;

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;

pub use error::YolocheckError;

use prune::PrunePlan;
use quality::QualityIssueKind;

/// The yolocheck CLI application.
#[derive(Parser)]
#[command(name = "yolocheck")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Run every read-only check against a dataset root.
    Check(CheckArgs),
    /// Validate YOLO label files for format and bounds errors.
    Labels(LabelsArgs),
    /// Find files sharing a name across subdirectories.
    Duplicates(DuplicatesArgs),
    /// Decode images, classify pixel ranges, and check label pairing.
    Integrity(IntegrityArgs),
    /// Flag low-quality images, optionally deleting flagged pairs.
    Quality(QualityArgs),
    /// Analyze the image size distribution, optionally pruning oversized pairs.
    Sizes(SizesArgs),
    /// Rewrite class IDs across a label directory.
    Remap(RemapArgs),
}

/// Arguments for the check subcommand.
#[derive(clap::Args)]
struct CheckArgs {
    /// Dataset root containing images/ and labels/.
    root: PathBuf,

    /// Number of classes; discovered from data.yaml or classes.txt when omitted.
    #[arg(long)]
    classes: Option<i64>,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,
}

/// Arguments for the labels subcommand.
#[derive(clap::Args)]
struct LabelsArgs {
    /// Label directory to validate.
    labels_dir: PathBuf,

    /// Number of classes; discovered from the parent directory's
    /// data.yaml or classes.txt when omitted.
    #[arg(long)]
    classes: Option<i64>,

    /// Additionally require every class ID to equal this value.
    #[arg(long)]
    expect_class: Option<i64>,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,
}

/// Arguments for the duplicates subcommand.
#[derive(clap::Args)]
struct DuplicatesArgs {
    /// Directory tree to scan.
    root: PathBuf,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,
}

/// Arguments for the integrity subcommand.
#[derive(clap::Args)]
struct IntegrityArgs {
    /// Image directory to scan.
    images_dir: PathBuf,

    /// Label directory for the pairing check; defaults to the sibling
    /// labels/ directory when present.
    #[arg(long)]
    labels: Option<PathBuf>,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,
}

/// Arguments for the quality subcommand.
#[derive(clap::Args)]
struct QualityArgs {
    /// Image directory to scan.
    images_dir: PathBuf,

    /// Minimum acceptable width in pixels.
    #[arg(long, default_value_t = 64)]
    min_width: u32,

    /// Minimum acceptable height in pixels.
    #[arg(long, default_value_t = 64)]
    min_height: u32,

    /// Maximum acceptable aspect ratio, max(w/h, h/w).
    #[arg(long, default_value_t = 5.0)]
    max_aspect: f64,

    /// Grayscale variance below which an image counts as near-blank.
    #[arg(long, default_value_t = 3.0)]
    min_variance: f64,

    /// Delete flagged pairs with this issue kind (repeatable).
    #[arg(long = "delete", value_name = "KIND")]
    delete: Vec<String>,

    /// Delete flagged pairs regardless of issue kind.
    #[arg(long)]
    delete_all: bool,

    /// Label directory override; defaults to the sibling labels/ tree.
    #[arg(long)]
    labels: Option<PathBuf>,

    /// Skip the confirmation prompt.
    #[arg(long)]
    yes: bool,

    /// Show the deletion plan without removing anything.
    #[arg(long)]
    dry_run: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,
}

/// Arguments for the sizes subcommand.
#[derive(clap::Args)]
struct SizesArgs {
    /// Image directory to scan.
    images_dir: PathBuf,

    /// Target resolution, e.g. 640x640.
    #[arg(long, default_value = "640x640")]
    target: String,

    /// Delete pairs whose images exceed --max-dim on either axis.
    #[arg(long)]
    delete_oversized: bool,

    /// Dimension above which an image counts as oversized.
    #[arg(long, default_value_t = 820)]
    max_dim: u32,

    /// Label directory override; defaults to the sibling labels/ tree.
    #[arg(long)]
    labels: Option<PathBuf>,

    /// Skip the confirmation prompt.
    #[arg(long)]
    yes: bool,

    /// Show the deletion plan without removing anything.
    #[arg(long)]
    dry_run: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the remap subcommand.
#[derive(clap::Args)]
struct RemapArgs {
    /// Label directory to rewrite.
    labels_dir: PathBuf,

    /// Class mapping OLD=NEW (repeatable).
    #[arg(long = "map", value_name = "OLD=NEW", required = true)]
    map: Vec<String>,

    /// Count what would change without writing.
    #[arg(long)]
    dry_run: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Run the yolocheck CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), YolocheckError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Check(args)) => run_check(args),
        Some(Commands::Labels(args)) => run_labels(args),
        Some(Commands::Duplicates(args)) => run_duplicates(args),
        Some(Commands::Integrity(args)) => run_integrity(args),
        Some(Commands::Quality(args)) => run_quality(args),
        Some(Commands::Sizes(args)) => run_sizes(args),
        Some(Commands::Remap(args)) => run_remap(args),
        None => {
            println!("yolocheck {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Validation and curation for YOLO detection datasets.");
            println!();
            println!("Run 'yolocheck --help' for usage information.");
            Ok(())
        }
    }
}

/// Render a report as text or pretty JSON.
fn emit<T: Serialize + fmt::Display>(report: &T, output: &str) -> Result<(), YolocheckError> {
    match output {
        "json" => println!("{}", serde_json::to_string_pretty(report)?),
        "text" => print!("{}", report),
        other => return Err(YolocheckError::UnsupportedOutput(other.to_string())),
    }
    Ok(())
}

/// Exit policy: errors always fail, warnings fail under --strict.
fn finish(error_count: usize, warning_count: usize, strict: bool) -> Result<(), YolocheckError> {
    if error_count > 0 || (strict && warning_count > 0) {
        Err(YolocheckError::CheckFailed {
            error_count,
            warning_count,
        })
    } else {
        Ok(())
    }
}

/// Resolve the class count from the flag or the dataset's class map.
fn resolve_class_count(
    explicit: Option<i64>,
    map_root: Option<&Path>,
) -> Result<i64, YolocheckError> {
    if let Some(classes) = explicit {
        if classes <= 0 {
            return Err(YolocheckError::InvalidParams {
                message: "--classes must be greater than 0".to_string(),
            });
        }
        return Ok(classes);
    }

    if let Some(root) = map_root {
        if let Some(count) = dataset::discover_class_count(root)? {
            return Ok(count as i64);
        }
    }

    Err(YolocheckError::InvalidParams {
        message: "class count unknown; pass --classes or provide data.yaml / classes.txt"
            .to_string(),
    })
}

/// Default the label directory to the sibling `labels/` tree.
fn sibling_labels_dir(images_dir: &Path, explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(|| {
        let candidate = images_dir.parent()?.join("labels");
        candidate.is_dir().then_some(candidate)
    })
}

/// Ask the operator for a single explicit confirmation.
fn confirm_deletion(count: usize) -> bool {
    print!(
        "Delete {} image(s) and their labels? (y/yes/n/no): ",
        count
    );
    let _ = io::stdout().flush();

    let mut response = String::new();
    if io::stdin().lock().read_line(&mut response).is_err() {
        return false;
    }
    matches!(response.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Display a plan and apply it behind the confirmation gate.
fn run_prune_flow(plan: &PrunePlan, yes: bool, dry_run: bool) {
    if plan.is_empty() {
        println!("No files to delete.");
        return;
    }

    print!("{}", plan);

    if dry_run {
        println!("Dry run: no files were deleted.");
        return;
    }

    if !(yes || confirm_deletion(plan.len())) {
        println!("Deletion cancelled.");
        return;
    }

    let outcome = prune::apply(plan);
    print!("{}", outcome);
}

/// Execute the check subcommand: every read-only pass over one root.
fn run_check(args: CheckArgs) -> Result<(), YolocheckError> {
    let layout = dataset::discover_layout(&args.root)?;
    let num_classes = resolve_class_count(args.classes, Some(&layout.root))?;

    let duplicates = duplicates::scan_duplicates(&layout.root)?;
    let pixels = integrity::check_pixel_range(&layout.images_dir)?;
    let pairing = integrity::check_pairing(&layout.images_dir, &layout.labels_dir)?;
    let labels = validate::validate_labels(
        &layout.labels_dir,
        &validate::ValidateOptions {
            num_classes,
            expect_class: None,
        },
    )?;
    let sizes = quality::analyze_sizes(&layout.images_dir, &quality::SizeOptions::default())?;
    let quality_report = quality::check_quality(&layout.images_dir, &Default::default())?;

    #[derive(Serialize)]
    struct FullReport {
        duplicates: duplicates::DuplicateReport,
        pixels: integrity::PixelRangeReport,
        pairing: integrity::PairingReport,
        labels: validate::LabelReport,
        sizes: quality::SizeReport,
        quality: quality::QualityReport,
    }

    let error_count = labels.error_count() + pixels.error_count();
    let warning_count = labels.warning_count()
        + duplicates.warning_count()
        + pairing.warning_count()
        + quality_report.warning_count();

    match args.output.as_str() {
        "json" => {
            let full = FullReport {
                duplicates,
                pixels,
                pairing,
                labels,
                sizes,
                quality: quality_report,
            };
            println!("{}", serde_json::to_string_pretty(&full)?);
        }
        "text" => {
            println!("== Duplicate filenames ==");
            print!("{}", duplicates);
            println!();
            println!("== Pixel range ==");
            print!("{}", pixels);
            println!();
            println!("== Image/label pairing ==");
            print!("{}", pairing);
            println!();
            println!("== Label format ==");
            print!("{}", labels);
            println!();
            println!("== Image sizes ==");
            print!("{}", sizes);
            println!();
            println!("== Image quality ==");
            print!("{}", quality_report);
        }
        other => return Err(YolocheckError::UnsupportedOutput(other.to_string())),
    }

    finish(error_count, warning_count, args.strict)
}

/// Execute the labels subcommand.
fn run_labels(args: LabelsArgs) -> Result<(), YolocheckError> {
    let num_classes = resolve_class_count(args.classes, args.labels_dir.parent())?;

    let opts = validate::ValidateOptions {
        num_classes,
        expect_class: args.expect_class,
    };
    let report = validate::validate_labels(&args.labels_dir, &opts)?;

    emit(&report, &args.output)?;
    finish(report.error_count(), report.warning_count(), args.strict)
}

/// Execute the duplicates subcommand.
fn run_duplicates(args: DuplicatesArgs) -> Result<(), YolocheckError> {
    let report = duplicates::scan_duplicates(&args.root)?;

    emit(&report, &args.output)?;
    finish(0, report.warning_count(), args.strict)
}

/// Execute the integrity subcommand.
fn run_integrity(args: IntegrityArgs) -> Result<(), YolocheckError> {
    let pixels = integrity::check_pixel_range(&args.images_dir)?;
    let pairing = match sibling_labels_dir(&args.images_dir, args.labels) {
        Some(labels_dir) => Some(integrity::check_pairing(&args.images_dir, &labels_dir)?),
        None => None,
    };

    #[derive(Serialize)]
    struct IntegrityReport {
        pixels: integrity::PixelRangeReport,
        pairing: Option<integrity::PairingReport>,
    }

    let error_count = pixels.error_count();
    let warning_count = pairing.as_ref().map_or(0, |p| p.warning_count());

    match args.output.as_str() {
        "json" => {
            let combined = IntegrityReport { pixels, pairing };
            println!("{}", serde_json::to_string_pretty(&combined)?);
        }
        "text" => {
            print!("{}", pixels);
            match &pairing {
                Some(pairing) => print!("{}", pairing),
                None => println!("No labels directory found; pairing check skipped"),
            }
        }
        other => return Err(YolocheckError::UnsupportedOutput(other.to_string())),
    }

    finish(error_count, warning_count, args.strict)
}

/// Execute the quality subcommand.
fn run_quality(args: QualityArgs) -> Result<(), YolocheckError> {
    let kinds: Vec<QualityIssueKind> = args
        .delete
        .iter()
        .map(|raw| {
            raw.parse()
                .map_err(|message| YolocheckError::InvalidParams { message })
        })
        .collect::<Result<_, _>>()?;

    let opts = quality::QualityOptions {
        min_width: args.min_width,
        min_height: args.min_height,
        max_aspect_ratio: args.max_aspect,
        min_variance: args.min_variance,
    };
    let report = quality::check_quality(&args.images_dir, &opts)?;

    emit(&report, &args.output)?;

    if !kinds.is_empty() || args.delete_all {
        let filter = if args.delete_all { Vec::new() } else { kinds };
        let labels_dir = sibling_labels_dir(&args.images_dir, args.labels);
        let plan = prune::plan_from_quality(&report, &filter, labels_dir.as_deref());
        run_prune_flow(&plan, args.yes, args.dry_run);
    }

    finish(0, report.warning_count(), args.strict)
}

/// Execute the sizes subcommand.
fn run_sizes(args: SizesArgs) -> Result<(), YolocheckError> {
    let (target_width, target_height) = parse_target(&args.target)?;

    let opts = quality::SizeOptions {
        target_width,
        target_height,
    };
    let report = quality::analyze_sizes(&args.images_dir, &opts)?;

    emit(&report, &args.output)?;

    if args.delete_oversized {
        let labels_dir = sibling_labels_dir(&args.images_dir, args.labels);
        let plan = prune::plan_from_oversized(&report, args.max_dim, labels_dir.as_deref());
        run_prune_flow(&plan, args.yes, args.dry_run);
    }

    Ok(())
}

/// Execute the remap subcommand.
fn run_remap(args: RemapArgs) -> Result<(), YolocheckError> {
    let mut mapping = BTreeMap::new();
    for raw in &args.map {
        let (old, new) = parse_mapping(raw)?;
        mapping.insert(old, new);
    }

    let outcome = remap::remap_classes(&args.labels_dir, &mapping, args.dry_run)?;
    if args.dry_run {
        println!("Dry run: no files were written.");
    }
    emit(&outcome, &args.output)
}

/// Parse a WxH resolution argument.
fn parse_target(raw: &str) -> Result<(u32, u32), YolocheckError> {
    let invalid = || YolocheckError::InvalidParams {
        message: format!("invalid --target '{}'; expected WIDTHxHEIGHT, e.g. 640x640", raw),
    };

    let (w, h) = raw.split_once(['x', 'X']).ok_or_else(invalid)?;
    let width = w.trim().parse::<u32>().map_err(|_| invalid())?;
    let height = h.trim().parse::<u32>().map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(invalid());
    }
    Ok((width, height))
}

/// Parse an OLD=NEW class mapping argument.
fn parse_mapping(raw: &str) -> Result<(i64, i64), YolocheckError> {
    let invalid = || YolocheckError::InvalidParams {
        message: format!("invalid --map '{}'; expected OLD=NEW, e.g. 1=3", raw),
    };

    let (old, new) = raw.split_once('=').ok_or_else(invalid)?;
    let old = old.trim().parse::<i64>().map_err(|_| invalid())?;
    let new = new.trim().parse::<i64>().map_err(|_| invalid())?;
    Ok((old, new))
}
