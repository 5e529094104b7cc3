//! `mignet build`: demographics and rates into a migration binary plus header.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use mignet_bin::{content_digest, BuildInfo, MigrationFile, MigrationHeader};
use mignet_core::MigrationType;
use mignet_input::{load_demographics, load_rates};
use mignet_verify::{NetworkValidator, ValidationReport};

/// Inputs and outputs of one build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub demographics: PathBuf,
    pub rates: PathBuf,
    pub output: PathBuf,
    /// Header path; `<output>.json` when absent.
    pub header: Option<PathBuf>,
    pub migration_type: MigrationType,
    pub build_info: BuildInfo,
}

/// What a successful build produced.
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub node_count: usize,
    pub link_count: usize,
    pub bytes_written: usize,
    pub digest: String,
    pub header_path: PathBuf,
    pub report: ValidationReport,
}

/// Run the build and print a summary.
pub fn run(options: &BuildOptions) -> Result<()> {
    let summary = execute(options)?;

    println!(
        "Built {} network: {} nodes, {} links",
        options.migration_type, summary.node_count, summary.link_count
    );
    println!(
        "  Binary:  {} ({} bytes)",
        options.output.display(),
        summary.bytes_written
    );
    println!("  Header:  {}", summary.header_path.display());
    println!("  SHA-256: {}", summary.digest);
    println!("  Validation: {}", summary.report);

    Ok(())
}

/// Load, parse, validate, and serialize. Both outputs are staged beside
/// their targets and moved into place only once both are written.
pub fn execute(options: &BuildOptions) -> Result<BuildSummary> {
    let demographics = load_demographics(&options.demographics)
        .with_context(|| format!("loading demographics {}", options.demographics.display()))?;
    let network = load_rates(&demographics, &options.rates)
        .with_context(|| format!("loading rates {}", options.rates.display()))?;

    let (network, report) = NetworkValidator::for_type(options.migration_type).validate(network);
    for warning in &report.warnings {
        log::warn!("{warning}");
    }

    let capacity = options.migration_type.link_capacity();
    let bytes = MigrationFile::from_network(&network, capacity)
        .and_then(|file| file.to_bytes())
        .with_context(|| format!("serializing {} network", options.migration_type))?;
    let header = MigrationHeader::for_network(&network, capacity, &options.build_info)
        .and_then(|header| header.to_json())
        .context("encoding header")?;

    let header_path = options
        .header
        .clone()
        .unwrap_or_else(|| default_header_path(&options.output));

    let staged_binary = stage(&options.output, &bytes)?;
    let staged_header = stage(&header_path, header.as_bytes())?;
    staged_binary
        .persist(&options.output)
        .with_context(|| format!("writing {}", options.output.display()))?;
    if let Err(err) = staged_header.persist(&header_path) {
        let _ = fs::remove_file(&options.output);
        return Err(err).with_context(|| format!("writing {}", header_path.display()));
    }

    Ok(BuildSummary {
        node_count: network.node_count(),
        link_count: network.link_count(),
        bytes_written: bytes.len(),
        digest: content_digest(&bytes),
        header_path,
        report,
    })
}

/// Write `contents` to a temporary file beside `path`. Dropping the
/// returned handle without persisting it removes the file.
fn stage(path: &Path, contents: &[u8]) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged =
        NamedTempFile::new_in(dir).with_context(|| format!("writing {}", path.display()))?;
    staged
        .write_all(contents)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(staged)
}

/// `<binary path>.json`, keeping the binary's own extension.
pub fn default_header_path(output: &Path) -> PathBuf {
    let mut path = OsString::from(output.as_os_str());
    path.push(".json");
    PathBuf::from(path)
}

/// Current UTC time as an ISO 8601 string.
pub fn utc_now() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    format_utc(secs)
}

/// Format seconds since the Unix epoch as `YYYY-MM-DDTHH:MM:SSZ`.
fn format_utc(secs: u64) -> String {
    let (hour, minute, second) = ((secs / 3600) % 24, (secs / 60) % 60, secs % 60);

    // Civil date from a day count, with March-based years so leap days fall last.
    let days = (secs / 86_400) as i64 + 719_468;
    let era = days.div_euclid(146_097);
    let day_of_era = days.rem_euclid(146_097);
    let year_of_era = (day_of_era - day_of_era / 1460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let month_index = (5 * day_of_year + 2) / 153;
    let day = day_of_year - (153 * month_index + 2) / 5 + 1;
    let month = if month_index < 10 { month_index + 3 } else { month_index - 9 };
    let year = year_of_era + era * 400 + i64::from(month <= 2);

    format!("{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}Z")
}
