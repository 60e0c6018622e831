//! Export ingestion
//!
//! This module streams an Apple Health export and keeps the target year:
//!
//! - **reader**: `quick_xml`-backed element reader (tag-open events only)
//! - **accumulator**: Year filter, global counters and retained collections
//! - **error**: Error types
//!
//! # Architecture
//!
//! ```text
//! export.xml / export.zip → ElementReader → YearAccumulator → YearDataset
//! ```
//!
//! The reader pushes one element at a time and the accumulator handles it
//! before the next is parsed, so memory follows the retained subset rather
//! than the size of the export.

pub mod accumulator;
pub mod error;
pub mod reader;

pub use accumulator::{ExportTotals, YearAccumulator, YearDataset, DEFAULT_PROGRESS_INTERVAL};
pub use error::{IngestError, IngestResult};
pub use reader::ElementReader;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Stream an export from any buffered reader
pub fn ingest_reader<R: BufRead>(input: R, mut accumulator: YearAccumulator) -> IngestResult<YearDataset> {
    let elements = ElementReader::new(input).for_each_element(|el| accumulator.observe(el))?;
    tracing::debug!(elements, "Reader reached end of document");
    Ok(accumulator.finish())
}

/// Stream an export from disk
///
/// Accepts the raw `export.xml` or the `.zip` archive the Health app
/// produces; archives are decompressed on the fly, never extracted.
pub fn ingest_path(path: &Path, accumulator: YearAccumulator) -> IngestResult<YearDataset> {
    if !path.exists() {
        return Err(IngestError::InputMissing(path.to_path_buf()));
    }

    tracing::info!(
        path = %path.display(),
        year = %accumulator.target_year(),
        "Streaming export"
    );

    if is_zip(path) {
        ingest_zip(path, accumulator)
    } else {
        let file = File::open(path)?;
        ingest_reader(BufReader::with_capacity(READ_BUFFER_SIZE, file), accumulator)
    }
}

fn is_zip(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("zip"))
        .unwrap_or(false)
}

fn ingest_zip(path: &Path, accumulator: YearAccumulator) -> IngestResult<YearDataset> {
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))?;

    // Apple nests it as apple_health_export/export.xml
    let entry_name = archive
        .file_names()
        .find(|name| name.ends_with("export.xml") || name.ends_with("Export.xml"))
        .map(str::to_string)
        .ok_or_else(|| IngestError::ExportNotFound(path.to_path_buf()))?;

    tracing::debug!(entry = %entry_name, "Reading export from archive");

    let entry = archive.by_name(&entry_name)?;
    ingest_reader(BufReader::with_capacity(READ_BUFFER_SIZE, entry), accumulator)
}
