//! Recording catalog: the static table of known CWRU recordings.
//!
//! One recording per line, whitespace-delimited:
//!
//! ```text
//! family speed recording-id url
//! 12DriveEndFault 1797 0.007-Ball https://engineering.case.edu/sites/default/files/118.mat
//! ```
//!
//! Blank lines and `#` comments are ignored. The catalog shipped with the crate
//! is embedded at compile time; a replacement table can be loaded from disk.

use crate::domain::{ExperimentFamily, RecordingDescriptor, Rpm};
use std::path::{Path, PathBuf};
use thiserror::Error;

const EMBEDDED_CATALOG: &str = include_str!("../data/metadata.txt");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("read catalog {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },
}

/// The complete list of known recordings, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    entries: Vec<RecordingDescriptor>,
}

impl Catalog {
    /// The catalog compiled into the crate.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::parse(EMBEDDED_CATALOG)
    }

    /// Load a catalog table from a file.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse a catalog table.
    pub fn parse(content: &str) -> Result<Self, CatalogError> {
        let mut entries = Vec::new();
        for (i, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            entries.push(parse_line(line, i + 1)?);
        }
        Ok(Self { entries })
    }

    pub fn from_entries(entries: Vec<RecordingDescriptor>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[RecordingDescriptor] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Recordings for one (family, speed) pair plus the baseline at that speed.
    ///
    /// Catalog order is preserved; the position of a descriptor in the returned
    /// list is its class label.
    pub fn select(&self, family: ExperimentFamily, rpm: Rpm) -> Vec<RecordingDescriptor> {
        self.entries
            .iter()
            .filter(|e| (e.family == family || e.family.is_baseline()) && e.rpm == rpm)
            .cloned()
            .collect()
    }
}

fn parse_line(line: &str, line_no: usize) -> Result<RecordingDescriptor, CatalogError> {
    let malformed = |reason: String| CatalogError::MalformedLine {
        line: line_no,
        reason,
    };

    let cols: Vec<&str> = line.split_whitespace().collect();
    if cols.len() < 4 {
        return Err(malformed(format!(
            "expected 4 columns (family speed id url), found {}",
            cols.len()
        )));
    }

    let family: ExperimentFamily = cols[0].parse().map_err(|e| malformed(format!("{e}")))?;
    let rpm: Rpm = cols[1].parse().map_err(|e| malformed(format!("{e}")))?;

    Ok(RecordingDescriptor {
        family,
        rpm,
        id: cols[2].to_string(),
        url: cols[3].to_string(),
    })
}
